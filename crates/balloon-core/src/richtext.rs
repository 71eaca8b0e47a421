//! Rich-text markup parsing into flat style runs.
//!
//! The editor stores bubble text as simple markup: `<br>` variants mark
//! forced line breaks, any other tag is presentational noise from the
//! contentEditable surface and gets stripped. Style is uniform across the
//! whole input (flat runs inherited from the default style); malformed
//! markup degrades to literal text, never an error.

use crate::bubble::TextStyle;

/// A parsed piece of bubble text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSegment {
    /// A contiguous run of one style.
    Text { text: String, style: TextStyle },
    /// Forced line break between fragments.
    LineBreak,
}

/// Parse markup into an ordered segment sequence.
///
/// Splits on line-break tags case-insensitively, strips every remaining tag,
/// decodes the common HTML entities, drops empty fragments, and places a
/// [`TextSegment::LineBreak`] between consecutive surviving fragments (never
/// after the last).
pub fn parse(markup: &str, default_style: &TextStyle) -> Vec<TextSegment> {
    let mut fragments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        current.push_str(&rest[..lt]);
        let after_lt = &rest[lt..];
        match after_lt.find('>') {
            Some(gt) => {
                let tag = &after_lt[1..gt];
                if is_line_break_tag(tag) {
                    fragments.push(std::mem::take(&mut current));
                }
                // Any other tag is stripped.
                rest = &after_lt[gt + 1..];
            }
            None => {
                // Unterminated tag: keep it as literal text.
                current.push_str(after_lt);
                rest = "";
            }
        }
    }
    current.push_str(rest);
    fragments.push(current);

    let mut segments = Vec::new();
    for fragment in fragments {
        let text = decode_entities(&fragment);
        if text.is_empty() {
            continue;
        }
        if !segments.is_empty() {
            segments.push(TextSegment::LineBreak);
        }
        segments.push(TextSegment::Text {
            text,
            style: default_style.clone(),
        });
    }
    segments
}

/// `br`, `br/`, `br /`, attributes tolerated, case-insensitive.
fn is_line_break_tag(tag: &str) -> bool {
    let name = tag
        .trim()
        .trim_end_matches('/')
        .split_whitespace()
        .next()
        .unwrap_or("");
    name.eq_ignore_ascii_case("br")
}

fn decode_entities(s: &str) -> String {
    // `&amp;` decodes last so `&amp;lt;` stays a literal `&lt;`.
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segments: &[TextSegment]) -> Vec<&str> {
        segments
            .iter()
            .map(|s| match s {
                TextSegment::Text { text, .. } => text.as_str(),
                TextSegment::LineBreak => "\n",
            })
            .collect()
    }

    #[test]
    fn splits_on_br_variants() {
        let style = TextStyle::default();
        for markup in ["a<br>b", "a<BR>b", "a<br/>b", "a<br />b", "a<br class=\"x\">b"] {
            let segments = parse(markup, &style);
            assert_eq!(texts(&segments), vec!["a", "\n", "b"], "markup: {markup}");
        }
    }

    #[test]
    fn strips_style_tags() {
        let segments = parse("<b>bold</b> and <i>slanted</i>", &TextStyle::default());
        assert_eq!(texts(&segments), vec!["bold and slanted"]);
    }

    #[test]
    fn drops_empty_fragments_and_trailing_breaks() {
        let segments = parse("a<br><br>b<br>", &TextStyle::default());
        assert_eq!(texts(&segments), vec!["a", "\n", "b"]);
    }

    #[test]
    fn decodes_entities() {
        let segments = parse("1 &lt; 2 &amp;&amp; 2 &gt; 1", &TextStyle::default());
        assert_eq!(texts(&segments), vec!["1 < 2 && 2 > 1"]);
    }

    #[test]
    fn malformed_markup_degrades_to_text() {
        let segments = parse("oops <unclosed", &TextStyle::default());
        assert_eq!(texts(&segments), vec!["oops <unclosed"]);
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(parse("", &TextStyle::default()).is_empty());
        assert!(parse("<br>", &TextStyle::default()).is_empty());
    }

    #[test]
    fn style_is_inherited_from_default() {
        let style = TextStyle { bold: true, ..TextStyle::default() };
        let segments = parse("hi", &style);
        assert!(matches!(
            &segments[0],
            TextSegment::Text { style, .. } if style.bold
        ));
    }
}
