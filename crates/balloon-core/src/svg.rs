//! SVG generation for bubble documents.
//!
//! Walks the document's bubbles in stacking order and emits one `<g>` per
//! bubble: the body outline as a `<path>`, dot ornaments as `<circle>`s,
//! and the laid-out text as `<text>`/`<line>` elements painted through the
//! [`TextPainter`] seam.

use crate::bubble::{Archetype, Bubble, Rect};
use crate::bounds::bbox;
use crate::fit;
use crate::measure::TextMeasurer;
use crate::path::{self, fmt_num};
use crate::render::{self, FontMap, TextPainter};
use crate::{BalloonDocument, FontSource};

/// Options for SVG generation.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Include XML declaration
    pub xml_declaration: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
        }
    }
}

/// Generated SVG plus the canvas size it settled on.
#[derive(Debug, Clone)]
pub struct SvgOutput {
    pub svg: String,
    pub width: f32,
    pub height: f32,
}

/// Stroke width of bubble outlines.
const OUTLINE_WIDTH: f32 = 2.0;
/// Dash pattern for whisper outlines.
const WHISPER_DASH: &str = "6 4";

/// Render every bubble of a document into one SVG canvas.
///
/// The canvas covers the union of all bubble bounding boxes; bubbles are
/// translated so the canvas origin is at the union's top-left. Non-fatal
/// conditions (unattachable tails, overflowing text) land in `warnings`.
pub fn generate_svg(
    doc: &BalloonDocument,
    options: &SvgOptions,
    measure: &mut dyn TextMeasurer,
    warnings: &mut Vec<String>,
) -> SvgOutput {
    let mut bubbles: Vec<&Bubble> = doc.bubbles.iter().collect();
    bubbles.sort_by_key(|b| b.z);

    let canvas = bubbles
        .iter()
        .map(|b| bbox(b).translate(b.x, b.y))
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 });

    let mut out = String::new();
    if options.xml_declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" \
         width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = fmt_num(canvas.width),
        h = fmt_num(canvas.height),
    ));

    push_font_faces(&mut out, &doc.meta.fonts);

    let font_map: FontMap = doc
        .meta
        .fonts
        .iter()
        .map(|f| (f.family.clone(), f.family.clone()))
        .collect();

    for bubble in bubbles {
        let mut bubble = bubble.clone();
        if bubble.font_family.is_none() {
            bubble.font_family = doc.meta.font_family.clone();
        }
        render_bubble(&mut out, &bubble, &canvas, &font_map, doc.meta.auto_fit, measure, warnings);
    }

    out.push_str("</svg>");
    SvgOutput {
        svg: out,
        width: canvas.width,
        height: canvas.height,
    }
}

fn render_bubble(
    out: &mut String,
    bubble: &Bubble,
    canvas: &Rect,
    font_map: &FontMap,
    auto_fit: bool,
    measure: &mut dyn TextMeasurer,
    warnings: &mut Vec<String>,
) {
    if path::has_unattachable_tail(bubble) {
        warnings.push(format!(
            "bubble '{}': tail can only attach to the top or bottom edge; skipped",
            bubble.id
        ));
    }

    let shape = path::generate(bubble);
    let stroke = bubble.border_color.to_css();

    out.push_str(&format!(
        "<g transform=\"translate({},{})\">",
        fmt_num(bubble.x - canvas.x),
        fmt_num(bubble.y - canvas.y),
    ));

    if bubble.archetype != Archetype::TextOnly {
        let dash = if bubble.archetype == Archetype::Whisper {
            format!(" stroke-dasharray=\"{}\"", WHISPER_DASH)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "<path d=\"{}\" fill=\"#ffffff\" stroke=\"{}\" stroke-width=\"{}\"{}/>",
            shape.body,
            stroke,
            fmt_num(OUTLINE_WIDTH),
            dash,
        ));
        for circle in &shape.circles {
            out.push_str(&format!(
                "<circle id=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\" \
                 fill=\"#ffffff\" stroke=\"{}\" stroke-width=\"{}\"/>",
                escape_xml(&circle.id),
                fmt_num(circle.cx),
                fmt_num(circle.cy),
                fmt_num(circle.r),
                stroke,
                fmt_num(OUTLINE_WIDTH),
            ));
        }
    }

    let fitted = if auto_fit {
        fit::auto_fit_bubble_text(bubble, measure)
    } else {
        if fit::detect_text_overflow(bubble, measure) {
            warnings.push(format!("bubble '{}': text overflows the safe zone", bubble.id));
        }
        bubble.clone()
    };

    let zone = fit::safe_text_zone(&fitted);
    let style = fitted.text_style();
    let mut painter = SvgTextPainter { out };
    render::render_rich_text(&mut painter, &fitted.text, &zone, &style, font_map, measure, None);

    out.push_str("</g>");
}

fn push_font_faces(out: &mut String, fonts: &[FontSource]) {
    let faces: Vec<&FontSource> = fonts.iter().filter(|f| f.url.is_some()).collect();
    if faces.is_empty() {
        return;
    }
    out.push_str("<defs><style>");
    for font in faces {
        out.push_str(&format!(
            "@font-face{{font-family:'{}';src:url({});font-weight:{};}}",
            escape_xml(&font.family),
            font.url.as_deref().unwrap_or(""),
            font.weight,
        ));
    }
    out.push_str("</style></defs>");
}

/// Text painter emitting `<text>` and `<line>` elements.
struct SvgTextPainter<'a> {
    out: &'a mut String,
}

impl TextPainter for SvgTextPainter<'_> {
    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &str, color: &crate::bubble::Color) {
        self.out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" style=\"font: {}\" fill=\"{}\">{}</text>",
            fmt_num(x),
            fmt_num(y),
            escape_xml(font),
            color.to_css(),
            escape_xml(text),
        ));
    }

    fn stroke_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: &crate::bubble::Color,
        width: f32,
    ) {
        self.out.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            fmt_num(x1),
            fmt_num(y1),
            fmt_num(x2),
            fmt_num(y2),
            color.to_css(),
            fmt_num(width),
        ));
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::Part;
    use crate::measure::HeuristicMeasurer;
    use crate::RenderOptions;

    fn doc(bubbles: Vec<Bubble>) -> BalloonDocument {
        BalloonDocument {
            meta: RenderOptions::default(),
            bubbles,
        }
    }

    fn speech(id: &str, x: f32, y: f32) -> Bubble {
        Bubble {
            id: id.to_string(),
            archetype: Archetype::SpeechDown,
            x,
            y,
            width: 200.0,
            height: 100.0,
            text: "Hello & goodbye".to_string(),
            ..Bubble::default()
        }
    }

    fn render(doc: &BalloonDocument) -> (SvgOutput, Vec<String>) {
        let mut warnings = Vec::new();
        let out = generate_svg(
            doc,
            &SvgOptions::default(),
            &mut HeuristicMeasurer,
            &mut warnings,
        );
        (out, warnings)
    }

    #[test]
    fn document_renders_paths_and_escaped_text() {
        let (out, warnings) = render(&doc(vec![speech("b1", 40.0, 60.0)]));
        assert!(out.svg.starts_with("<?xml"));
        assert!(out.svg.contains("<path d=\"M "));
        assert!(out.svg.contains("Hello"));
        assert!(out.svg.contains("&amp;"));
        assert!(out.svg.ends_with("</svg>"));
        assert!(warnings.is_empty());
        // Bubble rect plus bbox padding on each side.
        assert_eq!(out.width, 220.0);
        assert_eq!(out.height, 120.0);
    }

    #[test]
    fn empty_document_is_a_valid_empty_canvas() {
        let (out, _) = render(&doc(vec![]));
        assert!(out.svg.contains("<svg"));
        assert!(out.svg.ends_with("</svg>"));
        assert_eq!(out.width, 0.0);
        assert_eq!(out.height, 0.0);
    }

    #[test]
    fn thought_dots_become_circles() {
        let mut b = speech("b1", 0.0, 0.0);
        b.archetype = Archetype::Thought;
        b.parts.push(Part::Dot {
            id: "d1".to_string(),
            x: -20.0,
            y: 120.0,
            size: 12.0,
        });
        let (out, _) = render(&doc(vec![b]));
        assert!(out.svg.contains("<circle id=\"d1\""));
        assert!(out.svg.contains("r=\"6\""));
    }

    #[test]
    fn whisper_outline_is_dashed() {
        let mut b = speech("b1", 0.0, 0.0);
        b.archetype = Archetype::Whisper;
        let (out, _) = render(&doc(vec![b]));
        assert!(out.svg.contains("stroke-dasharray=\"6 4\""));
    }

    #[test]
    fn text_only_bubble_has_no_outline() {
        let mut b = speech("b1", 0.0, 0.0);
        b.archetype = Archetype::TextOnly;
        let (out, _) = render(&doc(vec![b]));
        assert!(!out.svg.contains("<path"));
        assert!(out.svg.contains("<text"));
    }

    #[test]
    fn z_order_controls_paint_order() {
        let mut back = speech("back", 0.0, 0.0);
        back.z = 5;
        let mut front = speech("front", 50.0, 0.0);
        front.z = -1;
        let (out, _) = render(&doc(vec![back, front]));
        // "front" has the lower z, so it paints first.
        let front_pos = out.svg.find("translate(60,10)").unwrap();
        let back_pos = out.svg.find("translate(10,10)").unwrap();
        assert!(front_pos < back_pos);
    }

    #[test]
    fn unattachable_tail_warns() {
        let mut b = speech("b1", 0.0, 0.0);
        b.parts.push(Part::Tail {
            id: "t".to_string(),
            base_x: 0.0,
            base_y: 50.0,
            base_width: 40.0,
            tip_x: -60.0,
            tip_y: 50.0,
        });
        let (_, warnings) = render(&doc(vec![b]));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("b1"));
    }

    #[test]
    fn overflow_warns_when_auto_fit_is_off() {
        let mut b = speech("b1", 0.0, 0.0);
        b.width = 30.0;
        b.height = 20.0;
        b.text = "far too much text for such a small bubble".to_string();
        let mut document = doc(vec![b]);
        document.meta.auto_fit = false;
        let (_, warnings) = render(&document);
        assert!(warnings.iter().any(|w| w.contains("overflows")));
    }
}
