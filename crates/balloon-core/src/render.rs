//! Rich-text rendering: walks wrapped lines and paints styled runs.
//!
//! Painting goes through the [`TextPainter`] seam so the engine stays
//! independent of the host surface; the SVG backend lives in
//! [`crate::svg`], and an editor host can implement the trait over a canvas
//! context instead. Rendering completes synchronously.

use std::collections::HashMap;

use crate::bubble::{Color, Rect, TextStyle};
use crate::measure::TextMeasurer;
use crate::path::fmt_num;
use crate::richtext;
use crate::wrap;

/// Fallback family appended to every synthesized font, and substituted for
/// families the map cannot resolve.
pub const GENERIC_FONT_FAMILY: &str = "sans-serif";

/// Logical font-family identifier to concrete resolvable family name.
/// Supplied by the host's asset-resolution layer.
pub type FontMap = HashMap<String, String>;

/// Baseline sits at this fraction of the line height.
const ASCENT_RATIO: f32 = 0.8;
/// Underline distance below the baseline.
const UNDERLINE_OFFSET: f32 = 2.0;
/// Strikethrough height above the baseline, as a fraction of font size.
const STRIKETHROUGH_RATIO: f32 = 0.3;

/// Drawing surface for text runs.
pub trait TextPainter {
    /// Draw a run of glyphs with `font` (a CSS font shorthand) at a baseline.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &str, color: &Color);
    /// Stroke a straight decoration segment (underline/strikethrough).
    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &Color, width: f32);
}

/// Synthesize the CSS font shorthand for a run: italic/bold flags, size,
/// and the mapped family with the generic fallback suffix.
pub fn font_string(style: &TextStyle, font_map: &FontMap) -> String {
    let family = font_map
        .get(&style.font_family)
        .map(String::as_str)
        .unwrap_or(GENERIC_FONT_FAMILY);

    let mut font = String::new();
    if style.italic {
        font.push_str("italic ");
    }
    if style.bold {
        font.push_str("bold ");
    }
    font.push_str(&fmt_num(style.font_size));
    font.push_str("px ");
    font.push_str(family);
    if family != GENERIC_FONT_FAMILY {
        font.push_str(", ");
        font.push_str(GENERIC_FONT_FAMILY);
    }
    font
}

/// Parse, wrap, and paint markup into `rect`.
///
/// The block is vertically centered in the rect; each line is horizontally
/// centered, clamped so text never starts left of the rect. Runs draw at
/// the running x on the line baseline, with underline and strikethrough
/// stroked separately across the run's measured width.
#[allow(clippy::too_many_arguments)]
pub fn render_rich_text(
    painter: &mut dyn TextPainter,
    markup: &str,
    rect: &Rect,
    default_style: &TextStyle,
    font_map: &FontMap,
    measure: &mut dyn TextMeasurer,
    available_width_at: Option<&mut dyn FnMut(f32) -> f32>,
) {
    let segments = richtext::parse(markup, default_style);

    let mut constant_width = |_: f32| rect.width;
    let width_fn: &mut dyn FnMut(f32) -> f32 = match available_width_at {
        Some(f) => f,
        None => &mut constant_width,
    };
    let lines = wrap::wrap(&segments, measure, width_fn, default_style.font_size);

    let block_height: f32 = lines.iter().map(|l| l.height).sum();
    let mut y = rect.y + (rect.height - block_height) / 2.0;

    for line in &lines {
        let baseline = y + line.height * ASCENT_RATIO;
        let mut x = rect.x + ((rect.width - line.width) / 2.0).max(0.0);

        for run in &line.runs {
            let font = font_string(&run.style, font_map);
            painter.fill_text(&run.text, x, baseline, &font, &run.style.color);

            if run.style.underline {
                let uy = baseline + UNDERLINE_OFFSET;
                painter.stroke_line(x, uy, x + run.width, uy, &run.style.color, 1.0);
            }
            if run.style.strikethrough {
                let sy = baseline - run.style.font_size * STRIKETHROUGH_RATIO;
                painter.stroke_line(x, sy, x + run.width, sy, &run.style.color, 1.0);
            }
            x += run.width;
        }
        y += line.height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::HeuristicMeasurer;

    #[derive(Debug, PartialEq)]
    enum Op {
        Text { text: String, x: f32, y: f32, font: String },
        Line { x1: f32, y1: f32, x2: f32 },
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl TextPainter for Recorder {
        fn fill_text(&mut self, text: &str, x: f32, y: f32, font: &str, _color: &Color) {
            self.0.push(Op::Text {
                text: text.to_string(),
                x,
                y,
                font: font.to_string(),
            });
        }

        fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, _y2: f32, _color: &Color, _w: f32) {
            self.0.push(Op::Line { x1, y1, x2 });
        }
    }

    fn rect() -> Rect {
        Rect { x: 10.0, y: 20.0, width: 100.0, height: 60.0 }
    }

    #[test]
    fn single_line_is_centered_both_ways() {
        let mut painter = Recorder::default();
        let style = TextStyle { font_size: 10.0, ..TextStyle::default() };
        render_rich_text(
            &mut painter,
            "hi",
            &rect(),
            &style,
            &FontMap::new(),
            &mut HeuristicMeasurer,
            None,
        );
        // "hi " measures 3 * 10 * 0.55 = 16.5.
        let Op::Text { x, y, .. } = &painter.0[0] else { panic!() };
        assert_eq!(*x, 10.0 + (100.0 - 16.5) / 2.0);
        // Block of one 10-high line centered in 60, baseline at 0.8.
        assert_eq!(*y, 20.0 + 25.0 + 8.0);
    }

    #[test]
    fn long_lines_clamp_to_the_left_edge() {
        let mut painter = Recorder::default();
        let style = TextStyle { font_size: 40.0, ..TextStyle::default() };
        render_rich_text(
            &mut painter,
            "stupendous",
            &rect(),
            &style,
            &FontMap::new(),
            &mut HeuristicMeasurer,
            None,
        );
        let Op::Text { x, .. } = &painter.0[0] else { panic!() };
        assert_eq!(*x, 10.0);
    }

    #[test]
    fn decorations_span_the_run_width() {
        let mut painter = Recorder::default();
        let style = TextStyle {
            font_size: 10.0,
            underline: true,
            strikethrough: true,
            ..TextStyle::default()
        };
        render_rich_text(
            &mut painter,
            "ab",
            &rect(),
            &style,
            &FontMap::new(),
            &mut HeuristicMeasurer,
            None,
        );
        assert_eq!(painter.0.len(), 3);
        let Op::Text { x, y: baseline, .. } = &painter.0[0] else { panic!() };
        let Op::Line { x1, y1, x2 } = &painter.0[1] else { panic!() };
        assert_eq!(*x1, *x);
        assert_eq!(*y1, baseline + 2.0);
        assert_eq!(*x2, x + 16.5);
        let Op::Line { y1: strike_y, .. } = &painter.0[2] else { panic!() };
        assert_eq!(*strike_y, baseline - 3.0);
    }

    #[test]
    fn runs_advance_the_pen() {
        let mut painter = Recorder::default();
        let style = TextStyle { font_size: 10.0, ..TextStyle::default() };
        render_rich_text(
            &mut painter,
            "aa bb",
            &rect(),
            &style,
            &FontMap::new(),
            &mut HeuristicMeasurer,
            None,
        );
        let Op::Text { x: x0, .. } = &painter.0[0] else { panic!() };
        let Op::Text { x: x1, .. } = &painter.0[1] else { panic!() };
        assert_eq!(*x1, x0 + 16.5);
    }

    #[test]
    fn font_string_resolves_through_the_map() {
        let mut map = FontMap::new();
        map.insert("comic".to_string(), "Comic Neue".to_string());

        let mapped = TextStyle {
            font_family: "comic".to_string(),
            italic: true,
            bold: true,
            font_size: 18.0,
            ..TextStyle::default()
        };
        assert_eq!(font_string(&mapped, &map), "italic bold 18px Comic Neue, sans-serif");

        let unmapped = TextStyle {
            font_family: "mystery".to_string(),
            ..TextStyle::default()
        };
        assert_eq!(font_string(&unmapped, &map), "16px sans-serif");
    }

    #[test]
    fn empty_markup_paints_nothing() {
        let mut painter = Recorder::default();
        render_rich_text(
            &mut painter,
            "",
            &rect(),
            &TextStyle::default(),
            &FontMap::new(),
            &mut HeuristicMeasurer,
            None,
        );
        assert!(painter.0.is_empty());
    }
}
