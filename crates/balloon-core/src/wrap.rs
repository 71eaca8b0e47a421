//! Greedy line wrapping of style runs against a width budget.
//!
//! The available width is sampled per line through a callback so callers
//! can describe non-rectangular interiors (narrower near a curved top);
//! rectangular interiors just return a constant.

use crate::bubble::TextStyle;
use crate::measure::TextMeasurer;
use crate::richtext::TextSegment;

/// A word-level run placed on a line. `width` is the measured advance of
/// the word plus one trailing space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
    pub width: f32,
}

/// One visual row of runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub runs: Vec<TextRun>,
    /// Sum of run widths.
    pub width: f32,
    /// Max run font size; the default font size for an empty line.
    pub height: f32,
}

/// Wrap segments into lines.
///
/// Words never split: one wider than the budget sits alone on its own line.
/// A [`TextSegment::LineBreak`] closes the current line even when empty.
/// The vertical cursor advances by the height of each closed line —
/// including forced breaks — and feeds `available_width_at` for the next
/// line's budget.
pub fn wrap(
    segments: &[TextSegment],
    measure: &mut dyn TextMeasurer,
    available_width_at: &mut dyn FnMut(f32) -> f32,
    default_font_size: f32,
) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut line_width = 0.0f32;
    let mut cursor_y = 0.0f32;

    let mut close_line =
        |runs: &mut Vec<TextRun>, line_width: &mut f32, cursor_y: &mut f32, lines: &mut Vec<TextLine>| {
            let height = line_height(runs, default_font_size);
            lines.push(TextLine {
                runs: std::mem::take(runs),
                width: *line_width,
                height,
            });
            *line_width = 0.0;
            *cursor_y += height;
        };

    for segment in segments {
        match segment {
            TextSegment::LineBreak => {
                close_line(&mut runs, &mut line_width, &mut cursor_y, &mut lines);
            }
            TextSegment::Text { text, style } => {
                for word in text.split_whitespace() {
                    let width = measure.measure(&format!("{word} "), style);
                    if !runs.is_empty() && line_width + width > available_width_at(cursor_y) {
                        close_line(&mut runs, &mut line_width, &mut cursor_y, &mut lines);
                    }
                    runs.push(TextRun {
                        text: word.to_string(),
                        style: style.clone(),
                        width,
                    });
                    line_width += width;
                }
            }
        }
    }

    if !runs.is_empty() {
        close_line(&mut runs, &mut line_width, &mut cursor_y, &mut lines);
    }
    lines
}

fn line_height(runs: &[TextRun], default_font_size: f32) -> f32 {
    if runs.is_empty() {
        default_font_size
    } else {
        runs.iter().map(|r| r.style.font_size).fold(0.0, f32::max)
    }
}
