//! Font-size search: shrink text until it fits the bubble interior.

use crate::bubble::{Archetype, Bubble, Rect};
use crate::measure::TextMeasurer;
use crate::richtext::{self, TextSegment};
use crate::wrap;

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 40.0;
/// Measurement rounds before the search gives up.
const MAX_FIT_ROUNDS: u32 = 20;
/// Padding of the near-full text zone on plain boxes.
const BOX_TEXT_PADDING: f32 = 8.0;
/// Fresh bubbles carry this text until the user types; never auto-fit it.
pub const PLACEHOLDER_TEXT: &str = "Text here";

/// Outcome of a fit search.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Best font size found.
    pub font_size: f32,
    /// Widest wrapped line at that size.
    pub text_width: f32,
    /// Total wrapped block height at that size.
    pub text_height: f32,
    /// Whether the block fits the safe text zone.
    pub fits: bool,
    /// `font_size / bubble.font_size`.
    pub scale_factor: f32,
}

/// The interior rectangle visually clear of the outline's curvature, spikes
/// and scallops, centered in the bubble. Text is laid out against this zone.
pub fn safe_text_zone(bubble: &Bubble) -> Rect {
    let (w, h) = (bubble.width, bubble.height);
    let (zw, zh) = match bubble.archetype {
        Archetype::Shout => (w * 0.50, h * 0.55),
        Archetype::Thought => (w * 0.50, h * 0.65),
        Archetype::Descriptive | Archetype::TextOnly => (
            (w - 2.0 * BOX_TEXT_PADDING).max(0.0),
            (h - 2.0 * BOX_TEXT_PADDING).max(0.0),
        ),
        _ => (w * 0.83, h * 0.83),
    };
    Rect {
        x: (w - zw) / 2.0,
        y: (h - zh) / 2.0,
        width: zw,
        height: zh,
    }
}

/// Search downward from the bubble's font size until the wrapped text block
/// fits the safe zone, the minimum size is reached, or the round cap hits.
pub fn fit(
    bubble: &Bubble,
    measure: &mut dyn TextMeasurer,
    min_size: f32,
    max_size: f32,
) -> FitResult {
    let zone = safe_text_zone(bubble);
    let segments = richtext::parse(&bubble.text, &bubble.text_style());

    let mut size = bubble.font_size.min(max_size);
    let mut rounds = 0;
    loop {
        let (text_width, text_height) = measure_block(&segments, size, measure, zone.width);
        let fits = text_width <= zone.width && text_height <= zone.height;
        if fits || size <= min_size || rounds >= MAX_FIT_ROUNDS {
            let scale_factor = if bubble.font_size > 0.0 {
                size / bubble.font_size
            } else {
                1.0
            };
            return FitResult {
                font_size: size,
                text_width,
                text_height,
                fits,
                scale_factor,
            };
        }
        size = (size - 1.0).max(min_size);
        rounds += 1;
    }
}

/// Fit test at the bubble's current font size.
pub fn detect_text_overflow(bubble: &Bubble, measure: &mut dyn TextMeasurer) -> bool {
    let zone = safe_text_zone(bubble);
    let segments = richtext::parse(&bubble.text, &bubble.text_style());
    let (w, h) = measure_block(&segments, bubble.font_size, measure, zone.width);
    w > zone.width || h > zone.height
}

/// Returns a copy of the bubble with the fitted font size applied.
///
/// The size only changes when it differs from the current one, the bubble is
/// not text-only, and the text is not the untouched placeholder. The input
/// is never mutated; applying the operation twice equals applying it once.
pub fn auto_fit_bubble_text(bubble: &Bubble, measure: &mut dyn TextMeasurer) -> Bubble {
    let mut fitted = bubble.clone();
    if bubble.archetype == Archetype::TextOnly || bubble.text == PLACEHOLDER_TEXT {
        return fitted;
    }
    let result = fit(bubble, measure, MIN_FONT_SIZE, MAX_FONT_SIZE);
    if result.font_size != bubble.font_size {
        fitted.font_size = result.font_size;
    }
    fitted
}

/// Wrap at a candidate size against the zone width; returns (max line
/// width, total height).
fn measure_block(
    segments: &[TextSegment],
    font_size: f32,
    measure: &mut dyn TextMeasurer,
    zone_width: f32,
) -> (f32, f32) {
    let sized: Vec<TextSegment> = segments
        .iter()
        .map(|segment| match segment {
            TextSegment::Text { text, style } => {
                let mut style = style.clone();
                style.font_size = font_size;
                TextSegment::Text { text: text.clone(), style }
            }
            TextSegment::LineBreak => TextSegment::LineBreak,
        })
        .collect();

    let lines = wrap::wrap(&sized, measure, &mut |_| zone_width, font_size);
    let width = lines.iter().map(|l| l.width).fold(0.0, f32::max);
    let height = lines.iter().map(|l| l.height).sum();
    (width, height)
}
