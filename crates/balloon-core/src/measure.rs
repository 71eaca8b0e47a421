//! Text measurement oracles.
//!
//! Layout never measures text itself; it goes through an injected
//! [`TextMeasurer`] so hosts can plug in their own metrics backend. The
//! production oracle wraps Parley; when no font produces glyphs (e.g. a bare
//! WASM sandbox) measurement falls back to an average-character-width
//! estimate so layout stays deterministic instead of failing.

use std::borrow::Cow;

use parley::layout::Layout;
use parley::style::{FontStack, FontStyle, FontWeight, LineHeight, StyleProperty};
use parley::{FontContext, LayoutContext};

use crate::bubble::TextStyle;

/// Advance-width oracle for a string in a given run style.
pub trait TextMeasurer {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f32;
}

/// Approximate average character width as a fraction of font size.
const CHAR_WIDTH_RATIO: f32 = 0.55;

/// Estimate text width for a string at a given font size.
pub(crate) fn estimate_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
}

/// Deterministic fixed-ratio measurer. Used as the oracle of last resort and
/// directly wherever reproducible layout matters more than fidelity.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f32 {
        estimate_width(text, style.font_size)
    }
}

/// Measurement oracle wrapping Parley.
pub struct ParleyMeasurer {
    font_cx: FontContext,
    layout_cx: LayoutContext<[u8; 4]>,
}

impl ParleyMeasurer {
    pub fn new() -> Self {
        Self {
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Register a font from binary data. Returns registered family names.
    pub fn register_font(&mut self, data: Vec<u8>) -> Vec<String> {
        let families = self.font_cx.collection.register_fonts(data.into(), None);
        families
            .iter()
            .map(|(id, _info)| {
                self.font_cx
                    .collection
                    .family_name(*id)
                    .unwrap_or("unknown")
                    .to_string()
            })
            .collect()
    }
}

impl Default for ParleyMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for ParleyMeasurer {
    fn measure(&mut self, text: &str, style: &TextStyle) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, false);

        builder.push_default(StyleProperty::FontSize(style.font_size));
        builder.push_default(StyleProperty::FontWeight(if style.bold {
            FontWeight::new(700.0)
        } else {
            FontWeight::new(400.0)
        }));
        if style.italic {
            builder.push_default(StyleProperty::FontStyle(FontStyle::Italic));
        }
        builder.push_default(StyleProperty::LineHeight(LineHeight::FontSizeRelative(1.2)));
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(
            style.font_family.clone(),
        ))));

        let mut layout: Layout<[u8; 4]> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width();

        // Fallback: if Parley returns zero width (no font available), use
        // approximate character-width estimation.
        if width == 0.0 {
            return estimate_width(text, style.font_size);
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width_scales_with_length_and_size() {
        let mut m = HeuristicMeasurer;
        let style = TextStyle { font_size: 10.0, ..TextStyle::default() };
        assert_eq!(m.measure("abcd", &style), 4.0 * 10.0 * CHAR_WIDTH_RATIO);
        assert_eq!(m.measure("", &style), 0.0);
    }

    #[test]
    fn parley_measurer_never_returns_zero_for_text() {
        // With or without system fonts the oracle must produce a usable
        // width, via real metrics or the estimation fallback.
        let mut m = ParleyMeasurer::new();
        let style = TextStyle::default();
        assert!(m.measure("hello", &style) > 0.0);
        assert_eq!(m.measure("", &style), 0.0);
    }
}
