//! Bubble types for the balloon input schema.
//!
//! Defines the bubble records that get deserialized from the editor's JSON
//! documents and fed through path generation and text layout.

use serde::Deserialize;

/// The fixed set of bubble shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Archetype {
    #[default]
    SpeechDown,
    SpeechUp,
    SpeechDownMinimal,
    SpeechUpMinimal,
    Whisper,
    Thought,
    Shout,
    Descriptive,
    TextOnly,
}

impl Archetype {
    /// Speech and whisper bubbles share the tail-capable rounded-rect body.
    pub fn is_speech_family(self) -> bool {
        matches!(
            self,
            Archetype::SpeechDown
                | Archetype::SpeechUp
                | Archetype::SpeechDownMinimal
                | Archetype::SpeechUpMinimal
                | Archetype::Whisper
        )
    }
}

/// A decorative sub-shape attached to a bubble.
///
/// Closed set: a tail (speech pointer) or a free-floating thought dot. The
/// discriminant is explicit so documents stay readable and exhaustiveness is
/// checked at compile time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Part {
    /// Speech tail: a base span on the bubble edge sweeping out to a tip.
    Tail {
        id: String,
        /// Base center, in bubble-local coordinates. Clamped into the body.
        base_x: f32,
        base_y: f32,
        /// Width of the span where the tail meets the body.
        base_width: f32,
        /// Tip point. May lie outside the body rectangle.
        tip_x: f32,
        tip_y: f32,
    },
    /// Thought dot: a floating circle trailing the main outline.
    Dot {
        id: String,
        /// Center offset relative to the bubble origin.
        x: f32,
        y: f32,
        /// Diameter.
        size: f32,
    },
}

/// A single bubble record as supplied by the editor layer.
///
/// Width and height are kept at sane minimums by the interaction layer, but
/// every operation here tolerates arbitrary positive values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bubble {
    pub id: String,
    pub archetype: Archetype,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Stacking order within the document. Ties keep document order.
    pub z: i32,
    /// Logical font family; resolved through the document's font map.
    pub font_family: Option<String>,
    pub font_size: f32,
    pub color: Color,
    pub border_color: Color,
    /// Raw rich-text markup (line-break tags plus inline style tags).
    pub text: String,
    pub parts: Vec<Part>,
}

impl Default for Bubble {
    fn default() -> Self {
        Self {
            id: String::new(),
            archetype: Archetype::default(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            z: 0,
            font_family: None,
            font_size: DEFAULT_FONT_SIZE,
            color: Color::BLACK,
            border_color: Color::BLACK,
            text: String::new(),
            parts: Vec::new(),
        }
    }
}

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

impl Bubble {
    /// The uniform run style derived from this bubble's own text settings.
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| crate::render::GENERIC_FONT_FAMILY.to_string()),
            font_size: self.font_size,
            color: self.color.clone(),
            ..TextStyle::default()
        }
    }
}

/// Run-level text style. Every flag toggles independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: crate::render::GENERIC_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: Color::BLACK,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }
}

/// An axis-aligned rectangle in bubble-local or canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

// ============================================================================
// Color type
// ============================================================================

/// Color value - supports hex (#RGB, #RRGGBB, #RRGGBBAA) and rgb/rgba functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Color {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 255 };

    /// Convert to CSS color string for SVG output.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else if self.a == 0 {
            "none".to_string()
        } else {
            format!(
                "rgba({},{},{},{:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }

    /// Parse a color string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        if s.starts_with("rgb") {
            let inner = s
                .trim_start_matches("rgba")
                .trim_start_matches("rgb")
                .trim_start_matches('(')
                .trim_end_matches(')');
            let parts: Vec<&str> = inner.split(',').map(|p| p.trim()).collect();
            if parts.len() >= 3 {
                let r = parts[0].parse().ok()?;
                let g = parts[1].parse().ok()?;
                let b = parts[2].parse().ok()?;
                let a = if parts.len() >= 4 {
                    let alpha: f32 = parts[3].parse().ok()?;
                    (alpha * 255.0) as u8
                } else {
                    255
                };
                return Some(Self { r, g, b, a });
            }
            return None;
        }

        match s.to_lowercase().as_str() {
            "transparent" => Some(Self::TRANSPARENT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self { r: 255, g: 0, b: 0, a: 255 }),
            "green" => Some(Self { r: 0, g: 128, b: 0, a: 255 }),
            "blue" => Some(Self { r: 0, g: 0, b: 255, a: 255 }),
            _ => None,
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some(Self { r, g, b, a: 255 })
            }
            6 | 8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                let a = if hex.len() == 8 {
                    u8::from_str_radix(&hex[6..8], 16).ok()?
                } else {
                    255
                };
                Some(Self { r, g, b, a })
            }
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: {}", s)))
    }
}
