//! Balloon - comic speech-balloon engine
//!
//! Generates bubble outlines, bounding boxes, and laid-out rich text for a
//! comic/meme editor, and compiles whole bubble documents to SVG.
//!
//! # Example
//!
//! ```ignore
//! use balloon_core::compile_document;
//!
//! let json = r#"{
//!     "bubbles": [
//!         {
//!             "id": "b1", "archetype": "speechDown",
//!             "x": 40, "y": 60, "width": 200, "height": 100,
//!             "text": "Hello World",
//!             "parts": [{ "kind": "tail", "id": "t1", "baseX": 100, "baseY": 100,
//!                         "baseWidth": 40, "tipX": 80, "tipY": 160 }]
//!         }
//!     ]
//! }"#;
//!
//! let result = compile_document(json)?;
//! println!("{}", result.svg);
//! ```

pub mod bounds;
pub mod bubble;
pub mod fit;
pub mod measure;
pub mod path;
pub mod render;
pub mod richtext;
pub mod svg;
pub mod wrap;

use serde::{Deserialize, Serialize};

pub use bounds::bbox;
pub use bubble::{Archetype, Bubble, Color, Part, Rect, TextStyle};
pub use fit::{auto_fit_bubble_text, detect_text_overflow, fit, safe_text_zone, FitResult};
pub use measure::{HeuristicMeasurer, ParleyMeasurer, TextMeasurer};
pub use path::{generate, BubblePath, DotCircle};
pub use render::{render_rich_text, FontMap, TextPainter};
pub use richtext::{parse, TextSegment};
pub use svg::{SvgOptions, SvgOutput};
pub use wrap::{wrap, TextLine, TextRun};

/// A font source to register before rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSource {
    /// Font family name (used in SVG @font-face and as identifier).
    pub family: String,
    /// URL to the font file - emitted as @font-face src in the SVG.
    #[serde(default)]
    pub url: Option<String>,
    /// Font weight (default: 400).
    #[serde(default = "default_font_weight")]
    pub weight: u16,
    /// Base64-encoded font data (TTF/OTF/WOFF2) - used for text measurement.
    #[serde(default)]
    pub data: Option<String>,
}

fn default_font_weight() -> u16 {
    400
}

/// Document-level rendering options.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Font family applied to bubbles without an explicit fontFamily.
    pub font_family: Option<String>,
    /// Fonts to register with the measurement oracle.
    pub fonts: Vec<FontSource>,
    /// Shrink each bubble's text to fit its interior before rendering.
    pub auto_fit: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_family: None,
            fonts: Vec::new(),
            auto_fit: true,
        }
    }
}

/// A self-contained bubble document with metadata and content.
///
/// ```json
/// {
///   "meta": { "autoFit": true },
///   "bubbles": [ { "id": "b1", "archetype": "speechDown", ... } ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalloonDocument {
    /// Rendering options (fonts, fitting, etc.)
    #[serde(default)]
    pub meta: RenderOptions,
    /// The bubbles to render.
    #[serde(default)]
    pub bubbles: Vec<Bubble>,
}

/// Compilation result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    /// Generated SVG string
    pub svg: String,
    /// Computed canvas width
    pub width: f32,
    /// Computed canvas height
    pub height: f32,
    /// Any warnings during compilation
    pub warnings: Vec<String>,
}

/// Compilation error.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("invalid document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid font data for family '{family}': {source}")]
    Font {
        family: String,
        source: base64::DecodeError,
    },
}

/// Compile a bubble document JSON string to SVG.
pub fn compile_document(doc_json: &str) -> Result<CompileResult, CompileError> {
    let doc: BalloonDocument = serde_json::from_str(doc_json)?;
    compile(&doc)
}

/// Compile a parsed bubble document to SVG.
///
/// Embedded base64 font data is registered with the Parley-backed oracle;
/// hosts without usable fonts still render through the deterministic
/// estimation fallback.
pub fn compile(doc: &BalloonDocument) -> Result<CompileResult, CompileError> {
    let mut warnings = Vec::new();

    let mut measurer = ParleyMeasurer::new();
    for font in &doc.meta.fonts {
        if let Some(data) = &font.data {
            use base64::Engine;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| CompileError::Font {
                    family: font.family.clone(),
                    source: e,
                })?;
            let registered = measurer.register_font(bytes);
            if registered.is_empty() {
                warnings.push(format!("font '{}' contained no usable faces", font.family));
            }
        }
    }

    let output = svg::generate_svg(doc, &SvgOptions::default(), &mut measurer, &mut warnings);

    Ok(CompileResult {
        svg: output.svg,
        width: output.width,
        height: output.height,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_simple() {
        let json = r###"{
            "bubbles": [
                {
                    "id": "b1",
                    "archetype": "speechDown",
                    "x": 40, "y": 60, "width": 200, "height": 100,
                    "text": "Hello World",
                    "parts": [
                        { "kind": "tail", "id": "t1", "baseX": 100, "baseY": 100,
                          "baseWidth": 40, "tipX": 80, "tipY": 160 }
                    ]
                }
            ]
        }"###;

        let result = compile_document(json).unwrap();
        assert!(result.svg.contains("<svg"));
        assert!(result.svg.contains("</svg>"));
        assert!(result.svg.contains("Hello"));
        assert!(result.svg.contains("World"));
        // Tail tip at y=160 plus padding stretches the canvas.
        assert!(result.height >= 170.0 + 10.0);
    }

    #[test]
    fn test_compile_document_meta() {
        let json = r###"{
            "meta": { "autoFit": false, "fontFamily": "Comic Neue" },
            "bubbles": [
                { "id": "b1", "archetype": "descriptive",
                  "width": 120, "height": 40, "text": "Meanwhile..." }
            ]
        }"###;

        let result = compile_document(json).unwrap();
        assert!(result.svg.contains("Meanwhile..."));
    }

    #[test]
    fn test_invalid_json() {
        let result = compile_document("not valid json");
        assert!(matches!(result, Err(CompileError::Parse(_))));
    }

    #[test]
    fn test_invalid_font_data() {
        let json = r###"{
            "meta": { "fonts": [ { "family": "Broken", "data": "%%%" } ] },
            "bubbles": []
        }"###;

        let result = compile_document(json);
        assert!(matches!(result, Err(CompileError::Font { .. })));
    }
}
