use serde::Serialize;
use wasm_bindgen::prelude::*;

use balloon_core::{bbox, compile_document, generate, Bubble};

/// Initialize the WASM module (sets up panic hook for better error messages).
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Compile a bubble document JSON to SVG.
///
/// Input: `{ "meta": { "autoFit": true }, "bubbles": [...] }`
/// Returns: `{ "svg": "...", "width": 800, "height": 600, "warnings": [] }`
#[wasm_bindgen(js_name = "compileDocument")]
pub fn compile_document_wasm(doc_json: &str) -> Result<JsValue, JsValue> {
    let result = compile_document(doc_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OutlineResult {
    body: String,
    circles: Vec<balloon_core::DotCircle>,
    bbox: balloon_core::Rect,
}

/// Compute one bubble's outline path, dot circles, and bounding box.
///
/// Used by the editor host to redraw a bubble live while it is dragged,
/// without recompiling the whole document.
///
/// Input: a single bubble record.
/// Returns: `{ "body": "M ... Z", "circles": [...], "bbox": {...} }`
#[wasm_bindgen(js_name = "bubbleOutline")]
pub fn bubble_outline_wasm(bubble_json: &str) -> Result<JsValue, JsValue> {
    let bubble: Bubble = serde_json::from_str(bubble_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid bubble: {}", e)))?;

    let shape = generate(&bubble);
    let result = OutlineResult {
        body: shape.body,
        circles: shape.circles,
        bbox: bbox(&bubble),
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Get version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
