//! WASM bindings for cropping.
//!
//! Selections and preview layouts are passed as plain JS objects:
//!
//! ```typescript
//! const selection = { start: { x: 40, y: 30 }, end: { x: 140, y: 110 } };
//! const view = {
//!   canvas_left: 12, canvas_top: 0,
//!   display_width: 600, display_height: 400,
//!   canvas_width: 1200, canvas_height: 800,
//! };
//! const rect = selection_to_rect(selection, view); // undefined if too small
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use pkedit_core::transform::{self, CropRect, CropSelection, PreviewGeometry};
use wasm_bindgen::prelude::*;

/// Copy a rectangle of `image` (in image pixels) into a new image.
///
/// The rectangle is clamped to the image and the result is at least 1x1.
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsDecodedImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> JsDecodedImage {
    let cropped = transform::apply_crop(&image.to_decoded(), CropRect::new(x, y, width, height));
    JsDecodedImage::from_decoded(cropped)
}

/// Map a selection dragged over the preview onto image pixels.
///
/// Returns `{ x, y, width, height }`, or `undefined` when the selection is
/// smaller than 10 × 10 preview pixels or misses the canvas.
#[wasm_bindgen]
pub fn selection_to_rect(selection: JsValue, view: JsValue) -> Result<JsValue, JsValue> {
    let selection: CropSelection =
        serde_wasm_bindgen::from_value(selection).map_err(to_js_error)?;
    let view: PreviewGeometry = serde_wasm_bindgen::from_value(view).map_err(to_js_error)?;

    match selection.to_image_rect(&view) {
        Some(rect) => serde_wasm_bindgen::to_value(&rect).map_err(to_js_error),
        None => Ok(JsValue::UNDEFINED),
    }
}
