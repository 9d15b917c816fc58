//! Image encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_image, output_extension } from '@pkedit/wasm';
//!
//! const bytes = encode_image(image, 'image/jpeg', 0.9);
//! const name = `editingwithpk-image.${output_extension('image/jpeg')}`;
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use pkedit_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

/// Encode an RGBA image to the format named by `mime_type`.
///
/// `quality` is in `(0, 1]` and only affects JPEG. Transparent pixels are
/// composited over black for JPEG. Unknown mime types encode as PNG.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match the dimensions, a
/// dimension is zero, or `quality` is out of range.
#[wasm_bindgen]
pub fn encode_image(
    image: &JsDecodedImage,
    mime_type: &str,
    quality: f64,
) -> Result<Vec<u8>, JsValue> {
    let format = OutputFormat::from_mime_type(mime_type);
    encode::encode_image(&image.to_decoded(), format, quality).map_err(to_js_error)
}

/// File extension (without dot) used for downloads in `mime_type`.
#[wasm_bindgen]
pub fn output_extension(mime_type: &str) -> String {
    OutputFormat::from_mime_type(mime_type)
        .extension()
        .to_string()
}

/// Whether the quality slider applies to `mime_type`.
#[wasm_bindgen]
pub fn supports_quality(mime_type: &str) -> bool {
    OutputFormat::from_mime_type(mime_type).supports_quality()
}
