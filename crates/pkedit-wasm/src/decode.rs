//! Image decoding and resizing WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, is_supported_mime_type, locked_height, resize } from '@pkedit/wasm';
//!
//! if (!is_supported_mime_type(file.type)) throw new Error('not an image');
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const height = locked_height(800, image.width, image.height);
//! const resized = resize(image, 800, height, 1);
//! ```

use crate::types::{filter_from_u8, to_js_error, JsDecodedImage};
use pkedit_core::decode::{self, ResizeMode};
use wasm_bindgen::prelude::*;

/// Whether an upload with this mime type is accepted (any `image/*`).
#[wasm_bindgen]
pub fn is_supported_mime_type(mime_type: &str) -> bool {
    decode::is_supported_mime_type(mime_type)
}

/// Decode JPEG, PNG or WebP bytes to RGBA.
///
/// JPEG EXIF orientation is applied, so the result is upright.
///
/// # Errors
///
/// Returns an error if the format is not recognised or the data is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0=Nearest, 1=Bilinear (default), 2=Lanczos3.
///
/// # Errors
///
/// Returns an error if width or height is zero.
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize(&image.to_decoded(), width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(to_js_error)
}

/// Resize an image by a percentage of its size.
#[wasm_bindgen]
pub fn resize_percent(
    image: &JsDecodedImage,
    percent: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    let (width, height) = ResizeMode::Percent(percent)
        .target_dimensions(image.width(), image.height())
        .map_err(to_js_error)?;
    resize(image, width, height, filter)
}

/// Height matching `width` with the aspect ratio locked, or `undefined`.
#[wasm_bindgen]
pub fn locked_height(width: u32, src_width: u32, src_height: u32) -> Option<u32> {
    decode::locked_height(width, src_width, src_height)
}

/// Width matching `height` with the aspect ratio locked, or `undefined`.
#[wasm_bindgen]
pub fn locked_width(height: u32, src_width: u32, src_height: u32) -> Option<u32> {
    decode::locked_width(height, src_width, src_height)
}
