//! Background removal WASM binding.

use crate::types::JsDecodedImage;
use pkedit_core::background::{self, DEFAULT_BACKGROUND_THRESHOLD};
use wasm_bindgen::prelude::*;

/// Make pixels close to the top-left pixel's colour transparent.
///
/// `threshold` defaults to 60 when omitted; pixels whose summed RGB
/// difference to the reference is below it are cleared.
#[wasm_bindgen]
pub fn remove_background(image: &JsDecodedImage, threshold: Option<u32>) -> JsDecodedImage {
    let threshold = threshold.unwrap_or(DEFAULT_BACKGROUND_THRESHOLD);
    JsDecodedImage::from_decoded(background::remove_background(&image.to_decoded(), threshold))
}
