//! The editor session as a JS class.
//!
//! # Example
//!
//! ```typescript
//! import { JsEditSession } from '@pkedit/wasm';
//!
//! const session = JsEditSession.load(file.type, new Uint8Array(await file.arrayBuffer()));
//! session.resize_percent(50);
//! session.fit_to_target_kb(200);
//! infoLine.textContent = session.output_info();
//! const blob = new Blob([session.export_bytes()], { type: session.output_format });
//! ```

use crate::search::{config_from_js, JsSearchResult};
use crate::types::{to_js_error, JsDecodedImage};
use pkedit_core::decode::ResizeMode;
use pkedit_core::encode::OutputFormat;
use pkedit_core::search::CancelToken;
use pkedit_core::session::EditSession;
use pkedit_core::transform::{CropSelection, PreviewGeometry};
use wasm_bindgen::prelude::*;

/// One editing session: source image, rendered canvas, format and quality.
#[wasm_bindgen]
pub struct JsEditSession {
    inner: EditSession,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Decode an upload and start a session.
    ///
    /// # Errors
    ///
    /// "Please upload an image file (JPG, PNG, WebP…)." for non-image mime
    /// types, or the decoding error.
    pub fn load(mime_type: &str, bytes: &[u8]) -> Result<JsEditSession, JsValue> {
        EditSession::load(mime_type, bytes)
            .map(|inner| JsEditSession { inner })
            .map_err(to_js_error)
    }

    /// Copy of the rendered canvas, for drawing the preview.
    pub fn canvas(&self) -> JsDecodedImage {
        JsDecodedImage::from_decoded(self.inner.canvas().clone())
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.canvas().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.canvas().height
    }

    /// Redraw the canvas at exact pixel dimensions.
    pub fn resize_pixels(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .resize(ResizeMode::Pixels { width, height })
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Redraw the canvas at a percentage of the source size.
    pub fn resize_percent(&mut self, percent: u32) -> Result<(), JsValue> {
        self.inner
            .resize(ResizeMode::Percent(percent))
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Search a JPEG quality for a target size in KB and apply it.
    ///
    /// Returns `undefined` when the format is not JPEG or `target_kb` is 0.
    /// `config` is an optional partial search config object.
    pub fn fit_to_target_kb(
        &mut self,
        target_kb: u32,
        config: JsValue,
    ) -> Result<Option<JsSearchResult>, JsValue> {
        let config = config_from_js(config)?;
        self.inner
            .fit_to_target_kb(u64::from(target_kb), &config, &CancelToken::new())
            .map(|result| result.map(JsSearchResult::from))
            .map_err(to_js_error)
    }

    /// Crop to a selection dragged over the preview.
    ///
    /// `selection` is `{ start: {x, y}, end: {x, y} }`, `view` the preview
    /// layout with `canvas_left`, `canvas_top`, `display_width`,
    /// `display_height`, `canvas_width` and `canvas_height`.
    pub fn crop(&mut self, selection: JsValue, view: JsValue) -> Result<(), JsValue> {
        let selection: CropSelection =
            serde_wasm_bindgen::from_value(selection).map_err(to_js_error)?;
        let view: PreviewGeometry = serde_wasm_bindgen::from_value(view).map_err(to_js_error)?;
        self.inner
            .crop(&selection, &view)
            .map(|_| ())
            .map_err(to_js_error)
    }

    /// Clear background pixels; `threshold` defaults to 60.
    pub fn remove_background(&mut self, threshold: Option<u32>) {
        self.inner.remove_background(
            threshold.unwrap_or(pkedit_core::background::DEFAULT_BACKGROUND_THRESHOLD),
        );
    }

    /// Current output mime type.
    #[wasm_bindgen(getter)]
    pub fn output_format(&self) -> String {
        self.inner.output_format().mime_type().to_string()
    }

    /// Select the output format by mime type; unknown types select PNG.
    pub fn set_output_format(&mut self, mime_type: &str) {
        self.inner
            .set_output_format(OutputFormat::from_mime_type(mime_type));
    }

    /// JPEG quality in percent (1..=100).
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality_percent()
    }

    #[wasm_bindgen(setter)]
    pub fn set_quality(&mut self, percent: u8) {
        self.inner.set_quality_percent(percent);
    }

    /// "Output: W × Hpx • S KB" for the canvas in the current format.
    pub fn output_info(&self) -> Result<String, JsValue> {
        self.inner
            .output_info()
            .map(|info| info.to_string())
            .map_err(to_js_error)
    }

    /// "Original: W × Hpx • S KB" for the upload.
    pub fn original_info(&self) -> String {
        self.inner.original_info().to_string()
    }

    /// Encoded bytes of the canvas for download.
    pub fn export_bytes(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .export()
            .map(|export| export.bytes)
            .map_err(to_js_error)
    }

    /// Download file name for the current format.
    pub fn export_file_name(&self) -> String {
        format!(
            "{}.{}",
            pkedit_core::session::DOWNLOAD_BASENAME,
            self.inner.output_format().extension()
        )
    }
}
