//! Target-size quality search binding.
//!
//! # Example
//!
//! ```typescript
//! import { find_quality_for_target_size } from '@pkedit/wasm';
//!
//! // Aim for ~200 KB, starting from the slider's quality
//! const result = find_quality_for_target_size(image, 200 * 1024, 0.9, { max_iterations: 8 });
//! if (!result.is_failed) slider.value = Math.round(result.quality * 100);
//! ```

use crate::types::{to_js_error, JsDecodedImage};
use pkedit_core::encode::{OutputFormat, SurfaceEncoder};
use pkedit_core::search::{self, CancelToken, SearchConfig, SearchResult};
use wasm_bindgen::prelude::*;

/// Result of a quality search, as seen from JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsSearchResult {
    inner: SearchResult,
}

#[wasm_bindgen]
impl JsSearchResult {
    /// Chosen quality in `(0, 1]`.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f64 {
        self.inner.quality
    }

    /// Quality as the slider's integer percent.
    #[wasm_bindgen(getter)]
    pub fn quality_percent(&self) -> u8 {
        pkedit_core::encode::quality_to_percent(self.inner.quality)
    }

    /// Encoded size at `quality` in bytes (a JS number).
    #[wasm_bindgen(getter)]
    pub fn achieved_size_bytes(&self) -> f64 {
        self.inner.achieved_size_bytes as f64
    }

    #[wasm_bindgen(getter)]
    pub fn within_tolerance(&self) -> bool {
        self.inner.within_tolerance
    }

    /// Why the search stopped, e.g. `"converged"` or `"budget_exhausted"`.
    #[wasm_bindgen(getter)]
    pub fn outcome(&self) -> String {
        self.inner.outcome.as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn probes(&self) -> u32 {
        self.inner.probes
    }

    #[wasm_bindgen(getter)]
    pub fn is_failed(&self) -> bool {
        self.inner.is_failed()
    }

    #[wasm_bindgen(getter)]
    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

impl From<SearchResult> for JsSearchResult {
    fn from(inner: SearchResult) -> Self {
        Self { inner }
    }
}

/// Read an optional `SearchConfig` object; missing fields take defaults.
pub(crate) fn config_from_js(config: JsValue) -> Result<SearchConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(SearchConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(to_js_error)
}

/// Search a JPEG quality whose encoded size of `image` is close to
/// `target_bytes`.
///
/// `config` may be omitted or a partial object with any of `min_quality`,
/// `max_quality`, `max_iterations`, `early_exit_tolerance_bytes` and
/// `tight_tolerance_bytes`.
///
/// # Errors
///
/// Returns an error for a target that is not a positive number, an initial
/// quality outside `(0, 1]`, or an invalid config. Encoder failures do not
/// throw; they are reported through `outcome`.
#[wasm_bindgen]
pub fn find_quality_for_target_size(
    image: &JsDecodedImage,
    target_bytes: f64,
    initial_quality: f64,
    config: JsValue,
) -> Result<JsSearchResult, JsValue> {
    let config = config_from_js(config)?;
    let surface = image.to_decoded();
    let mut encoder = SurfaceEncoder::new(&surface, OutputFormat::Jpeg);

    // NaN and negative numbers saturate to 0, which the search rejects
    let target = target_bytes as u64;
    search::find_quality_for_target_size_with(
        &config,
        target,
        initial_quality,
        &mut encoder,
        &CancelToken::new(),
    )
    .map(JsSearchResult::from)
    .map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::{Object, Reflect};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn noisy(width: u32, height: u32) -> JsDecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        let mut state = 0xDEAD_BEEFu32;
        for _ in 0..width * height {
            for _ in 0..3 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                pixels.push((state >> 24) as u8);
            }
            pixels.push(255);
        }
        JsDecodedImage::new(width, height, pixels)
    }

    #[wasm_bindgen_test]
    fn test_search_with_default_config() {
        let result =
            find_quality_for_target_size(&noisy(64, 64), 4096.0, 0.9, JsValue::UNDEFINED).unwrap();
        assert!(result.probes() <= 13);
        assert!(result.quality() >= 0.1 && result.quality() <= 1.0);
    }

    #[wasm_bindgen_test]
    fn test_search_with_partial_config() {
        let config = Object::new();
        Reflect::set(&config, &"max_iterations".into(), &JsValue::from(2)).unwrap();
        Reflect::set(&config, &"early_exit_tolerance_bytes".into(), &JsValue::from(0)).unwrap();
        Reflect::set(&config, &"tight_tolerance_bytes".into(), &JsValue::from(0)).unwrap();

        let result =
            find_quality_for_target_size(&noisy(64, 64), 1.0, 0.9, config.into()).unwrap();
        assert!(result.probes() <= 3);
    }

    #[wasm_bindgen_test]
    fn test_zero_target_errors() {
        assert!(find_quality_for_target_size(&noisy(8, 8), 0.0, 0.9, JsValue::NULL).is_err());
        assert!(find_quality_for_target_size(&noisy(8, 8), -5.0, 0.9, JsValue::NULL).is_err());
    }

    #[wasm_bindgen_test]
    fn test_invalid_config_errors() {
        let config = Object::new();
        Reflect::set(&config, &"min_quality".into(), &JsValue::from(2.0)).unwrap();
        assert!(find_quality_for_target_size(&noisy(8, 8), 1024.0, 0.9, config.into()).is_err());
    }
}
