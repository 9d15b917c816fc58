//! pkedit WASM - WebAssembly bindings for pkedit
//!
//! This crate exposes the pkedit-core functionality to the browser widget.
//!
//! # Module Structure
//!
//! - `session` - `JsEditSession`, the whole editor state behind one object
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Upload decoding and resizing
//! - `encode` - JPEG/PNG/WebP encoding
//! - `search` - Quality search for a target file size
//! - `transform` - Cropping
//! - `background` - Naive background removal
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession } from '@pkedit/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const session = JsEditSession.load(file.type, bytes);
//! console.log(session.original_info());
//! ```

use wasm_bindgen::prelude::*;

mod background;
mod console;
mod decode;
mod encode;
mod search;
mod session;
mod transform;
mod types;

// Re-export public types
pub use background::remove_background;
pub use decode::{
    decode_image, is_supported_mime_type, locked_height, locked_width, resize, resize_percent,
};
pub use encode::{encode_image, output_extension, supports_quality};
pub use search::{find_quality_for_target_size, JsSearchResult};
pub use session::JsEditSession;
pub use transform::{apply_crop, selection_to_rect};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
///
/// Routes core log output to the browser console at `info` level.
#[wasm_bindgen(start)]
pub fn init() {
    console::install(log::LevelFilter::Info);
}

/// Change the console log level: "off", "error", "warn", "info", "debug" or
/// "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    console::install(console::parse_level(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
