//! Upload decoding and resizing for PKEdit.
//!
//! This module provides functionality for:
//! - Decoding uploaded JPEG, PNG and WebP files into an RGBA surface
//! - Applying EXIF orientation the way the browser displays photos
//! - Resizing by exact pixels or by percentage, with aspect locking
//!
//! # Examples
//!
//! ```ignore
//! use pkedit_core::decode::{decode_image, ResizeMode};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let (w, h) = ResizeMode::Percent(50).target_dimensions(image.width, image.height).unwrap();
//! ```

mod resize;
mod types;
mod upload;

pub use resize::{locked_height, locked_width, resize, ResizeMode};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, CHANNELS};
pub use upload::{decode_image, get_orientation, is_supported_mime_type};
