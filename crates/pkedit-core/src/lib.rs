//! pkedit Core - Image editing library
//!
//! This crate provides the core functionality of the pkedit image editor:
//! decoding uploads, resizing, cropping, naive background removal, encoding
//! to JPEG/PNG/WebP, and searching a JPEG quality that hits a target file
//! size.
//!
//! [`session::EditSession`] ties the pieces together the way the editor
//! widget uses them. The individual modules are usable on their own.

pub mod background;
pub mod decode;
pub mod encode;
pub mod search;
pub mod session;
pub mod transform;

pub use background::{remove_background, DEFAULT_BACKGROUND_THRESHOLD};
pub use decode::{decode_image, DecodeError, DecodedImage, ResizeMode};
pub use encode::{encode_image, EncodeError, OutputFormat};
pub use search::{
    find_quality_for_target_size, CancelToken, SearchConfig, SearchOutcome, SearchResult,
};
pub use session::{EditSession, Export, ImageInfo, SessionError};
pub use transform::{apply_crop, CropRect, CropSelection, PreviewGeometry};
