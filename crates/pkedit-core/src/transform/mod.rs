//! Geometric transforms.
//!
//! # Coordinate System
//!
//! - Crop selections are recorded in preview (CSS) pixels
//! - Crop rectangles are in image pixels
//! - Origin is top-left corner

mod crop;

pub use crop::{apply_crop, CropRect, CropSelection, Point, PreviewGeometry, MIN_SELECTION_SIZE};
