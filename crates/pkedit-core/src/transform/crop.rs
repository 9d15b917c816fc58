//! Cropping by a rectangle dragged over the preview.
//!
//! A [`CropSelection`] is recorded in preview coordinates (CSS pixels relative
//! to the preview area). [`PreviewGeometry`] describes where the canvas is
//! drawn inside that area and at what scale, which is what is needed to map
//! the selection onto canvas pixels.
//!
//! # Example
//!
//! ```ignore
//! let selection = CropSelection::new(Point::new(40.0, 30.0), Point::new(140.0, 110.0));
//! if let Some(rect) = selection.to_image_rect(&geometry) {
//!     let cropped = apply_crop(&canvas, rect);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::decode::{DecodedImage, CHANNELS};

/// Selections smaller than this (in preview pixels) along either axis are
/// ignored.
pub const MIN_SELECTION_SIZE: f64 = 10.0;

/// A point in preview coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Crop region in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Layout of the rendered canvas inside the preview area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewGeometry {
    /// Offset of the canvas' left edge from the preview area's left edge.
    pub canvas_left: f64,
    /// Offset of the canvas' top edge from the preview area's top edge.
    pub canvas_top: f64,
    /// Displayed (CSS) width of the canvas.
    pub display_width: f64,
    /// Displayed (CSS) height of the canvas.
    pub display_height: f64,
    /// Backing canvas width in pixels.
    pub canvas_width: u32,
    /// Backing canvas height in pixels.
    pub canvas_height: u32,
}

impl PreviewGeometry {
    /// Geometry for a canvas shown at its natural size at the area's origin.
    pub fn unscaled(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_left: 0.0,
            canvas_top: 0.0,
            display_width: canvas_width as f64,
            display_height: canvas_height as f64,
            canvas_width,
            canvas_height,
        }
    }
}

/// A drag from `start` to `end` over the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropSelection {
    pub start: Point,
    pub end: Point,
}

impl CropSelection {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Begin a drag: start and end coincide.
    pub fn begin(at: Point) -> Self {
        Self { start: at, end: at }
    }

    /// Move the end of the drag.
    pub fn drag_to(&mut self, to: Point) {
        self.end = to;
    }

    /// Top-left corner and size of the selection, whatever the drag direction.
    pub fn normalized(&self) -> (Point, f64, f64) {
        let origin = Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y));
        let width = (self.end.x - self.start.x).abs();
        let height = (self.end.y - self.start.y).abs();
        (origin, width, height)
    }

    /// Whether the selection is large enough to be shown and applied.
    pub fn is_visible(&self) -> bool {
        let (_, width, height) = self.normalized();
        width >= MIN_SELECTION_SIZE && height >= MIN_SELECTION_SIZE
    }

    /// Map the selection onto canvas pixels.
    ///
    /// The canvas offset is subtracted, then coordinates are scaled by
    /// `canvas / display`. The origin is clamped at zero and the size to what
    /// remains of the canvas. Returns `None` for selections that are not
    /// visible, a degenerate display size, or an empty result.
    pub fn to_image_rect(&self, view: &PreviewGeometry) -> Option<CropRect> {
        if !self.is_visible() || view.display_width <= 0.0 || view.display_height <= 0.0 {
            return None;
        }

        let canvas_w = view.canvas_width as f64;
        let canvas_h = view.canvas_height as f64;
        let scale_x = canvas_w / view.display_width;
        let scale_y = canvas_h / view.display_height;

        let (origin, width, height) = self.normalized();
        let sx = ((origin.x - view.canvas_left) * scale_x).max(0.0);
        let sy = ((origin.y - view.canvas_top) * scale_y).max(0.0);
        let sw = (canvas_w - sx).min(width * scale_x);
        let sh = (canvas_h - sy).min(height * scale_y);

        let rect = CropRect::new(
            sx.round() as u32,
            sy.round() as u32,
            sw.round().max(0.0) as u32,
            sh.round().max(0.0) as u32,
        );
        if rect.width == 0 || rect.height == 0 {
            return None;
        }
        Some(rect)
    }
}

/// Copy the pixels inside `rect` into a new image.
///
/// The rectangle is clamped to the image bounds and the output is at least
/// 1x1 pixels.
pub fn apply_crop(image: &DecodedImage, rect: CropRect) -> DecodedImage {
    if image.is_empty() {
        return image.clone();
    }
    if rect.x == 0 && rect.y == 0 && rect.width >= image.width && rect.height >= image.height {
        return image.clone();
    }

    let left = rect.x.min(image.width.saturating_sub(1));
    let top = rect.y.min(image.height.saturating_sub(1));
    let out_width = rect.width.min(image.width - left).max(1);
    let out_height = rect.height.min(image.height - top).max(1);

    let src_stride = image.width as usize * CHANNELS;
    let row_len = out_width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    for y in top..top + out_height {
        let start = y as usize * src_stride + left as usize * CHANNELS;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage::new(out_width, out_height, output)
}
