//! Editor session state.
//!
//! One [`EditSession`] holds everything the widget used to keep in globals:
//! the source image (replaced by crop and background removal), the rendered
//! canvas (the source drawn at the chosen output size), the output format and
//! the JPEG quality.
//!
//! # Pipeline
//!
//! 1. `load` decodes the upload; source and canvas start identical
//! 2. `resize` redraws the canvas from the source at a new size
//! 3. `fit_to_target_kb` searches a JPEG quality for a target file size
//! 4. `crop` / `remove_background` work on the canvas and make the result
//!    the new source
//! 5. `export` encodes the canvas for download

use std::fmt;

use thiserror::Error;

use crate::background;
use crate::decode::{self, DecodeError, DecodedImage, FilterType, ResizeMode};
use crate::encode::{self, quality_to_percent, EncodeError, OutputFormat, SurfaceEncoder};
use crate::search::{
    find_quality_for_target_size_with, CancelToken, SearchConfig, SearchError, SearchResult,
};
use crate::transform::{apply_crop, CropRect, CropSelection, PreviewGeometry};

/// Base name of downloaded files; the extension follows the output format.
pub const DOWNLOAD_BASENAME: &str = "editingwithpk-image";

/// Quality used until the user or a target-size search changes it.
pub const DEFAULT_QUALITY_PERCENT: u8 = 90;

/// Errors surfaced to the user by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("Please enter valid width and height.")]
    InvalidDimensions,

    #[error("Please enter a valid percentage.")]
    InvalidPercent,

    /// No usable crop selection was made.
    #[error("Select an area of at least 10 × 10 px to crop.")]
    EmptySelection,
}

/// Which of the two info lines an [`ImageInfo`] renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    Original,
    Output,
}

/// Dimensions and file size of the original upload or the current output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub kind: InfoKind,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

impl ImageInfo {
    pub fn kilobytes(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            InfoKind::Original => "Original",
            InfoKind::Output => "Output",
        };
        write!(
            f,
            "{}: {} × {}px • {:.1} KB",
            label,
            self.width,
            self.height,
            self.kilobytes()
        )
    }
}

/// An encoded file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// State of one editing session.
#[derive(Debug, Clone)]
pub struct EditSession {
    source: DecodedImage,
    original_width: u32,
    original_height: u32,
    original_size_bytes: u64,
    canvas: DecodedImage,
    output_format: OutputFormat,
    quality_percent: u8,
    filter: FilterType,
}

impl EditSession {
    /// Start a session from an uploaded file.
    ///
    /// # Errors
    ///
    /// `DecodeError::NotAnImage` if `mime_type` is not an image type, or any
    /// decoding error.
    pub fn load(mime_type: &str, bytes: &[u8]) -> Result<Self, SessionError> {
        if !decode::is_supported_mime_type(mime_type) {
            return Err(DecodeError::NotAnImage.into());
        }
        let image = decode::decode_image(bytes)?;
        Ok(Self::from_image(image, bytes.len() as u64))
    }

    /// Start a session from an already decoded image.
    pub fn from_image(image: DecodedImage, original_size_bytes: u64) -> Self {
        log::info!(
            "session loaded: {}x{}, {} bytes",
            image.width,
            image.height,
            original_size_bytes
        );
        Self {
            original_width: image.width,
            original_height: image.height,
            original_size_bytes,
            canvas: image.clone(),
            source: image,
            output_format: OutputFormat::default(),
            quality_percent: DEFAULT_QUALITY_PERCENT,
            filter: FilterType::Bilinear,
        }
    }

    /// Image that resizes are drawn from.
    pub fn source(&self) -> &DecodedImage {
        &self.source
    }

    /// Rendered output surface.
    pub fn canvas(&self) -> &DecodedImage {
        &self.canvas
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn quality_percent(&self) -> u8 {
        self.quality_percent
    }

    /// Set the JPEG quality, clamped to `1..=100`.
    pub fn set_quality_percent(&mut self, percent: u8) {
        self.quality_percent = percent.clamp(1, 100);
    }

    /// Current quality as a normalized value in `(0, 1]`.
    pub fn quality(&self) -> f64 {
        self.quality_percent as f64 / 100.0
    }

    pub fn set_filter(&mut self, filter: FilterType) {
        self.filter = filter;
    }

    /// Quality passed to the encoder on export: the slider for JPEG, 1.0 otherwise.
    pub fn export_quality(&self) -> f64 {
        if self.output_format.supports_quality() {
            self.quality()
        } else {
            1.0
        }
    }

    /// Redraw the canvas from the source at the size `mode` asks for.
    ///
    /// Returns the new canvas dimensions.
    pub fn resize(&mut self, mode: ResizeMode) -> Result<(u32, u32), SessionError> {
        let (width, height) = mode
            .target_dimensions(self.source.width, self.source.height)
            .map_err(|_| match mode {
                ResizeMode::Pixels { .. } => SessionError::InvalidDimensions,
                ResizeMode::Percent(_) => SessionError::InvalidPercent,
            })?;

        self.canvas = decode::resize(&self.source, width, height, self.filter)?;
        log::debug!("canvas redrawn at {}x{}", width, height);
        Ok((width, height))
    }

    /// Search a JPEG quality whose output is close to `target_kb` kilobytes.
    ///
    /// Does nothing (returns `Ok(None)`) when `target_kb` is zero or the
    /// output format is not JPEG. The current quality is the initial probe.
    /// The found quality is applied unless the first probe failed, the format
    /// turned out lossless, or the search was cancelled.
    pub fn fit_to_target_kb(
        &mut self,
        target_kb: u64,
        config: &SearchConfig,
        cancel: &CancelToken,
    ) -> Result<Option<SearchResult>, SessionError> {
        if target_kb == 0 || self.output_format != OutputFormat::Jpeg {
            return Ok(None);
        }

        let mut encoder = SurfaceEncoder::new(&self.canvas, self.output_format);
        let result = find_quality_for_target_size_with(
            config,
            target_kb.saturating_mul(1024),
            self.quality(),
            &mut encoder,
            cancel,
        )?;

        if result.is_applicable() {
            self.quality_percent = quality_to_percent(result.quality);
        } else {
            log::warn!(
                "target size search not applied ({:?}), keeping quality {}%",
                result.outcome,
                self.quality_percent
            );
        }
        Ok(Some(result))
    }

    /// Crop the canvas to a selection made over the preview.
    ///
    /// The cropped image becomes the new source and the canvas is redrawn
    /// at its size.
    pub fn crop(
        &mut self,
        selection: &CropSelection,
        view: &PreviewGeometry,
    ) -> Result<CropRect, SessionError> {
        let rect = selection
            .to_image_rect(view)
            .ok_or(SessionError::EmptySelection)?;
        self.crop_rect(rect);
        Ok(rect)
    }

    /// Crop the canvas to a rectangle in canvas pixels.
    pub fn crop_rect(&mut self, rect: CropRect) {
        let cropped = apply_crop(&self.canvas, rect);
        log::info!(
            "cropped to {}x{} at ({}, {})",
            cropped.width,
            cropped.height,
            rect.x,
            rect.y
        );
        self.replace_source(cropped);
    }

    /// Clear background-coloured pixels of the canvas.
    pub fn remove_background(&mut self, threshold: u32) {
        let cleaned = background::remove_background(&self.canvas, threshold);
        self.replace_source(cleaned);
    }

    fn replace_source(&mut self, image: DecodedImage) {
        self.canvas = image.clone();
        self.source = image;
    }

    /// Dimensions and size of the uploaded file.
    pub fn original_info(&self) -> ImageInfo {
        ImageInfo {
            kind: InfoKind::Original,
            width: self.original_width,
            height: self.original_height,
            size_bytes: self.original_size_bytes,
        }
    }

    /// Dimensions and encoded size of the canvas in the current format.
    pub fn output_info(&self) -> Result<ImageInfo, SessionError> {
        let bytes = encode::encode_image(&self.canvas, self.output_format, self.export_quality())?;
        Ok(ImageInfo {
            kind: InfoKind::Output,
            width: self.canvas.width,
            height: self.canvas.height,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Encode the canvas for download.
    pub fn export(&self) -> Result<Export, SessionError> {
        let bytes = encode::encode_image(&self.canvas, self.output_format, self.export_quality())?;
        Ok(Export {
            bytes,
            file_name: format!("{}.{}", DOWNLOAD_BASENAME, self.output_format.extension()),
            mime_type: self.output_format.mime_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchOutcome;
    use crate::transform::Point;

    fn noisy_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        let mut state = 0x9E37_79B9u32;
        for _ in 0..width * height {
            for _ in 0..3 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                pixels.push((state >> 24) as u8);
            }
            pixels.push(255);
        }
        DecodedImage::new(width, height, pixels)
    }

    fn png_upload(image: &DecodedImage) -> Vec<u8> {
        encode::encode_image(image, OutputFormat::Png, 1.0).unwrap()
    }

    #[test]
    fn test_load_png_upload() {
        let bytes = png_upload(&DecodedImage::filled(30, 20, [1, 2, 3]));
        let session = EditSession::load("image/png", &bytes).unwrap();

        assert_eq!((session.canvas().width, session.canvas().height), (30, 20));
        assert_eq!(session.original_info().size_bytes, bytes.len() as u64);
        assert_eq!(session.output_format(), OutputFormat::Jpeg);
        assert_eq!(session.quality_percent(), DEFAULT_QUALITY_PERCENT);
    }

    #[test]
    fn test_load_rejects_non_image_mime() {
        let err = EditSession::load("text/plain", b"hello").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please upload an image file (JPG, PNG, WebP…)."
        );
    }

    #[test]
    fn test_load_rejects_garbage() {
        let err = EditSession::load("image/png", &[1, 2, 3, 4]).unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
    }

    #[test]
    fn test_resize_pixels_and_percent() {
        let mut session = EditSession::from_image(DecodedImage::filled(200, 100, [9, 9, 9]), 0);

        let dims = session
            .resize(ResizeMode::Pixels {
                width: 50,
                height: 40,
            })
            .unwrap();
        assert_eq!(dims, (50, 40));
        assert_eq!((session.canvas().width, session.canvas().height), (50, 40));
        // The source is untouched by resizing
        assert_eq!(session.source().width, 200);

        let dims = session.resize(ResizeMode::Percent(25)).unwrap();
        assert_eq!(dims, (50, 25));
    }

    #[test]
    fn test_resize_validation_messages() {
        let mut session = EditSession::from_image(DecodedImage::filled(10, 10, [0, 0, 0]), 0);

        let err = session
            .resize(ResizeMode::Pixels {
                width: 0,
                height: 10,
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter valid width and height.");

        let err = session.resize(ResizeMode::Percent(0)).unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid percentage.");
    }

    #[test]
    fn test_fit_to_target_kb_updates_quality() {
        let mut session = EditSession::from_image(noisy_image(160, 160), 0);
        let max = encode::encode_image(session.canvas(), OutputFormat::Jpeg, 1.0)
            .unwrap()
            .len() as u64;
        let target_kb = (max / 1024 / 3).max(1);

        let result = session
            .fit_to_target_kb(target_kb, &SearchConfig::default(), &CancelToken::new())
            .unwrap()
            .unwrap();

        assert!(result.probes <= 13);
        assert!(!result.is_failed());
        assert_eq!(session.quality_percent(), quality_to_percent(result.quality));
    }

    #[test]
    fn test_fit_to_target_kb_skips_non_jpeg_and_zero_target() {
        let mut session = EditSession::from_image(noisy_image(16, 16), 0);
        session.set_quality_percent(77);

        let none = session
            .fit_to_target_kb(0, &SearchConfig::default(), &CancelToken::new())
            .unwrap();
        assert!(none.is_none());

        session.set_output_format(OutputFormat::Png);
        let none = session
            .fit_to_target_kb(50, &SearchConfig::default(), &CancelToken::new())
            .unwrap();
        assert!(none.is_none());
        assert_eq!(session.quality_percent(), 77);
    }

    #[test]
    fn test_fit_to_huge_target_saturates() {
        let mut session = EditSession::from_image(noisy_image(16, 16), 0);
        let result = session
            .fit_to_target_kb(u64::MAX, &SearchConfig::default(), &CancelToken::new())
            .unwrap()
            .unwrap();

        assert_eq!(result.outcome, SearchOutcome::BudgetExhausted);
        assert!(!result.within_tolerance);
        assert_eq!(session.quality_percent(), 100);
    }

    #[test]
    fn test_fit_from_low_quality_reports_size_of_applied_quality() {
        let mut session = EditSession::from_image(noisy_image(64, 64), 0);
        session.set_quality_percent(5);
        let at_floor = encode::encode_image(session.canvas(), OutputFormat::Jpeg, 0.1)
            .unwrap()
            .len() as u64;

        let result = session
            .fit_to_target_kb(
                (at_floor / 1024).max(1),
                &SearchConfig::default(),
                &CancelToken::new(),
            )
            .unwrap()
            .unwrap();

        assert!(result.quality >= 0.1);
        let applied = encode::encode_image(session.canvas(), OutputFormat::Jpeg, result.quality)
            .unwrap()
            .len() as u64;
        assert_eq!(result.achieved_size_bytes, applied);
        assert_eq!(session.quality_percent(), quality_to_percent(result.quality));
    }

    #[test]
    fn test_cancelled_search_keeps_quality() {
        let mut session = EditSession::from_image(noisy_image(16, 16), 0);
        session.set_quality_percent(42);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = session
            .fit_to_target_kb(500, &SearchConfig::default(), &cancel)
            .unwrap()
            .unwrap();
        assert_eq!(result.outcome, SearchOutcome::Cancelled);
        assert_eq!(session.quality_percent(), 42);
    }

    #[test]
    fn test_crop_replaces_source() {
        let mut session = EditSession::from_image(DecodedImage::filled(100, 80, [5, 5, 5]), 0);
        let selection = CropSelection::new(Point::new(10.0, 10.0), Point::new(60.0, 40.0));

        let rect = session
            .crop(&selection, &PreviewGeometry::unscaled(100, 80))
            .unwrap();
        assert_eq!(rect, CropRect::new(10, 10, 50, 30));
        assert_eq!((session.source().width, session.source().height), (50, 30));
        assert_eq!((session.canvas().width, session.canvas().height), (50, 30));

        // Later resizes start from the cropped image
        assert_eq!(session.resize(ResizeMode::Percent(200)).unwrap(), (100, 60));
        // The original info still describes the upload
        assert_eq!(session.original_info().width, 100);
    }

    #[test]
    fn test_crop_with_tiny_selection_fails() {
        let mut session = EditSession::from_image(DecodedImage::filled(100, 80, [5, 5, 5]), 0);
        let selection = CropSelection::new(Point::new(10.0, 10.0), Point::new(15.0, 40.0));
        let err = session
            .crop(&selection, &PreviewGeometry::unscaled(100, 80))
            .unwrap_err();
        assert!(matches!(err, SessionError::EmptySelection));
        assert_eq!(session.canvas().width, 100);
    }

    #[test]
    fn test_remove_background_becomes_source() {
        let mut session = EditSession::from_image(DecodedImage::filled(4, 4, [255, 255, 255]), 0);
        session.remove_background(background::DEFAULT_BACKGROUND_THRESHOLD);

        assert_eq!(session.canvas().pixel(0, 0).unwrap()[3], 0);
        assert_eq!(session.source().pixel(3, 3).unwrap()[3], 0);
    }

    #[test]
    fn test_export_names_and_formats() {
        let mut session = EditSession::from_image(DecodedImage::filled(8, 8, [10, 20, 30]), 0);

        let export = session.export().unwrap();
        assert_eq!(export.file_name, "editingwithpk-image.jpg");
        assert_eq!(export.mime_type, "image/jpeg");
        assert_eq!(&export.bytes[..2], &[0xFF, 0xD8]);

        session.set_output_format(OutputFormat::WebP);
        let export = session.export().unwrap();
        assert_eq!(export.file_name, "editingwithpk-image.webp");
        assert_eq!(export.mime_type, "image/webp");
        assert_eq!(session.export_quality(), 1.0);
    }

    #[test]
    fn test_info_lines() {
        let session = EditSession::from_image(DecodedImage::filled(4, 3, [0, 0, 0]), 2048);
        assert_eq!(
            session.original_info().to_string(),
            "Original: 4 × 3px • 2.0 KB"
        );

        let info = session.output_info().unwrap();
        assert_eq!(info.kind, InfoKind::Output);
        assert_eq!((info.width, info.height), (4, 3));
        assert!(info.size_bytes > 0);
        assert!(info.to_string().starts_with("Output: 4 × 3px • "));
    }

    #[test]
    fn test_quality_percent_is_clamped() {
        let mut session = EditSession::from_image(DecodedImage::filled(1, 1, [0, 0, 0]), 0);
        session.set_quality_percent(0);
        assert_eq!(session.quality_percent(), 1);
        session.set_quality_percent(250);
        assert_eq!(session.quality_percent(), 100);
        assert_eq!(session.quality(), 1.0);
    }
}
