//! Decoding of uploaded files (JPEG, PNG, WebP) into an RGBA surface.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageFormat, ImageReader};

use super::{DecodeError, DecodedImage, Orientation};

/// Check whether an upload's MIME type is an image.
///
/// Any `image/*` type is accepted here; whether the bytes can actually be
/// decoded is decided by [`decode_image`].
pub fn is_supported_mime_type(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Decode an uploaded image from bytes.
///
/// The container format is sniffed from the bytes. JPEG uploads have their
/// EXIF orientation applied so the surface matches what the browser shows
/// for the same file.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognised.
/// Returns `DecodeError::CorruptedFile` if decoding fails.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if format == ImageFormat::Jpeg {
        apply_orientation(img, get_orientation(bytes))
    } else {
        img
    };

    log::debug!(
        "decoded {:?} upload: {}x{}",
        format,
        img.width(),
        img.height()
    );

    Ok(DecodedImage::from_rgba_image(img.into_rgba8()))
}

/// Extract the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
