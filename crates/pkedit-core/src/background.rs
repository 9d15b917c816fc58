//! Naive background removal.
//!
//! The colour of the top-left pixel is taken as the background. Every pixel
//! whose Manhattan RGB distance to it is below a threshold is made fully
//! transparent.
//!
//! This only works for flat, light or solid backgrounds. Noisy, gradient or
//! multi-colour backgrounds are not detected, and foreground pixels that
//! happen to match the corner colour are removed too.

use crate::decode::{DecodedImage, CHANNELS};

/// Default colour distance below which a pixel counts as background.
pub const DEFAULT_BACKGROUND_THRESHOLD: u32 = 60;

/// Sum of absolute per-channel RGB differences.
#[inline]
pub fn color_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs())
        .sum()
}

/// Return a copy of `image` with background-coloured pixels made transparent.
///
/// Colour values are left untouched; only alpha is cleared. Empty images are
/// returned unchanged.
pub fn remove_background(image: &DecodedImage, threshold: u32) -> DecodedImage {
    let mut output = image.clone();
    let Some(first) = image.pixels.get(..3) else {
        return output;
    };
    let reference = [first[0], first[1], first[2]];

    let mut cleared = 0usize;
    for px in output.pixels.chunks_exact_mut(CHANNELS) {
        if color_distance([px[0], px[1], px[2]], reference) < threshold {
            px[3] = 0;
            cleared += 1;
        }
    }

    log::debug!(
        "background removal: cleared {} of {} pixels (reference {:?}, threshold {})",
        cleared,
        image.pixel_count(),
        reference,
        threshold
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_distance() {
        assert_eq!(color_distance([0, 0, 0], [0, 0, 0]), 0);
        assert_eq!(color_distance([10, 20, 30], [20, 10, 30]), 20);
        assert_eq!(color_distance([255, 255, 255], [0, 0, 0]), 765);
    }

    #[test]
    fn test_solid_background_becomes_transparent() {
        // White border around a red centre pixel
        let mut image = DecodedImage::filled(3, 3, [250, 250, 250]);
        let centre = 4 * 4; // pixel (1, 1)
        image.pixels[centre..centre + 4].copy_from_slice(&[200, 0, 0, 255]);

        let result = remove_background(&image, DEFAULT_BACKGROUND_THRESHOLD);

        for y in 0..3 {
            for x in 0..3 {
                let alpha = result.pixel(x, y).unwrap()[3];
                if (x, y) == (1, 1) {
                    assert_eq!(alpha, 255);
                } else {
                    assert_eq!(alpha, 0);
                }
            }
        }
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut image = DecodedImage::filled(2, 1, [100, 100, 100]);
        // Distance exactly 60 from the reference
        image.pixels[4..8].copy_from_slice(&[120, 120, 120, 255]);

        let result = remove_background(&image, 60);
        assert_eq!(result.pixel(1, 0).unwrap()[3], 255);

        let result = remove_background(&image, 61);
        assert_eq!(result.pixel(1, 0).unwrap()[3], 0);
    }

    #[test]
    fn test_colours_are_preserved() {
        let image = DecodedImage::filled(2, 2, [40, 50, 60]);
        let result = remove_background(&image, DEFAULT_BACKGROUND_THRESHOLD);
        assert_eq!(result.pixel(1, 1), Some([40, 50, 60, 0]));
        assert_eq!((result.width, result.height), (2, 2));
    }

    #[test]
    fn test_zero_threshold_removes_nothing() {
        let image = DecodedImage::filled(4, 4, [9, 9, 9]);
        assert_eq!(remove_background(&image, 0), image);
    }

    #[test]
    fn test_empty_image() {
        let image = DecodedImage::new(0, 0, vec![]);
        assert!(remove_background(&image, 60).is_empty());
    }
}
