// SPDX-License-Identifier: MPL-2.0
//! Pixel transformations used by edits (rotate, resize) and the scaler.

use crate::error::Result;
use crate::media::ImageData;
use image_rs::imageops::FilterType;

/// Rotation in quarter turns, normalized from a signed degree value.
///
/// Only multiples of 90° are meaningful; other values round down to the
/// nearest quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    /// Normalizes a signed angle in degrees (e.g. `-90` becomes three turns).
    #[must_use]
    pub fn from_degrees(degrees: i32) -> Self {
        let turns = degrees.div_euclid(90).rem_euclid(4);
        // rem_euclid(4) keeps the value in 0..4
        Self(turns as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Rotate an image by a signed number of degrees (multiples of 90).
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match its dimensions.
pub fn rotate(image: &ImageData, degrees: i32) -> Result<ImageData> {
    let dynamic = image.to_dynamic()?;
    let rotated = match QuarterTurns::from_degrees(degrees).value() {
        1 => dynamic.rotate90(),
        2 => dynamic.rotate180(),
        3 => dynamic.rotate270(),
        _ => return Ok(image.clone()),
    };
    Ok(ImageData::from_dynamic(&rotated))
}

/// Resize the image to exactly the provided dimensions using a bilinear filter.
///
/// Both target dimensions are raised to at least 1 pixel.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match its dimensions.
pub fn scale(image: &ImageData, width: u32, height: u32) -> Result<ImageData> {
    let width = width.max(1);
    let height = height.max(1);
    if width == image.width && height == image.height {
        return Ok(image.clone());
    }
    let dynamic = image.to_dynamic()?;
    let resized = dynamic.resize_exact(width, height, FilterType::Triangle);
    Ok(ImageData::from_dynamic(&resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> ImageData {
        ImageData::from_rgba(width, height, vec![0u8; (width * height * 4) as usize])
    }

    #[test]
    fn quarter_turns_normalize_negative_angles() {
        assert_eq!(QuarterTurns::from_degrees(-90).value(), 3);
        assert_eq!(QuarterTurns::from_degrees(90).value(), 1);
        assert_eq!(QuarterTurns::from_degrees(360).value(), 0);
        assert_eq!(QuarterTurns::from_degrees(-180).value(), 2);
    }

    #[test]
    fn rotate_right_swaps_dimensions() {
        let img = create_test_image(4, 3);
        let rotated = rotate(&img, 90).expect("rotate");
        assert_eq!((rotated.width, rotated.height), (3, 4));
    }

    #[test]
    fn rotate_left_swaps_dimensions() {
        let img = create_test_image(4, 3);
        let rotated = rotate(&img, -90).expect("rotate");
        assert_eq!((rotated.width, rotated.height), (3, 4));
    }

    #[test]
    fn rotate_by_zero_returns_same_pixels() {
        let img = create_test_image(4, 3);
        let rotated = rotate(&img, 0).expect("rotate");
        assert!(rotated.same_pixels(&img));
    }

    #[test]
    fn scale_changes_dimensions() {
        let img = create_test_image(8, 4);
        let resized = scale(&img, 4, 2).expect("scale");
        assert_eq!((resized.width, resized.height), (4, 2));
    }

    #[test]
    fn scale_clamps_zero_to_one_pixel() {
        let img = create_test_image(8, 4);
        let resized = scale(&img, 0, 0).expect("scale");
        assert_eq!((resized.width, resized.height), (1, 1));
    }
}
