//! Padded cropping of page images.

use crate::core::ImageProcessError;
use crate::processors::BoundingBox;
use image::RgbImage;

/// Crops `bbox` grown by `padding` pixels out of `image`.
///
/// The padded box is clamped to the image before cropping, so padding near an
/// edge only grows the crop as far as the image reaches.
///
/// # Arguments
///
/// * `image` - The page image to crop from
/// * `bbox` - Region to crop, in page-pixel space
/// * `padding` - Pixels added on every side before clamping
///
/// # Returns
///
/// The cropped image together with the pixel-aligned box it was taken from.
pub fn crop_padded(
    image: &RgbImage,
    bbox: &BoundingBox,
    padding: f32,
) -> Result<(RgbImage, BoundingBox), ImageProcessError> {
    let (width, height) = image.dimensions();
    let padded = bbox.pad_within(padding.max(0.0), width as f32, height as f32);

    let x1 = padded.x1.max(0.0).floor() as u32;
    let y1 = padded.y1.max(0.0).floor() as u32;
    let x2 = padded.x2.max(0.0).ceil() as u32;
    let y2 = padded.y2.max(0.0).ceil() as u32;

    if x2 <= x1 || y2 <= y1 {
        return Err(ImageProcessError::InvalidCropCoordinates { x1, y1, x2, y2 });
    }
    if x2 > width || y2 > height {
        return Err(ImageProcessError::CropOutOfBounds {
            x2,
            y2,
            width,
            height,
        });
    }

    let crop = image::imageops::crop_imm(image, x1, y1, x2 - x1, y2 - y1).to_image();
    let crop_box = BoundingBox::from_coords(x1 as f32, y1 as f32, x2 as f32, y2 as f32);
    Ok((crop, crop_box))
}
