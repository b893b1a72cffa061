//! Image loading utilities.

use std::path::Path;

use image::RgbImage;
use ndarray::Array3;

use crate::error::{Error, Result};

use super::{Image, RGB_CHANNELS};

/// Load an image from disk as a normalized HWC tensor.
///
/// Any source format `image` can decode is accepted; the pixels are
/// converted to 8-bit RGB and scaled to [0, 1].
///
/// # Errors
///
/// Returns an error if the image cannot be opened or decoded.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(rgb_to_array(&img.to_rgb8()))
}

/// Convert an 8-bit RGB image to an HWC tensor with values in [0, 1].
#[must_use]
pub fn rgb_to_array(rgb: &RgbImage) -> Image {
    let (width, height) = rgb.dimensions();
    let (width, height) = (width as usize, height as usize);

    // The raw buffer is already row-major RGB, the same layout as HWC.
    Array3::from_shape_fn((height, width, RGB_CHANNELS), |(y, x, c)| {
        f32::from(rgb.as_raw()[(y * width + x) * RGB_CHANNELS + c]) / 255.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_tensor_shape() {
        let img = RgbImage::new(150, 100);
        let tensor = rgb_to_array(&img);

        assert_eq!(tensor.shape(), &[100, 150, 3]);
    }

    #[test]
    fn test_normalization_range() {
        let mut img = RgbImage::new(4, 2);
        img.put_pixel(3, 1, Rgb([255, 128, 0]));
        let tensor = rgb_to_array(&img);

        assert!((tensor[[1, 3, 0]] - 1.0).abs() < f32::EPSILON);
        assert!((tensor[[1, 3, 1]] - 128.0 / 255.0).abs() < f32::EPSILON);
        assert!(tensor[[1, 3, 2]].abs() < f32::EPSILON);
        assert!(tensor[[0, 0, 0]].abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, Error::ImageLoad { .. }));
    }
}
