//! Image saving utilities.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};
use ndarray::ArrayView3;

use crate::error::{Error, Result};

use super::SequenceFormat;

/// Save an HWC tensor as an image file.
///
/// The tensor is:
/// 1. Denormalized from [0, 1] to [0, 255]
/// 2. Expanded or reduced to RGB (grey is replicated, alpha is dropped)
/// 3. Encoded with `format` regardless of the path's extension
///
/// # Errors
///
/// Returns an error if the channel count is unsupported or the image cannot be saved.
pub fn save_image<P: AsRef<Path>>(
    tensor: ArrayView3<'_, f32>,
    path: P,
    format: SequenceFormat,
) -> Result<()> {
    let path = path.as_ref();

    let img = DynamicImage::ImageRgb8(array_to_rgb(tensor)?);

    match format {
        SequenceFormat::Jpeg { quality } => {
            let mut output = std::fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            img.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        SequenceFormat::Png => {
            img.save_with_format(path, image::ImageFormat::Png)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
    }

    Ok(())
}

/// Convert a normalized HWC tensor to an 8-bit RGB image.
///
/// # Errors
///
/// Returns [`Error::UnsupportedChannels`] unless the tensor has 1, 3 or 4 channels.
#[allow(clippy::cast_possible_truncation)]
pub fn array_to_rgb(tensor: ArrayView3<'_, f32>) -> Result<RgbImage> {
    let (height, width, channels) = tensor.dim();

    // Grey replicates channel 0, RGBA ignores channel 3.
    let source: [usize; 3] = match channels {
        1 => [0, 0, 0],
        3 | 4 => [0, 1, 2],
        _ => return Err(Error::UnsupportedChannels { channels }),
    };

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb(source.map(|c| quantize(tensor[[y, x, c]])))
    }))
}

/// Map a value from [0, 1] to the nearest byte, clamping out-of-range input.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
