//! Image batch types and conversion to/from files on disk.

mod load;
mod save;

pub use load::{load_image, rgb_to_array};
pub use save::{array_to_rgb, save_image};

use ndarray::{Array3, Array4};

/// Batch of images in NHWC format (index, row, column, channel).
/// Values are normalized to [0, 1]; index order is frame or tile order.
pub type ImageBatch = Array4<f32>;

/// A single image in HWC format (row, column, channel).
pub type Image = Array3<f32>;

/// Number of channels in persisted RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Default JPEG quality when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Encoding used for files written to a sequence directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceFormat {
    /// Lossless PNG, the default.
    #[default]
    Png,
    /// JPEG with the given quality (1-100).
    Jpeg { quality: u8 },
}

impl SequenceFormat {
    /// File extension, without the leading dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}
