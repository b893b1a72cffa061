//! Frame selection from a video batch.

use ndarray::{s, Axis};

use crate::error::{Error, Result};
use crate::image::ImageBatch;

/// A frame picked out of a batch, plus the size of the batch it came from.
#[derive(Debug, Clone)]
pub struct SelectedFrame {
    /// One-image batch holding the selected frame.
    pub frame: ImageBatch,
    /// Number of frames in the source batch.
    pub total_frames: usize,
}

/// Select frame `frame_index` from `images`.
///
/// An index past the end is clamped to the last frame with a warning, so a
/// driver incrementing the index can compare it to `total_frames` to know
/// when the video is exhausted.
///
/// # Errors
///
/// Returns [`Error::EmptyBatch`] if `images` holds no frame.
pub fn select_frame(images: &ImageBatch, frame_index: usize) -> Result<SelectedFrame> {
    let total_frames = images.len_of(Axis(0));
    if total_frames == 0 {
        return Err(Error::EmptyBatch);
    }

    let index = if frame_index >= total_frames {
        tracing::warn!(
            "frame_index {frame_index} >= batch_size {total_frames}, using last frame"
        );
        total_frames - 1
    } else {
        frame_index
    };

    Ok(SelectedFrame {
        frame: images.slice(s![index..=index, .., .., ..]).to_owned(),
        total_frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_warnings;
    use ndarray::Array4;

    #[allow(clippy::cast_precision_loss)]
    fn numbered(frames: usize) -> ImageBatch {
        Array4::from_shape_fn((frames, 2, 3, 3), |(i, _, _, _)| i as f32 / 10.0)
    }

    #[test]
    fn test_selects_requested_frame() {
        let images = numbered(5);
        let selected = select_frame(&images, 2).unwrap();

        assert_eq!(selected.total_frames, 5);
        assert_eq!(selected.frame.shape(), &[1, 2, 3, 3]);
        assert!(selected.frame.iter().all(|&v| (v - 0.2).abs() < f32::EPSILON));
    }

    #[test]
    fn test_clamps_past_end() {
        let images = numbered(4);
        let selected = select_frame(&images, 9).unwrap();

        assert_eq!(selected.total_frames, 4);
        assert_eq!(selected.frame, images.slice(s![3..4, .., .., ..]));
    }

    #[test]
    fn test_clamp_logs_warning() {
        let images = numbered(4);

        let (selected, logs) = capture_warnings(|| select_frame(&images, 9));

        assert_eq!(selected.unwrap().total_frames, 4);
        assert!(logs.contains("WARN"), "{logs}");
        assert!(
            logs.contains("frame_index 9 >= batch_size 4, using last frame"),
            "{logs}"
        );
    }

    #[test]
    fn test_in_range_index_logs_nothing() {
        let images = numbered(4);

        let (_, logs) = capture_warnings(|| select_frame(&images, 1));

        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn test_index_equal_to_len_is_clamped() {
        let images = numbered(3);
        let selected = select_frame(&images, 3).unwrap();
        assert_eq!(selected.frame, images.slice(s![2..3, .., .., ..]));
    }

    #[test]
    fn test_empty_batch() {
        let images = Array4::<f32>::zeros((0, 2, 2, 3));
        assert!(matches!(select_frame(&images, 0), Err(Error::EmptyBatch)));
    }
}
