//! Numbered image sequences on disk.
//!
//! A sequence directory is a flat folder of `frame_NNNN.<ext>` files. The
//! zero padding keeps lexicographic file order equal to frame order for
//! indices below [`FRAME_INDEX_LIMIT`].

use std::fs;
use std::path::{Path, PathBuf};

use ndarray::{stack, ArrayView3, Axis};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::image::{self, Image, ImageBatch};

/// First frame index that no longer fits the four-digit file name field.
pub const FRAME_INDEX_LIMIT: usize = 10_000;

/// Result of writing a batch to a sequence directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSequence {
    /// Resolved sequence directory.
    pub directory: PathBuf,
    /// `frame_index + 1`, independent of how many images were written.
    pub next_frame_index: usize,
}

/// A sequence directory read back into memory.
#[derive(Debug, Clone)]
pub struct LoadedSequence {
    /// Frames stacked in file name order.
    pub images: ImageBatch,
    /// Number of frames loaded.
    pub frame_count: usize,
}

/// File name of frame `index`, e.g. `frame_0042.png`.
#[must_use]
pub fn frame_file_name(index: usize, extension: &str) -> String {
    format!("frame_{index:04}.{extension}")
}

/// Write every image of `images` into `folder`, numbered from `frame_index`.
///
/// `folder` is resolved against the configured output directory and created
/// if missing. Existing files with the same index are overwritten.
///
/// The returned `next_frame_index` is always `frame_index + 1`, which is what
/// a host saving one frame per invocation chains into its next call.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an image cannot be written.
pub fn save_sequence<P: AsRef<Path>>(
    images: &ImageBatch,
    folder: P,
    frame_index: usize,
    config: &Config,
) -> Result<SavedSequence> {
    let directory = config.resolve(folder);

    fs::create_dir_all(&directory).map_err(|source| Error::CreateDir {
        path: directory.clone(),
        source,
    })?;

    let extension = config.format.extension();
    for (offset, frame) in images.axis_iter(Axis(0)).enumerate() {
        let index = frame_index + offset;
        if index >= FRAME_INDEX_LIMIT {
            tracing::warn!(
                "frame index {index} exceeds the 4-digit file name field; sequence order is no longer guaranteed"
            );
        }

        let path = directory.join(frame_file_name(index, extension));
        image::save_image(frame, &path, config.format)?;

        tracing::info!("Saved: {}", path.display());
    }

    Ok(SavedSequence {
        directory,
        next_frame_index: frame_index + 1,
    })
}

/// Load every file with the configured extension in `folder` as one batch.
///
/// Relative paths are resolved against the configured output directory.
/// Files are ordered by file name; images are converted to RGB in [0, 1].
///
/// # Errors
///
/// Returns [`Error::FolderNotFound`] if the folder does not exist,
/// [`Error::NoImages`] if it holds no matching files, and
/// [`Error::FrameSizeMismatch`] if the frames differ in size.
pub fn load_sequence<P: AsRef<Path>>(folder: P, config: &Config) -> Result<LoadedSequence> {
    let directory = config.resolve(folder);

    if !directory.exists() {
        return Err(Error::FolderNotFound { path: directory });
    }

    let extension = config.format.extension();
    let files = list_frames(&directory, extension)?;

    if files.is_empty() {
        return Err(Error::NoImages {
            path: directory,
            extension: extension.to_uppercase(),
        });
    }

    let mut frames: Vec<Image> = Vec::with_capacity(files.len());
    for path in &files {
        let frame = image::load_image(path)?;
        if let Some(first) = frames.first() {
            let expected = (first.dim().0, first.dim().1);
            let actual = (frame.dim().0, frame.dim().1);
            if expected != actual {
                return Err(Error::FrameSizeMismatch {
                    path: path.clone(),
                    expected,
                    actual,
                });
            }
        }
        tracing::debug!("Loaded: {}", path.display());
        frames.push(frame);
    }

    let views: Vec<ArrayView3<'_, f32>> = frames.iter().map(Image::view).collect();
    let images = stack(Axis(0), &views)?;

    tracing::info!("Loaded {} frames from {}", frames.len(), directory.display());

    Ok(LoadedSequence {
        frame_count: frames.len(),
        images,
    })
}

/// Files in `directory` with the given extension, sorted by file name.
fn list_frames(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
