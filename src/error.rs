//! Custom error types for framegrid.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the framegrid library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to create a sequence directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tile batch does not match the requested grid.
    #[error("number of tiles ({tiles}) doesn't match grid size ({rows}x{cols}={expected})")]
    GridMismatch {
        tiles: usize,
        rows: usize,
        cols: usize,
        expected: usize,
    },

    /// Sequence folder does not exist.
    #[error("folder not found: {}", path.display())]
    FolderNotFound { path: PathBuf },

    /// Sequence folder holds no files with the expected extension.
    #[error("no {extension} files found in: {}", path.display())]
    NoImages { path: PathBuf, extension: String },

    /// A frame in a sequence has a different size from the first one.
    #[error("frame {} is {actual:?}, expected {expected:?} (height, width)", path.display())]
    FrameSizeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An operation needs at least one image in the batch.
    #[error("image batch is empty")]
    EmptyBatch,

    /// Image channel count cannot be written as RGB.
    #[error("unsupported channel count {channels}: expected 1, 3 or 4")]
    UnsupportedChannels { channels: usize },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// No node registered under this name.
    #[error("unknown node {name}")]
    UnknownNode { name: String },

    /// Two registry entries share a name.
    #[error("node {name} is registered more than once")]
    DuplicateNode { name: String },

    /// A required input without a default was not supplied.
    #[error("node {node} is missing required input {input}")]
    MissingInput { node: String, input: String },

    /// An input value has the wrong kind.
    #[error("input {input} of node {node} expects {expected}, got {actual}")]
    InputType {
        node: String,
        input: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape error in array operations.
    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Result type alias for framegrid operations.
pub type Result<T> = std::result::Result<T, Error>;
