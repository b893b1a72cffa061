//! Stateless operations over image batches and sequence directories.

mod frames;
mod grid;
mod sequence;

pub use frames::{select_frame, SelectedFrame};
pub use grid::{merge, split, GridLayout, MAX_GRID_DIM};
pub use sequence::{
    frame_file_name, load_sequence, save_sequence, LoadedSequence, SavedSequence,
    FRAME_INDEX_LIMIT,
};
