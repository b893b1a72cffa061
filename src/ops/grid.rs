//! Grid split and merge of image batches.

use ndarray::{concatenate, s, stack, Array3, ArrayView3, Axis};

use crate::error::{Error, Result};
use crate::image::ImageBatch;

/// Largest number of rows or columns a grid may have.
pub const MAX_GRID_DIM: usize = 10;

/// A rows × cols tiling of an image.
///
/// Tiles are enumerated in row-major order: tile `row * cols + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    rows: usize,
    cols: usize,
}

impl GridLayout {
    /// Create a layout, validating both dimensions are in `1..=MAX_GRID_DIM`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if either dimension is out of range.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        for (name, value) in [("rows", rows), ("cols", cols)] {
            if !(1..=MAX_GRID_DIM).contains(&value) {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    reason: format!("must be between 1 and {MAX_GRID_DIM}, got {value}"),
                });
            }
        }
        Ok(Self { rows, cols })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of tiles in the grid.
    #[must_use]
    pub const fn tile_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Tile `(height, width)` for an image of the given size.
    /// The bottom and right remainders are not covered by any tile.
    #[must_use]
    pub const fn tile_size(&self, height: usize, width: usize) -> (usize, usize) {
        (height / self.rows, width / self.cols)
    }
}

/// Split the first image of `images` into a batch of tiles.
///
/// Any further images in the batch are ignored. Pixels beyond
/// `rows * tile_height` or `cols * tile_width` are dropped.
///
/// # Errors
///
/// Returns [`Error::EmptyBatch`] if `images` holds no image.
pub fn split(images: &ImageBatch, layout: GridLayout) -> Result<ImageBatch> {
    let (batch, height, width, _) = images.dim();
    if batch == 0 {
        return Err(Error::EmptyBatch);
    }

    let first = images.index_axis(Axis(0), 0);
    let (tile_height, tile_width) = layout.tile_size(height, width);

    tracing::debug!(
        "Splitting {height}x{width} image into {}x{} tiles of {tile_height}x{tile_width}",
        layout.rows,
        layout.cols
    );

    let mut tiles: Vec<ArrayView3<'_, f32>> = Vec::with_capacity(layout.tile_count());
    for row in 0..layout.rows {
        for col in 0..layout.cols {
            let y = row * tile_height;
            let x = col * tile_width;
            tiles.push(first.slice(s![y..y + tile_height, x..x + tile_width, ..]));
        }
    }

    Ok(stack(Axis(0), &tiles)?)
}

/// Merge a batch of row-major tiles back into a single image.
///
/// Returns a one-image batch.
///
/// # Errors
///
/// Returns [`Error::GridMismatch`] if the tile count is not `rows * cols`.
pub fn merge(tiles: &ImageBatch, layout: GridLayout) -> Result<ImageBatch> {
    let count = tiles.len_of(Axis(0));
    if count != layout.tile_count() {
        return Err(Error::GridMismatch {
            tiles: count,
            rows: layout.rows,
            cols: layout.cols,
            expected: layout.tile_count(),
        });
    }

    let strips = (0..layout.rows)
        .map(|row| {
            let row_tiles: Vec<ArrayView3<'_, f32>> = (0..layout.cols)
                .map(|col| tiles.index_axis(Axis(0), row * layout.cols + col))
                .collect();
            // Concatenate tiles horizontally
            concatenate(Axis(1), &row_tiles)
        })
        .collect::<std::result::Result<Vec<Array3<f32>>, _>>()?;

    let strip_views: Vec<ArrayView3<'_, f32>> = strips.iter().map(Array3::view).collect();
    // Concatenate strips vertically
    let merged = concatenate(Axis(0), &strip_views)?;

    Ok(merged.insert_axis(Axis(0)))
}
