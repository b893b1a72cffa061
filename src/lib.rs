//! # framegrid
//!
//! Image grid and frame sequence nodes for node-based image pipelines.
//!
//! Every operation is a stateless transformation over an [`ImageBatch`], a
//! 4D array laid out as (index, row, column, channel) with values in [0, 1]:
//!
//! - [`ops::split`] / [`ops::merge`] cut one image into a rows × cols grid of
//!   tiles and put it back together.
//! - [`ops::select_frame`] picks one frame out of a video batch.
//! - [`ops::save_sequence`] / [`ops::load_sequence`] persist a batch as
//!   `frame_NNNN.png` files and read such a folder back.
//!
//! A host discovers the operations through the [`Registry`] and invokes them
//! by name.
//!
//! ## Example
//!
//! ```no_run
//! use framegrid::ops::{self, GridLayout};
//! use framegrid::Config;
//!
//! # fn main() -> framegrid::Result<()> {
//! let config = Config::default();
//! let video = ops::load_sequence("depth_frames", &config)?;
//!
//! let layout = GridLayout::new(2, 3)?;
//! let tiles = ops::split(&video.images, layout)?;
//! let image = ops::merge(&tiles, layout)?;
//!
//! ops::save_sequence(&image, "merged", 0, &config)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod ops;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use crate::image::{ImageBatch, SequenceFormat};
pub use registry::{Registry, Value};
