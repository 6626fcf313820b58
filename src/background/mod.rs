//! Ambient background simulation
//!
//! Two soft blobs drift around the viewport, bounce off its (extended) edges
//! and push each other apart. A static noise tile is laid over them to break
//! up gradient banding. Pure data only; painting lives in `renderer`.

pub mod blob;
pub mod noise;

pub use blob::{Blob, BlobColor, BlobField};
pub use noise::NoiseTile;
