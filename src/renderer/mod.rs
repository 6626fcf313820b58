//! Browser rendering (wasm only)
//!
//! Writes computed card transforms onto DOM elements and paints the blob
//! background onto a Canvas2D surface.

pub mod background;
pub mod cards;

pub use background::BackgroundRenderer;
pub use cards::{CardElements, ScrollSpacer};
