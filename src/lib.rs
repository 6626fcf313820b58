//! Card Stack - a scroll-driven card deck feed
//!
//! Core modules:
//! - `feed`: Pure scroll-to-visual-state mapping (layout, progress, per-card transforms)
//! - `background`: Ambient blob simulation and static noise dithering
//! - `content`: Markdown/config text pipeline producing card records
//! - `renderer`: DOM and Canvas2D application of computed frames (wasm only)
//! - `tuning`: Data-driven visual constants

pub mod background;
pub mod content;
pub mod feed;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod tuning;

pub use tuning::{BackgroundTuning, FeedTuning, TuningError};

/// Feed configuration constants
pub mod consts {
    /// Physical gap between the edges of two consecutive dealt cards
    pub const CARD_MARGIN: f32 = 20.0;
    /// Visible sliver of a stacked card below its predecessor
    pub const PEEK: f32 = 40.0;
    /// Downward anchor drift per card of progress (pixels)
    pub const EXPANSION_RATE: f32 = 35.0;

    /// Depth (translateZ) per stack position
    pub const DEPTH_STEP: f32 = 50.0;
    /// Scale reduction per stack position
    pub const SCALE_STEP: f32 = 0.04;
    /// Stack tilt per stack position (degrees)
    pub const STACK_TILT_DEG: f32 = 2.0;
    /// Stack positions that stay fully opaque before fading out
    pub const VISIBLE_DEPTH: f32 = 2.0;
    /// CSS perspective applied to every card (pixels)
    pub const PERSPECTIVE: f32 = 1000.0;
    /// Clip insets below this are not worth a clip-path
    pub const CLIP_EPSILON: f32 = 0.5;
    /// Rounded corner radius of the clipped inner card
    pub const CARD_CORNER_RADIUS: f32 = 24.0;
    /// Base z-index; card i draws at BASE_Z_INDEX - i
    pub const BASE_Z_INDEX: i32 = 100;

    /// How far a blob may travel past the viewport edge before bouncing
    pub const WALL_OVERSHOOT: f32 = 100.0;
    /// Overlap allowed between two blobs before repulsion kicks in
    pub const OVERLAP_ALLOWANCE: f32 = 100.0;
    /// Repulsion impulse scale
    pub const REPEL_STRENGTH: f32 = 0.05;
    /// Blob speed cap (units per frame)
    pub const MAX_SPEED: f32 = 2.0;
    /// Initial velocity components are drawn from ±INITIAL_SPEED_SPREAD/2
    pub const INITIAL_SPEED_SPREAD: f32 = 1.5;
    /// Fraction of the radius painted as a solid core
    pub const GRADIENT_CORE: f32 = 0.25;

    /// Noise tile edge length (pixels)
    pub const NOISE_TILE_SIZE: u32 = 200;
    /// Fraction of noise pixels that are lit
    pub const NOISE_DENSITY: f64 = 0.20;
    /// Alpha of a lit noise pixel (out of 255)
    pub const NOISE_ALPHA: u8 = 0x02;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
