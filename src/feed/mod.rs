//! Scroll-to-visual-state mapping
//!
//! Everything here is pure: measured heights and a scroll offset go in, a
//! per-card transform record comes out. Applying that record to the DOM lives
//! in `renderer`.
//! - `layout`: breakpoints and stack offsets (recomputed on resize)
//! - `progress`: global progress, camera and anchor drift
//! - `frame`: per-card transforms and dynamic top clipping
//! - `state`: owned animation state fed by scroll/pointer/resize events

pub mod frame;
pub mod layout;
pub mod progress;
pub mod state;

pub use frame::{CardPhase, CardTransform, FrameOutput, compute_frame};
pub use layout::{CardLayout, compute_breakpoints, compute_stack_offsets};
pub use progress::{ScrollFrame, global_progress};
pub use state::{AnimationState, CardInteraction};
