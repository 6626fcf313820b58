//! Global progress resolution
//!
//! The clamped scroll offset is mapped through the breakpoints to a single
//! scalar in `[0, N-1]`: the integer part is the active card, the fraction is
//! how far the deck has moved toward the next one.

use super::layout::CardLayout;
use crate::lerp;

/// Map an effective (already clamped) scroll offset to global progress
///
/// Linear scan over the breakpoint intervals. Zero-length intervals are
/// stepped over rather than divided by.
pub fn global_progress(breakpoints: &[f32], effective_scroll: f32) -> f32 {
    let mut progress = 0.0;
    for (i, pair) in breakpoints.windows(2).enumerate() {
        let (start, end) = (pair[0], pair[1]);
        if effective_scroll >= start && effective_scroll < end {
            return i as f32 + (effective_scroll - start) / (end - start);
        } else if effective_scroll >= end {
            progress = (i + 1) as f32;
        }
    }
    progress
}

/// Scroll-derived values shared by every card in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFrame {
    /// Scroll offset clamped to `[0, max_scroll]`
    pub effective_scroll: f32,
    /// Global progress in `[0, N-1]`
    pub progress: f32,
    /// `floor(progress)`, clamped to the last card
    pub active_index: usize,
    /// Interpolation weight toward `active_index + 1`
    pub percent: f32,
    /// Stack offset the waiting cards are positioned against
    pub camera_y: f32,
    /// Screen-space anchor drift (`progress * expansion_rate`)
    pub anchor_shift: f32,
}

impl ScrollFrame {
    /// Resolve the frame for a live scroll offset
    pub fn resolve(layout: &CardLayout, scroll_y: f32, expansion_rate: f32) -> Self {
        let effective_scroll = layout.clamp_scroll(scroll_y);
        let progress = global_progress(layout.breakpoints(), effective_scroll);

        let last = layout.len().saturating_sub(1);
        let active_index = (progress.floor() as usize).min(last);
        let percent = progress - active_index as f32;

        // The camera glides from one stack offset to the next; the final card
        // has no successor so the camera stops there.
        let offset_a = layout.stack_offset(active_index);
        let offset_b = layout.stack_offset(active_index + 1);
        let camera_y = lerp(offset_a, offset_b, percent);

        Self {
            effective_scroll,
            progress,
            active_index,
            percent,
            camera_y,
            anchor_shift: progress * expansion_rate,
        }
    }
}
