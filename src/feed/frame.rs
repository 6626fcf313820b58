//! Per-card transform derivation
//!
//! Each card is either still waiting in the deck ([`CardPhase::Stacked`]) or
//! has passed its breakpoint and rides up with the scroll
//! ([`CardPhase::Dealt`]). Positions are card centers in viewport pixels.
//!
//! After placement, cards are walked in index order and each card's top is
//! clipped (never translated) so that it never rises more than `peek` above
//! the visible top of the card before it.

use glam::Vec2;

use super::layout::CardLayout;
use super::progress::ScrollFrame;
use super::state::CardInteraction;
use crate::consts::BASE_Z_INDEX;
use crate::tuning::FeedTuning;

/// Where a card is in its stacked → dealt lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardPhase {
    /// Waiting in the deck, `rel_index` positions behind the active slot (>= 0)
    Stacked { rel_index: f32 },
    /// Past its breakpoint; `scroll_delta = breakpoint - effective_scroll` (< 0
    /// once it has scrolled above the anchor)
    Dealt { scroll_delta: f32 },
}

impl CardPhase {
    /// Resolve the phase of card `index` for this frame
    pub fn resolve(layout: &CardLayout, frame: &ScrollFrame, index: usize) -> Self {
        let rel_index = index as f32 - frame.progress;
        if rel_index >= 0.0 {
            CardPhase::Stacked { rel_index }
        } else {
            CardPhase::Dealt {
                scroll_delta: layout.breakpoint(index) - frame.effective_scroll,
            }
        }
    }
}

/// Computed visual state of one card for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub phase: CardPhase,
    /// Card center (viewport pixels, before clipping)
    pub center_y: f32,
    /// Card height
    pub height: f32,
    /// translateZ
    pub depth: f32,
    pub scale: f32,
    /// Stack tilt plus pointer tilt (degrees)
    pub rotate_x: f32,
    /// Pointer tilt (degrees)
    pub rotate_y: f32,
    pub opacity: f32,
    pub z_index: i32,
    /// Pixels trimmed off the card's top edge
    pub clip_inset: f32,
    /// Local pointer position for the hover glow, when hovering
    pub glow: Option<Vec2>,
}

impl CardTransform {
    /// Unclipped top edge
    #[inline]
    pub fn physical_top(&self) -> f32 {
        self.center_y - self.height / 2.0
    }

    /// Top edge after clipping
    #[inline]
    pub fn visual_top(&self) -> f32 {
        self.physical_top() + self.clip_inset
    }

    /// Stack-only component of the X rotation
    pub fn stack_tilt(&self, tilt_per_step: f32) -> f32 {
        match self.phase {
            CardPhase::Stacked { rel_index } if rel_index > 0.0 => rel_index * tilt_per_step,
            _ => 0.0,
        }
    }

    /// CSS `transform` for the card wrapper
    ///
    /// Wrappers are positioned at the top of the viewport and centered
    /// horizontally, so the Y translation is the physical top edge.
    pub fn css_transform(&self, perspective: f32) -> String {
        format!(
            "translate3d(-50%, {}px, {}px) perspective({}px) rotateX({}deg) rotateY({}deg) scale({})",
            self.physical_top(),
            self.depth,
            perspective,
            self.rotate_x,
            self.rotate_y,
            self.scale
        )
    }

    /// CSS `transform-origin`, pinned to the clip line so scale and rotation
    /// don't move the visible edge
    pub fn css_transform_origin(&self) -> String {
        format!("center {}px", self.clip_inset)
    }

    /// CSS `clip-path` for the inner card, or `None` when the inset is
    /// negligible
    pub fn css_clip_path(&self, epsilon: f32, corner_radius: f32) -> Option<String> {
        if self.clip_inset > epsilon {
            Some(format!(
                "inset({}px 0 0 0 round {}px)",
                self.clip_inset, corner_radius
            ))
        } else {
            None
        }
    }
}

/// All card transforms for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub scroll: ScrollFrame,
    pub cards: Vec<CardTransform>,
}

/// Opacity of a stacked card: opaque up to `visible_depth`, then fading to
/// zero over the next stack position
#[inline]
pub fn stacked_opacity(rel_index: f32, visible_depth: f32) -> f32 {
    if rel_index <= visible_depth {
        1.0
    } else {
        (1.0 - (rel_index - visible_depth)).max(0.0)
    }
}

/// Derive every card's transform for the given scroll frame
///
/// `interactions` may be shorter than the layout while a relayout is pending;
/// missing entries are treated as idle.
pub fn compute_frame(
    layout: &CardLayout,
    interactions: &[CardInteraction],
    scroll: ScrollFrame,
    viewport_height: f32,
    tuning: &FeedTuning,
) -> FrameOutput {
    let anchor = viewport_height / 2.0 + scroll.anchor_shift;
    let mut cards = Vec::with_capacity(layout.len());
    let mut prev_visual_top = f32::NEG_INFINITY;

    for i in 0..layout.len() {
        let interaction = interactions.get(i).copied().unwrap_or_default();
        let phase = CardPhase::resolve(layout, &scroll, i);

        let (center_y, depth, scale, opacity) = match phase {
            CardPhase::Stacked { rel_index } => (
                anchor + (layout.stack_offset(i) - scroll.camera_y),
                -rel_index * tuning.depth_step,
                1.0 - rel_index * tuning.scale_step,
                stacked_opacity(rel_index, tuning.visible_depth),
            ),
            CardPhase::Dealt { scroll_delta } => (anchor + scroll_delta, 0.0, 1.0, 1.0),
        };

        let mut card = CardTransform {
            phase,
            center_y,
            height: layout.height(i),
            depth,
            scale,
            rotate_x: interaction.tilt_x,
            rotate_y: interaction.tilt_y,
            opacity,
            z_index: BASE_Z_INDEX - i as i32,
            clip_inset: 0.0,
            glow: interaction
                .hovering
                .then(|| Vec2::new(interaction.mouse_x, interaction.mouse_y)),
        };

        card.rotate_x += card.stack_tilt(tuning.stack_tilt_deg);

        if i > 0 {
            let limit = prev_visual_top - tuning.peek;
            let excess = limit - card.physical_top();
            if excess > 0.0 {
                card.clip_inset = excess;
            }
        }
        prev_visual_top = card.visual_top();

        cards.push(card);
    }

    FrameOutput { scroll, cards }
}
