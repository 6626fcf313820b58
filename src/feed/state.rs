//! Owned animation state
//!
//! Written by scroll/pointer/resize handlers, read once per frame. Everything
//! runs on the browser's main thread, so the handlers and the frame callback
//! share it through `Rc<RefCell<_>>` with no further synchronization.

use super::frame::{FrameOutput, compute_frame};
use super::layout::CardLayout;
use super::progress::ScrollFrame;
use crate::tuning::FeedTuning;

/// Pointer-driven hover state of one card
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CardInteraction {
    /// Extra rotateX (degrees)
    pub tilt_x: f32,
    /// rotateY (degrees)
    pub tilt_y: f32,
    /// Pointer position local to the card, for the hover glow
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub hovering: bool,
}

impl CardInteraction {
    /// Update from a pointer at `(x, y)` inside a `width` x `height` card
    pub fn pointer_move(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.hovering = true;
        self.mouse_x = x;
        self.mouse_y = y;

        if width <= 0.0 || height <= 0.0 {
            self.tilt_x = 0.0;
            self.tilt_y = 0.0;
            return;
        }

        let center_x = width / 2.0;
        let ratio_y = (y / height).clamp(0.0, 1.0);
        self.tilt_x = ratio_y.sqrt() * 0.5;
        self.tilt_y = -(x - center_x) / center_x;
    }

    /// Pointer left the card
    pub fn pointer_leave(&mut self) {
        self.hovering = false;
        self.tilt_x = 0.0;
        self.tilt_y = 0.0;
    }
}

/// Everything the card frame loop needs, owned in one place
#[derive(Debug, Clone)]
pub struct AnimationState {
    tuning: FeedTuning,
    layout: CardLayout,
    interactions: Vec<CardInteraction>,
    viewport_width: f32,
    viewport_height: f32,
    /// Live scroll offset, unclamped
    scroll_y: f32,
}

impl AnimationState {
    /// Empty state; nothing is drawn until [`AnimationState::relayout`]
    pub fn new(tuning: FeedTuning, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            tuning,
            layout: CardLayout::default(),
            interactions: Vec::new(),
            viewport_width,
            viewport_height,
            scroll_y: 0.0,
        }
    }

    /// Recompute layout from freshly measured heights
    ///
    /// Interaction state survives for cards that still exist.
    pub fn relayout(&mut self, heights: &[f32]) {
        self.layout = CardLayout::compute(heights, self.tuning.card_margin, self.tuning.peek);
        self.interactions
            .resize(self.layout.len(), CardInteraction::default());
        log::info!(
            "Layout: {} cards, max scroll {:.1}px",
            self.layout.len(),
            self.layout.max_scroll()
        );
    }

    /// Viewport changed; the caller re-measures and calls `relayout` before
    /// the next frame
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y;
    }

    pub fn pointer_move(&mut self, index: usize, x: f32, y: f32, width: f32, height: f32) {
        if let Some(interaction) = self.interactions.get_mut(index) {
            interaction.pointer_move(x, y, width, height);
        }
    }

    pub fn pointer_leave(&mut self, index: usize) {
        if let Some(interaction) = self.interactions.get_mut(index) {
            interaction.pointer_leave();
        }
    }

    pub fn tuning(&self) -> &FeedTuning {
        &self.tuning
    }

    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    pub fn interactions(&self) -> &[CardInteraction] {
        &self.interactions
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Largest scroll offset the animation responds to
    pub fn max_scroll(&self) -> f32 {
        self.layout.max_scroll()
    }

    /// Height the scroll spacer must have for the current layout and viewport
    pub fn spacer_height(&self) -> f32 {
        self.layout.spacer_height(self.viewport_height)
    }

    /// Compute this frame's card transforms
    pub fn frame(&self) -> FrameOutput {
        let scroll = ScrollFrame::resolve(&self.layout, self.scroll_y, self.tuning.expansion_rate);
        compute_frame(
            &self.layout,
            &self.interactions,
            scroll,
            self.viewport_height,
            &self.tuning,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(heights: &[f32]) -> AnimationState {
        let mut state = AnimationState::new(FeedTuning::default(), 1280.0, 800.0);
        state.relayout(heights);
        state
    }

    #[test]
    fn test_pointer_tilt() {
        let mut interaction = CardInteraction::default();
        interaction.pointer_move(0.0, 400.0, 300.0, 400.0);
        assert!(interaction.hovering);
        assert!((interaction.tilt_x - 0.5).abs() < 1e-6);
        assert!((interaction.tilt_y - 1.0).abs() < 1e-6);

        interaction.pointer_move(300.0, 0.0, 300.0, 400.0);
        assert_eq!(interaction.tilt_x, 0.0);
        assert!((interaction.tilt_y + 1.0).abs() < 1e-6);
        assert_eq!((interaction.mouse_x, interaction.mouse_y), (300.0, 0.0));
    }

    #[test]
    fn test_pointer_leave_resets_tilt() {
        let mut interaction = CardInteraction::default();
        interaction.pointer_move(10.0, 20.0, 300.0, 400.0);
        interaction.pointer_leave();
        assert!(!interaction.hovering);
        assert_eq!(interaction.tilt_x, 0.0);
        assert_eq!(interaction.tilt_y, 0.0);
    }

    #[test]
    fn test_zero_sized_card_has_no_tilt() {
        let mut interaction = CardInteraction::default();
        interaction.pointer_move(5.0, 5.0, 0.0, 0.0);
        assert!(interaction.hovering);
        assert_eq!(interaction.tilt_x, 0.0);
        assert_eq!(interaction.tilt_y, 0.0);
    }

    #[test]
    fn test_empty_state_frame_is_noop() {
        let mut state = AnimationState::new(FeedTuning::default(), 1280.0, 800.0);
        state.set_scroll(300.0);
        assert!(state.frame().cards.is_empty());
        assert_eq!(state.max_scroll(), 0.0);
        assert_eq!(state.spacer_height(), 800.0);
        // Pointer events on missing cards are ignored
        state.pointer_move(3, 1.0, 1.0, 10.0, 10.0);
        state.pointer_leave(3);
    }

    #[test]
    fn test_resize_mid_scroll() {
        let mut state = state_with(&[300.0, 400.0, 350.0]);
        state.set_scroll(600.0);
        assert_eq!(state.max_scroll(), 765.0);
        assert_eq!(state.spacer_height(), 765.0 + 800.0);

        // Narrower viewport: text reflows and cards grow taller
        state.set_viewport(600.0, 700.0);
        state.relayout(&[420.0, 560.0, 500.0]);
        assert_eq!(state.max_scroll(), 490.0 + 20.0 + 530.0 + 20.0);
        assert_eq!(state.spacer_height(), state.max_scroll() + 700.0);

        let out = state.frame();
        assert_eq!(out.cards.len(), 3);
        assert_eq!(out.scroll.effective_scroll, 600.0);
    }

    #[test]
    fn test_shrinking_layout_clamps_scroll() {
        let mut state = state_with(&[300.0, 400.0, 350.0]);
        state.set_scroll(700.0);
        state.relayout(&[100.0, 100.0]);
        let out = state.frame();
        assert_eq!(out.scroll.effective_scroll, state.max_scroll());
        assert_eq!(out.scroll.progress, 1.0);
    }

    #[test]
    fn test_relayout_keeps_interactions() {
        let mut state = state_with(&[300.0, 400.0]);
        state.pointer_move(1, 150.0, 100.0, 300.0, 400.0);
        state.relayout(&[320.0, 380.0, 200.0]);
        assert!(state.interactions()[1].hovering);
        assert!(!state.interactions()[2].hovering);
        assert_eq!(state.interactions().len(), 3);
    }

    #[test]
    fn test_hover_reaches_frame() {
        let mut state = state_with(&[300.0, 400.0]);
        state.pointer_move(0, 75.0, 300.0, 300.0, 300.0);
        let out = state.frame();
        let card = &out.cards[0];
        assert!(card.glow.is_some());
        assert!((card.rotate_y - 0.5).abs() < 1e-6);

        state.pointer_leave(0);
        let out = state.frame();
        assert_eq!(out.cards[0].glow, None);
        assert_eq!(out.cards[0].rotate_x, 0.0);
    }
}
