//! Layout engine: breakpoints and stack offsets from measured card heights
//!
//! A card's breakpoint is the scroll distance at which it sits centered on the
//! anchor. Its stack offset is where its center rests while it waits in the
//! deck, relative to card 0.

/// Cumulative scroll distance at which each card becomes active
///
/// `b[0] = 0`, `b[i] = b[i-1] + (h[i-1] + h[i]) / 2 + margin`, which leaves
/// exactly `margin` between the bottom of card i-1 and the top of card i once
/// both are dealt.
pub fn compute_breakpoints(heights: &[f32], margin: f32) -> Vec<f32> {
    let mut breakpoints = Vec::with_capacity(heights.len());
    let mut current = 0.0;
    for (i, &h) in heights.iter().enumerate() {
        if i > 0 {
            current += (heights[i - 1] + h) / 2.0 + margin;
        }
        breakpoints.push(current);
    }
    breakpoints
}

/// Center offset of each card while stacked, relative to card 0
///
/// `s[0] = 0`, `s[i] = s[i-1] + h[i-1]/2 - h[i]/2 + peek`, so card i's bottom
/// edge sits `peek` below card i-1's bottom edge.
pub fn compute_stack_offsets(heights: &[f32], peek: f32) -> Vec<f32> {
    let mut offsets = Vec::with_capacity(heights.len());
    let mut current = 0.0;
    for (i, &h) in heights.iter().enumerate() {
        if i > 0 {
            current += heights[i - 1] / 2.0 - h / 2.0 + peek;
        }
        offsets.push(current);
    }
    offsets
}

/// Per-card geometry, immutable between resizes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardLayout {
    heights: Vec<f32>,
    breakpoints: Vec<f32>,
    stack_offsets: Vec<f32>,
}

impl CardLayout {
    /// Compute layout for the given measured heights
    pub fn compute(heights: &[f32], card_margin: f32, peek: f32) -> Self {
        // Negative or NaN measurements are treated as collapsed cards
        let heights: Vec<f32> = heights
            .iter()
            .map(|&h| if h > 0.0 { h } else { 0.0 })
            .collect();
        Self {
            breakpoints: compute_breakpoints(&heights, card_margin),
            stack_offsets: compute_stack_offsets(&heights, peek),
            heights,
        }
    }

    /// Number of cards
    #[inline]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn breakpoints(&self) -> &[f32] {
        &self.breakpoints
    }

    pub fn stack_offsets(&self) -> &[f32] {
        &self.stack_offsets
    }

    /// Height of card `i`, or 0 if out of range
    #[inline]
    pub fn height(&self, i: usize) -> f32 {
        self.heights.get(i).copied().unwrap_or(0.0)
    }

    /// Breakpoint of card `i`, clamped to the last card
    #[inline]
    pub fn breakpoint(&self, i: usize) -> f32 {
        clamped_get(&self.breakpoints, i)
    }

    /// Stack offset of card `i`, clamped to the last card
    #[inline]
    pub fn stack_offset(&self, i: usize) -> f32 {
        clamped_get(&self.stack_offsets, i)
    }

    /// Largest scroll offset the animation responds to (the last breakpoint)
    pub fn max_scroll(&self) -> f32 {
        self.breakpoints.last().copied().unwrap_or(0.0)
    }

    /// Clamp a live scroll offset into `[0, max_scroll]`
    pub fn clamp_scroll(&self, scroll_y: f32) -> f32 {
        if scroll_y.is_nan() {
            return 0.0;
        }
        scroll_y.clamp(0.0, self.max_scroll())
    }

    /// Total height of the scroll spacer so the scrollable distance equals
    /// `max_scroll`
    pub fn spacer_height(&self, viewport_height: f32) -> f32 {
        self.max_scroll() + viewport_height.max(0.0)
    }
}

/// Index into `values`, clamping to the last element (0 when empty)
#[inline]
fn clamped_get(values: &[f32], i: usize) -> f32 {
    match values.len() {
        0 => 0.0,
        n => values[i.min(n - 1)],
    }
}
