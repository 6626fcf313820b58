//! Data-driven visual constants
//!
//! Defaults come from [`crate::consts`]. A page may override any subset with an
//! inline `<script id="feed-tuning" type="application/json">` element.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a tuning document was rejected
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} = {value} is out of range ({expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

fn check(
    field: &'static str,
    value: f64,
    ok: bool,
    expected: &'static str,
) -> Result<(), TuningError> {
    if value.is_finite() && ok {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, value, expected })
    }
}

/// Card feed tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedTuning {
    // === Layout ===
    /// Gap between dealt cards
    pub card_margin: f32,
    /// Visible sliver of each stacked card
    pub peek: f32,

    // === Animation ===
    /// Anchor drift per card of progress
    pub expansion_rate: f32,
    pub depth_step: f32,
    pub scale_step: f32,
    /// Degrees of rotateX per stack position
    pub stack_tilt_deg: f32,
    /// Stack positions that stay fully opaque
    pub visible_depth: f32,
    pub perspective: f32,
    pub clip_epsilon: f32,
    pub corner_radius: f32,

    /// Ambient background
    pub background: BackgroundTuning,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            card_margin: CARD_MARGIN,
            peek: PEEK,

            expansion_rate: EXPANSION_RATE,
            depth_step: DEPTH_STEP,
            scale_step: SCALE_STEP,
            stack_tilt_deg: STACK_TILT_DEG,
            visible_depth: VISIBLE_DEPTH,
            perspective: PERSPECTIVE,
            clip_epsilon: CLIP_EPSILON,
            corner_radius: CARD_CORNER_RADIUS,

            background: BackgroundTuning::default(),
        }
    }
}

/// Blob simulation and noise tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundTuning {
    pub wall_overshoot: f32,
    pub overlap_allowance: f32,
    pub repel_strength: f32,
    pub max_speed: f32,
    pub initial_speed_spread: f32,
    pub gradient_core: f32,
    pub noise_tile_size: u32,
    pub noise_density: f64,
    pub noise_alpha: u8,
}

impl Default for BackgroundTuning {
    fn default() -> Self {
        Self {
            wall_overshoot: WALL_OVERSHOOT,
            overlap_allowance: OVERLAP_ALLOWANCE,
            repel_strength: REPEL_STRENGTH,
            max_speed: MAX_SPEED,
            initial_speed_spread: INITIAL_SPEED_SPREAD,
            gradient_core: GRADIENT_CORE,
            noise_tile_size: NOISE_TILE_SIZE,
            noise_density: NOISE_DENSITY,
            noise_alpha: NOISE_ALPHA,
        }
    }
}

impl BackgroundTuning {
    /// Reject values the blob step or the canvas painter can't work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let f = |v: f32| v as f64;
        check(
            "background.wall_overshoot",
            f(self.wall_overshoot),
            self.wall_overshoot >= 0.0,
            ">= 0",
        )?;
        check("background.overlap_allowance", f(self.overlap_allowance), true, "finite")?;
        check("background.repel_strength", f(self.repel_strength), true, "finite")?;
        check("background.max_speed", f(self.max_speed), self.max_speed > 0.0, "> 0")?;
        check(
            "background.initial_speed_spread",
            f(self.initial_speed_spread),
            self.initial_speed_spread >= 0.0,
            ">= 0",
        )?;
        check(
            "background.gradient_core",
            f(self.gradient_core),
            (0.0..=1.0).contains(&self.gradient_core),
            "0..=1",
        )?;
        check(
            "background.noise_tile_size",
            self.noise_tile_size as f64,
            self.noise_tile_size >= 1,
            ">= 1",
        )?;
        check(
            "background.noise_density",
            self.noise_density,
            (0.0..=1.0).contains(&self.noise_density),
            "0..=1",
        )
    }
}

impl FeedTuning {
    /// Id of the inline JSON element read by [`FeedTuning::load`]
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "feed-tuning";

    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break layout or the frame math
    pub fn validate(&self) -> Result<(), TuningError> {
        let f = |v: f32| v as f64;
        check("card_margin", f(self.card_margin), self.card_margin >= 0.0, ">= 0")?;
        check("peek", f(self.peek), self.peek >= 0.0, ">= 0")?;
        check("expansion_rate", f(self.expansion_rate), true, "finite")?;
        check("depth_step", f(self.depth_step), true, "finite")?;
        check("scale_step", f(self.scale_step), true, "finite")?;
        check("stack_tilt_deg", f(self.stack_tilt_deg), true, "finite")?;
        check("visible_depth", f(self.visible_depth), self.visible_depth >= 0.0, ">= 0")?;
        check("perspective", f(self.perspective), self.perspective > 0.0, "> 0")?;
        check("clip_epsilon", f(self.clip_epsilon), self.clip_epsilon >= 0.0, ">= 0")?;
        check("corner_radius", f(self.corner_radius), self.corner_radius >= 0.0, ">= 0")?;
        self.background.validate()
    }

    /// Load tuning from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = json else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from #{}", Self::ELEMENT_ID);
                tuning
            }
            Err(e) => {
                log::warn!("Rejected tuning from #{} ({}), using defaults", Self::ELEMENT_ID, e);
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = FeedTuning::from_json(r#"{ "peek": 32, "background": { "max_speed": 3.5 } }"#)
            .unwrap();
        assert_eq!(tuning.peek, 32.0);
        assert_eq!(tuning.card_margin, CARD_MARGIN);
        assert_eq!(tuning.background.max_speed, 3.5);
        assert_eq!(tuning.background.repel_strength, REPEL_STRENGTH);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(FeedTuning::from_json("{}").unwrap(), FeedTuning::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(FeedTuning::from_json("{ peek: }"), Err(TuningError::Json(_))));
        assert!(matches!(
            FeedTuning::from_json(r#"{ "peek": "wide" }"#),
            Err(TuningError::Json(_))
        ));
    }

    fn rejected_field(json: &str) -> &'static str {
        match FeedTuning::from_json(json) {
            Err(TuningError::OutOfRange { field, .. }) => field,
            other => panic!("expected out-of-range error for {json}, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let cases = [
            (r#"{ "card_margin": -1 }"#, "card_margin"),
            (r#"{ "peek": -40 }"#, "peek"),
            (r#"{ "perspective": 0 }"#, "perspective"),
            (r#"{ "background": { "max_speed": -1.0 } }"#, "background.max_speed"),
            (r#"{ "background": { "max_speed": 0 } }"#, "background.max_speed"),
            (r#"{ "background": { "wall_overshoot": -5 } }"#, "background.wall_overshoot"),
            (r#"{ "background": { "gradient_core": 1.5 } }"#, "background.gradient_core"),
            (r#"{ "background": { "gradient_core": -0.1 } }"#, "background.gradient_core"),
            (
                r#"{ "background": { "noise_tile_size": 0 } }"#,
                "background.noise_tile_size",
            ),
            (r#"{ "background": { "noise_density": 2 } }"#, "background.noise_density"),
        ];
        for (json, field) in cases {
            assert_eq!(rejected_field(json), field, "{json}");
        }
    }

    #[test]
    fn test_overflowing_float_rejected() {
        // Too large for f32: either the parse or the finiteness check refuses it
        assert!(FeedTuning::from_json(r#"{ "depth_step": 1e39 }"#).is_err());
    }

    #[test]
    fn test_boundary_values_accepted() {
        let tuning = FeedTuning::from_json(
            r#"{ "peek": 0, "card_margin": 0,
                 "background": { "gradient_core": 1, "noise_tile_size": 1, "wall_overshoot": 0 } }"#,
        )
        .unwrap();
        assert_eq!(tuning.background.noise_tile_size, 1);
    }

    #[test]
    fn test_defaults_are_valid() {
        FeedTuning::default().validate().unwrap();
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut tuning = FeedTuning::default();
        tuning.expansion_rate = 12.5;
        let json = serde_json::to_string(&tuning).unwrap();
        assert_eq!(FeedTuning::from_json(&json).unwrap(), tuning);
    }
}
