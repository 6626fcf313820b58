//! Blob particles and their per-frame physics step
//!
//! Velocities are in pixels per frame; the step is not scaled by elapsed time.

use glam::Vec2;
use rand::Rng;

use crate::tuning::BackgroundTuning;

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl BlobColor {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Olive drab
    pub const OLIVE: Self = Self::new(85, 107, 47, 0.65);
    /// Yellow green, slightly more transparent to balance its brightness
    pub const YELLOW_GREEN: Self = Self::new(154, 205, 50, 0.55);

    /// CSS `rgba()` string
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A blob particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: BlobColor,
}

impl Blob {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: BlobColor) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
        }
    }

    /// Flip velocity components that carry the blob further past a wall
    ///
    /// Walls sit `overshoot` pixels outside the `bounds` rectangle.
    pub fn bounce(&mut self, bounds: Vec2, overshoot: f32) {
        if self.pos.x < -overshoot && self.vel.x < 0.0 {
            self.vel.x = -self.vel.x;
        }
        if self.pos.x > bounds.x + overshoot && self.vel.x > 0.0 {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < -overshoot && self.vel.y < 0.0 {
            self.vel.y = -self.vel.y;
        }
        if self.pos.y > bounds.y + overshoot && self.vel.y > 0.0 {
            self.vel.y = -self.vel.y;
        }
    }

    /// Rescale velocity down to `max_speed` if it is faster
    pub fn cap_speed(&mut self, max_speed: f32) {
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel = self.vel / speed * max_speed;
        }
    }
}

/// Velocity impulse pushing `blob` away from `other`
///
/// Engages once the centers are closer than `r1 + r2 - overlap_allowance`,
/// scaled by the fractional penetration. `tie_break` is the direction used
/// when the centers coincide.
pub fn repulsion(
    blob: &Blob,
    other: &Blob,
    overlap_allowance: f32,
    strength: f32,
    tie_break: Vec2,
) -> Vec2 {
    let min_dist = blob.radius + other.radius - overlap_allowance;
    if min_dist <= 0.0 {
        return Vec2::ZERO;
    }

    let delta = blob.pos - other.pos;
    let dist = delta.length();
    if dist >= min_dist {
        return Vec2::ZERO;
    }

    let force = (min_dist - dist) / min_dist;
    let dir = if dist > f32::EPSILON {
        delta / dist
    } else {
        tie_break
    };
    dir * force * strength
}

/// The full set of blobs and the area they roam
#[derive(Debug, Clone)]
pub struct BlobField {
    pub blobs: Vec<Blob>,
    bounds: Vec2,
    tuning: BackgroundTuning,
}

impl BlobField {
    pub fn new(blobs: Vec<Blob>, bounds: Vec2, tuning: BackgroundTuning) -> Self {
        Self {
            blobs,
            bounds,
            tuning,
        }
    }

    /// The default pair: an olive blob at 30% and a yellow-green one at 70% of
    /// the viewport, each with a random initial velocity
    pub fn with_default_blobs(bounds: Vec2, tuning: BackgroundTuning, rng: &mut impl Rng) -> Self {
        let spread = tuning.initial_speed_spread;
        let mut random_vel = || {
            Vec2::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            )
        };
        let blobs = vec![
            Blob::new(bounds * 0.3, random_vel(), 120.0, BlobColor::OLIVE),
            Blob::new(bounds * 0.7, random_vel(), 90.0, BlobColor::YELLOW_GREEN),
        ];
        Self::new(blobs, bounds, tuning)
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Viewport changed; positions and velocities are kept
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// Advance one frame
    ///
    /// Blobs are updated in order; later blobs see earlier blobs' new
    /// positions.
    pub fn step(&mut self) {
        let BackgroundTuning {
            wall_overshoot,
            overlap_allowance,
            repel_strength,
            max_speed,
            ..
        } = self.tuning;

        for i in 0..self.blobs.len() {
            {
                let blob = &mut self.blobs[i];
                blob.pos += blob.vel;
                blob.bounce(self.bounds, wall_overshoot);
            }

            let blob = self.blobs[i];
            let impulse: Vec2 = self
                .blobs
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(j, other)| {
                    let tie_break = if i < j { Vec2::NEG_X } else { Vec2::X };
                    repulsion(&blob, other, overlap_allowance, repel_strength, tie_break)
                })
                .sum();

            let blob = &mut self.blobs[i];
            blob.vel += impulse;
            blob.cap_speed(max_speed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Vec2 = Vec2::new(1600.0, 1000.0);

    fn still(pos: Vec2, radius: f32) -> Blob {
        Blob::new(pos, Vec2::ZERO, radius, BlobColor::OLIVE)
    }

    fn field(blobs: Vec<Blob>) -> BlobField {
        BlobField::new(blobs, BOUNDS, BackgroundTuning::default())
    }

    #[test]
    fn test_default_blobs() {
        let mut rng = Pcg32::seed_from_u64(7);
        let field = BlobField::with_default_blobs(BOUNDS, BackgroundTuning::default(), &mut rng);
        assert_eq!(field.blobs.len(), 2);
        assert!(field.blobs[0].pos.abs_diff_eq(Vec2::new(480.0, 300.0), 1e-3));
        assert!(field.blobs[1].pos.abs_diff_eq(Vec2::new(1120.0, 700.0), 1e-3));
        for blob in &field.blobs {
            assert!(blob.vel.x.abs() <= 0.75 && blob.vel.y.abs() <= 0.75);
        }
    }

    #[test]
    fn test_seeded_start_is_reproducible() {
        let a = BlobField::with_default_blobs(
            BOUNDS,
            BackgroundTuning::default(),
            &mut Pcg32::seed_from_u64(42),
        );
        let b = BlobField::with_default_blobs(
            BOUNDS,
            BackgroundTuning::default(),
            &mut Pcg32::seed_from_u64(42),
        );
        assert_eq!(a.blobs, b.blobs);
    }

    #[test]
    fn test_overlapping_blobs_repel() {
        // min distance is 120 + 90 - 100 = 110
        let mut field = field(vec![
            still(Vec2::new(800.0, 500.0), 120.0),
            Blob::new(Vec2::new(840.0, 530.0), Vec2::ZERO, 90.0, BlobColor::YELLOW_GREEN),
        ]);
        let away_0 = field.blobs[0].pos - field.blobs[1].pos;
        let away_1 = -away_0;
        field.step();
        assert!(field.blobs[0].vel.dot(away_0) > 0.0);
        assert!(field.blobs[1].vel.dot(away_1) > 0.0);
    }

    #[test]
    fn test_distant_blobs_ignore_each_other() {
        let mut field = field(vec![
            still(Vec2::new(200.0, 500.0), 120.0),
            still(Vec2::new(900.0, 500.0), 90.0),
        ]);
        field.step();
        assert_eq!(field.blobs[0].vel, Vec2::ZERO);
        assert_eq!(field.blobs[1].vel, Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_magnitude() {
        let a = still(Vec2::new(0.0, 0.0), 120.0);
        let b = still(Vec2::new(55.0, 0.0), 90.0);
        // Half-way into the 110px threshold
        let impulse = repulsion(&a, &b, 100.0, 0.05, Vec2::X);
        assert!((impulse.x + 0.025).abs() < 1e-6);
        assert_eq!(impulse.y, 0.0);
    }

    #[test]
    fn test_coincident_blobs_separate() {
        let mut field = field(vec![
            still(Vec2::new(800.0, 500.0), 120.0),
            still(Vec2::new(800.0, 500.0), 90.0),
        ]);
        field.step();
        let (a, b) = (field.blobs[0], field.blobs[1]);
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!(a.vel.x < 0.0);
        assert!(b.vel.x > 0.0);
    }

    #[test]
    fn test_wall_bounce_past_overshoot() {
        let mut field = field(vec![Blob::new(
            Vec2::new(-99.5, 500.0),
            Vec2::new(-1.0, 0.5),
            120.0,
            BlobColor::OLIVE,
        )]);
        field.step();
        assert_eq!(field.blobs[0].pos.x, -100.5);
        assert_eq!(field.blobs[0].vel, Vec2::new(1.0, 0.5));
    }

    #[test]
    fn test_no_bounce_inside_overshoot() {
        // Partly off-screen but not past the extended wall
        let mut blob = Blob::new(Vec2::new(-50.0, 1050.0), Vec2::new(-1.0, 1.0), 90.0, BlobColor::OLIVE);
        blob.bounce(BOUNDS, 100.0);
        assert_eq!(blob.vel, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_no_bounce_when_moving_inward() {
        let mut blob = Blob::new(Vec2::new(1750.0, 500.0), Vec2::new(-1.0, 0.0), 90.0, BlobColor::OLIVE);
        blob.bounce(BOUNDS, 100.0);
        assert_eq!(blob.vel, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_resize_keeps_motion() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = BlobField::with_default_blobs(BOUNDS, BackgroundTuning::default(), &mut rng);
        let before = field.blobs.clone();
        field.resize(Vec2::new(800.0, 600.0));
        assert_eq!(field.bounds(), Vec2::new(800.0, 600.0));
        assert_eq!(field.blobs, before);
    }

    #[test]
    fn test_cap_speed() {
        let mut blob = Blob::new(Vec2::ZERO, Vec2::new(3.0, 4.0), 90.0, BlobColor::OLIVE);
        blob.cap_speed(2.0);
        assert!((blob.vel.length() - 2.0).abs() < 1e-5);
        assert!((blob.vel.x - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(BlobColor::OLIVE.css(), "rgba(85, 107, 47, 0.65)");
    }

    proptest! {
        #[test]
        fn prop_speed_never_exceeds_cap(
            x0 in -100.0f32..1700.0, y0 in -100.0f32..1100.0,
            x1 in -100.0f32..1700.0, y1 in -100.0f32..1100.0,
            vx0 in -5.0f32..5.0, vy0 in -5.0f32..5.0,
            steps in 1usize..600,
        ) {
            let mut field = field(vec![
                Blob::new(Vec2::new(x0, y0), Vec2::new(vx0, vy0), 120.0, BlobColor::OLIVE),
                Blob::new(Vec2::new(x1, y1), Vec2::ZERO, 90.0, BlobColor::YELLOW_GREEN),
            ]);
            for _ in 0..steps {
                field.step();
                for blob in &field.blobs {
                    prop_assert!(blob.vel.length() <= 2.0 + 1e-4);
                    prop_assert!(blob.pos.is_finite());
                }
            }
        }
    }
}
