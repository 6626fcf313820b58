//! Static dithering noise
//!
//! Generated once and tiled over the whole background. Regenerating it per
//! frame would flicker like TV static.

use rand::Rng;

/// A square RGBA8 tile of sparse, nearly transparent white speckles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseTile {
    size: u32,
    pixels: Vec<u8>,
}

impl NoiseTile {
    /// Generate a `size` x `size` tile where each pixel is lit with
    /// probability `density`
    pub fn generate(size: u32, density: f64, alpha: u8, rng: &mut impl Rng) -> Self {
        let density = density.clamp(0.0, 1.0);
        let count = (size as usize) * (size as usize);
        let mut pixels = vec![0u8; count * 4];
        for px in pixels.chunks_exact_mut(4) {
            if rng.random_bool(density) {
                px.copy_from_slice(&[0xFF, 0xFF, 0xFF, alpha]);
            }
        }
        Self { size, pixels }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Row-major RGBA bytes, ready for `ImageData`
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of lit pixels
    pub fn lit_count(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{NOISE_ALPHA, NOISE_DENSITY, NOISE_TILE_SIZE};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn tile(seed: u64) -> NoiseTile {
        let mut rng = Pcg32::seed_from_u64(seed);
        NoiseTile::generate(NOISE_TILE_SIZE, NOISE_DENSITY, NOISE_ALPHA, &mut rng)
    }

    #[test]
    fn test_tile_dimensions() {
        let tile = tile(1);
        assert_eq!(tile.size(), 200);
        assert_eq!(tile.pixels().len(), 200 * 200 * 4);
    }

    #[test]
    fn test_lit_pixels_are_faint_white() {
        let tile = tile(2);
        for px in tile.pixels().chunks_exact(4) {
            assert!(px == [0, 0, 0, 0] || px == [0xFF, 0xFF, 0xFF, 0x02]);
        }
    }

    #[test]
    fn test_density_is_roughly_respected() {
        let lit = tile(3).lit_count() as f64 / (200.0 * 200.0);
        assert!((lit - 0.20).abs() < 0.02, "lit fraction {lit}");
    }

    #[test]
    fn test_same_seed_same_tile() {
        assert_eq!(tile(9), tile(9));
        assert_ne!(tile(9), tile(10));
    }

    #[test]
    fn test_density_extremes() {
        let mut rng = Pcg32::seed_from_u64(4);
        assert_eq!(NoiseTile::generate(16, 0.0, 2, &mut rng).lit_count(), 0);
        assert_eq!(NoiseTile::generate(16, 1.0, 2, &mut rng).lit_count(), 256);
        assert_eq!(NoiseTile::generate(16, 7.0, 2, &mut rng).lit_count(), 256);
    }
}
