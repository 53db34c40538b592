//! Deterministic noise helpers for synthetic scenes.
//!
//! The functions here avoid `thread_rng` and any dependency on the internal
//! algorithm of `rand` RNGs, keeping synthetic scenes stable across
//! versions and platforms.

use crate::{Real, Vec2, Vec3};

/// Deterministic uniform pixel noise in `[-max_abs_px, +max_abs_px]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UniformPixelNoise {
    /// Base seed controlling the pseudo-random sequence.
    pub seed: u64,
    /// Maximum absolute per-axis noise (pixels).
    pub max_abs_px: Real,
}

impl UniformPixelNoise {
    /// Sample a 2D noise vector (pixels) for a `(frame, track)` key.
    #[inline]
    pub fn sample(&self, frame: u64, track: u64) -> Vec2 {
        let max_abs = self.max_abs_px.abs();
        if max_abs == 0.0 {
            return Vec2::zeros();
        }
        Vec2::new(
            symmetric_unit(self.seed, frame, track, 0) * max_abs,
            symmetric_unit(self.seed, frame, track, 1) * max_abs,
        )
    }
}

/// Deterministic 3D offset in `[-max_abs, +max_abs]` per axis.
pub fn offset3(seed: u64, key: u64, max_abs: Real) -> Vec3 {
    Vec3::new(
        symmetric_unit(seed, key, 0, 2),
        symmetric_unit(seed, key, 0, 3),
        symmetric_unit(seed, key, 0, 4),
    ) * max_abs
}

/// Deterministic value in `[-1, 1)` for a keyed stream.
pub fn symmetric_unit(seed: u64, a: u64, b: u64, lane: u64) -> Real {
    let key = mix_key(seed, a, b) ^ lane.wrapping_mul(0x94D0_49BB_1331_11EB);
    (u64_to_unit_f64(splitmix64(key)) - 0.5) * 2.0
}

#[inline]
fn mix_key(seed: u64, a: u64, b: u64) -> u64 {
    seed ^ a.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ b.wrapping_mul(0xBF58_476D_1CE4_E5B9)
}

#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn u64_to_unit_f64(x: u64) -> Real {
    // top 53 bits -> [0, 1)
    let mantissa = x >> 11;
    (mantissa as Real) * (1.0 / ((1u64 << 53) as Real))
}
