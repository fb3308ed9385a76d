//! Seeded value noise
//!
//! Lattice corner values come from a pure integer hash, so the same
//! `(seed, x, y)` yields the same bits on every platform and in every call
//! order. Nothing here holds mutable state; every function takes the seed
//! explicitly.

use serde::{Deserialize, Serialize};

/// Scale from a 24-bit hash to [0, 2)
const HASH_TO_UNIT: f32 = 2.0 / (1u32 << 24) as f32;

/// One frequency/amplitude layer of fractal noise
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Octave {
    /// Cycles per world unit
    pub frequency: f32,
    /// Output multiplier in world units
    pub amplitude: f32,
}

impl Octave {
    pub const fn new(frequency: f32, amplitude: f32) -> Self {
        Self { frequency, amplitude }
    }
}

/// Reference height ladder: continents, hills, bumps, grit.
pub const REFERENCE_OCTAVES: [Octave; 4] = [
    Octave::new(0.001, 25.0),
    Octave::new(0.004, 10.0),
    Octave::new(0.015, 3.0),
    Octave::new(0.05, 1.0),
];

/// Hash an integer lattice point to a value in [-1, 1)
#[inline]
pub fn lattice_hash(ix: i32, iy: i32, seed: u32) -> f32 {
    let mut h = seed.wrapping_mul(0x9e37_79b9)
        ^ (ix as u32).wrapping_mul(0x85eb_ca6b)
        ^ (iy as u32).wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    (h >> 8) as f32 * HASH_TO_UNIT - 1.0
}

/// Hermite smoothstep `3t² - 2t³`
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Bilinear value noise at `(x, y)`, in [-1, 1]
pub fn sample(seed: u32, x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let ix = x0 as i32;
    let iy = y0 as i32;

    let sx = smoothstep(x - x0);
    let sy = smoothstep(y - y0);

    let v00 = lattice_hash(ix, iy, seed);
    let v10 = lattice_hash(ix.wrapping_add(1), iy, seed);
    let v01 = lattice_hash(ix, iy.wrapping_add(1), seed);
    let v11 = lattice_hash(ix.wrapping_add(1), iy.wrapping_add(1), seed);

    let near = lerp(v00, v10, sx);
    let far = lerp(v01, v11, sx);
    lerp(near, far, sy).clamp(-1.0, 1.0)
}

/// Sum of `amplitude * sample(seed + i, x * frequency, y * frequency)`
pub fn octave_sample(seed: u32, x: f32, y: f32, octaves: &[Octave]) -> f32 {
    octaves
        .iter()
        .enumerate()
        .map(|(i, octave)| {
            let octave_seed = seed.wrapping_add(i as u32);
            octave.amplitude * sample(octave_seed, x * octave.frequency, y * octave.frequency)
        })
        .sum()
}

/// Upper bound on `|octave_sample(..)|`
pub fn octave_amplitude_sum(octaves: &[Octave]) -> f32 {
    octaves.iter().map(|o| o.amplitude.abs()).sum()
}

/// A seeded octave stack
///
/// Thin handle pairing a seed with a ladder so callers do not have to
/// thread both through every call.
#[derive(Clone, Debug)]
pub struct NoiseField {
    seed: u32,
    octaves: Vec<Octave>,
}

impl NoiseField {
    pub fn new(seed: u32, octaves: Vec<Octave>) -> Self {
        Self { seed, octaves }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn octaves(&self) -> &[Octave] {
        &self.octaves
    }

    /// Evaluate the full octave stack at a world point
    #[inline]
    pub fn get(&self, x: f32, y: f32) -> f32 {
        octave_sample(self.seed, x, y, &self.octaves)
    }

    /// Largest magnitude [`NoiseField::get`] can return
    pub fn amplitude(&self) -> f32 {
        octave_amplitude_sum(&self.octaves)
    }
}
