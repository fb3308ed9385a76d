//! Heightmap generation for terrain chunks

use std::sync::Arc;

use glam::Vec3;
use rayon::prelude::*;

use super::biome::{BiomeDescriptor, BiomeSelector};
use super::config::TerrainConfig;
use super::coords::{ChunkCoord, CoordinateMapper};
use super::noise::NoiseField;

/// Square grid of height samples in world units, row-major (row = z, column = x)
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    side: u32,
    samples: Vec<f32>,
}

impl HeightGrid {
    /// Wrap raw samples; returns `None` unless `samples.len() == side * side`
    pub fn from_samples(side: u32, samples: Vec<f32>) -> Option<Self> {
        if samples.len() == side as usize * side as usize {
            Some(Self { side, samples })
        } else {
            None
        }
    }

    /// Flat grid of the given side length
    pub fn flat(side: u32, height: f32) -> Self {
        Self {
            side,
            samples: vec![height; side as usize * side as usize],
        }
    }

    /// Samples per side
    pub fn side(&self) -> u32 {
        self.side
    }

    /// Total number of samples (`side²`)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at column `col` (x) and row `row` (z)
    ///
    /// # Panics
    /// If either index is outside the grid.
    #[inline]
    pub fn get(&self, col: u32, row: u32) -> f32 {
        assert!(col < self.side && row < self.side, "sample ({}, {}) outside {}² grid", col, row, self.side);
        self.samples[row as usize * self.side as usize + col as usize]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Lowest and highest sample
    pub fn min_max(&self) -> (f32, f32) {
        self.samples.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        })
    }
}

/// Deterministic heightmap generator
///
/// Height at a world point is the octave stack scaled by the biome at that
/// point. The same formula backs both [`HeightmapGenerator::generate`] and
/// [`HeightmapGenerator::height_at_world`], so a point evaluated on the fly
/// matches the sample a chunk later stores for it.
#[derive(Clone, Debug)]
pub struct HeightmapGenerator {
    mapper: CoordinateMapper,
    noise: NoiseField,
    biomes: BiomeSelector,
}

impl HeightmapGenerator {
    /// Create a generator for a world seed
    ///
    /// `config` is expected to have passed [`TerrainConfig::validate`].
    pub fn new(seed: u32, config: &TerrainConfig) -> Self {
        Self {
            mapper: CoordinateMapper::new(config.chunk_size, config.sample_spacing),
            noise: NoiseField::new(seed, config.octaves.clone()),
            biomes: BiomeSelector::new(
                seed,
                config.biome_seed_offset,
                config.biome_frequency,
                config.biomes.clone(),
            ),
        }
    }

    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn biomes(&self) -> &BiomeSelector {
        &self.biomes
    }

    /// World `(x, z)` of grid sample `(col, row)` for a chunk at `origin`
    #[inline]
    pub fn sample_world_xz(&self, origin: Vec3, col: u32, row: u32) -> (f32, f32) {
        let spacing = self.mapper.sample_spacing();
        (origin.x + col as f32 * spacing, origin.z + row as f32 * spacing)
    }

    /// Height at an arbitrary world point, without any chunk
    #[inline]
    pub fn height_at_world(&self, x: f32, z: f32) -> f32 {
        self.noise.get(x, z) * self.biomes.biome_at(x, z).height_scale
    }

    /// Height at global sample index `(ix, iz)`
    ///
    /// Bit-identical to the value [`HeightmapGenerator::generate`] stores for
    /// that sample in its owning chunk.
    pub fn lattice_height(&self, ix: i64, iz: i64) -> f32 {
        let n = self.mapper.chunk_size() as i64;
        let coord = ChunkCoord::new(ix.div_euclid(n) as i32, iz.div_euclid(n) as i32);
        let origin = self.mapper.chunk_origin(coord);
        let (x, z) = self.sample_world_xz(origin, ix.rem_euclid(n) as u32, iz.rem_euclid(n) as u32);
        self.height_at_world(x, z)
    }

    /// Biome a chunk is labelled with (the one at its centre)
    pub fn chunk_biome(&self, coord: ChunkCoord) -> Arc<BiomeDescriptor> {
        let center = self.mapper.chunk_center(coord);
        Arc::clone(self.biomes.biome_at(center.x, center.z))
    }

    /// Generate the full height grid for a chunk
    ///
    /// O(N²) noise evaluations; rows are filled on the rayon pool but the
    /// call returns only once the grid is complete.
    pub fn generate(&self, coord: ChunkCoord) -> HeightGrid {
        let side = self.mapper.chunk_size();
        let n = side as usize;
        let origin = self.mapper.chunk_origin(coord);

        let mut samples = vec![0.0f32; n * n];
        samples
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(row, out)| {
                for (col, h) in out.iter_mut().enumerate() {
                    let (x, z) = self.sample_world_xz(origin, col as u32, row as u32);
                    *h = self.height_at_world(x, z);
                }
            });

        HeightGrid { side, samples }
    }
}
