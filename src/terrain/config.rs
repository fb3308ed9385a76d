//! Terrain generation parameters

use serde::{Deserialize, Serialize};

use super::biome::{default_catalog, BiomeDescriptor, DEFAULT_BIOME_FREQUENCY, DEFAULT_BIOME_SEED_OFFSET};
use super::noise::{Octave, REFERENCE_OCTAVES};
use crate::core::{Error, Result};

/// Parameters controlling heightmap generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Samples per chunk side (the height grid is `chunk_size²`)
    pub chunk_size: u32,
    /// World units between neighbouring samples
    pub sample_spacing: f32,
    /// Height octave ladder
    pub octaves: Vec<Octave>,
    /// Biome channel frequency
    pub biome_frequency: f32,
    /// Biome channel seed offset from the world seed
    pub biome_seed_offset: u32,
    /// Ordered biome catalog
    pub biomes: Vec<BiomeDescriptor>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            sample_spacing: 2.0,
            octaves: REFERENCE_OCTAVES.to_vec(),
            biome_frequency: DEFAULT_BIOME_FREQUENCY,
            biome_seed_offset: DEFAULT_BIOME_SEED_OFFSET,
            biomes: default_catalog(),
        }
    }
}

impl TerrainConfig {
    /// Reject parameter sets that cannot produce a usable height grid
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size < 2 {
            return Err(Error::Config(format!(
                "chunk_size must be at least 2, got {}",
                self.chunk_size
            )));
        }
        if !(self.sample_spacing.is_finite() && self.sample_spacing > 0.0) {
            return Err(Error::Config(format!(
                "sample_spacing must be positive, got {}",
                self.sample_spacing
            )));
        }
        if self.octaves.is_empty() {
            return Err(Error::Config("octave ladder is empty".into()));
        }
        for (i, octave) in self.octaves.iter().enumerate() {
            if !(octave.frequency.is_finite() && octave.frequency > 0.0) || !octave.amplitude.is_finite() {
                return Err(Error::Config(format!(
                    "octave {} has invalid frequency/amplitude ({}, {})",
                    i, octave.frequency, octave.amplitude
                )));
            }
        }
        if !(self.biome_frequency.is_finite() && self.biome_frequency > 0.0) {
            return Err(Error::Config(format!(
                "biome_frequency must be positive, got {}",
                self.biome_frequency
            )));
        }
        if self.biomes.is_empty() {
            return Err(Error::Config("biome catalog is empty".into()));
        }
        if let Some(bad) = self.biomes.iter().find(|b| !b.height_scale.is_finite()) {
            return Err(Error::Config(format!("biome {} has a non-finite height scale", bad.name)));
        }
        Ok(())
    }
}
