//! Biome catalog and selection from a low-frequency noise channel

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::noise;

/// Frequency of the biome channel (cycles per world unit)
pub const DEFAULT_BIOME_FREQUENCY: f32 = 0.0005;

/// Offset added to the world seed for the biome channel, keeping it
/// uncorrelated with the height octaves (which use `seed + i`)
pub const DEFAULT_BIOME_SEED_OFFSET: u32 = 1000;

/// A named terrain style
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeDescriptor {
    pub name: String,
    /// Linear RGB at low elevation
    pub ground_color: [f32; 3],
    /// Linear RGB at mid elevation
    pub hill_color: [f32; 3],
    /// Linear RGB at peaks
    pub peak_color: [f32; 3],
    /// Multiplier applied to the octave height
    pub height_scale: f32,
}

impl BiomeDescriptor {
    pub fn new(
        name: impl Into<String>,
        ground_color: [f32; 3],
        hill_color: [f32; 3],
        peak_color: [f32; 3],
        height_scale: f32,
    ) -> Self {
        Self {
            name: name.into(),
            ground_color,
            hill_color,
            peak_color,
            height_scale,
        }
    }
}

/// Reference catalog, ordered from low to high noise values
pub fn default_catalog() -> Vec<BiomeDescriptor> {
    vec![
        BiomeDescriptor::new("Dunes", [0.76, 0.65, 0.42], [0.70, 0.55, 0.34], [0.82, 0.74, 0.58], 0.6),
        BiomeDescriptor::new("Steppe", [0.45, 0.52, 0.28], [0.55, 0.50, 0.32], [0.62, 0.60, 0.55], 0.8),
        BiomeDescriptor::new("Grassland", [0.28, 0.55, 0.22], [0.35, 0.45, 0.25], [0.55, 0.55, 0.50], 1.0),
        BiomeDescriptor::new("Badlands", [0.62, 0.36, 0.22], [0.55, 0.30, 0.20], [0.72, 0.55, 0.42], 1.3),
        BiomeDescriptor::new("Highlands", [0.38, 0.40, 0.36], [0.45, 0.45, 0.45], [0.92, 0.94, 0.97], 1.8),
    ]
}

/// Picks one biome per world point, no blending
#[derive(Clone, Debug)]
pub struct BiomeSelector {
    seed: u32,
    frequency: f32,
    catalog: Vec<Arc<BiomeDescriptor>>,
}

impl BiomeSelector {
    /// Create a selector for the given world seed
    ///
    /// `catalog` must not be empty; configuration validation guarantees it.
    pub fn new(world_seed: u32, seed_offset: u32, frequency: f32, catalog: Vec<BiomeDescriptor>) -> Self {
        assert!(!catalog.is_empty(), "biome catalog must not be empty");
        Self {
            seed: world_seed.wrapping_add(seed_offset),
            frequency,
            catalog: catalog.into_iter().map(Arc::new).collect(),
        }
    }

    /// Selector with the reference frequency, seed offset and catalog
    pub fn with_defaults(world_seed: u32) -> Self {
        Self::new(world_seed, DEFAULT_BIOME_SEED_OFFSET, DEFAULT_BIOME_FREQUENCY, default_catalog())
    }

    pub fn catalog(&self) -> &[Arc<BiomeDescriptor>] {
        &self.catalog
    }

    /// Biome channel value normalized to [0, 1]
    pub fn channel_at(&self, x: f32, z: f32) -> f32 {
        let n = noise::sample(self.seed, x * self.frequency, z * self.frequency);
        (n + 1.0) * 0.5
    }

    /// Catalog index at a world point
    pub fn biome_index_at(&self, x: f32, z: f32) -> usize {
        let last = self.catalog.len() - 1;
        let scaled = (self.channel_at(x, z) * self.catalog.len() as f32).floor();
        (scaled.max(0.0) as usize).min(last)
    }

    /// Biome at a world point
    pub fn biome_at(&self, x: f32, z: f32) -> &Arc<BiomeDescriptor> {
        &self.catalog[self.biome_index_at(x, z)]
    }
}
