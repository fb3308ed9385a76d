//! World configuration: seed, terrain and streaming parameters

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use crate::streaming::config::StreamingConfig;
use crate::terrain::config::TerrainConfig;

/// Everything needed to build a streaming world
///
/// The seed is fixed for the lifetime of a scheduler; changing it means
/// building a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u32,
    pub terrain: TerrainConfig,
    pub streaming: StreamingConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            terrain: TerrainConfig::default(),
            streaming: StreamingConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default parameters with a specific seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.streaming.validate()
    }

    /// Save to a JSON file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file (sync) and validate
    ///
    /// Missing fields fall back to their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
