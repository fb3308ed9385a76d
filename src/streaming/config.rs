//! Streaming radii and per-tick budget

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Configuration for the streaming scheduler
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Radius in chunks (Chebyshev) that should be resident
    pub view_distance: u32,
    /// Radius in chunks beyond which resident chunks are evicted.
    /// Must exceed `view_distance` or a viewer sitting on a chunk border
    /// would generate and evict the same chunks every tick.
    pub unload_distance: u32,
    /// Chunks generated per `update` call
    pub max_chunks_per_tick: usize,
    /// Collider registration attempts per chunk before it is abandoned
    pub max_collider_retries: u32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            view_distance: 6,
            unload_distance: 8,
            max_chunks_per_tick: 1,
            max_collider_retries: 3,
        }
    }
}

impl StreamingConfig {
    /// Config with custom radii and the default budget
    pub fn with_radii(view_distance: u32, unload_distance: u32) -> Self {
        Self {
            view_distance,
            unload_distance,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.unload_distance <= self.view_distance {
            return Err(Error::Config(format!(
                "unload_distance ({}) must be greater than view_distance ({})",
                self.unload_distance, self.view_distance
            )));
        }
        if self.max_chunks_per_tick == 0 {
            return Err(Error::Config("max_chunks_per_tick must be at least 1".into()));
        }
        if self.max_collider_retries == 0 {
            return Err(Error::Config("max_collider_retries must be at least 1".into()));
        }
        Ok(())
    }
}
