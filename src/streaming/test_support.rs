//! Shared helpers for streaming tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Vec3;

use crate::streaming::chunk::Chunk;
use crate::streaming::collider::{ColliderBridge, ColliderError, ColliderId};
use crate::terrain::biome::default_catalog;
use crate::terrain::coords::ChunkCoord;
use crate::terrain::generator::HeightGrid;

pub fn make_chunk(x: i32, z: i32) -> Chunk {
    let biome = Arc::new(default_catalog().remove(0));
    Chunk::new(ChunkCoord::new(x, z), HeightGrid::flat(4, 0.0), biome)
}

/// Bridge that records every call and can be told to fail
#[derive(Debug, Default)]
pub struct RecordingBridge {
    next_id: u64,
    pub registered: Vec<ColliderId>,
    pub unregistered: Vec<ColliderId>,
    /// Origins of registered colliders, in call order
    pub origins: Vec<Vec3>,
    /// Remaining failures per chunk origin (x, z)
    failures: HashMap<(i32, i32), u32>,
    pub failed_calls: usize,
}

impl RecordingBridge {
    /// Register without going through a height grid
    pub fn register_raw(&mut self) -> ColliderId {
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.registered.push(id);
        id
    }

    /// Make the next `times` registrations at `origin` fail
    pub fn fail_at(&mut self, origin: Vec3, times: u32) {
        self.failures.insert((origin.x as i32, origin.z as i32), times);
    }

    /// Colliders registered and not yet released
    pub fn live(&self) -> usize {
        self.registered.len() - self.unregistered.len()
    }

    pub fn assert_no_double_release(&self) {
        let unique: HashSet<_> = self.unregistered.iter().collect();
        assert_eq!(unique.len(), self.unregistered.len(), "a collider was released twice");
        for id in &self.unregistered {
            assert!(self.registered.contains(id), "released unknown collider {:?}", id);
        }
    }
}

impl ColliderBridge for RecordingBridge {
    fn register_static_height_surface(
        &mut self,
        origin: Vec3,
        heights: &HeightGrid,
        _sample_spacing: f32,
    ) -> Result<ColliderId, ColliderError> {
        assert!(!heights.is_empty());
        if let Some(remaining) = self.failures.get_mut(&(origin.x as i32, origin.z as i32)) {
            if *remaining > 0 {
                *remaining -= 1;
                self.failed_calls += 1;
                return Err(ColliderError::Rejected(format!("injected failure at {}", origin)));
            }
        }
        let id = self.register_raw();
        self.origins.push(origin);
        Ok(id)
    }

    fn unregister_collider(&mut self, id: ColliderId) {
        self.unregistered.push(id);
    }
}
