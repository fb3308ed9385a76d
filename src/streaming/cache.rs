//! Resident chunk store
//!
//! Holds every chunk currently in memory, keyed by coordinate. Chunks enter
//! through [`ChunkStore::admit`] and leave only through the eviction
//! methods, which always hand the collider back to the bridge before the
//! chunk is dropped.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::core::{Error, Result};
use crate::streaming::chunk::Chunk;
use crate::streaming::collider::ColliderBridge;
use crate::terrain::coords::ChunkCoord;

/// Map of resident chunks with distance-based eviction
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store sized for a view square of the given radius
    pub fn with_view_distance(view_distance: u32) -> Self {
        let side = 2 * view_distance as usize + 1;
        Self {
            chunks: HashMap::with_capacity(side * side),
        }
    }

    /// Make a chunk resident
    ///
    /// Fails with [`Error::DuplicateChunk`] if the coordinate is already
    /// resident. The rejected chunk's collider is released through `bridge`
    /// so the failure never leaks a physics handle.
    pub fn admit<B: ColliderBridge + ?Sized>(&mut self, mut chunk: Chunk, bridge: &mut B) -> Result<()> {
        let coord = chunk.coord();
        match self.chunks.entry(coord) {
            Entry::Occupied(_) => {
                if let Some(id) = chunk.take_collider() {
                    bridge.unregister_collider(id);
                }
                Err(Error::DuplicateChunk(coord))
            }
            Entry::Vacant(slot) => {
                slot.insert(chunk);
                Ok(())
            }
        }
    }

    /// Look up a resident chunk; never generates
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of resident chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterator over resident coordinates (arbitrary order)
    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.chunks.keys()
    }

    /// Iterator over resident chunks (arbitrary order)
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Evict a single chunk, releasing its collider
    ///
    /// Returns false if nothing was resident at `coord`.
    pub fn evict<B: ColliderBridge + ?Sized>(&mut self, coord: ChunkCoord, bridge: &mut B) -> bool {
        match self.chunks.remove(&coord) {
            Some(chunk) => {
                release(chunk, bridge);
                true
            }
            None => false,
        }
    }

    /// Evict every chunk farther than `unload_distance` (Chebyshev) from `center`
    ///
    /// Returns the evicted coordinates in ascending order.
    pub fn evict_far_from<B: ColliderBridge + ?Sized>(
        &mut self,
        center: ChunkCoord,
        unload_distance: u32,
        bridge: &mut B,
    ) -> Vec<ChunkCoord> {
        let mut far: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .copied()
            .filter(|coord| coord.chebyshev_distance(center) > unload_distance)
            .collect();
        far.sort_unstable();

        for coord in &far {
            if let Some(chunk) = self.chunks.remove(coord) {
                release(chunk, bridge);
            }
        }
        far
    }

    /// Evict everything; returns how many chunks were dropped
    pub fn clear<B: ColliderBridge + ?Sized>(&mut self, bridge: &mut B) -> usize {
        let count = self.chunks.len();
        for (_, chunk) in self.chunks.drain() {
            release(chunk, bridge);
        }
        count
    }
}

fn release<B: ColliderBridge + ?Sized>(mut chunk: Chunk, bridge: &mut B) {
    if let Some(id) = chunk.take_collider() {
        bridge.unregister_collider(id);
    }
    log::trace!("evicted chunk {}", chunk.coord());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::collider::ColliderId;
    use crate::streaming::test_support::{make_chunk, RecordingBridge};

    fn admit_with_collider(store: &mut ChunkStore, bridge: &mut RecordingBridge, x: i32, z: i32) -> ColliderId {
        let mut chunk = make_chunk(x, z);
        let id = bridge.register_raw();
        chunk.attach_collider(id);
        store.admit(chunk, bridge).expect("admit failed");
        id
    }

    #[test]
    fn test_store_new() {
        let store = ChunkStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_admit_and_get() {
        let mut store = ChunkStore::new();
        let mut bridge = RecordingBridge::default();
        admit_with_collider(&mut store, &mut bridge, 1, 2);

        assert_eq!(store.len(), 1);
        assert!(store.contains(ChunkCoord::new(1, 2)));
        let chunk = store.get(ChunkCoord::new(1, 2)).expect("chunk missing");
        assert_eq!(chunk.coord(), ChunkCoord::new(1, 2));
        assert!(store.get(ChunkCoord::new(2, 1)).is_none());

        store.clear(&mut bridge);
    }

    #[test]
    fn test_store_admit_duplicate() {
        let mut store = ChunkStore::new();
        let mut bridge = RecordingBridge::default();
        let first = admit_with_collider(&mut store, &mut bridge, 0, 0);

        let mut dup = make_chunk(0, 0);
        let dup_id = bridge.register_raw();
        dup.attach_collider(dup_id);

        let result = store.admit(dup, &mut bridge);
        assert!(matches!(result, Err(Error::DuplicateChunk(c)) if c == ChunkCoord::new(0, 0)));

        // The original stays, the duplicate's collider was handed back
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(ChunkCoord::new(0, 0)).unwrap().collider(), Some(first));
        assert_eq!(bridge.unregistered, vec![dup_id]);

        store.clear(&mut bridge);
    }

    #[test]
    fn test_store_evict_single() {
        let mut store = ChunkStore::new();
        let mut bridge = RecordingBridge::default();
        let id = admit_with_collider(&mut store, &mut bridge, 4, 4);

        assert!(store.evict(ChunkCoord::new(4, 4), &mut bridge));
        assert!(!store.evict(ChunkCoord::new(4, 4), &mut bridge));
        assert!(store.is_empty());
        assert_eq!(bridge.unregistered, vec![id]);
    }

    #[test]
    fn test_store_evict_far_from() {
        let mut store = ChunkStore::new();
        let mut bridge = RecordingBridge::default();

        for x in -5..=5 {
            for z in -5..=5 {
                admit_with_collider(&mut store, &mut bridge, x, z);
            }
        }
        assert_eq!(store.len(), 121);

        let center = ChunkCoord::new(1, 0);
        let evicted = store.evict_far_from(center, 3, &mut bridge);

        // Nothing beyond the unload square remains
        for coord in store.coords() {
            assert!(coord.chebyshev_distance(center) <= 3);
        }
        // Everything inside it stays (x in -2..=4, z in -3..=3)
        assert_eq!(store.len(), 7 * 7);
        assert_eq!(evicted.len(), 121 - 49);

        // Each evicted collider released exactly once
        assert_eq!(bridge.unregistered.len(), evicted.len());
        bridge.assert_no_double_release();

        // Sorted output
        let mut sorted = evicted.clone();
        sorted.sort();
        assert_eq!(evicted, sorted);

        store.clear(&mut bridge);
    }

    #[test]
    fn test_store_evict_far_from_nothing_to_do() {
        let mut store = ChunkStore::new();
        let mut bridge = RecordingBridge::default();
        admit_with_collider(&mut store, &mut bridge, 0, 0);

        assert!(store.evict_far_from(ChunkCoord::new(0, 0), 8, &mut bridge).is_empty());
        assert_eq!(store.len(), 1);
        assert!(bridge.unregistered.is_empty());

        store.clear(&mut bridge);
    }

    #[test]
    fn test_store_clear_releases_all() {
        let mut store = ChunkStore::with_view_distance(2);
        let mut bridge = RecordingBridge::default();
        for x in 0..5 {
            admit_with_collider(&mut store, &mut bridge, x, 0);
        }
        // A chunk that never got a collider is fine too
        store.admit(make_chunk(10, 10), &mut bridge).unwrap();

        assert_eq!(store.clear(&mut bridge), 6);
        assert!(store.is_empty());
        assert_eq!(bridge.unregistered.len(), 5);
        assert_eq!(bridge.live(), 0);
    }
}
