//! A resident terrain chunk

use std::sync::Arc;

use crate::streaming::collider::ColliderId;
use crate::terrain::biome::BiomeDescriptor;
use crate::terrain::coords::ChunkCoord;
use crate::terrain::generator::HeightGrid;

/// Heights, biome and physics handle for one tile of terrain
///
/// Heights are immutable once the chunk exists. The collider handle is
/// attached right after registration and must be taken back out (and
/// unregistered) before the chunk is dropped; `ChunkStore` is the only
/// code path that does this.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    heights: HeightGrid,
    biome: Arc<BiomeDescriptor>,
    collider: Option<ColliderId>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, heights: HeightGrid, biome: Arc<BiomeDescriptor>) -> Self {
        Self {
            coord,
            heights,
            biome,
            collider: None,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    pub fn biome(&self) -> &BiomeDescriptor {
        &self.biome
    }

    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }

    pub(crate) fn attach_collider(&mut self, id: ColliderId) {
        debug_assert!(self.collider.is_none(), "chunk {} already has a collider", self.coord);
        self.collider = Some(id);
    }

    pub(crate) fn take_collider(&mut self) -> Option<ColliderId> {
        self.collider.take()
    }
}

impl Drop for Chunk {
    fn drop(&mut self) {
        if !std::thread::panicking() {
            debug_assert!(
                self.collider.is_none(),
                "chunk {} dropped while collider {:?} is still registered",
                self.coord,
                self.collider
            );
        }
    }
}
