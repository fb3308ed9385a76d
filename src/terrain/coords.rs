//! Conversion between world positions and chunk grid coordinates

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Integer coordinate identifying a terrain chunk on the XZ plane
///
/// Ordered by `x` then `z`, which is what the pending queue uses to break
/// priority ties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Manhattan distance in chunks (used as streaming priority)
    pub fn manhattan_distance(&self, other: ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.z.abs_diff(other.z))
    }

    /// Chebyshev distance in chunks (used for the view and unload squares)
    pub fn chebyshev_distance(&self, other: ChunkCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// Offset this coordinate by a number of chunks, saturating at the grid bounds
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.z.saturating_add(dz))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Maps world positions to chunk coordinates and back
///
/// A chunk covers `chunk_size` samples per side, `sample_spacing` world
/// units apart, so its footprint is `chunk_size * sample_spacing` units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    chunk_size: u32,
    sample_spacing: f32,
}

impl CoordinateMapper {
    pub fn new(chunk_size: u32, sample_spacing: f32) -> Self {
        Self { chunk_size, sample_spacing }
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn sample_spacing(&self) -> f32 {
        self.sample_spacing
    }

    /// Side length of one chunk in world units
    pub fn chunk_world_size(&self) -> f32 {
        self.chunk_size as f32 * self.sample_spacing
    }

    /// Chunk containing a world position (y is ignored)
    pub fn world_to_chunk(&self, pos: Vec3) -> ChunkCoord {
        self.world_xz_to_chunk(pos.x, pos.z)
    }

    /// Chunk containing the world point `(x, z)`
    pub fn world_xz_to_chunk(&self, x: f32, z: f32) -> ChunkCoord {
        let size = self.chunk_world_size();
        ChunkCoord::new((x / size).floor() as i32, (z / size).floor() as i32)
    }

    /// World-space minimum corner of a chunk, at y = 0
    pub fn chunk_origin(&self, coord: ChunkCoord) -> Vec3 {
        let size = self.chunk_world_size();
        Vec3::new(coord.x as f32 * size, 0.0, coord.z as f32 * size)
    }

    /// World-space centre of a chunk footprint, at y = 0
    pub fn chunk_center(&self, coord: ChunkCoord) -> Vec3 {
        let half = self.chunk_world_size() * 0.5;
        self.chunk_origin(coord) + Vec3::new(half, 0.0, half)
    }
}
