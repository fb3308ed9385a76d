//! Terrain height at arbitrary world points
//!
//! Resident chunks answer from their stored grid. Anywhere else the
//! generator is evaluated at the surrounding sample lattice points and
//! interpolated the same way, so a query never fails, never waits for
//! streaming, and returns the same value before and after its chunk loads.

use crate::streaming::cache::ChunkStore;
use crate::terrain::coords::ChunkCoord;
use crate::terrain::generator::{HeightGrid, HeightmapGenerator};

/// Read-only height lookup over a store and the generator that fills it
#[derive(Clone, Copy)]
pub struct HeightQuery<'a> {
    store: &'a ChunkStore,
    generator: &'a HeightmapGenerator,
}

impl<'a> HeightQuery<'a> {
    pub fn new(store: &'a ChunkStore, generator: &'a HeightmapGenerator) -> Self {
        Self { store, generator }
    }

    /// Terrain height at world `(x, z)`
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let mapper = self.generator.mapper();
        let coord = mapper.world_xz_to_chunk(x, z);
        let origin = mapper.chunk_origin(coord);
        let spacing = mapper.sample_spacing();
        // Fractional sample position within the owning chunk
        let fx = (x - origin.x) / spacing;
        let fz = (z - origin.z) / spacing;

        match self.store.get(coord) {
            Some(chunk) => interpolate_grid(chunk.heights(), fx, fz),
            None => self.interpolate_lattice(coord, fx, fz),
        }
    }

    /// Whether `(x, z)` would be answered from a resident chunk
    pub fn is_resident_at(&self, x: f32, z: f32) -> bool {
        let coord = self.generator.mapper().world_xz_to_chunk(x, z);
        self.store.contains(coord)
    }

    /// Bilinear interpolation of generator values at the global sample lattice
    ///
    /// Matches [`interpolate_grid`] bit for bit everywhere but the last
    /// column and row of a chunk, where the grid clamps and the lattice
    /// continues into the neighbour.
    fn interpolate_lattice(&self, coord: ChunkCoord, fx: f32, fz: f32) -> f32 {
        let n = self.generator.mapper().chunk_size() as i64;
        let c0 = fx.floor();
        let r0 = fz.floor();
        let ix = coord.x as i64 * n + c0 as i64;
        let iz = coord.z as i64 * n + r0 as i64;

        let g = self.generator;
        bilerp(
            g.lattice_height(ix, iz),
            g.lattice_height(ix + 1, iz),
            g.lattice_height(ix, iz + 1),
            g.lattice_height(ix + 1, iz + 1),
            fx - c0,
            fz - r0,
        )
    }
}

/// Bilinear interpolation of a chunk grid, indices clamped to its edges
fn interpolate_grid(heights: &HeightGrid, fx: f32, fz: f32) -> f32 {
    let last = heights.side() - 1;
    let fx = fx.clamp(0.0, last as f32);
    let fz = fz.clamp(0.0, last as f32);

    let c0 = (fx.floor() as u32).min(last);
    let r0 = (fz.floor() as u32).min(last);
    let c1 = (c0 + 1).min(last);
    let r1 = (r0 + 1).min(last);

    bilerp(
        heights.get(c0, r0),
        heights.get(c1, r0),
        heights.get(c0, r1),
        heights.get(c1, r1),
        fx - c0 as f32,
        fz - r0 as f32,
    )
}

#[inline]
fn bilerp(h00: f32, h10: f32, h01: f32, h11: f32, tx: f32, tz: f32) -> f32 {
    let near = h00 + (h10 - h00) * tx;
    let far = h01 + (h11 - h01) * tx;
    near + (far - near) * tz
}
