//! Contract between terrain streaming and the physics engine
//!
//! The physics world is external. Streaming only needs to hand over a
//! finished height grid and later give the returned handle back. Bridges
//! that register triangle meshes can build one with [`TriangleSurface`].

use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;

use crate::terrain::generator::HeightGrid;

/// Opaque handle to a registered static collider
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u64);

/// Why a collider could not be registered
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColliderError {
    #[error("degenerate surface: {0}")]
    Degenerate(String),

    #[error("physics backend rejected surface: {0}")]
    Rejected(String),
}

/// Registers and unregisters static terrain colliders
///
/// `register_static_height_surface` is called exactly once per admitted
/// chunk, after its heights are final. `unregister_collider` is called
/// exactly once per returned id, before the owning chunk is dropped.
pub trait ColliderBridge {
    fn register_static_height_surface(
        &mut self,
        origin: Vec3,
        heights: &HeightGrid,
        sample_spacing: f32,
    ) -> Result<ColliderId, ColliderError>;

    fn unregister_collider(&mut self, id: ColliderId);
}

impl<B: ColliderBridge + ?Sized> ColliderBridge for Box<B> {
    fn register_static_height_surface(
        &mut self,
        origin: Vec3,
        heights: &HeightGrid,
        sample_spacing: f32,
    ) -> Result<ColliderId, ColliderError> {
        (**self).register_static_height_surface(origin, heights, sample_spacing)
    }

    fn unregister_collider(&mut self, id: ColliderId) {
        (**self).unregister_collider(id)
    }
}

impl<B: ColliderBridge + ?Sized> ColliderBridge for &mut B {
    fn register_static_height_surface(
        &mut self,
        origin: Vec3,
        heights: &HeightGrid,
        sample_spacing: f32,
    ) -> Result<ColliderId, ColliderError> {
        (**self).register_static_height_surface(origin, heights, sample_spacing)
    }

    fn unregister_collider(&mut self, id: ColliderId) {
        (**self).unregister_collider(id)
    }
}

/// Triangle-mesh form of a height grid
///
/// One vertex per sample, two triangles per grid cell, wound
/// counter-clockwise when seen from +Y so normals face up.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleSurface {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleSurface {
    /// Triangulate `heights` placed at `origin` with the given sample spacing
    pub fn from_heights(origin: Vec3, heights: &HeightGrid, sample_spacing: f32) -> Result<Self, ColliderError> {
        let side = heights.side();
        if side < 2 {
            return Err(ColliderError::Degenerate(format!(
                "{}x{} grid has no cells",
                side, side
            )));
        }
        if !(sample_spacing.is_finite() && sample_spacing > 0.0) {
            return Err(ColliderError::Degenerate(format!(
                "sample spacing {} is not positive",
                sample_spacing
            )));
        }
        if let Some(bad) = heights.as_slice().iter().find(|h| !h.is_finite()) {
            return Err(ColliderError::Degenerate(format!("non-finite height {}", bad)));
        }

        let mut vertices = Vec::with_capacity(heights.len());
        for row in 0..side {
            for col in 0..side {
                vertices.push(Vec3::new(
                    origin.x + col as f32 * sample_spacing,
                    origin.y + heights.get(col, row),
                    origin.z + row as f32 * sample_spacing,
                ));
            }
        }

        let cells = (side - 1) as usize;
        let mut indices = Vec::with_capacity(cells * cells * 2);
        for row in 0..side - 1 {
            for col in 0..side - 1 {
                let a = row * side + col;
                let b = a + 1;
                let c = a + side;
                let d = c + 1;
                indices.push([a, c, b]);
                indices.push([b, c, d]);
            }
        }

        Ok(Self { vertices, indices })
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        )
    }
}

/// In-memory bridge that keeps triangulated surfaces by id
///
/// Stands in for a physics world in headless runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessColliderBridge {
    next_id: u64,
    surfaces: HashMap<ColliderId, TriangleSurface>,
}

impl HeadlessColliderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live colliders
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn contains(&self, id: ColliderId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn surface(&self, id: ColliderId) -> Option<&TriangleSurface> {
        self.surfaces.get(&id)
    }
}

impl ColliderBridge for HeadlessColliderBridge {
    fn register_static_height_surface(
        &mut self,
        origin: Vec3,
        heights: &HeightGrid,
        sample_spacing: f32,
    ) -> Result<ColliderId, ColliderError> {
        let surface = TriangleSurface::from_heights(origin, heights, sample_spacing)?;
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        log::trace!("collider {:?}: {} triangles at {}", id, surface.triangle_count(), origin);
        self.surfaces.insert(id, surface);
        Ok(id)
    }

    fn unregister_collider(&mut self, id: ColliderId) {
        let removed = self.surfaces.remove(&id);
        debug_assert!(removed.is_some(), "collider {:?} unregistered twice or never registered", id);
    }
}
