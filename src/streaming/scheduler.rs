//! Per-tick streaming around a moving viewer
//!
//! Each [`StreamingScheduler::update`] call runs one tick:
//!
//! 1. Map the viewer position to its chunk.
//! 2. If that chunk changed, re-prioritise the pending queue and cancel
//!    requests that left the view square.
//! 3. Queue every chunk in the view square that is neither resident nor
//!    pending.
//! 4. Generate up to `max_chunks_per_tick` of the most urgent requests,
//!    register their colliders and make them resident.
//! 5. Evict resident chunks beyond `unload_distance`.
//!
//! A coordinate is never both pending and resident, and a chunk is only
//! ever visible to queries once its collider is registered.

use std::collections::{HashMap, HashSet};

use glam::Vec3;

use crate::config::WorldConfig;
use crate::core::Result;
use crate::streaming::cache::ChunkStore;
use crate::streaming::chunk::Chunk;
use crate::streaming::collider::ColliderBridge;
use crate::streaming::config::StreamingConfig;
use crate::streaming::priority::{PendingQueue, StreamingRequest};
use crate::streaming::query::HeightQuery;
use crate::terrain::coords::ChunkCoord;
use crate::terrain::generator::HeightmapGenerator;

/// What a single `update` call did
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Chunk containing the viewer this tick
    pub viewer_chunk: ChunkCoord,
    /// Requests added to the pending queue
    pub enqueued: usize,
    /// Chunks made resident, in generation order
    pub generated: Vec<ChunkCoord>,
    /// Chunks whose collider registration failed this tick
    pub failed: Vec<ChunkCoord>,
    /// Pending requests dropped because the viewer moved away
    pub cancelled: Vec<ChunkCoord>,
    /// Resident chunks evicted beyond the unload distance
    pub evicted: Vec<ChunkCoord>,
}

impl TickReport {
    fn new(viewer_chunk: ChunkCoord) -> Self {
        Self {
            viewer_chunk,
            ..Default::default()
        }
    }

    /// True if the tick changed nothing
    pub fn is_idle(&self) -> bool {
        self.enqueued == 0
            && self.generated.is_empty()
            && self.failed.is_empty()
            && self.cancelled.is_empty()
            && self.evicted.is_empty()
    }
}

/// Keeps the chunks around a viewer resident, a few per tick
///
/// Owns the generator, the resident store, the pending queue and the
/// collider bridge. Dropping the scheduler releases every collider it
/// still holds.
pub struct StreamingScheduler<B: ColliderBridge> {
    config: StreamingConfig,
    generator: HeightmapGenerator,
    store: ChunkStore,
    pending: PendingQueue,
    bridge: B,
    viewer_chunk: Option<ChunkCoord>,
    /// Failed collider registrations per coordinate
    attempts: HashMap<ChunkCoord, u32>,
    /// Coordinates that ran out of retries; skipped until they leave view
    abandoned: HashSet<ChunkCoord>,
}

impl<B: ColliderBridge> StreamingScheduler<B> {
    /// Build a scheduler for the given world
    ///
    /// Fails if the configuration does not validate.
    pub fn new(config: &WorldConfig, bridge: B) -> Result<Self> {
        config.validate()?;

        let generator = HeightmapGenerator::new(config.seed, &config.terrain);
        let streaming = config.streaming.clone();
        log::info!(
            "Streaming scheduler: seed={}, chunk {} x {:.1}m, view {} / unload {} chunks, {} per tick",
            config.seed,
            config.terrain.chunk_size,
            config.terrain.sample_spacing,
            streaming.view_distance,
            streaming.unload_distance,
            streaming.max_chunks_per_tick
        );

        Ok(Self {
            store: ChunkStore::with_view_distance(streaming.unload_distance),
            config: streaming,
            generator,
            pending: PendingQueue::new(),
            bridge,
            viewer_chunk: None,
            attempts: HashMap::new(),
            abandoned: HashSet::new(),
        })
    }

    /// Advance streaming by one tick for a viewer at `viewer_pos`
    pub fn update(&mut self, viewer_pos: Vec3) -> TickReport {
        let viewer_chunk = self.generator.mapper().world_to_chunk(viewer_pos);
        let mut report = TickReport::new(viewer_chunk);

        if self.viewer_chunk != Some(viewer_chunk) {
            self.retarget(viewer_chunk, &mut report);
        }

        report.enqueued = self.enqueue_view_square(viewer_chunk);

        let mut retry = Vec::new();
        for _ in 0..self.config.max_chunks_per_tick {
            let Some(request) = self.pending.pop() else {
                break;
            };
            if let Some(coord) = self.service(request.coord, &mut report) {
                retry.push(coord);
            }
        }
        // Re-queued after the loop so one tick never retries the same chunk twice
        for coord in retry {
            self.pending.push(StreamingRequest::new(coord, viewer_chunk));
        }

        report.evicted = self
            .store
            .evict_far_from(viewer_chunk, self.config.unload_distance, &mut self.bridge);

        if !report.is_idle() {
            log::debug!(
                "tick at {}: +{} generated, {} failed, {} cancelled, {} evicted ({} resident, {} pending)",
                viewer_chunk,
                report.generated.len(),
                report.failed.len(),
                report.cancelled.len(),
                report.evicted.len(),
                self.store.len(),
                self.pending.len()
            );
        }

        report
    }

    /// Terrain height at world `(x, z)`, resident or not
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.query().height_at(x, z)
    }

    /// Read-only height queries against the current resident set
    pub fn query(&self) -> HeightQuery<'_> {
        HeightQuery::new(&self.store, &self.generator)
    }

    /// Drop every resident and pending chunk, releasing all colliders
    ///
    /// Returns how many resident chunks were evicted. The next `update`
    /// starts streaming from scratch.
    pub fn reset(&mut self) -> usize {
        let evicted = self.store.clear(&mut self.bridge);
        self.pending.clear();
        self.attempts.clear();
        self.abandoned.clear();
        self.viewer_chunk = None;
        if evicted > 0 {
            log::info!("reset: evicted {} chunks", evicted);
        }
        evicted
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    pub fn generator(&self) -> &HeightmapGenerator {
        &self.generator
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Chunk the viewer was in at the last update
    pub fn viewer_chunk(&self) -> Option<ChunkCoord> {
        self.viewer_chunk
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(coord)
    }

    pub fn is_abandoned(&self, coord: ChunkCoord) -> bool {
        self.abandoned.contains(&coord)
    }

    /// True once nothing in view is waiting to be generated
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    fn retarget(&mut self, viewer_chunk: ChunkCoord, report: &mut TickReport) {
        let view = self.config.view_distance;
        report.cancelled = self.pending.retarget(viewer_chunk, view);
        for coord in &report.cancelled {
            self.attempts.remove(coord);
        }
        self.attempts
            .retain(|coord, _| coord.chebyshev_distance(viewer_chunk) <= view);
        self.abandoned
            .retain(|coord| coord.chebyshev_distance(viewer_chunk) <= view);

        if let Some(previous) = self.viewer_chunk {
            log::debug!(
                "viewer moved {} -> {}, cancelled {} pending",
                previous,
                viewer_chunk,
                report.cancelled.len()
            );
        }
        self.viewer_chunk = Some(viewer_chunk);
    }

    fn enqueue_view_square(&mut self, viewer_chunk: ChunkCoord) -> usize {
        let view = self.config.view_distance as i32;
        let mut added = 0;
        for dz in -view..=view {
            for dx in -view..=view {
                let coord = viewer_chunk.offset(dx, dz);
                if self.store.contains(coord) || self.abandoned.contains(&coord) {
                    continue;
                }
                if self.pending.push(StreamingRequest::new(coord, viewer_chunk)) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Generate one chunk and make it resident
    ///
    /// Returns the coordinate if it should be queued again.
    fn service(&mut self, coord: ChunkCoord, report: &mut TickReport) -> Option<ChunkCoord> {
        debug_assert!(!self.store.contains(coord), "pending chunk {} is already resident", coord);

        let heights = self.generator.generate(coord);
        let origin = self.generator.mapper().chunk_origin(coord);
        let spacing = self.generator.mapper().sample_spacing();

        match self
            .bridge
            .register_static_height_surface(origin, &heights, spacing)
        {
            Ok(id) => {
                let mut chunk = Chunk::new(coord, heights, self.generator.chunk_biome(coord));
                chunk.attach_collider(id);
                if let Err(e) = self.store.admit(chunk, &mut self.bridge) {
                    // Pending and resident sets are disjoint; reaching this is a bug
                    panic!("streaming state corrupted: {}", e);
                }
                self.attempts.remove(&coord);
                report.generated.push(coord);
                log::trace!("generated chunk {} (collider {:?})", coord, id);
                None
            }
            Err(e) => {
                report.failed.push(coord);
                let attempts = self.attempts.entry(coord).or_insert(0);
                *attempts += 1;
                if *attempts >= self.config.max_collider_retries {
                    log::warn!(
                        "chunk {}: collider registration failed {} times, giving up: {}",
                        coord,
                        attempts,
                        e
                    );
                    self.attempts.remove(&coord);
                    self.abandoned.insert(coord);
                    None
                } else {
                    log::warn!(
                        "chunk {}: collider registration failed (attempt {}), will retry: {}",
                        coord,
                        attempts,
                        e
                    );
                    Some(coord)
                }
            }
        }
    }
}

impl<B: ColliderBridge> Drop for StreamingScheduler<B> {
    fn drop(&mut self) {
        self.reset();
    }
}
