//! Pending chunk requests ordered by distance from the viewer

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::terrain::coords::ChunkCoord;

/// A chunk waiting to be generated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamingRequest {
    pub coord: ChunkCoord,
    /// Manhattan distance in chunks from the viewer; lower = more urgent
    pub priority: u32,
}

impl StreamingRequest {
    /// Request for `coord` prioritised against the viewer's chunk
    pub fn new(coord: ChunkCoord, viewer_chunk: ChunkCoord) -> Self {
        Self {
            coord,
            priority: coord.manhattan_distance(viewer_chunk),
        }
    }
}

// BinaryHeap is a max-heap: invert so the lowest (priority, coord) pops first
impl Ord for StreamingRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for StreamingRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of pending requests, at most one per coordinate
#[derive(Debug, Default)]
pub struct PendingQueue {
    heap: BinaryHeap<StreamingRequest>,
    members: HashSet<ChunkCoord>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request; returns false if the coordinate is already pending
    pub fn push(&mut self, request: StreamingRequest) -> bool {
        if !self.members.insert(request.coord) {
            return false;
        }
        self.heap.push(request);
        true
    }

    /// Take the most urgent request
    pub fn pop(&mut self) -> Option<StreamingRequest> {
        let request = self.heap.pop()?;
        self.members.remove(&request.coord);
        Some(request)
    }

    /// Most urgent request without removing it
    pub fn peek(&self) -> Option<&StreamingRequest> {
        self.heap.peek()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.members.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.members.clear();
    }

    /// Pending coordinates (arbitrary order)
    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.members.iter()
    }

    /// Re-prioritise against a new viewer chunk
    ///
    /// Requests outside `view_distance` (Chebyshev) of `viewer_chunk` are
    /// dropped without being generated. Returns the dropped coordinates.
    pub fn retarget(&mut self, viewer_chunk: ChunkCoord, view_distance: u32) -> Vec<ChunkCoord> {
        let mut dropped = Vec::new();
        let mut kept = Vec::with_capacity(self.heap.len());

        for request in self.heap.drain() {
            if request.coord.chebyshev_distance(viewer_chunk) > view_distance {
                self.members.remove(&request.coord);
                dropped.push(request.coord);
            } else {
                kept.push(StreamingRequest::new(request.coord, viewer_chunk));
            }
        }

        self.heap = BinaryHeap::from(kept);
        dropped.sort_unstable();
        dropped
    }
}
