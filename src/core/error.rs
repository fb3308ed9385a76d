//! Error types for terrain streaming

use thiserror::Error;

use crate::streaming::collider::ColliderError;
use crate::terrain::coords::ChunkCoord;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collider error: {0}")]
    Collider(#[from] ColliderError),

    #[error("Chunk {0} is already resident")]
    DuplicateChunk(ChunkCoord),
}
