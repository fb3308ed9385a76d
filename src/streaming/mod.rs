//! Chunk streaming around a moving viewer

pub mod cache;
pub mod chunk;
pub mod collider;
pub mod config;
pub mod priority;
pub mod query;
pub mod scheduler;

#[cfg(test)]
pub mod test_support;

pub use cache::ChunkStore;
pub use chunk::Chunk;
pub use collider::{ColliderBridge, ColliderError, ColliderId, HeadlessColliderBridge, TriangleSurface};
pub use config::StreamingConfig;
pub use priority::{PendingQueue, StreamingRequest};
pub use query::HeightQuery;
pub use scheduler::{StreamingScheduler, TickReport};
