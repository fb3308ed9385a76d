//! Terrastream - streaming procedural terrain around a moving viewer
//!
//! Heightmap chunks are generated from layered value noise, shaded by a
//! biome channel, and kept resident in a square around the viewer. Each
//! resident chunk carries a static collider registered through a
//! [`streaming::ColliderBridge`].

pub mod core;
pub mod config;
pub mod terrain;
pub mod streaming;

pub use config::WorldConfig;
pub use streaming::{HeadlessColliderBridge, StreamingScheduler, TickReport};
