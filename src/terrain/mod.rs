//! Procedural terrain generation

pub mod coords;
pub use coords::{ChunkCoord, CoordinateMapper};

pub mod noise;
pub use noise::{NoiseField, Octave};

pub mod biome;
pub use biome::{BiomeDescriptor, BiomeSelector};

pub mod config;
pub use config::TerrainConfig;

pub mod generator;
pub use generator::{HeightGrid, HeightmapGenerator};
