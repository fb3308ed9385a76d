//! Core types shared across the crate

pub mod types;
pub mod error;
pub mod logging;

pub use types::*;
pub use error::Error;
