//! Core types and configuration for the Lifegrid cellular simulation engine.

pub mod types;
pub mod biomes;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
