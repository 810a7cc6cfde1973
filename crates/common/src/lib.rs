//! Snapbooth Common Utilities
//!
//! Shared infrastructure for all Snapbooth crates:
//! - Error types and result aliases
//! - Clock and pacing utilities for booth sessions
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
