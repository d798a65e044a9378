//! Vibe Render Common Utilities
//!
//! Shared infrastructure for all Vibe Render crates:
//! - Error types and result aliases
//! - Caption timecodes and time-interval arithmetic
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod timecode;

pub use config::*;
pub use error::*;
pub use timecode::*;
