//! Vibe Render Model
//!
//! Defines the data contracts of a render batch:
//! - **Assets:** Audio, image, and subtitle files discovered on disk
//! - **Options:** The read-only render configuration captured for one run
//! - **Plans:** Fully specified segments, one per encoded clip
//! - **Results:** Per-segment and combined outputs plus progress reports
//!
//! Everything here is plain data. Nothing in this crate spawns processes.

pub mod asset;
pub mod options;
pub mod plan;
pub mod result;

pub use asset::*;
pub use options::*;
pub use plan::*;
pub use result::*;
