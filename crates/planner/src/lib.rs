//! Vibe Planner
//!
//! Turns sorted audio and image lists into an ordered list of
//! [`SegmentPlan`](vibe_render_model::SegmentPlan)s under one of three sync
//! modes:
//!
//! - **standard:** index-wise 1:1 pairing
//! - **sync_images:** consecutive audio files share one image
//! - **sync_audio:** the whole audio track is split evenly across all images
//!
//! Media operations (probing, concatenation, extraction) go through the
//! [`MediaToolkit`] trait so planning can be tested without an encoder.

pub mod planner;
pub mod spans;
pub mod subtitles;
pub mod toolkit;

pub use planner::{group_ranges, SegmentPlanner};
pub use spans::equal_spans;
pub use subtitles::SubtitleLookup;
pub use toolkit::MediaToolkit;
