//! Vibe Subtitle
//!
//! Caption timeline engine. Reads SRT caption tracks into ordered cue
//! lists, moves them between time bases, and writes them back.
//!
//! - [`Timeline::offset`] places one clip's captions on a shared multi-clip timeline
//! - [`Timeline::merge`] combines the captions of grouped clips
//! - [`Timeline::slice`] cuts a window out of a shared timeline and re-bases it to 0
//! - [`srt::parse`] / [`srt::serialize`] convert to and from the SRT text format

pub mod srt;
pub mod timeline;

pub use srt::{parse, read_timeline, serialize, write_timeline};
pub use timeline::{Cue, Timeline};
