//! Media operations the planner depends on.

use std::path::{Path, PathBuf};

use vibe_common::error::VibeResult;
use vibe_common::timecode::TimeSpan;

/// External media operations needed to build plans.
///
/// The production implementation shells out to ffmpeg/ffprobe.
pub trait MediaToolkit {
    /// Duration of a media file in seconds.
    ///
    /// Returns `0.0` when the duration cannot be determined. Never fails.
    fn probe_duration(&self, path: &Path) -> f64;

    /// Concatenate audio files, in order, into a single track at `output`.
    fn concat_audio(&self, inputs: &[PathBuf], output: &Path) -> VibeResult<()>;

    /// Write the `span` portion of `input` to `output`.
    fn extract_audio_span(&self, input: &Path, span: TimeSpan, output: &Path) -> VibeResult<()>;
}
