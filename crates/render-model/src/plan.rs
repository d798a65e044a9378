//! Segment plans.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A fully specified unit of rendering: one image, one audio track, and an
/// optional caption file. Produced by the planner, consumed by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPlan {
    /// 1-based position in the batch.
    pub index: usize,

    /// Audio track. May be a scratch file synthesized by the planner.
    pub audio_path: PathBuf,

    /// Still image shown for the whole segment.
    pub image_path: PathBuf,

    /// Caption file for this segment, on the segment's own time base.
    pub subtitle_path: Option<PathBuf>,

    /// Original input files that contributed to this segment.
    pub sources: Vec<PathBuf>,
}

impl SegmentPlan {
    /// Output file name, `output_001.mp4` for the first segment.
    pub fn output_file_name(&self) -> String {
        output_file_name(self.index)
    }

    /// Output path inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.output_file_name())
    }

    /// Zero-based position, used for cycling through background music.
    pub fn position(&self) -> usize {
        self.index.saturating_sub(1)
    }
}

/// Output file name of the segment at 1-based `index`.
pub fn output_file_name(index: usize) -> String {
    format!("output_{index:03}.mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_are_zero_padded() {
        assert_eq!(output_file_name(1), "output_001.mp4");
        assert_eq!(output_file_name(42), "output_042.mp4");
        assert_eq!(output_file_name(1234), "output_1234.mp4");
    }

    #[test]
    fn test_plan_output_path() {
        let plan = SegmentPlan {
            index: 3,
            audio_path: PathBuf::from("a.wav"),
            image_path: PathBuf::from("i.png"),
            subtitle_path: None,
            sources: vec![PathBuf::from("a.wav")],
        };
        assert_eq!(
            plan.output_path(Path::new("/out")),
            PathBuf::from("/out/output_003.mp4")
        );
        assert_eq!(plan.position(), 2);
    }
}
