//! Render results and progress reports.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Outcome of one encoded segment or of the combined output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// 1-based segment index. The combined output uses 0.
    pub index: usize,

    /// Inputs that went into this output.
    pub input_paths: Vec<PathBuf>,

    pub output_path: PathBuf,

    /// Duration in seconds the output was encoded for.
    pub duration_secs: f64,

    pub success: bool,

    /// Failure detail, or a note about a non-fatal fallback.
    pub error: Option<String>,
}

impl RenderResult {
    pub fn succeeded(
        index: usize,
        input_paths: Vec<PathBuf>,
        output_path: PathBuf,
        duration_secs: f64,
    ) -> Self {
        Self {
            index,
            input_paths,
            output_path,
            duration_secs,
            success: true,
            error: None,
        }
    }

    /// Attach a note while keeping the result successful.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.error = Some(note.into());
        self
    }
}

/// Everything a completed batch produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderBatchResult {
    /// One result per segment, in segment order.
    pub segments: Vec<RenderResult>,

    /// The combined video, when combination was requested.
    pub combined: Option<RenderResult>,

    /// Manifest of retained intermediates, when they were kept.
    pub manifest_path: Option<PathBuf>,
}

impl RenderBatchResult {
    /// All output files, segments first.
    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.segments
            .iter()
            .chain(self.combined.iter())
            .map(|result| result.output_path.clone())
            .collect()
    }

    /// Total encoded segment duration in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_secs).sum()
    }
}

/// Pipeline stage reported with each progress update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStage {
    Idle,
    Planning,
    RenderingSegments,
    CombiningSegments,
    Done,
    Failed,
}

impl RenderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStage::Idle => "idle",
            RenderStage::Planning => "planning",
            RenderStage::RenderingSegments => "rendering_segments",
            RenderStage::CombiningSegments => "combining_segments",
            RenderStage::Done => "done",
            RenderStage::Failed => "failed",
        }
    }
}

/// A progress update emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderProgress {
    pub stage: RenderStage,
    /// Completion fraction in `[0.0, 1.0]`.
    pub fraction: f64,
    pub message: String,
}

impl RenderProgress {
    pub fn new(stage: RenderStage, fraction: f64, message: impl Into<String>) -> Self {
        Self {
            stage,
            fraction: fraction.clamp(0.0, 1.0),
            message: message.into(),
        }
    }
}
