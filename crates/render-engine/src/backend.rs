//! Render backend abstraction.

use std::path::Path;

use vibe_common::error::VibeResult;
use vibe_planner::MediaToolkit;

/// A failed external tool run. `detail` is the tool's diagnostic output.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{detail}")]
pub struct ToolRunError {
    pub detail: String,
}

impl ToolRunError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Everything the orchestrator needs from the outside world.
pub trait RenderBackend: MediaToolkit + Send {
    /// Backend name, used in logs.
    fn name(&self) -> &str;

    /// Fail with [`VibeError::ToolUnavailable`](vibe_common::error::VibeError)
    /// if the encoder or probe is missing.
    fn check_tools(&self) -> VibeResult<()>;

    /// Pixel size of an image, if it can be determined.
    fn probe_dimensions(&self, path: &Path) -> Option<(u32, u32)>;

    /// Run the encoder with `args`, blocking until it exits.
    fn run_encoder(&self, args: &[String]) -> Result<(), ToolRunError>;
}
