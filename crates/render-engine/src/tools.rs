//! Locating the external encoder and probe binaries.

use std::path::{Path, PathBuf};

use serde::Serialize;
use vibe_common::config::ToolConfig;

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";

/// Resolved location of one external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: &'static str,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Find `name`, preferring an explicit configured path.
///
/// An explicit path that does not exist is reported as missing rather than
/// silently replaced by whatever is on `PATH`.
pub fn locate(name: &str, explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(path) => {
            tracing::warn!(tool = name, path = %path.display(), "Configured tool path does not exist");
            None
        }
        None => which::which(name).ok(),
    }
}

/// Status of ffmpeg and ffprobe under `config`.
pub fn tool_status(config: &ToolConfig) -> Vec<ToolStatus> {
    vec![
        ToolStatus {
            name: FFMPEG,
            path: locate(FFMPEG, config.ffmpeg.as_deref()),
        },
        ToolStatus {
            name: FFPROBE,
            path: locate(FFPROBE, config.ffprobe.as_deref()),
        },
    ]
}
