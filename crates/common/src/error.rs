//! Error types shared across Vibe Render crates.

use std::path::PathBuf;

/// Top-level error type for render pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum VibeError {
    #[error("Required tool unavailable: {tool}")]
    ToolUnavailable { tool: String },

    #[error("Input directory does not exist: {path}")]
    InvalidInputDirectory { path: PathBuf },

    #[error("No valid segments to render: {reason}")]
    NoValidSegments { reason: String },

    #[error("Failed to probe {path}: {message}")]
    ProbeFailure { path: PathBuf, message: String },

    #[error("Encoding segment {index} failed: {detail}")]
    EncodeFailure { index: usize, detail: String },

    #[error("Concatenation failed: {detail}")]
    ConcatFailure { detail: String },

    #[error("Format error: {message}")]
    Format { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Render batch cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using VibeError.
pub type VibeResult<T> = Result<T, VibeError>;

impl VibeError {
    pub fn tool_unavailable(tool: impl Into<String>) -> Self {
        Self::ToolUnavailable { tool: tool.into() }
    }

    pub fn no_valid_segments(reason: impl Into<String>) -> Self {
        Self::NoValidSegments {
            reason: reason.into(),
        }
    }

    pub fn encode(index: usize, detail: impl Into<String>) -> Self {
        Self::EncodeFailure {
            index,
            detail: detail.into(),
        }
    }

    pub fn concat(detail: impl Into<String>) -> Self {
        Self::ConcatFailure {
            detail: detail.into(),
        }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error aborted the batch before any segment was planned.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::ToolUnavailable { .. } | Self::InvalidInputDirectory { .. }
        )
    }
}
