//! Vibe Render Engine
//!
//! Encodes planned segments into video clips with an external encoder and
//! optionally joins them into one combined file.
//!
//! # Pipeline Architecture
//!
//! ```text
//! audio/ ──┐
//!          ├── Discover (natural order)
//! images/ ─┘         │
//!                    ├── Plan (standard | sync_images | sync_audio)
//! subtitles/ ────────┘         │
//!                              ├── Per segment: animation → logo → captions
//! music/ ──────────────────────┘         │        narration → music mix → preset
//!                                        ▼
//!                                 Encode (hw, then sw fallback)
//!                                        │
//!                                        ▼
//!                           output_001.mp4 … output_NNN.mp4
//!                                        │
//!                                        ▼ (optional)
//!                          combined_video.mp4 (concat or crossfade)
//! ```

pub mod backend;
pub mod color;
pub mod command;
pub mod ffmpeg;
pub mod filters;
pub mod graph;
pub mod orchestrator;
pub mod presets;
pub mod probe;
pub mod tools;
pub mod transition;
pub mod worker;
pub mod workspace;

pub use backend::{RenderBackend, ToolRunError};
pub use color::hex_to_native_color;
pub use ffmpeg::FfmpegBackend;
pub use orchestrator::{
    CancelFlag, ProgressCallback, RenderOrchestrator, RenderRequest, FALLBACK_DURATION_SECS,
};
pub use tools::{tool_status, ToolStatus};
pub use worker::{spawn_render, RenderHandle};
pub use workspace::{IntermediatesManifest, ScratchWorkspace, MANIFEST_FILE};
