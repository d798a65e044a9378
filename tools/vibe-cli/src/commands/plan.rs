//! Print the segment plan of a batch without encoding.

use std::path::PathBuf;

use vibe_common::config::AppConfig;
use vibe_render_engine::{FfmpegBackend, RenderBackend, RenderOrchestrator, RenderRequest};
use vibe_render_model::{RenderOptions, SyncMode};

pub fn run(
    config: &AppConfig,
    audio_dir: PathBuf,
    image_dir: PathBuf,
    subtitle_dir: Option<PathBuf>,
    options: RenderOptions,
) -> anyhow::Result<()> {
    let backend = FfmpegBackend::detect(&config.tools);
    if options.sync_mode != SyncMode::Standard {
        // Grouped modes probe and concatenate audio while planning.
        backend.check_tools()?;
    }

    let scratch = tempfile::Builder::new()
        .prefix(".vibe-plan-")
        .tempdir()?;
    let request = RenderRequest {
        audio_dir,
        image_dir,
        subtitle_dir,
        output_dir: scratch.path().to_path_buf(),
        options,
    };

    let orchestrator = RenderOrchestrator::new(backend);
    let plans = orchestrator.plan(&request, scratch.path())?;
    if plans.is_empty() {
        println!(
            "No valid segments for sync mode '{}'",
            request.options.sync_mode.as_str()
        );
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&plans)?);
    tracing::info!(
        segments = plans.len(),
        "Planned segments; scratch files are discarded"
    );
    Ok(())
}
