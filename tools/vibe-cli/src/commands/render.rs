//! Render a batch.

use std::io::Write;
use std::path::PathBuf;

use vibe_common::config::AppConfig;
use vibe_render_engine::{spawn_render, FfmpegBackend, RenderRequest};
use vibe_render_model::RenderOptions;

pub async fn run(
    config: &AppConfig,
    audio_dir: PathBuf,
    image_dir: PathBuf,
    subtitle_dir: Option<PathBuf>,
    output_dir: PathBuf,
    options: RenderOptions,
) -> anyhow::Result<()> {
    println!("Rendering batch");
    println!("  Audio:     {}", audio_dir.display());
    println!("  Images:    {}", image_dir.display());
    if let Some(dir) = &subtitle_dir {
        println!("  Subtitles: {}", dir.display());
    }
    println!("  Output:    {}", output_dir.display());
    println!("  Mode:      {}", options.sync_mode.as_str());
    println!(
        "  Video:     {}x{} @ {} fps",
        options.resolution.width, options.resolution.height, options.frame_rate
    );

    let request = RenderRequest {
        audio_dir,
        image_dir,
        subtitle_dir,
        output_dir,
        options,
    };

    let backend = FfmpegBackend::detect(&config.tools);
    let mut handle = spawn_render(backend, request);

    let cancel = handle.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancelling after the current segment...");
            cancel.cancel();
        }
    });

    while let Some(p) = handle.progress.recv().await {
        print!(
            "\r  Progress: {:5.1}% [{}] {}  ",
            p.fraction * 100.0,
            p.stage.as_str(),
            p.message
        );
        std::io::stdout().flush().ok();
    }

    let batch = match handle.wait().await {
        Ok(batch) => batch,
        Err(e) => {
            println!();
            return Err(anyhow::anyhow!("Render failed: {e}"));
        }
    };

    println!("\nRender complete: {} segment(s)", batch.segments.len());
    for segment in &batch.segments {
        println!(
            "  [{:03}] {} ({:.1}s)",
            segment.index,
            segment.output_path.display(),
            segment.duration_secs
        );
        if let Some(note) = &segment.error {
            println!("        note: {note}");
        }
    }
    if let Some(combined) = &batch.combined {
        println!(
            "  Combined: {} ({:.1}s)",
            combined.output_path.display(),
            combined.duration_secs
        );
    }
    if let Some(manifest) = &batch.manifest_path {
        println!("  Intermediates: {}", manifest.display());
    }

    Ok(())
}
