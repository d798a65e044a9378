//! Vibe Render CLI: batch rendering of audio + image (+ caption) sets.
//!
//! Usage:
//!   vibe-render render <AUDIO> <IMAGES> -o <OUT>   Render a batch
//!   vibe-render plan <AUDIO> <IMAGES>              Print the segment plan only
//!   vibe-render check                              Check for ffmpeg and ffprobe
//!   vibe-render presets                            List filter presets

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vibe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "vibe-render",
    about = "Batch video rendering from audio clips, still images, and captions",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one video per segment, optionally combined into one file
    Render {
        /// Directory of audio clips
        audio_dir: PathBuf,

        /// Directory of still images
        image_dir: PathBuf,

        /// Directory of .srt caption files
        #[arg(short, long)]
        subtitles: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Render options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Sync mode: standard|sync_images|sync_audio
        #[arg(long)]
        sync_mode: Option<String>,

        /// Background music directory
        #[arg(long)]
        music: Option<PathBuf>,

        /// Burn captions into the picture instead of adding a subtitle track
        #[arg(long)]
        burn_subtitles: bool,

        /// Try the hardware encoder first
        #[arg(long)]
        hardware: bool,

        /// Join all segments into one file
        #[arg(long)]
        combine: bool,

        /// File name of the combined output
        #[arg(long)]
        combined_name: Option<String>,

        /// Keep scratch files and write a manifest
        #[arg(long)]
        keep_intermediates: bool,
    },

    /// Plan segments without encoding
    Plan {
        /// Directory of audio clips
        audio_dir: PathBuf,

        /// Directory of still images
        image_dir: PathBuf,

        /// Directory of .srt caption files
        #[arg(short, long)]
        subtitles: Option<PathBuf>,

        /// Render options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Sync mode: standard|sync_images|sync_audio
        #[arg(long)]
        sync_mode: Option<String>,
    },

    /// Check for the external encoder and probe
    Check {
        /// Write a default config file if none exists
        #[arg(long)]
        init_config: bool,
    },

    /// List video and audio filter presets
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    vibe_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Render {
            audio_dir,
            image_dir,
            subtitles,
            output,
            options,
            sync_mode,
            music,
            burn_subtitles,
            hardware,
            combine,
            combined_name,
            keep_intermediates,
        } => {
            let mut options = commands::load_options(options.as_deref(), sync_mode.as_deref())?;
            if music.is_some() {
                options.music_dir = music;
            }
            options.subtitles.burn_in |= burn_subtitles;
            options.hardware_acceleration |= hardware;
            options.output.combine |= combine;
            options.output.keep_intermediates |= keep_intermediates;
            if let Some(name) = combined_name {
                options.output.combined_filename = name;
            }
            commands::render::run(&config, audio_dir, image_dir, subtitles, output, options).await
        }
        Commands::Plan {
            audio_dir,
            image_dir,
            subtitles,
            options,
            sync_mode,
        } => {
            let options = commands::load_options(options.as_deref(), sync_mode.as_deref())?;
            commands::plan::run(&config, audio_dir, image_dir, subtitles, options)
        }
        Commands::Check { init_config } => commands::check::run(&config, init_config),
        Commands::Presets => commands::presets::run(),
    }
}
