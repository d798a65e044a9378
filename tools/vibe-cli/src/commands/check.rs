//! Check for the external tools.

use vibe_common::config::{config_file_path, AppConfig};
use vibe_render_engine::tool_status;

pub fn run(config: &AppConfig, init_config: bool) -> anyhow::Result<()> {
    println!("Vibe Render System Check");
    println!("{}", "=".repeat(50));

    let statuses = tool_status(&config.tools);
    for status in &statuses {
        match &status.path {
            Some(path) => println!("[OK] {}: {}", status.name, path.display()),
            None => println!("[MISSING] {}", status.name),
        }
    }

    let config_path = config_file_path();
    println!();
    if config_path.exists() {
        println!("Config: {}", config_path.display());
    } else if init_config {
        config.save()?;
        println!("Config written: {}", config_path.display());
    } else {
        println!("Config: {} (not found, using defaults)", config_path.display());
    }

    println!();
    if statuses.iter().all(|s| s.is_available()) {
        println!("ffmpeg and ffprobe are available. Vibe Render is ready.");
    } else {
        println!("Install ffmpeg or set tools.ffmpeg / tools.ffprobe in the config file.");
    }

    Ok(())
}
