pub mod check;
pub mod plan;
pub mod presets;
pub mod render;

use std::path::Path;

use vibe_render_model::{RenderOptions, SyncMode};

/// Render options from `path` (or defaults), with an optional sync mode override.
pub fn load_options(path: Option<&Path>, sync_mode: Option<&str>) -> anyhow::Result<RenderOptions> {
    let mut options = match path {
        Some(path) => RenderOptions::load(path)?,
        None => RenderOptions::default(),
    };
    if let Some(mode) = sync_mode {
        options.sync_mode = parse_sync_mode(mode)?;
    }
    Ok(options)
}

pub fn parse_sync_mode(mode: &str) -> anyhow::Result<SyncMode> {
    match mode {
        "standard" => Ok(SyncMode::Standard),
        "sync_images" => Ok(SyncMode::SyncImages),
        "sync_audio" => Ok(SyncMode::SyncAudio),
        _ => Err(anyhow::anyhow!(
            "Unknown sync mode: {mode}. Use: standard, sync_images, sync_audio"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_mode() {
        assert_eq!(parse_sync_mode("sync_audio").unwrap(), SyncMode::SyncAudio);
        assert!(parse_sync_mode("sync-audio").is_err());
    }

    #[test]
    fn test_sync_mode_override_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, r#"{"sync_mode": "sync_images", "frame_rate": 24.0}"#).unwrap();

        let options = load_options(Some(&path), Some("standard")).unwrap();
        assert_eq!(options.sync_mode, SyncMode::Standard);
        assert_eq!(options.frame_rate, 24.0);
    }
}
