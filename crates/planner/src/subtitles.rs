//! Subtitle lookup for audio files.

use std::path::{Path, PathBuf};

use vibe_common::error::VibeResult;
use vibe_render_model::{asset_paths, discover_assets, AssetKind};

/// Finds the caption file belonging to an audio file.
///
/// An exact base-name match wins (`intro.wav` → `intro.srt`). Otherwise the
/// lookup falls back to cycling through the available files by position, so
/// `files[position % len]` is returned even when its name is unrelated to
/// the audio. That fallback can pair captions with the wrong clip when the
/// counts differ; it is kept for compatibility.
#[derive(Debug, Clone, Default)]
pub struct SubtitleLookup {
    files: Vec<PathBuf>,
}

impl SubtitleLookup {
    /// `files` should already be in natural order.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Discover caption files in `dir`. A missing directory yields no captions.
    pub fn from_dir(dir: Option<&Path>) -> VibeResult<Self> {
        match dir {
            Some(dir) if dir.is_dir() => {
                let assets = discover_assets(dir, AssetKind::Subtitle)?;
                Ok(Self::new(asset_paths(&assets)))
            }
            Some(dir) => {
                tracing::debug!(
                    dir = %dir.display(),
                    "Subtitle directory missing, continuing without captions"
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Caption file for the audio at zero-based `position`.
    pub fn for_audio(&self, audio: &Path, position: usize) -> Option<&Path> {
        if self.files.is_empty() {
            return None;
        }
        let stem = audio.file_stem();
        self.files
            .iter()
            .find(|file| stem.is_some() && file.file_stem() == stem)
            .or_else(|| self.files.get(position % self.files.len()))
            .map(PathBuf::as_path)
    }
}
