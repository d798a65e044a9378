//! Media asset discovery.
//!
//! Assets are classified by file extension and ordered by natural,
//! case-insensitive filename order so `clip2` sorts before `clip10`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vibe_common::error::{VibeError, VibeResult};

const AUDIO_EXTENSIONS: [&str; 6] = ["wav", "mp3", "m4a", "aac", "flac", "ogg"];
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff", "gif"];
const SUBTITLE_EXTENSIONS: [&str; 1] = ["srt"];

/// Kind of media asset, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Audio,
    Image,
    Subtitle,
}

impl AssetKind {
    /// Lowercase extensions recognised for this kind.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Audio => &AUDIO_EXTENSIONS,
            AssetKind::Image => &IMAGE_EXTENSIONS,
            AssetKind::Subtitle => &SUBTITLE_EXTENSIONS,
        }
    }

    /// Infer the kind of a path from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        [AssetKind::Audio, AssetKind::Image, AssetKind::Subtitle]
            .into_iter()
            .find(|kind| {
                kind.extensions()
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Audio => "audio",
            AssetKind::Image => "image",
            AssetKind::Subtitle => "subtitle",
        }
    }
}

/// A discovered media file. Immutable for the lifetime of a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub path: PathBuf,
    pub kind: AssetKind,
}

impl MediaAsset {
    /// Classify `path`, returning `None` for unsupported extensions.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = AssetKind::from_path(&path)?;
        Some(Self { path, kind })
    }

    /// File name without extension.
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|stem| stem.to_str())
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List the files of `kind` directly inside `dir`, in natural filename order.
///
/// A missing directory is [`VibeError::InvalidInputDirectory`]; an existing
/// directory without matching files yields an empty list.
pub fn discover_assets(dir: &Path, kind: AssetKind) -> VibeResult<Vec<MediaAsset>> {
    if !dir.is_dir() {
        return Err(VibeError::InvalidInputDirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut assets: Vec<MediaAsset> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|entry| MediaAsset::from_path(entry.path()))
        .filter(|asset| asset.kind == kind)
        .collect();

    sort_naturally(&mut assets);

    tracing::debug!(
        dir = %dir.display(),
        kind = kind.as_str(),
        count = assets.len(),
        "Discovered assets"
    );

    Ok(assets)
}

/// Sort assets by natural, case-insensitive file name.
pub fn sort_naturally(assets: &mut [MediaAsset]) {
    assets.sort_by(|a, b| natord::compare_ignore_case(&a.file_name(), &b.file_name()));
}

/// Paths of a list of assets, in order.
pub fn asset_paths(assets: &[MediaAsset]) -> Vec<PathBuf> {
    assets.iter().map(|asset| asset.path.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension_is_case_insensitive() {
        assert_eq!(
            AssetKind::from_path(Path::new("voice.MP3")),
            Some(AssetKind::Audio)
        );
        assert_eq!(
            AssetKind::from_path(Path::new("cover.JPeG")),
            Some(AssetKind::Image)
        );
        assert_eq!(
            AssetKind::from_path(Path::new("captions.srt")),
            Some(AssetKind::Subtitle)
        );
        assert_eq!(AssetKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(AssetKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_discover_assets_uses_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["clip10.wav", "clip2.wav", "Clip1.mp3", "cover.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let audio = discover_assets(dir.path(), AssetKind::Audio).unwrap();
        let names: Vec<String> = audio.iter().map(MediaAsset::file_name).collect();
        assert_eq!(names, vec!["Clip1.mp3", "clip2.wav", "clip10.wav"]);

        let images = discover_assets(dir.path(), AssetKind::Image).unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].stem(), Some("cover"));
    }

    #[test]
    fn test_discover_assets_missing_directory() {
        let err = discover_assets(Path::new("/definitely/not/here"), AssetKind::Audio)
            .unwrap_err();
        assert!(matches!(err, VibeError::InvalidInputDirectory { .. }));
    }
}
