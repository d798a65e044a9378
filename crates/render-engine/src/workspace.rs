//! Scratch workspace for one batch run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vibe_common::error::VibeResult;

/// File written next to the outputs when intermediates are kept.
pub const MANIFEST_FILE: &str = "intermediates_manifest.json";

const SCRATCH_PREFIX: &str = ".vibe-render-";

/// Temporary directory owned by exactly one batch run.
///
/// Dropping the workspace deletes it, so every early return (failure or
/// cancellation) cleans up. Call [`ScratchWorkspace::retain`] to keep it.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: tempfile::TempDir,
}

/// Listing of the files left behind in a retained workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntermediatesManifest {
    pub generated_at: DateTime<Utc>,
    pub scratch_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

impl ScratchWorkspace {
    /// Create a fresh, uniquely named workspace inside `parent`.
    pub fn create_in(parent: &Path) -> VibeResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)?;
        tracing::debug!(path = %dir.path().display(), "Created scratch workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Keep the workspace on disk and write a manifest of its files into
    /// `manifest_dir`. Returns the manifest path.
    pub fn retain(self, manifest_dir: &Path) -> VibeResult<PathBuf> {
        let scratch_dir = self.dir.keep();

        let mut files: Vec<PathBuf> = std::fs::read_dir(&scratch_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        let manifest = IntermediatesManifest {
            generated_at: Utc::now(),
            scratch_dir,
            files,
        };
        let path = manifest_dir.join(MANIFEST_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;

        tracing::info!(
            manifest = %path.display(),
            files = manifest.files.len(),
            "Kept intermediate files"
        );
        Ok(path)
    }
}

/// Whether `path` looks like a scratch workspace directory.
pub fn is_scratch_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(SCRATCH_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_removes_workspace() {
        let parent = tempfile::tempdir().unwrap();
        let scratch_path = {
            let workspace = ScratchWorkspace::create_in(parent.path()).unwrap();
            std::fs::write(workspace.join("group_001.wav"), b"").unwrap();
            assert!(is_scratch_dir(workspace.path()));
            workspace.path().to_path_buf()
        };
        assert!(!scratch_path.exists());
    }

    #[test]
    fn test_retain_writes_manifest() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = ScratchWorkspace::create_in(parent.path()).unwrap();
        std::fs::write(workspace.join("seg_002.srt"), b"").unwrap();
        std::fs::write(workspace.join("seg_001.wav"), b"").unwrap();
        let scratch_path = workspace.path().to_path_buf();

        let manifest_path = workspace.retain(parent.path()).unwrap();
        assert!(scratch_path.exists());

        let manifest: IntermediatesManifest =
            serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
        assert_eq!(manifest.scratch_dir, scratch_path);
        assert_eq!(
            manifest.files,
            vec![scratch_path.join("seg_001.wav"), scratch_path.join("seg_002.srt")]
        );
    }
}
