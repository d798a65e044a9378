//! ffmpeg/ffprobe backed implementation of [`RenderBackend`].

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use vibe_common::config::ToolConfig;
use vibe_common::error::{VibeError, VibeResult};
use vibe_common::timecode::TimeSpan;
use vibe_planner::MediaToolkit;

use crate::backend::{RenderBackend, ToolRunError};
use crate::command::path_arg;
use crate::graph::{FilterGraph, FilterNode, LabelAllocator, PadRef, StreamKind};
use crate::probe;
use crate::tools::{locate, FFMPEG, FFPROBE};

pub struct FfmpegBackend {
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
}

impl FfmpegBackend {
    /// Locate the tools named in `config`, or on `PATH`. Missing tools are
    /// reported by [`RenderBackend::check_tools`].
    pub fn detect(config: &ToolConfig) -> Self {
        Self {
            ffmpeg: locate(FFMPEG, config.ffmpeg.as_deref()),
            ffprobe: locate(FFPROBE, config.ffprobe.as_deref()),
        }
    }

    pub fn with_paths(ffmpeg: PathBuf, ffprobe: PathBuf) -> Self {
        Self {
            ffmpeg: Some(ffmpeg),
            ffprobe: Some(ffprobe),
        }
    }

    fn ffmpeg(&self) -> Result<&Path, ToolRunError> {
        self.ffmpeg
            .as_deref()
            .ok_or_else(|| ToolRunError::new("ffmpeg is not available"))
    }

    fn run(&self, args: &[String]) -> Result<(), ToolRunError> {
        let ffmpeg = self.ffmpeg()?;
        tracing::debug!(args = ?args, "Running ffmpeg");

        let started = std::time::Instant::now();
        let output = Command::new(ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ToolRunError::new(format!("Failed to start ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolRunError::new(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tracing::debug!(
            elapsed_secs = started.elapsed().as_secs_f64(),
            "ffmpeg finished"
        );
        Ok(())
    }
}

impl MediaToolkit for FfmpegBackend {
    fn probe_duration(&self, path: &Path) -> f64 {
        let Some(ffprobe) = self.ffprobe.as_deref() else {
            return 0.0;
        };
        match probe::probe_duration(ffprobe, path) {
            Some(duration) => duration,
            None => {
                tracing::warn!(path = %path.display(), "Could not determine media duration");
                0.0
            }
        }
    }

    fn concat_audio(&self, inputs: &[PathBuf], output: &Path) -> VibeResult<()> {
        self.run(&audio_concat_args(inputs, output))
            .map_err(|e| VibeError::concat(format!("Audio concatenation failed: {e}")))
    }

    fn extract_audio_span(&self, input: &Path, span: TimeSpan, output: &Path) -> VibeResult<()> {
        self.run(&audio_extract_args(input, span, output))
            .map_err(|e| anyhow::anyhow!("Audio extraction failed for {}: {e}", input.display()))?;
        Ok(())
    }
}

impl RenderBackend for FfmpegBackend {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn check_tools(&self) -> VibeResult<()> {
        if self.ffmpeg.is_none() {
            return Err(VibeError::tool_unavailable(FFMPEG));
        }
        if self.ffprobe.is_none() {
            return Err(VibeError::tool_unavailable(FFPROBE));
        }
        Ok(())
    }

    fn probe_dimensions(&self, path: &Path) -> Option<(u32, u32)> {
        probe::probe_dimensions(self.ffprobe.as_deref()?, path)
    }

    fn run_encoder(&self, args: &[String]) -> Result<(), ToolRunError> {
        self.run(args)
    }
}

/// Decode and join audio files into one PCM WAV track.
pub fn audio_concat_args(inputs: &[PathBuf], output: &Path) -> Vec<String> {
    let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
    for input in inputs {
        args.extend(["-i".to_string(), path_arg(input)]);
    }

    let mut labels = LabelAllocator::new();
    let mut graph = FilterGraph::new();
    let joined = graph.push(FilterNode::new(
        (0..inputs.len())
            .map(|i| PadRef::input(i, StreamKind::Audio))
            .collect(),
        vec![format!("concat=n={}:v=0:a=1", inputs.len())],
        labels.next_audio(),
    ));

    args.extend([
        "-filter_complex".to_string(),
        graph.to_string(),
        "-map".to_string(),
        joined.map_arg(),
        "-c:a".to_string(),
        "pcm_s16le".to_string(),
        path_arg(output),
    ]);
    args
}

/// Cut `span` out of `input` into a PCM WAV file. Seeking after `-i` is
/// sample accurate.
///
/// Both endpoints are absolute input positions at microsecond precision, so
/// adjacent spans share the exact same boundary string.
pub fn audio_extract_args(input: &Path, span: TimeSpan, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-i".to_string(),
        path_arg(input),
        "-ss".to_string(),
        format!("{:.6}", span.start),
        "-to".to_string(),
        format!("{:.6}", span.end),
        "-c:a".to_string(),
        "pcm_s16le".to_string(),
        path_arg(output),
    ]
}

/// Stream-copy the clips listed in `list_file` into `output`.
pub fn concat_copy_args(list_file: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        path_arg(list_file),
        "-c".to_string(),
        "copy".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        path_arg(output),
    ]
}

/// Body of a concat-demuxer list file.
pub fn concat_list(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| {
            let escaped = clip.to_string_lossy().replace('\'', "'\\''");
            format!("file '{escaped}'\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_planner::equal_spans;

    #[test]
    fn test_audio_concat_graph() {
        let args = audio_concat_args(
            &[PathBuf::from("a.wav"), PathBuf::from("b.mp3")],
            Path::new("/scratch/group_001.wav"),
        );
        let graph_at = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert_eq!(args[graph_at + 1], "[0:a][1:a]concat=n=2:v=0:a=1[a0]");
        assert_eq!(args[graph_at + 3], "[a0]");
        assert_eq!(args.last().unwrap(), "/scratch/group_001.wav");
    }

    #[test]
    fn test_extract_seeks_after_input() {
        let args = audio_extract_args(
            Path::new("all.wav"),
            TimeSpan::new(10.0 / 3.0, 20.0 / 3.0),
            Path::new("seg_002.wav"),
        );
        let input_at = args.iter().position(|a| a == "-i").unwrap();
        let seek_at = args.iter().position(|a| a == "-ss").unwrap();
        assert!(seek_at > input_at);
        assert_eq!(args[seek_at + 1], "3.333333");
        assert_eq!(args[seek_at + 2], "-to");
        assert_eq!(args[seek_at + 3], "6.666667");
    }

    #[test]
    fn test_extracted_spans_are_contiguous_and_cover_total() {
        let ranges: Vec<(String, String)> = equal_spans(10.0, 3)
            .into_iter()
            .map(|span| {
                let args = audio_extract_args(Path::new("all.wav"), span, Path::new("seg.wav"));
                let at = args.iter().position(|a| a == "-ss").unwrap();
                (args[at + 1].clone(), args[at + 3].clone())
            })
            .collect();

        assert_eq!(ranges.first().unwrap().0, "0.000000");
        assert_eq!(ranges.last().unwrap().1, "10.000000");
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        let covered: f64 = ranges
            .iter()
            .map(|(start, end)| end.parse::<f64>().unwrap() - start.parse::<f64>().unwrap())
            .sum();
        assert!((covered - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = concat_list(&[PathBuf::from("/out/output_001.mp4"), PathBuf::from("/out/it's.mp4")]);
        assert_eq!(list, "file '/out/output_001.mp4'\nfile '/out/it'\\''s.mp4'\n");
    }

    #[test]
    fn test_missing_tools_are_reported() {
        let backend = FfmpegBackend {
            ffmpeg: Some(PathBuf::from("/usr/bin/ffmpeg")),
            ffprobe: None,
        };
        let err = backend.check_tools().unwrap_err();
        assert!(matches!(err, VibeError::ToolUnavailable { ref tool } if tool == "ffprobe"));
        assert_eq!(backend.probe_duration(Path::new("a.wav")), 0.0);
    }
}
