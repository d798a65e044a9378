//! Sync-mode policies.

use std::ops::Range;
use std::path::{Path, PathBuf};

use vibe_common::error::VibeResult;
use vibe_render_model::{SegmentPlan, SyncMode};
use vibe_subtitle::{read_timeline, write_timeline, Timeline};

use crate::spans::equal_spans;
use crate::subtitles::SubtitleLookup;
use crate::toolkit::MediaToolkit;

/// Builds segment plans. Synthesized audio and caption files are written
/// into `scratch_dir`, which the caller owns.
pub struct SegmentPlanner<'a> {
    toolkit: &'a dyn MediaToolkit,
    scratch_dir: &'a Path,
}

impl<'a> SegmentPlanner<'a> {
    pub fn new(toolkit: &'a dyn MediaToolkit, scratch_dir: &'a Path) -> Self {
        Self {
            toolkit,
            scratch_dir,
        }
    }

    /// Plan segments for sorted `audio` and `images` under `mode`.
    ///
    /// An empty result means the inputs could not be planned; it is never a
    /// partial plan. Media-operation failures propagate as errors.
    pub fn plan(
        &self,
        audio: &[PathBuf],
        images: &[PathBuf],
        subtitles: &SubtitleLookup,
        mode: SyncMode,
    ) -> VibeResult<Vec<SegmentPlan>> {
        tracing::info!(
            mode = mode.as_str(),
            audio = audio.len(),
            images = images.len(),
            subtitles = subtitles.len(),
            "Planning segments"
        );

        if audio.is_empty() || images.is_empty() {
            return Ok(Vec::new());
        }

        let plans = match mode {
            SyncMode::Standard => plan_standard(audio, images, subtitles),
            SyncMode::SyncImages => self.plan_sync_images(audio, images, subtitles)?,
            SyncMode::SyncAudio => self.plan_sync_audio(audio, images, subtitles)?,
        };

        tracing::info!(segments = plans.len(), "Planned segments");
        Ok(plans)
    }

    fn plan_sync_images(
        &self,
        audio: &[PathBuf],
        images: &[PathBuf],
        subtitles: &SubtitleLookup,
    ) -> VibeResult<Vec<SegmentPlan>> {
        let mut plans = Vec::new();

        for (group_idx, (image, range)) in images
            .iter()
            .zip(group_ranges(audio.len(), images.len()))
            .enumerate()
        {
            let index = group_idx + 1;
            let group = &audio[range.clone()];

            if let [single] = group {
                plans.push(SegmentPlan {
                    index,
                    audio_path: single.clone(),
                    image_path: image.clone(),
                    subtitle_path: subtitles
                        .for_audio(single, range.start)
                        .map(Path::to_path_buf),
                    sources: vec![single.clone()],
                });
                continue;
            }

            let Some(durations) = self.probe_all(group) else {
                return Ok(Vec::new());
            };

            let audio_path = self.scratch_dir.join(format!("group_{index:03}.wav"));
            self.toolkit.concat_audio(group, &audio_path)?;

            let timeline = merged_timeline(group, range.start, &durations, subtitles);
            let subtitle_path = if timeline.is_empty() {
                None
            } else {
                let path = self.scratch_dir.join(format!("group_{index:03}.srt"));
                write_timeline(&path, &timeline)?;
                Some(path)
            };

            tracing::debug!(
                segment = index,
                files = group.len(),
                duration_secs = durations.iter().sum::<f64>(),
                "Grouped audio for image"
            );

            plans.push(SegmentPlan {
                index,
                audio_path,
                image_path: image.clone(),
                subtitle_path,
                sources: group.to_vec(),
            });
        }

        Ok(plans)
    }

    fn plan_sync_audio(
        &self,
        audio: &[PathBuf],
        images: &[PathBuf],
        subtitles: &SubtitleLookup,
    ) -> VibeResult<Vec<SegmentPlan>> {
        let combined = if let [single] = audio {
            single.clone()
        } else {
            let path = self.scratch_dir.join("combined_audio.wav");
            self.toolkit.concat_audio(audio, &path)?;
            path
        };

        let total = self.toolkit.probe_duration(&combined);
        if total <= 0.0 {
            tracing::warn!(path = %combined.display(), "Combined audio has no usable duration");
            return Ok(Vec::new());
        }

        let timeline = if subtitles.is_empty() {
            Timeline::new()
        } else if audio.len() == 1 {
            merged_timeline(audio, 0, &[total], subtitles)
        } else {
            let Some(durations) = self.probe_all(audio) else {
                return Ok(Vec::new());
            };
            merged_timeline(audio, 0, &durations, subtitles)
        };

        let mut plans = Vec::with_capacity(images.len());
        for (k, (image, span)) in images
            .iter()
            .zip(equal_spans(total, images.len()))
            .enumerate()
        {
            let index = k + 1;
            let audio_path = self.scratch_dir.join(format!("seg_{index:03}.wav"));
            self.toolkit
                .extract_audio_span(&combined, span, &audio_path)?;

            let slice = timeline.slice(span.start, span.end);
            let subtitle_path = if slice.is_empty() {
                None
            } else {
                let path = self.scratch_dir.join(format!("seg_{index:03}.srt"));
                write_timeline(&path, &slice)?;
                Some(path)
            };

            tracing::debug!(
                segment = index,
                start = span.start,
                end = span.end,
                cues = slice.len(),
                "Assigned audio span to image"
            );

            plans.push(SegmentPlan {
                index,
                audio_path,
                image_path: image.clone(),
                subtitle_path,
                sources: audio.to_vec(),
            });
        }

        Ok(plans)
    }

    /// Probe every file, or `None` if any duration is not positive.
    fn probe_all(&self, files: &[PathBuf]) -> Option<Vec<f64>> {
        let mut durations = Vec::with_capacity(files.len());
        for file in files {
            let duration = self.toolkit.probe_duration(file);
            if duration <= 0.0 {
                tracing::warn!(path = %file.display(), duration, "Audio has no usable duration");
                return None;
            }
            durations.push(duration);
        }
        Some(durations)
    }
}

/// Index-wise pairing, `min(audio, images)` plans.
fn plan_standard(
    audio: &[PathBuf],
    images: &[PathBuf],
    subtitles: &SubtitleLookup,
) -> Vec<SegmentPlan> {
    audio
        .iter()
        .zip(images)
        .enumerate()
        .map(|(i, (audio_path, image_path))| SegmentPlan {
            index: i + 1,
            audio_path: audio_path.clone(),
            image_path: image_path.clone(),
            subtitle_path: subtitles.for_audio(audio_path, i).map(Path::to_path_buf),
            sources: vec![audio_path.clone()],
        })
        .collect()
}

/// Consecutive audio index ranges, one per image.
///
/// Every group holds `ceil(audio / images)` files except possibly the last.
/// Fewer than `images` groups are returned when audio runs out first.
pub fn group_ranges(audio_count: usize, image_count: usize) -> Vec<Range<usize>> {
    if audio_count == 0 || image_count == 0 {
        return Vec::new();
    }
    let size = audio_count.div_ceil(image_count);
    (0..audio_count)
        .step_by(size)
        .take(image_count)
        .map(|start| start..(start + size).min(audio_count))
        .collect()
}

/// Captions of consecutive audio files on one time base. Each file's cues are
/// shifted by the summed duration of the files before it.
fn merged_timeline(
    files: &[PathBuf],
    first_position: usize,
    durations: &[f64],
    subtitles: &SubtitleLookup,
) -> Timeline {
    let mut offset = 0.0;
    let mut parts = Vec::with_capacity(files.len());

    for (i, (file, duration)) in files.iter().zip(durations).enumerate() {
        if let Some(path) = subtitles.for_audio(file, first_position + i) {
            match read_timeline(path) {
                Ok(timeline) => parts.push(timeline.offset(offset)),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "Skipping unreadable captions: {err}");
                }
            }
        }
        offset += duration;
    }

    Timeline::merge(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn paths(prefix: &str, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| PathBuf::from(format!("{prefix}{i}")))
            .collect()
    }

    #[test]
    fn test_group_ranges_even_split() {
        assert_eq!(group_ranges(6, 3), vec![0..2, 2..4, 4..6]);
    }

    #[test]
    fn test_group_ranges_short_last_group() {
        assert_eq!(group_ranges(5, 3), vec![0..2, 2..4, 4..5]);
    }

    #[test]
    fn test_group_ranges_stop_when_audio_runs_out() {
        assert_eq!(group_ranges(4, 3), vec![0..2, 2..4]);
        assert_eq!(group_ranges(2, 5), vec![0..1, 1..2]);
        assert!(group_ranges(0, 3).is_empty());
    }

    #[test]
    fn test_standard_pairs_by_index() {
        let plans = plan_standard(&paths("a", 3), &paths("i", 2), &SubtitleLookup::default());
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[1].index, 2);
        assert_eq!(plans[1].audio_path, PathBuf::from("a1"));
        assert_eq!(plans[1].image_path, PathBuf::from("i1"));
        assert!(plans[1].subtitle_path.is_none());
    }

    proptest! {
        #[test]
        fn prop_standard_plan_length_is_min(m in 0usize..40, n in 0usize..40) {
            let plans = plan_standard(&paths("a", m), &paths("i", n), &SubtitleLookup::default());
            prop_assert_eq!(plans.len(), m.min(n));
        }

        #[test]
        fn prop_groups_partition_audio(n in 1usize..30, extra in 0usize..60) {
            let m = n + extra;
            let ranges = group_ranges(m, n);
            let size = m.div_ceil(n);

            let covered: Vec<usize> = ranges.iter().cloned().flatten().collect();
            prop_assert_eq!(covered, (0..m).collect::<Vec<_>>());

            prop_assert!(ranges.len() <= n);
            for range in &ranges[..ranges.len() - 1] {
                prop_assert_eq!(range.len(), size);
            }
        }
    }
}
