//! Batch render orchestration.
//!
//! ```text
//! Idle → Planning → RenderingSegments → (CombiningSegments)? → Done | Failed
//! ```
//!
//! Segments are encoded strictly one after another. Any fatal error aborts
//! the batch; the scratch workspace is dropped (and deleted) on every exit
//! path unless intermediates are kept.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vibe_common::error::{VibeError, VibeResult};
use vibe_planner::{SegmentPlanner, SubtitleLookup};
use vibe_render_model::{
    asset_paths, discover_assets, AssetKind, RenderBatchResult, RenderOptions, RenderProgress,
    RenderResult, RenderStage, SegmentPlan,
};

use crate::backend::RenderBackend;
use crate::command::{segment_args, LogoImage, MusicTrack, SegmentInputs};
use crate::ffmpeg::{concat_copy_args, concat_list};
use crate::transition::{crossfade_applies, crossfade_args, crossfaded_length};
use crate::workspace::ScratchWorkspace;

/// Duration assumed for a segment whose audio cannot be probed.
pub const FALLBACK_DURATION_SECS: f64 = 10.0;

/// Progress callback, invoked on the worker thread after each unit of work.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send>;

/// Inputs of one batch run.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub audio_dir: PathBuf,
    pub image_dir: PathBuf,
    /// Optional; a missing directory means no captions.
    pub subtitle_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub options: RenderOptions,
}

/// Cooperative cancellation shared between the caller and the worker.
///
/// Checked before each segment encode and before combination. An encode
/// already in progress runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives a batch against a [`RenderBackend`].
pub struct RenderOrchestrator<B: RenderBackend> {
    backend: B,
    cancel: CancelFlag,
}

impl<B: RenderBackend> RenderOrchestrator<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Discover inputs and plan segments into `scratch_dir` without encoding.
    pub fn plan(&self, request: &RenderRequest, scratch_dir: &Path) -> VibeResult<Vec<SegmentPlan>> {
        let audio = asset_paths(&discover_assets(&request.audio_dir, AssetKind::Audio)?);
        let images = asset_paths(&discover_assets(&request.image_dir, AssetKind::Image)?);
        let subtitles = SubtitleLookup::from_dir(request.subtitle_dir.as_deref())?;

        let planner = SegmentPlanner::new(&self.backend, scratch_dir);
        planner.plan(&audio, &images, &subtitles, request.options.sync_mode)
    }

    /// Run the whole batch.
    pub fn run(
        &self,
        request: &RenderRequest,
        progress: Option<ProgressCallback>,
    ) -> VibeResult<RenderBatchResult> {
        let result = self.run_inner(request, progress.as_ref());
        match &result {
            Ok(batch) => tracing::info!(
                stage = RenderStage::Done.as_str(),
                segments = batch.segments.len(),
                combined = batch.combined.is_some(),
                "Render batch finished"
            ),
            Err(err) => tracing::error!(
                stage = RenderStage::Failed.as_str(),
                error = %err,
                "Render batch failed"
            ),
        }
        result
    }

    fn run_inner(
        &self,
        request: &RenderRequest,
        progress: Option<&ProgressCallback>,
    ) -> VibeResult<RenderBatchResult> {
        let options = &request.options;
        options.validate()?;

        self.backend.check_tools()?;
        for dir in [&request.audio_dir, &request.image_dir] {
            if !dir.is_dir() {
                return Err(VibeError::InvalidInputDirectory { path: dir.clone() });
            }
        }

        std::fs::create_dir_all(&request.output_dir)?;
        let workspace = ScratchWorkspace::create_in(&request.output_dir)?;

        tracing::info!(
            stage = RenderStage::Planning.as_str(),
            backend = self.backend.name(),
            mode = options.sync_mode.as_str(),
            output = %request.output_dir.display(),
            "Starting render batch"
        );
        let plans = self.plan(request, workspace.path())?;
        if plans.is_empty() {
            return Err(VibeError::no_valid_segments(format!(
                "no usable audio/image pairs for sync mode '{}'",
                options.sync_mode.as_str()
            )));
        }

        let music = self.discover_music(options);
        let logo = options.logo.active_path().map(|path| LogoImage {
            path: path.to_path_buf(),
            dimensions: self.backend.probe_dimensions(path),
        });

        let combine = options.output.combine;
        let total_units = plans.len() + usize::from(combine);
        let report = |completed: usize, stage: RenderStage, message: String| {
            if let Some(cb) = progress {
                cb(RenderProgress::new(
                    stage,
                    completed as f64 / total_units as f64,
                    message,
                ));
            }
        };

        let mut segments = Vec::with_capacity(plans.len());
        for plan in &plans {
            if self.cancel.is_cancelled() {
                tracing::warn!(segment = plan.index, "Render cancelled");
                return Err(VibeError::Cancelled);
            }

            let result = self.render_segment(plan, options, &request.output_dir, &music, logo.as_ref())?;
            segments.push(result);
            report(
                segments.len(),
                RenderStage::RenderingSegments,
                format!("Rendered segment {}/{}", plan.index, plans.len()),
            );
        }

        let combined = if combine {
            if self.cancel.is_cancelled() {
                tracing::warn!("Render cancelled before combining");
                return Err(VibeError::Cancelled);
            }
            let result = self.combine_segments(&segments, options, &request.output_dir, &workspace)?;
            report(
                total_units,
                RenderStage::CombiningSegments,
                format!("Combined {} segments", segments.len()),
            );
            Some(result)
        } else {
            None
        };

        let manifest_path = if options.output.keep_intermediates {
            Some(workspace.retain(&request.output_dir)?)
        } else {
            None
        };

        Ok(RenderBatchResult {
            segments,
            combined,
            manifest_path,
        })
    }

    fn render_segment(
        &self,
        plan: &SegmentPlan,
        options: &RenderOptions,
        output_dir: &Path,
        music: &[PathBuf],
        logo: Option<&LogoImage>,
    ) -> VibeResult<RenderResult> {
        let probed = self.backend.probe_duration(&plan.audio_path);
        let (duration_secs, note) = if probed > 0.0 {
            (probed, None)
        } else {
            tracing::warn!(
                segment = plan.index,
                path = %plan.audio_path.display(),
                fallback_secs = FALLBACK_DURATION_SECS,
                "Duration probe failed, using fallback"
            );
            (
                FALLBACK_DURATION_SECS,
                Some(format!(
                    "duration probe failed for {}; used fallback {FALLBACK_DURATION_SECS:.3}s",
                    plan.audio_path.display()
                )),
            )
        };

        let music_track = self.pick_music(plan, music);
        let output_path = plan.output_path(output_dir);
        let inputs = SegmentInputs {
            plan,
            duration_secs,
            music: music_track.as_ref(),
            logo,
            output_path: &output_path,
        };

        let candidates = options
            .codec
            .encoder_candidates(options.hardware_acceleration);
        for (attempt, encoder) in candidates.iter().enumerate() {
            tracing::info!(
                segment = plan.index,
                encoder,
                duration_secs,
                music = music_track.is_some(),
                logo = logo.is_some(),
                subtitles = plan.subtitle_path.is_some(),
                "Encoding segment"
            );
            let args = segment_args(&inputs, options, encoder);
            match self.backend.run_encoder(&args) {
                Ok(()) => break,
                Err(err) if attempt + 1 < candidates.len() => {
                    tracing::warn!(
                        segment = plan.index,
                        encoder,
                        error = %err,
                        "Encoder failed, retrying with fallback"
                    );
                }
                Err(err) => return Err(VibeError::encode(plan.index, err.detail)),
            }
        }

        let result = RenderResult::succeeded(
            plan.index,
            plan.sources.clone(),
            output_path,
            duration_secs,
        );
        Ok(match note {
            Some(note) => result.with_note(note),
            None => result,
        })
    }

    fn combine_segments(
        &self,
        segments: &[RenderResult],
        options: &RenderOptions,
        output_dir: &Path,
        workspace: &ScratchWorkspace,
    ) -> VibeResult<RenderResult> {
        let clips: Vec<PathBuf> = segments.iter().map(|s| s.output_path.clone()).collect();
        let durations: Vec<f64> = segments.iter().map(|s| s.duration_secs).collect();
        let output_path = output_dir.join(options.combined_filename());

        tracing::info!(
            stage = RenderStage::CombiningSegments.as_str(),
            clips = clips.len(),
            output = %output_path.display(),
            "Combining segments"
        );

        let crossfade = crossfade_applies(&options.transition, &durations)
            .then(|| crossfade_args(&clips, &durations, options, &output_path))
            .flatten();
        let (args, duration_secs) = match crossfade {
            Some(args) => (
                args,
                crossfaded_length(&durations, options.transition.duration_secs),
            ),
            None => {
                if options.transition.kind.xfade_name().is_some() {
                    tracing::warn!("Clips too short for the transition, joining with hard cuts");
                }
                let list_file = workspace.join("concat_list.txt");
                std::fs::write(&list_file, concat_list(&clips))?;
                (
                    concat_copy_args(&list_file, &output_path),
                    durations.iter().sum(),
                )
            }
        };

        self.backend
            .run_encoder(&args)
            .map_err(|err| VibeError::concat(err.detail))?;

        Ok(RenderResult::succeeded(0, clips, output_path, duration_secs))
    }

    /// Music files from the configured directory, in natural order.
    fn discover_music(&self, options: &RenderOptions) -> Vec<PathBuf> {
        let Some(dir) = options.music_dir.as_deref() else {
            return Vec::new();
        };
        match discover_assets(dir, AssetKind::Audio) {
            Ok(assets) => asset_paths(&assets),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Skipping background music");
                Vec::new()
            }
        }
    }

    /// Cycle through `music` by segment position. An unprobeable file skips
    /// music for this segment.
    fn pick_music(&self, plan: &SegmentPlan, music: &[PathBuf]) -> Option<MusicTrack> {
        if music.is_empty() {
            return None;
        }
        let path = &music[plan.position() % music.len()];
        let duration_secs = self.backend.probe_duration(path);
        if duration_secs <= 0.0 {
            tracing::warn!(
                segment = plan.index,
                path = %path.display(),
                "Background music has no usable duration, skipping"
            );
            return None;
        }
        Some(MusicTrack {
            path: path.clone(),
            duration_secs,
        })
    }
}
