//! Crossfade compositing for the combined video.

use std::path::{Path, PathBuf};

use vibe_render_model::{RenderOptions, TransitionSettings};

use crate::command::{codec_args, path_arg};
use crate::graph::{format_number, FilterGraph, FilterNode, LabelAllocator, PadRef, StreamKind};

/// Whether clips of `durations` can be joined with `transition`.
///
/// Needs at least two clips, a transition with a positive duration, and
/// every clip strictly longer than the transition.
pub fn crossfade_applies(transition: &TransitionSettings, durations: &[f64]) -> bool {
    transition.kind.xfade_name().is_some()
        && transition.duration_secs > 0.0
        && durations.len() >= 2
        && durations.iter().all(|d| *d > transition.duration_secs)
}

/// Offset of each `xfade` join, one per clip after the first.
///
/// With `L_k` the length of the first `k` clips already merged,
/// `L_k = sum(d_0..d_k) - (k - 1) * D` and join `k` starts at `L_k - D`.
pub fn xfade_offsets(durations: &[f64], transition_secs: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(durations.len().saturating_sub(1));
    let mut merged = match durations.first() {
        Some(first) => *first,
        None => return offsets,
    };
    for duration in &durations[1..] {
        offsets.push(merged - transition_secs);
        merged += duration - transition_secs;
    }
    offsets
}

/// Length of the crossfaded output.
pub fn crossfaded_length(durations: &[f64], transition_secs: f64) -> f64 {
    let total: f64 = durations.iter().sum();
    total - transition_secs * durations.len().saturating_sub(1) as f64
}

/// Chained `xfade` / `acrossfade` graph over inputs `0..n`.
pub fn crossfade_graph(
    transition: &TransitionSettings,
    durations: &[f64],
) -> Option<(FilterGraph, PadRef, PadRef)> {
    let name = transition.kind.xfade_name()?;
    let d = transition.duration_secs;
    let duration = format_number(d);

    let mut labels = LabelAllocator::new();
    let mut graph = FilterGraph::new();
    let mut video = PadRef::input(0, StreamKind::Video);
    let mut audio = PadRef::input(0, StreamKind::Audio);

    for (i, offset) in xfade_offsets(durations, d).into_iter().enumerate() {
        let next = i + 1;
        video = graph.push(FilterNode::new(
            vec![video, PadRef::input(next, StreamKind::Video)],
            vec![format!(
                "xfade=transition={name}:duration={duration}:offset={}",
                format_number(offset)
            )],
            labels.next_video(),
        ));
        audio = graph.push(FilterNode::new(
            vec![audio, PadRef::input(next, StreamKind::Audio)],
            vec![format!("acrossfade=d={duration}")],
            labels.next_audio(),
        ));
    }

    Some((graph, video, audio))
}

/// Re-encode `clips` into `output` with crossfades between them.
pub fn crossfade_args(
    clips: &[PathBuf],
    durations: &[f64],
    options: &RenderOptions,
    output: &Path,
) -> Option<Vec<String>> {
    let (graph, video, audio) = crossfade_graph(&options.transition, durations)?;

    let mut args = vec!["-y".to_string(), "-hide_banner".to_string()];
    for clip in clips {
        args.extend(["-i".to_string(), path_arg(clip)]);
    }
    args.extend([
        "-filter_complex".to_string(),
        graph.to_string(),
        "-map".to_string(),
        video.map_arg(),
        "-map".to_string(),
        audio.map_arg(),
    ]);
    args.extend(codec_args(options, options.codec.software_encoder()));
    args.extend([
        "-r".to_string(),
        format_number(options.frame_rate),
        "-movflags".to_string(),
        "+faststart".to_string(),
        path_arg(output),
    ]);
    Some(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vibe_render_model::TransitionKind;

    fn fade(duration_secs: f64) -> TransitionSettings {
        TransitionSettings {
            kind: TransitionKind::Fade,
            duration_secs,
        }
    }

    #[test]
    fn test_offsets_account_for_overlap() {
        assert_eq!(xfade_offsets(&[5.0, 4.0, 6.0], 1.0), vec![4.0, 7.0]);
        assert!(xfade_offsets(&[5.0], 1.0).is_empty());
        assert_eq!(crossfaded_length(&[5.0, 4.0, 6.0], 1.0), 13.0);
    }

    #[test]
    fn test_crossfade_requires_long_enough_clips() {
        assert!(crossfade_applies(&fade(1.0), &[5.0, 4.0]));
        assert!(!crossfade_applies(&fade(1.0), &[5.0, 1.0]));
        assert!(!crossfade_applies(&fade(1.0), &[5.0]));
        assert!(!crossfade_applies(&TransitionSettings::default(), &[5.0, 4.0]));
        assert!(!crossfade_applies(&fade(0.0), &[5.0, 4.0]));
    }

    #[test]
    fn test_crossfade_graph_chains_labels() {
        let settings = TransitionSettings {
            kind: TransitionKind::WipeLeft,
            duration_secs: 0.5,
        };
        let (graph, video, audio) = crossfade_graph(&settings, &[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(
            graph.to_string(),
            "[0:v][1:v]xfade=transition=wipeleft:duration=0.5:offset=2.5[v0];\
             [0:a][1:a]acrossfade=d=0.5[a0];\
             [v0][2:v]xfade=transition=wipeleft:duration=0.5:offset=5[v1];\
             [a0][2:a]acrossfade=d=0.5[a1]"
        );
        assert_eq!(video.map_arg(), "[v1]");
        assert_eq!(audio.map_arg(), "[a1]");
    }

    proptest! {
        #[test]
        fn prop_offsets_match_crossfaded_length(
            transition in 0.1f64..2.0,
            extra in prop::collection::vec(0.01f64..30.0, 2..8),
        ) {
            let durations: Vec<f64> = extra.iter().map(|e| e + transition).collect();
            let offsets = xfade_offsets(&durations, transition);
            prop_assert_eq!(offsets.len(), durations.len() - 1);

            for pair in offsets.windows(2) {
                prop_assert!(pair[1] > pair[0]);
            }
            let last_offset = *offsets.last().unwrap();
            let expected = last_offset + durations.last().unwrap();
            prop_assert!((crossfaded_length(&durations, transition) - expected).abs() < 1e-9);
        }
    }
}
