//! ffmpeg argument construction for one segment.

use std::path::{Path, PathBuf};

use vibe_render_model::{RenderOptions, SegmentPlan};

use crate::filters::{
    animation_filters, logo_filters, logo_position, music_filters, music_mix_filter,
    overlay_filter, scaled_logo_height, subtitle_filter,
};
use crate::graph::{format_number, FilterGraph, FilterNode, LabelAllocator, PadRef, StreamKind};
use crate::presets;

/// A resolved background-music track for one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicTrack {
    pub path: PathBuf,
    pub duration_secs: f64,
}

/// A logo file and its probed pixel size, if known.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub path: PathBuf,
    pub dimensions: Option<(u32, u32)>,
}

/// Per-segment facts the orchestrator resolved before encoding.
#[derive(Debug, Clone)]
pub struct SegmentInputs<'a> {
    pub plan: &'a SegmentPlan,
    pub duration_secs: f64,
    pub music: Option<&'a MusicTrack>,
    pub logo: Option<&'a LogoImage>,
    pub output_path: &'a Path,
}

/// Filters and stream selection for one encode.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSetup {
    /// `-vf` and optional `-af` chains on the image and audio inputs.
    Simple {
        video: Vec<String>,
        audio: Option<Vec<String>>,
    },
    /// A `-filter_complex` graph with explicit output streams.
    Complex {
        graph: FilterGraph,
        video: PadRef,
        audio: PadRef,
    },
}

const IMAGE_INPUT: usize = 0;
const AUDIO_INPUT: usize = 1;

/// Build the full argument list for encoding one segment with `encoder`.
///
/// Inputs are numbered in order: image, audio, then logo, music, and soft
/// subtitle when present.
pub fn segment_args(
    inputs: &SegmentInputs<'_>,
    options: &RenderOptions,
    encoder: &str,
) -> Vec<String> {
    let plan = inputs.plan;
    let fps = format_number(options.frame_rate);
    let duration = format!("{:.3}", inputs.duration_secs);

    let mut args: Vec<String> = vec![
        "-y".into(),
        "-hide_banner".into(),
        "-loop".into(),
        "1".into(),
        "-framerate".into(),
        fps.clone(),
        "-i".into(),
        path_arg(&plan.image_path),
        "-i".into(),
        path_arg(&plan.audio_path),
    ];
    let mut next_input = AUDIO_INPUT + 1;

    let burn_in = options.subtitles.burn_in && plan.subtitle_path.is_some();

    let logo_input = inputs.logo.map(|logo| {
        args.extend(["-loop".into(), "1".into(), "-i".into(), path_arg(&logo.path)]);
        next_input += 1;
        next_input - 1
    });
    let music_input = inputs.music.map(|music| {
        args.extend(["-i".into(), path_arg(&music.path)]);
        next_input += 1;
        next_input - 1
    });
    let soft_subtitle_input = match (&plan.subtitle_path, burn_in) {
        (Some(path), false) => {
            args.extend(["-i".into(), path_arg(path)]);
            Some(next_input)
        }
        _ => None,
    };

    let setup = filter_setup(inputs, options, logo_input, music_input);
    match &setup {
        FilterSetup::Simple { video, audio } => {
            args.extend(["-vf".into(), video.join(",")]);
            if let Some(audio) = audio {
                args.extend(["-af".into(), audio.join(",")]);
            }
            args.extend([
                "-map".into(),
                PadRef::input(IMAGE_INPUT, StreamKind::Video).map_arg(),
                "-map".into(),
                PadRef::input(AUDIO_INPUT, StreamKind::Audio).map_arg(),
            ]);
        }
        FilterSetup::Complex {
            graph,
            video,
            audio,
        } => {
            args.extend([
                "-filter_complex".into(),
                graph.to_string(),
                "-map".into(),
                video.map_arg(),
                "-map".into(),
                audio.map_arg(),
            ]);
        }
    }
    if let Some(index) = soft_subtitle_input {
        args.extend([
            "-map".into(),
            format!("{}:0", PadRef::input(index, StreamKind::Subtitle).map_arg()),
        ]);
    }

    args.extend(codec_args(options, encoder));
    args.extend(["-r".into(), fps, "-t".into(), duration]);
    if soft_subtitle_input.is_some() {
        args.extend(["-c:s".to_string(), "mov_text".to_string()]);
    }
    args.extend(["-movflags".to_string(), "+faststart".to_string()]);
    args.push(path_arg(inputs.output_path));
    args
}

/// Decide between the simple and the multi-input filter path.
///
/// The multi-input path is used whenever a logo, subtitle burn-in, or
/// background music is active.
pub fn filter_setup(
    inputs: &SegmentInputs<'_>,
    options: &RenderOptions,
    logo_input: Option<usize>,
    music_input: Option<usize>,
) -> FilterSetup {
    let burn_subtitle = inputs
        .plan
        .subtitle_path
        .as_deref()
        .filter(|_| options.subtitles.burn_in);

    let mut video_chain = animation_filters(
        &options.animation,
        options.resolution,
        options.frame_rate,
        inputs.duration_secs,
    );
    video_chain
        .extend(presets::video_expression(options.video_preset.as_deref()).map(String::from));
    let audio_preset = presets::audio_expression(options.audio_preset.as_deref());

    let logo = inputs.logo.zip(logo_input);
    let music = inputs.music.zip(music_input);

    if logo.is_none() && burn_subtitle.is_none() && music.is_none() {
        video_chain.push("format=yuv420p".into());
        return FilterSetup::Simple {
            video: video_chain,
            audio: audio_preset.map(|expr| vec![expr.to_string()]),
        };
    }

    let mut labels = LabelAllocator::new();
    let mut graph = FilterGraph::new();

    let mut video = graph.push(FilterNode::new(
        vec![PadRef::input(IMAGE_INPUT, StreamKind::Video)],
        video_chain,
        labels.next_video(),
    ));

    if let Some((logo, index)) = logo {
        let height = scaled_logo_height(&options.logo, logo.dimensions);
        let prepared = graph.push(FilterNode::new(
            vec![PadRef::input(index, StreamKind::Video)],
            logo_filters(&options.logo),
            labels.next_logo(),
        ));
        video = graph.push(FilterNode::new(
            vec![video, prepared],
            vec![overlay_filter(logo_position(
                &options.logo,
                height,
                options.resolution,
            ))],
            labels.next_video(),
        ));
    }

    if let Some(path) = burn_subtitle {
        video = graph.push(FilterNode::new(
            vec![video],
            vec![subtitle_filter(path, &options.subtitles)],
            labels.next_video(),
        ));
    }

    video = graph.push(FilterNode::new(
        vec![video],
        vec!["format=yuv420p".into()],
        labels.next_video(),
    ));

    let mut audio = PadRef::input(AUDIO_INPUT, StreamKind::Audio);

    if let Some((music, index)) = music {
        let prepared = graph.push(FilterNode::new(
            vec![PadRef::input(index, StreamKind::Audio)],
            music_filters(music.duration_secs, inputs.duration_secs),
            labels.next_music(),
        ));
        audio = graph.push(FilterNode::new(
            vec![audio, prepared],
            vec![music_mix_filter()],
            labels.next_audio(),
        ));
    }

    if let Some(expr) = audio_preset {
        audio = graph.push(FilterNode::new(
            vec![audio],
            vec![expr.to_string()],
            labels.next_audio(),
        ));
    }

    FilterSetup::Complex {
        graph,
        video,
        audio,
    }
}

/// Video and audio codec arguments.
pub fn codec_args(options: &RenderOptions, encoder: &str) -> Vec<String> {
    vec![
        "-c:v".into(),
        encoder.to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-b:v".into(),
        format!("{}k", options.video_bitrate_kbps.max(100)),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        format!("{}k", options.audio_bitrate_kbps.max(32)),
    ]
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibe_render_model::{AnimationKind, LogoSettings};

    fn plan(subtitle: Option<&str>) -> SegmentPlan {
        SegmentPlan {
            index: 1,
            audio_path: PathBuf::from("/in/a.wav"),
            image_path: PathBuf::from("/in/i.png"),
            subtitle_path: subtitle.map(PathBuf::from),
            sources: vec![PathBuf::from("/in/a.wav")],
        }
    }

    fn inputs<'a>(
        plan: &'a SegmentPlan,
        music: Option<&'a MusicTrack>,
        logo: Option<&'a LogoImage>,
    ) -> SegmentInputs<'a> {
        SegmentInputs {
            plan,
            duration_secs: 6.0,
            music,
            logo,
            output_path: Path::new("/out/output_001.mp4"),
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    fn all_values_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
        args.windows(2)
            .filter(|w| w[0] == flag)
            .map(|w| w[1].as_str())
            .collect()
    }

    #[test]
    fn test_plain_segment_uses_simple_path() {
        let plan = plan(None);
        let args = segment_args(&inputs(&plan, None, None), &RenderOptions::default(), "libx264");

        assert!(!args.contains(&"-filter_complex".to_string()));
        assert_eq!(
            value_after(&args, "-vf"),
            Some("scale=1920:1080:force_original_aspect_ratio=increase,crop=1920:1080,setsar=1,format=yuv420p")
        );
        assert_eq!(value_after(&args, "-af"), None);
        assert_eq!(all_values_after(&args, "-map"), vec!["0:v", "1:a"]);
        assert_eq!(value_after(&args, "-c:v"), Some("libx264"));
        assert_eq!(value_after(&args, "-b:v"), Some("6000k"));
        assert_eq!(value_after(&args, "-t"), Some("6.000"));
        assert_eq!(value_after(&args, "-r"), Some("30"));
        assert_eq!(args.last().map(String::as_str), Some("/out/output_001.mp4"));
    }

    #[test]
    fn test_soft_subtitle_is_mapped_as_extra_input() {
        let plan = plan(Some("/in/a.srt"));
        let args = segment_args(&inputs(&plan, None, None), &RenderOptions::default(), "libx264");

        assert_eq!(all_values_after(&args, "-i"), vec!["/in/i.png", "/in/a.wav", "/in/a.srt"]);
        assert_eq!(all_values_after(&args, "-map"), vec!["0:v", "1:a", "2:s:0"]);
        assert_eq!(value_after(&args, "-c:s"), Some("mov_text"));
    }

    #[test]
    fn test_presets_on_simple_path() {
        let plan = plan(None);
        let options = RenderOptions {
            video_preset: Some("b_and_w".into()),
            audio_preset: Some("bass_boost".into()),
            ..RenderOptions::default()
        };
        let args = segment_args(&inputs(&plan, None, None), &options, "libx264");
        assert!(value_after(&args, "-vf").unwrap().ends_with("setsar=1,hue=s=0,format=yuv420p"));
        assert_eq!(value_after(&args, "-af"), Some("bass=g=5:f=110:w=0.4"));
    }

    #[test]
    fn test_logo_subtitle_and_music_chain_in_order() {
        let plan = plan(Some("/tmp/s.srt"));
        let mut options = RenderOptions::default();
        options.subtitles.burn_in = true;
        options.animation.kind = AnimationKind::ZoomIn;
        options.audio_preset = Some("clean_highpass".into());
        options.logo = LogoSettings {
            enabled: true,
            ..LogoSettings::default()
        };
        let music = MusicTrack {
            path: PathBuf::from("/music/bed.mp3"),
            duration_secs: 4.0,
        };
        let logo = LogoImage {
            path: PathBuf::from("/brand/logo.png"),
            dimensions: Some((320, 160)),
        };

        let args = segment_args(&inputs(&plan, Some(&music), Some(&logo)), &options, "libx264");

        assert_eq!(
            all_values_after(&args, "-i"),
            vec!["/in/i.png", "/in/a.wav", "/brand/logo.png", "/music/bed.mp3"]
        );
        assert!(!args.contains(&"-vf".to_string()));

        let graph = value_after(&args, "-filter_complex").unwrap();
        let nodes: Vec<&str> = graph.split(';').collect();
        assert_eq!(nodes.len(), 8);
        assert!(nodes[0].starts_with("[0:v]scale=1920:1080"));
        assert!(nodes[0].ends_with("[v0]"));
        assert_eq!(
            nodes[1],
            "[2:v]scale=160:-1,format=rgba,colorchannelmixer=aa=1[lg0]"
        );
        assert_eq!(nodes[2], "[v0][lg0]overlay=x=1736:y=24[v1]");
        assert!(nodes[3].starts_with("[v1]subtitles='/tmp/s.srt':force_style="));
        assert!(nodes[3].ends_with("[v2]"));
        assert_eq!(nodes[4], "[v2]format=yuv420p[v3]");
        assert_eq!(
            nodes[5],
            "[3:a]aresample=48000,aloop=loop=2:size=192000,atrim=duration=6,asetpts=N/SR/TB[bgm0]"
        );
        assert_eq!(
            nodes[6],
            "[1:a][bgm0]amix=inputs=2:duration=first:dropout_transition=0:weights=1 0.15[a0]"
        );
        assert_eq!(nodes[7], "[a0]highpass=f=80[a1]");
        assert_eq!(all_values_after(&args, "-map"), vec!["[v3]", "[a1]"]);
    }

    #[test]
    fn test_burn_in_without_file_stays_simple() {
        let plan = plan(None);
        let mut options = RenderOptions::default();
        options.subtitles.burn_in = true;
        let args = segment_args(&inputs(&plan, None, None), &options, "libx264");
        assert!(args.contains(&"-vf".to_string()));
    }

    #[test]
    fn test_music_only_keeps_video_labels_sequential() {
        let plan = plan(None);
        let music = MusicTrack {
            path: PathBuf::from("/music/long.mp3"),
            duration_secs: 120.0,
        };
        let args = segment_args(
            &inputs(&plan, Some(&music), None),
            &RenderOptions::default(),
            "h264_videotoolbox",
        );
        let graph = value_after(&args, "-filter_complex").unwrap();
        assert!(graph.contains("[v0];[v0]format=yuv420p[v1]"));
        assert!(graph.contains("[2:a]aresample=48000,atrim=duration=6"));
        assert_eq!(all_values_after(&args, "-map"), vec!["[v1]", "[a0]"]);
        assert_eq!(value_after(&args, "-c:v"), Some("h264_videotoolbox"));
    }
}
