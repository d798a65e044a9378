//! Filter expressions for animation, subtitle burn-in, logo overlay, and
//! background music.
//!
//! Everything here is pure string construction.

use std::path::Path;

use vibe_render_model::{
    AnimationIntensity, AnimationKind, AnimationSettings, LogoPosition, LogoSettings, Resolution,
    SubtitleStyle,
};

use crate::color::hex_to_native_color;
use crate::graph::format_number;

/// Sample rate background music is resampled to before mixing.
pub const MUSIC_SAMPLE_RATE: u32 = 48_000;

/// Relative weight of background music against the narration.
pub const MUSIC_WEIGHT: f64 = 0.15;

/// Length of the fade animations in seconds.
pub const FADE_SECS: f64 = 1.0;

/// Per-frame zoom step and maximum zoom for an intensity.
pub fn intensity_params(intensity: AnimationIntensity) -> (f64, f64) {
    match intensity {
        AnimationIntensity::Subtle => (0.0005, 1.10),
        AnimationIntensity::Medium => (0.0010, 1.20),
        AnimationIntensity::Strong => (0.0020, 1.35),
    }
}

/// Number of output frames for `duration_secs` at `frame_rate`, at least 1.
pub fn frame_count(duration_secs: f64, frame_rate: f64) -> u64 {
    let frames = (duration_secs.max(0.0) * frame_rate).ceil();
    if frames.is_finite() && frames >= 1.0 {
        frames as u64
    } else {
        1
    }
}

/// Scale-to-cover and crop the still image to `resolution`, then animate it.
///
/// Every filter here either preserves the frame size or sets it to
/// `resolution` explicitly, so each output frame is exactly `W x H`.
pub fn animation_filters(
    settings: &AnimationSettings,
    resolution: Resolution,
    frame_rate: f64,
    duration_secs: f64,
) -> Vec<String> {
    let Resolution { width, height } = resolution;
    let mut filters = vec![
        format!("scale={width}:{height}:force_original_aspect_ratio=increase"),
        format!("crop={width}:{height}"),
        "setsar=1".to_string(),
    ];

    let frames = frame_count(duration_secs, frame_rate);
    let (step, max_zoom) = intensity_params(settings.intensity);
    let step = format_number(step);
    let max = format_number(max_zoom);
    // Denominator for linear travel so the last frame reaches the far edge.
    let travel = frames.saturating_sub(1).max(1);
    let center_x = "iw/2-(iw/zoom/2)";
    let center_y = "ih/2-(ih/zoom/2)";

    let zoompan = |z: String, x: String, y: String| {
        format!(
            "zoompan=z='{z}':x='{x}':y='{y}':d=1:s={width}x{height}:fps={}",
            format_number(frame_rate)
        )
    };

    match settings.kind {
        AnimationKind::None => {}
        AnimationKind::ZoomIn => filters.push(zoompan(
            format!("min(1+{step}*on,{max})"),
            center_x.into(),
            center_y.into(),
        )),
        AnimationKind::ZoomOut => filters.push(zoompan(
            format!("max({max}-{step}*on,1)"),
            center_x.into(),
            center_y.into(),
        )),
        AnimationKind::KenBurns => filters.push(zoompan(
            format!("min(1+{step}*on,{max})"),
            format!("(iw-iw/zoom)*on/{travel}"),
            format!("(ih-ih/zoom)*on/{travel}"),
        )),
        AnimationKind::PanLeft => filters.push(zoompan(
            max.clone(),
            format!("(iw-iw/zoom)*(1-on/{travel})"),
            center_y.into(),
        )),
        AnimationKind::PanRight => filters.push(zoompan(
            max.clone(),
            format!("(iw-iw/zoom)*on/{travel}"),
            center_y.into(),
        )),
        AnimationKind::PanUp => filters.push(zoompan(
            max.clone(),
            center_x.into(),
            format!("(ih-ih/zoom)*(1-on/{travel})"),
        )),
        AnimationKind::PanDown => filters.push(zoompan(
            max.clone(),
            center_x.into(),
            format!("(ih-ih/zoom)*on/{travel}"),
        )),
        AnimationKind::FadeIn => {
            let fade = FADE_SECS.min(duration_secs.max(0.0));
            filters.push(format!("fade=t=in:st=0:d={}", format_number(fade)));
        }
        AnimationKind::FadeOut => {
            let fade = FADE_SECS.min(duration_secs.max(0.0));
            let start = (duration_secs - fade).max(0.0);
            filters.push(format!(
                "fade=t=out:st={}:d={}",
                format_number(start),
                format_number(fade)
            ));
        }
    }

    filters
}

/// Burn-in filter for `subtitle_path` with `style`.
pub fn subtitle_filter(subtitle_path: &Path, style: &SubtitleStyle) -> String {
    format!(
        "subtitles={}:force_style={}",
        escape_filter_path(subtitle_path),
        quote_force_style(&force_style(style))
    )
}

/// The `force_style` body: comma-separated ASS style overrides.
pub fn force_style(style: &SubtitleStyle) -> String {
    let font = style.font_name.trim();
    let font = if font.is_empty() { "Arial" } else { font };
    [
        format!("FontName={}", escape_style_value(font)),
        format!("FontSize={}", format_number(style.font_size.max(1.0))),
        format!("PrimaryColour={}", hex_to_native_color(&style.primary_color)),
        format!("OutlineColour={}", hex_to_native_color(&style.outline_color)),
        format!("Outline={}", format_number(style.outline_width.max(0.0))),
        format!("Spacing={}", format_number(style.letter_spacing)),
        format!("MarginV={}", style.margin_bottom),
        format!("Alignment={}", style.alignment.ass_code()),
    ]
    .join(",")
}

/// Quote a path for use as a filter option value.
pub fn escape_filter_path(path: &Path) -> String {
    let escaped = path
        .to_string_lossy()
        .replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('\'', "\\'")
        .replace(',', "\\,");
    format!("'{escaped}'")
}

fn quote_force_style(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

fn escape_style_value(value: &str) -> String {
    value
        .replace(',', "\\,")
        .replace(':', "\\:")
        .replace('\'', "\\'")
}

/// Logo preparation filters: scale, optional white keying, opacity.
pub fn logo_filters(logo: &LogoSettings) -> Vec<String> {
    let mut filters = vec![
        format!("scale={}:-1", logo.width.max(2)),
        "format=rgba".to_string(),
    ];
    if logo.remove_background {
        filters.push("colorkey=white:0.12:0.08".to_string());
    }
    filters.push(format!(
        "colorchannelmixer=aa={}",
        format_number(logo.opacity.clamp(0.0, 1.0))
    ));
    filters
}

/// Height of the logo once scaled to `logo.width`. Square when the source
/// dimensions are unknown.
pub fn scaled_logo_height(logo: &LogoSettings, source: Option<(u32, u32)>) -> u32 {
    let width = logo.width.max(2);
    match source {
        Some((w, h)) if w > 0 && h > 0 => {
            ((width as f64 * h as f64 / w as f64).round() as u32).max(1)
        }
        _ => width,
    }
}

/// Top-left pixel position of the logo on a `frame` sized output.
pub fn logo_position(logo: &LogoSettings, logo_height: u32, frame: Resolution) -> (u32, u32) {
    let w = logo.width.max(2);
    let h = logo_height;
    let m = logo.margin;
    let right = frame.width.saturating_sub(w).saturating_sub(m);
    let bottom = frame.height.saturating_sub(h).saturating_sub(m);
    match logo.position {
        LogoPosition::TopLeft => (m, m),
        LogoPosition::TopRight => (right, m),
        LogoPosition::BottomLeft => (m, bottom),
        LogoPosition::BottomRight => (right, bottom),
        LogoPosition::Center => (
            frame.width.saturating_sub(w) / 2,
            frame.height.saturating_sub(h) / 2,
        ),
    }
}

/// Overlay filter placing the logo at `(x, y)`.
pub fn overlay_filter((x, y): (u32, u32)) -> String {
    format!("overlay=x={x}:y={y}")
}

/// Background-music preparation: resample, loop when shorter than the
/// segment, then trim to the segment.
pub fn music_filters(music_secs: f64, segment_secs: f64) -> Vec<String> {
    let mut filters = vec![format!("aresample={MUSIC_SAMPLE_RATE}")];
    if music_secs > 0.0 && music_secs < segment_secs {
        let loops = (segment_secs / music_secs).ceil() as u64;
        let size = (music_secs * MUSIC_SAMPLE_RATE as f64).ceil() as u64;
        filters.push(format!("aloop=loop={loops}:size={size}"));
    }
    filters.push(format!("atrim=duration={}", format_number(segment_secs)));
    filters.push("asetpts=N/SR/TB".to_string());
    filters
}

/// Mix narration (first input) with prepared music (second input).
pub fn music_mix_filter() -> String {
    format!(
        "amix=inputs=2:duration=first:dropout_transition=0:weights=1 {}",
        format_number(MUSIC_WEIGHT)
    )
}
