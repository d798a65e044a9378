//! Named auxiliary video and audio filter presets.

use serde::Serialize;

/// A reusable filter expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub expression: &'static str,
}

const fn preset(id: &'static str, name: &'static str, expression: &'static str) -> FilterPreset {
    FilterPreset {
        id,
        name,
        expression,
    }
}

pub const VIDEO_PRESETS: &[FilterPreset] = &[
    preset(
        "warm_tone",
        "Warm Cinematic",
        "eq=contrast=1.08:brightness=0.03:saturation=1.12",
    ),
    preset("cool_teal", "Teal & Orange", "curves=preset=teal_orange"),
    preset("b_and_w", "Black & White", "hue=s=0"),
    preset("sharp_pop", "Sharpen", "unsharp=5:5:0.8:5:5:0.0"),
    preset(
        "soft_glow",
        "Soft Glow",
        "gblur=sigma=8,eq=saturation=1.1:contrast=1.05",
    ),
    preset("vignette_focus", "Vignette", "vignette=PI/5"),
    preset("film_grain", "Film Grain", "noise=alls=20:allf=t"),
    preset(
        "motion_blur",
        "Motion Blur",
        "tblend=all_mode='average':all_opacity=0.7",
    ),
];

pub const AUDIO_PRESETS: &[FilterPreset] = &[
    preset(
        "voice_clarity",
        "Voice Clarity",
        "anequalizer=f=120:t=q:w=1.0:g=3,anequalizer=f=3000:t=q:w=1.5:g=4",
    ),
    preset("bass_boost", "Bass Boost", "bass=g=5:f=110:w=0.4"),
    preset("treble_air", "Airy Treble", "treble=g=4:f=6000:w=0.5"),
    preset(
        "broadcast_comp",
        "Broadcast Compressor",
        "acompressor=threshold=-18dB:ratio=3:attack=20:release=260",
    ),
    preset("loudness_norm", "Loudness Normalize", "loudnorm=I=-16:LRA=11:TP=-1.5"),
    preset("clean_highpass", "Rumble Cut", "highpass=f=80"),
];

pub fn video_preset(id: &str) -> Option<&'static FilterPreset> {
    VIDEO_PRESETS.iter().find(|p| p.id == id)
}

pub fn audio_preset(id: &str) -> Option<&'static FilterPreset> {
    AUDIO_PRESETS.iter().find(|p| p.id == id)
}

/// Expression for an optional video preset id. Unknown ids are ignored.
pub fn video_expression(id: Option<&str>) -> Option<&'static str> {
    lookup(id, video_preset, "video")
}

/// Expression for an optional audio preset id. Unknown ids are ignored.
pub fn audio_expression(id: Option<&str>) -> Option<&'static str> {
    lookup(id, audio_preset, "audio")
}

fn lookup(
    id: Option<&str>,
    find: fn(&str) -> Option<&'static FilterPreset>,
    kind: &str,
) -> Option<&'static str> {
    let id = id.map(str::trim).filter(|id| !id.is_empty())?;
    match find(id) {
        Some(preset) => Some(preset.expression),
        None => {
            tracing::warn!(preset = id, kind, "Unknown filter preset, ignoring");
            None
        }
    }
}
