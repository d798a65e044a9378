//! Render options.
//!
//! A `RenderOptions` value is captured once per batch and passed by
//! reference to every pipeline stage. No stage mutates it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vibe_common::error::{VibeError, VibeResult};

/// Default file name of the combined video.
pub const DEFAULT_COMBINED_FILENAME: &str = "combined_video.mp4";

/// Complete configuration of one render batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Output frame rate.
    pub frame_rate: f64,

    /// Output resolution in pixels.
    pub resolution: Resolution,

    /// Video codec family.
    pub codec: VideoCodec,

    /// Video bitrate in kbps.
    pub video_bitrate_kbps: u32,

    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,

    /// Prefer the platform hardware encoder, falling back to software.
    pub hardware_acceleration: bool,

    /// How audio, image, and subtitle counts are reconciled.
    pub sync_mode: SyncMode,

    /// Subtitle styling and burn-in switch.
    pub subtitles: SubtitleStyle,

    /// Still-image animation.
    pub animation: AnimationSettings,

    /// Transition used between clips of the combined video.
    pub transition: TransitionSettings,

    /// Directory of background-music files, if any.
    pub music_dir: Option<PathBuf>,

    /// Logo overlay.
    pub logo: LogoSettings,

    /// Identifier of an auxiliary video filter preset.
    pub video_preset: Option<String>,

    /// Identifier of an auxiliary audio filter preset.
    pub audio_preset: Option<String>,

    /// Output combination and intermediate-file retention.
    pub output: OutputSettings,
}

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Video codec family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    #[default]
    H264,
    Hevc,
}

impl VideoCodec {
    pub fn software_encoder(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "libx264",
            VideoCodec::Hevc => "libx265",
        }
    }

    pub fn hardware_encoder(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "h264_videotoolbox",
            VideoCodec::Hevc => "hevc_videotoolbox",
        }
    }

    /// Encoders to try in order.
    pub fn encoder_candidates(&self, hardware: bool) -> Vec<&'static str> {
        if hardware {
            vec![self.hardware_encoder(), self.software_encoder()]
        } else {
            vec![self.software_encoder()]
        }
    }
}

/// Policy for grouping audio, image, and subtitle inputs into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// One image per audio file, index-wise.
    #[default]
    Standard,
    /// Several consecutive audio files share one image.
    SyncImages,
    /// The whole audio track is divided evenly across all images.
    SyncAudio,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Standard => "standard",
            SyncMode::SyncImages => "sync_images",
            SyncMode::SyncAudio => "sync_audio",
        }
    }
}

/// Subtitle styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    /// Render captions into the video pixels instead of a soft subtitle stream.
    pub burn_in: bool,
    pub font_name: String,
    pub font_size: f64,
    /// Text colour as `#RRGGBB`.
    pub primary_color: String,
    /// Outline colour as `#RRGGBB`.
    pub outline_color: String,
    pub outline_width: f64,
    pub letter_spacing: f64,
    /// Distance from the bottom edge in pixels.
    pub margin_bottom: u32,
    pub alignment: SubtitleAlignment,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            burn_in: false,
            font_name: "Arial".to_string(),
            font_size: 48.0,
            primary_color: "#FFFFFF".to_string(),
            outline_color: "#000000".to_string(),
            outline_width: 2.0,
            letter_spacing: 0.0,
            margin_bottom: 40,
            alignment: SubtitleAlignment::Center,
        }
    }
}

/// Horizontal caption alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl SubtitleAlignment {
    /// Bottom-row numpad alignment code used by the subtitle renderer.
    pub fn ass_code(&self) -> u8 {
        match self {
            SubtitleAlignment::Left => 1,
            SubtitleAlignment::Center => 2,
            SubtitleAlignment::Right => 3,
        }
    }
}

/// Still-image animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnimationSettings {
    pub kind: AnimationKind,
    pub intensity: AnimationIntensity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    #[default]
    None,
    ZoomIn,
    ZoomOut,
    KenBurns,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    FadeIn,
    FadeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationIntensity {
    Subtle,
    #[default]
    Medium,
    Strong,
}

/// Transition between consecutive clips of the combined video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    pub kind: TransitionKind,
    pub duration_secs: f64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            kind: TransitionKind::None,
            duration_secs: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    #[default]
    None,
    Fade,
    Dissolve,
    Crossfade,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    SlideLeft,
    SlideRight,
    Blur,
}

impl TransitionKind {
    /// Name of the matching `xfade` transition, `None` for a hard cut.
    pub fn xfade_name(&self) -> Option<&'static str> {
        match self {
            TransitionKind::None => None,
            TransitionKind::Fade | TransitionKind::Crossfade => Some("fade"),
            TransitionKind::Dissolve => Some("dissolve"),
            TransitionKind::WipeLeft => Some("wipeleft"),
            TransitionKind::WipeRight => Some("wiperight"),
            TransitionKind::WipeUp => Some("wipeup"),
            TransitionKind::WipeDown => Some("wipedown"),
            TransitionKind::SlideLeft => Some("slideleft"),
            TransitionKind::SlideRight => Some("slideright"),
            TransitionKind::Blur => Some("hblur"),
        }
    }
}

/// Logo overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoSettings {
    pub enabled: bool,
    pub path: Option<PathBuf>,
    /// Scaled logo width in pixels.
    pub width: u32,
    /// Opacity in `[0.0, 1.0]`.
    pub opacity: f64,
    pub position: LogoPosition,
    /// Distance from the frame edges in pixels.
    pub margin: u32,
    /// Key out a near-white background before compositing.
    pub remove_background: bool,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: None,
            width: 160,
            opacity: 1.0,
            position: LogoPosition::TopRight,
            margin: 24,
            remove_background: false,
        }
    }
}

impl LogoSettings {
    /// The logo file, when the overlay is enabled and the file exists.
    pub fn active_path(&self) -> Option<&Path> {
        if !self.enabled {
            return None;
        }
        self.path.as_deref().filter(|path| path.is_file())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogoPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

/// Output combination and retention settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Concatenate all segment clips into one file.
    pub combine: bool,
    /// File name of the combined video.
    pub combined_filename: String,
    /// Keep the scratch workspace and write a manifest instead of deleting it.
    pub keep_intermediates: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            combine: false,
            combined_filename: DEFAULT_COMBINED_FILENAME.to_string(),
            keep_intermediates: false,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            resolution: Resolution::default(),
            codec: VideoCodec::H264,
            video_bitrate_kbps: 6000,
            audio_bitrate_kbps: 192,
            hardware_acceleration: false,
            sync_mode: SyncMode::Standard,
            subtitles: SubtitleStyle::default(),
            animation: AnimationSettings::default(),
            transition: TransitionSettings::default(),
            music_dir: None,
            logo: LogoSettings::default(),
            video_preset: None,
            audio_preset: None,
            output: OutputSettings::default(),
        }
    }
}

impl RenderOptions {
    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> VibeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            VibeError::config(format!(
                "Failed to read render options {}: {e}",
                path.display()
            ))
        })?;
        let options: Self = serde_json::from_str(&content).map_err(|e| {
            VibeError::config(format!(
                "Failed to parse render options {}: {e}",
                path.display()
            ))
        })?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values the encoder cannot honour.
    pub fn validate(&self) -> VibeResult<()> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(VibeError::config("Frame rate must be greater than zero"));
        }
        let Resolution { width, height } = self.resolution;
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(VibeError::config(format!(
                "Resolution must be non-zero and even, got {width}x{height}"
            )));
        }
        if !(0.0..=1.0).contains(&self.logo.opacity) {
            return Err(VibeError::config("Logo opacity must be within [0, 1]"));
        }
        if self.transition.duration_secs < 0.0 {
            return Err(VibeError::config("Transition duration cannot be negative"));
        }
        if self.output.combined_filename.trim().is_empty() {
            return Err(VibeError::config("Combined filename cannot be empty"));
        }
        Ok(())
    }

    /// Name of the combined output file.
    pub fn combined_filename(&self) -> &str {
        self.output.combined_filename.trim()
    }
}
