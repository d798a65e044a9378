//! Media probing via ffprobe.

use std::path::Path;
use std::process::Command;

/// Duration of `path` in seconds, or `None` if ffprobe fails or prints no
/// usable number.
pub fn probe_duration(ffprobe: &Path, path: &Path) -> Option<f64> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        tracing::debug!(
            path = %path.display(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "ffprobe duration query failed"
        );
        return None;
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

/// Pixel dimensions of the first video stream of `path`.
pub fn probe_dimensions(ffprobe: &Path, path: &Path) -> Option<(u32, u32)> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height",
            "-of",
            "csv=p=0:s=x",
        ])
        .arg(path)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_dimensions(&String::from_utf8_lossy(&output.stdout))
}

/// Parse ffprobe's bare duration output. Non-positive values are rejected.
pub fn parse_duration(stdout: &str) -> Option<f64> {
    let value = stdout.lines().next()?.trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_dimensions(stdout: &str) -> Option<(u32, u32)> {
    let line = stdout.lines().next()?.trim();
    let (w, h) = line.split_once('x')?;
    let width = w.parse::<u32>().ok()?;
    let height = h.parse::<u32>().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("12.345000\n"), Some(12.345));
        assert_eq!(parse_duration("N/A\n"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0.000000"), None);
        assert_eq!(parse_duration("-1"), None);
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("640x480\n"), Some((640, 480)));
        assert_eq!(parse_dimensions("0x480"), None);
        assert_eq!(parse_dimensions("garbage"), None);
    }

    #[test]
    fn test_missing_probe_binary_is_not_a_crash() {
        let result = probe_duration(
            Path::new("/nonexistent/ffprobe"),
            Path::new("/nonexistent/audio.wav"),
        );
        assert_eq!(result, None);
    }
}
