//! Caption timecodes and time-interval arithmetic.
//!
//! All pipeline times are `f64` seconds on a segment- or batch-relative
//! time base. This module provides:
//! - Conversion between seconds and `HH:MM:SS,mmm` caption timestamps
//! - Half-open `[start, end)` spans with offset/clip/rebase operations

use serde::{Deserialize, Serialize};

use crate::error::{VibeError, VibeResult};

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Round seconds to whole milliseconds. Negative and non-finite input maps to 0.
pub fn seconds_to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Format seconds as a caption timestamp: `HH:MM:SS,mmm`.
///
/// Rounding happens on the total millisecond count before the fields are
/// split, so `999.9996` becomes `00:16:40,000` rather than `00:16:39,1000`.
pub fn seconds_to_timestamp(seconds: f64) -> String {
    let total_ms = seconds_to_millis(seconds);
    let hours = total_ms / MS_PER_HOUR;
    let minutes = (total_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let secs = (total_ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = total_ms % MS_PER_SECOND;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Parse a caption timestamp `[HH:]MM:SS,mmm` (a `.` separator is also accepted).
pub fn timestamp_to_seconds(input: &str) -> VibeResult<f64> {
    let trimmed = input.trim();
    let malformed = || VibeError::format(format!("Malformed timestamp '{trimmed}'"));

    let (clock, fraction) = trimmed.split_once([',', '.']).ok_or_else(malformed)?;
    if fraction.is_empty() || fraction.len() > 3 {
        return Err(malformed());
    }
    let fraction_value = parse_digits(fraction).ok_or_else(malformed)?;
    let millis = fraction_value * 10u64.pow(3 - fraction.len() as u32);

    let fields: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match fields.as_slice() {
        [h, m, s] => (
            parse_digits(h).ok_or_else(malformed)?,
            parse_digits(m).ok_or_else(malformed)?,
            parse_digits(s).ok_or_else(malformed)?,
        ),
        [m, s] => (
            0,
            parse_digits(m).ok_or_else(malformed)?,
            parse_digits(s).ok_or_else(malformed)?,
        ),
        _ => return Err(malformed()),
    };
    if minutes >= 60 || seconds >= 60 {
        return Err(malformed());
    }

    let total_ms = hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|ms| ms.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(|| VibeError::format(format!("Timestamp out of range '{trimmed}'")))?;
    Ok(total_ms as f64 / 1000.0)
}

fn parse_digits(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// A half-open time interval `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    /// Create a span. An `end` before `start` collapses to an empty span at `start`.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Span length in seconds.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Shift both endpoints by `delta` seconds.
    pub fn offset(&self, delta: f64) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Whether the two half-open spans share any instant.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Intersection with `window`, or `None` when they do not overlap.
    pub fn clip_to(&self, window: &TimeSpan) -> Option<TimeSpan> {
        if !self.overlaps(window) {
            return None;
        }
        Some(TimeSpan::new(
            self.start.max(window.start),
            self.end.min(window.end),
        ))
    }

    /// Re-express the span relative to `origin`.
    pub fn rebase(&self, origin: f64) -> Self {
        self.offset(-origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_timestamp_formatting() {
        assert_eq!(seconds_to_timestamp(0.0), "00:00:00,000");
        assert_eq!(seconds_to_timestamp(3661.5), "01:01:01,500");
        assert_eq!(seconds_to_timestamp(3726.045), "01:02:06,045");
    }

    #[test]
    fn test_timestamp_rounding_carries_into_seconds() {
        assert_eq!(seconds_to_timestamp(999.9996), "00:16:40,000");
        assert_eq!(seconds_to_timestamp(59.9999), "00:01:00,000");
        assert_eq!(seconds_to_timestamp(3599.9995), "01:00:00,000");
    }

    #[test]
    fn test_negative_and_nan_format_as_zero() {
        assert_eq!(seconds_to_timestamp(-4.0), "00:00:00,000");
        assert_eq!(seconds_to_timestamp(f64::NAN), "00:00:00,000");
    }

    #[test]
    fn test_timestamp_parsing() {
        assert_eq!(timestamp_to_seconds("01:02:06,045").unwrap(), 3726.045);
        assert_eq!(timestamp_to_seconds("02:06,045").unwrap(), 126.045);
        assert_eq!(timestamp_to_seconds("00:00:01.5").unwrap(), 1.5);
        assert_eq!(timestamp_to_seconds(" 00:00:04,000 ").unwrap(), 4.0);
    }

    #[test]
    fn test_malformed_timestamps_are_format_errors() {
        for bad in [
            "",
            "00:00:01",
            "aa:00:01,000",
            "00:61:01,000",
            "00:00:75,000",
            "00:00:01,0000",
            "1:2:3:4,000",
            "00:00:01,",
        ] {
            let err = timestamp_to_seconds(bad).unwrap_err();
            assert!(matches!(err, VibeError::Format { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_two_field_timestamp_rejects_large_minutes() {
        let err = timestamp_to_seconds("75:00,000").unwrap_err();
        assert!(matches!(err, VibeError::Format { .. }));
        assert_eq!(timestamp_to_seconds("59:59,999").unwrap(), 3599.999);
    }

    #[test]
    fn test_oversized_hours_are_format_errors() {
        for huge in ["9999999999999999:00:00,000", "99999999999999999999999:00:00,000"] {
            let err = timestamp_to_seconds(huge).unwrap_err();
            assert!(matches!(err, VibeError::Format { .. }), "{huge:?}");
        }
    }

    #[test]
    fn test_span_clip_and_rebase() {
        let cue = TimeSpan::new(4.0, 6.0);
        let window = TimeSpan::new(0.0, 5.0);
        assert_eq!(cue.clip_to(&window), Some(TimeSpan::new(4.0, 5.0)));

        let shifted = TimeSpan::new(12.0, 14.0).rebase(10.0);
        assert_eq!(shifted, TimeSpan::new(2.0, 4.0));
    }

    #[test]
    fn test_span_touching_edges_do_not_overlap() {
        let a = TimeSpan::new(0.0, 3.0);
        let b = TimeSpan::new(3.0, 5.0);
        assert!(!a.overlaps(&b));
        assert_eq!(a.clip_to(&b), None);
    }

    #[test]
    fn test_inverted_span_collapses() {
        let span = TimeSpan::new(5.0, 2.0);
        assert!(span.is_empty());
        assert_eq!(span.len(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_timestamp_round_trip_within_a_millisecond(secs in 0.0f64..360_000.0) {
            let parsed = timestamp_to_seconds(&seconds_to_timestamp(secs)).unwrap();
            prop_assert!((parsed - secs).abs() <= 0.0005 + 1e-9);
        }

        #[test]
        fn prop_formatter_output_is_a_fixed_point(ms in 0u64..360_000_000) {
            let text = seconds_to_timestamp(ms as f64 / 1000.0);
            let again = seconds_to_timestamp(timestamp_to_seconds(&text).unwrap());
            prop_assert_eq!(text, again);
        }
    }
}
