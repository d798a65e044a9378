//! SRT caption format.
//!
//! A track is a sequence of blank-line separated blocks:
//!
//! ```text
//! 1
//! 00:00:01,000 --> 00:00:03,500
//! First line
//! Second line
//! ```
//!
//! The index line is optional on input. Blocks without a valid timing line
//! are skipped rather than failing the whole track.

use std::path::Path;

use vibe_common::error::{VibeError, VibeResult};
use vibe_common::timecode::{seconds_to_timestamp, timestamp_to_seconds};

use crate::timeline::{Cue, Timeline};

const ARROW: &str = "-->";

/// Parse SRT text into a timeline.
pub fn parse(text: &str) -> Timeline {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            if !block.is_empty() {
                push_block(&block, &mut cues);
                block.clear();
            }
        } else {
            block.push(line);
        }
    }
    if !block.is_empty() {
        push_block(&block, &mut cues);
    }

    Timeline::from_cues(cues)
}

fn push_block(block: &[&str], cues: &mut Vec<Cue>) {
    match parse_block(block) {
        Ok(cue) => cues.push(cue),
        Err(err) => {
            tracing::debug!(
                first_line = block.first().copied().unwrap_or(""),
                "Skipping caption block: {err}"
            );
        }
    }
}

fn parse_block(block: &[&str]) -> VibeResult<Cue> {
    let mut lines = block.iter().copied();
    let mut timing = lines.next().unwrap_or("");

    if !timing.contains(ARROW) && timing.trim().bytes().all(|b| b.is_ascii_digit()) {
        timing = lines.next().unwrap_or("");
    }

    let (start, end) = parse_timing(timing)?;
    if end <= start {
        return Err(VibeError::format(format!(
            "Cue does not end after it starts: '{timing}'"
        )));
    }

    Ok(Cue::new(start, end, lines.map(str::to_string).collect()))
}

fn parse_timing(line: &str) -> VibeResult<(f64, f64)> {
    let (start, rest) = line
        .split_once(ARROW)
        .ok_or_else(|| VibeError::format(format!("Missing timing line, got '{line}'")))?;
    // Anything after the end timestamp is a cue setting.
    let end = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| VibeError::format(format!("Missing end timestamp in '{line}'")))?;
    Ok((timestamp_to_seconds(start)?, timestamp_to_seconds(end)?))
}

/// Serialize a timeline to SRT text, numbering cues from 1.
pub fn serialize(timeline: &Timeline) -> String {
    timeline
        .cues()
        .iter()
        .enumerate()
        .map(|(i, cue)| {
            format!(
                "{}\n{} --> {}\n{}\n",
                i + 1,
                seconds_to_timestamp(cue.start),
                seconds_to_timestamp(cue.end),
                cue.text(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read and parse an SRT file.
pub fn read_timeline(path: &Path) -> VibeResult<Timeline> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse(&text))
}

/// Serialize a timeline and write it to `path`.
pub fn write_timeline(path: &Path, timeline: &Timeline) -> VibeResult<()> {
    std::fs::write(path, serialize(timeline))?;
    tracing::debug!(path = %path.display(), cues = timeline.len(), "Wrote caption track");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "1\n00:00:00,000 --> 00:00:03,000\nHello\n\n2\n00:00:04,000 --> 00:00:06,500\nTwo\nlines\n";

    #[test]
    fn test_parse_basic_track() {
        let timeline = parse(SAMPLE);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.cues()[0].lines, vec!["Hello"]);
        assert_eq!(timeline.cues()[1].start, 4.0);
        assert_eq!(timeline.cues()[1].end, 6.5);
        assert_eq!(timeline.cues()[1].text(), "Two\nlines");
    }

    #[test]
    fn test_parse_tolerates_bom_crlf_and_missing_index() {
        let text = "\u{feff}00:00:01,000 --> 00:00:02,000\r\nNo index\r\n\r\n\r\n7\r\n00:00:03,000 --> 00:00:04,000 align:start\r\nSettings\r\n";
        let timeline = parse(text);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.cues()[0].lines, vec!["No index"]);
        assert_eq!(timeline.cues()[1].start, 3.0);
        assert_eq!(timeline.cues()[1].lines, vec!["Settings"]);
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let text = "1\nnot a timing line\nText\n\n2\n00:00:05,000 --> 00:00:04,000\nBackwards\n\n3\n00:00:07,000 --> 00:00:08,000\nKept\n";
        let timeline = parse(text);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.cues()[0].lines, vec!["Kept"]);
    }

    #[test]
    fn test_zero_length_and_out_of_range_blocks_are_skipped() {
        let text = "1\n00:00:02,000 --> 00:00:02,000\nInstant\n\n\
                    2\n9999999999999999:00:00,000 --> 9999999999999999:00:01,000\nHuge\n\n\
                    3\n00:00:03,000 --> 00:00:04,000\nKept\n";
        let timeline = parse(text);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.cues()[0].lines, vec!["Kept"]);
    }

    #[test]
    fn test_empty_text_is_allowed() {
        let timeline = parse("1\n00:00:01,000 --> 00:00:02,000\n");
        assert_eq!(timeline.len(), 1);
        assert!(timeline.cues()[0].lines.is_empty());
    }

    #[test]
    fn test_serialize_numbers_from_one() {
        let timeline = Timeline::from_cues(vec![
            Cue::new(4.0, 5.0, vec!["b".into()]),
            Cue::new(0.0, 1.25, vec!["a".into()]),
        ]);
        assert_eq!(
            serialize(&timeline),
            "1\n00:00:00,000 --> 00:00:01,250\na\n\n2\n00:00:04,000 --> 00:00:05,000\nb\n"
        );
    }

    #[test]
    fn test_serialize_empty_timeline() {
        assert_eq!(serialize(&Timeline::new()), "");
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("track.srt");
        write_timeline(&path, &parse(SAMPLE)).unwrap();
        assert_eq!(read_timeline(&path).unwrap(), parse(SAMPLE));
    }

    fn arb_timeline() -> impl Strategy<Value = Timeline> {
        let cue_shape = (
            0u64..5_000,
            1u64..5_000,
            prop::collection::vec("[A-Za-z][A-Za-z0-9 ,.!?']{0,24}", 0..3),
        );
        prop::collection::vec(cue_shape, 0..12).prop_map(|shapes| {
            let mut cursor = 0u64;
            let cues = shapes
                .into_iter()
                .map(|(gap, len, lines)| {
                    let start = cursor + gap;
                    let end = start + len;
                    cursor = end;
                    Cue::new(start as f64 / 1000.0, end as f64 / 1000.0, lines)
                })
                .collect();
            Timeline::from_cues(cues)
        })
    }

    proptest! {
        #[test]
        fn prop_serialize_then_parse_is_identity(timeline in arb_timeline()) {
            prop_assert_eq!(parse(&serialize(&timeline)), timeline);
        }
    }
}
