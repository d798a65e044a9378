//! Cues and timelines.

use serde::{Deserialize, Serialize};
use vibe_common::timecode::TimeSpan;

/// A single timed caption entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Caption text, one entry per line. May be empty.
    pub lines: Vec<String>,
}

impl Cue {
    pub fn new(start: f64, end: f64, lines: Vec<String>) -> Self {
        Self { start, end, lines }
    }

    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.start, self.end)
    }

    /// Caption text with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn with_span(&self, span: TimeSpan) -> Self {
        Self {
            start: span.start,
            end: span.end,
            lines: self.lines.clone(),
        }
    }
}

/// Cues sharing one time base, sorted ascending by start.
///
/// Overlapping cues are allowed; nothing here merges them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    cues: Vec<Cue>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline, sorting the cues by start. The sort is stable.
    pub fn from_cues(mut cues: Vec<Cue>) -> Self {
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self { cues }
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn into_cues(self) -> Vec<Cue> {
        self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End of the last-ending cue, or 0 for an empty timeline.
    pub fn end(&self) -> f64 {
        self.cues.iter().map(|c| c.end).fold(0.0, f64::max)
    }

    /// Shift every cue by `delta` seconds. Order is preserved.
    pub fn offset(&self, delta: f64) -> Self {
        Self {
            cues: self
                .cues
                .iter()
                .map(|cue| cue.with_span(cue.span().offset(delta)))
                .collect(),
        }
    }

    /// Concatenate timelines and re-sort by start.
    pub fn merge<I>(timelines: I) -> Self
    where
        I: IntoIterator<Item = Timeline>,
    {
        let cues = timelines
            .into_iter()
            .flat_map(|timeline| timeline.cues)
            .collect();
        Self::from_cues(cues)
    }

    /// Keep the cues overlapping `[window_start, window_end)`, clipped to the
    /// window and re-based so the window starts at 0.
    ///
    /// Returns an empty timeline when nothing overlaps.
    pub fn slice(&self, window_start: f64, window_end: f64) -> Self {
        let window = TimeSpan::new(window_start, window_end);
        let cues = self
            .cues
            .iter()
            .filter_map(|cue| {
                let clipped = cue.span().clip_to(&window)?;
                Some(cue.with_span(clipped.rebase(window_start)))
            })
            .collect();
        Self { cues }
    }
}
