//! Typed filter graphs.
//!
//! Graphs are built as a list of [`FilterNode`]s and only turned into
//! ffmpeg's `-filter_complex` text by the [`Display`](std::fmt::Display)
//! impl. Intermediate stream names come from an explicit
//! [`LabelAllocator`], so the same inputs always produce the same graph.

use std::fmt;

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
}

impl StreamKind {
    fn specifier(&self) -> &'static str {
        match self {
            StreamKind::Video => "v",
            StreamKind::Audio => "a",
            StreamKind::Subtitle => "s",
        }
    }
}

/// Name of an intermediate stream inside a filter graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamLabel(String);

impl StreamLabel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}

/// A filter pad input: either a stream of an encoder input or a label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PadRef {
    Input { index: usize, kind: StreamKind },
    Label(StreamLabel),
}

impl PadRef {
    pub fn input(index: usize, kind: StreamKind) -> Self {
        Self::Input { index, kind }
    }

    /// Argument for `-map`.
    pub fn map_arg(&self) -> String {
        match self {
            PadRef::Input { index, kind } => format!("{index}:{}", kind.specifier()),
            PadRef::Label(label) => label.to_string(),
        }
    }
}

impl fmt::Display for PadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PadRef::Input { index, kind } => write!(f, "[{index}:{}]", kind.specifier()),
            PadRef::Label(label) => label.fmt(f),
        }
    }
}

impl From<StreamLabel> for PadRef {
    fn from(label: StreamLabel) -> Self {
        PadRef::Label(label)
    }
}

/// One filter chain: `[in...]filter,filter[out]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    pub inputs: Vec<PadRef>,
    pub filters: Vec<String>,
    pub output: StreamLabel,
}

impl FilterNode {
    pub fn new(inputs: Vec<PadRef>, filters: Vec<String>, output: StreamLabel) -> Self {
        Self {
            inputs,
            filters,
            output,
        }
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for input in &self.inputs {
            write!(f, "{input}")?;
        }
        write!(f, "{}{}", self.filters.join(","), self.output)
    }
}

/// An ordered list of filter chains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    nodes: Vec<FilterNode>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return a reference to its output.
    pub fn push(&mut self, node: FilterNode) -> PadRef {
        let output = PadRef::Label(node.output.clone());
        self.nodes.push(node);
        output
    }

    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// Hands out unique intermediate labels, one counter per family.
#[derive(Debug, Default)]
pub struct LabelAllocator {
    video: usize,
    audio: usize,
    logo: usize,
    music: usize,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_video(&mut self) -> StreamLabel {
        Self::bump(&mut self.video, "v")
    }

    pub fn next_audio(&mut self) -> StreamLabel {
        Self::bump(&mut self.audio, "a")
    }

    pub fn next_logo(&mut self) -> StreamLabel {
        Self::bump(&mut self.logo, "lg")
    }

    pub fn next_music(&mut self) -> StreamLabel {
        Self::bump(&mut self.music, "bgm")
    }

    fn bump(counter: &mut usize, prefix: &str) -> StreamLabel {
        let label = StreamLabel(format!("{prefix}{counter}"));
        *counter += 1;
        label
    }
}

/// Format a number for a filter argument without trailing zeros.
pub fn format_number(value: f64) -> String {
    let text = format!("{value:.4}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
