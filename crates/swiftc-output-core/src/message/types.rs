//! Message types for the Swift compiler's parseable output.

use serde::{Deserialize, Serialize};

/// Name given to records synthesized from free-form text lines.
pub const UNKNOWN_MESSAGE_NAME: &str = "unknown";

/// One record emitted by the compiler in parseable-output mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerMessage {
    /// Task name, e.g. `compile` or `link`.
    pub name: String,
    /// What happened to the task.
    #[serde(flatten)]
    pub kind: MessageKind,
}

impl CompilerMessage {
    /// Wrap a line of text that did not look like a frame size.
    pub fn unparsable(text: impl Into<String>) -> Self {
        Self {
            name: UNKNOWN_MESSAGE_NAME.to_string(),
            kind: MessageKind::UnparsableOutput { text: text.into() },
        }
    }
}

/// Event kinds, discriminated on the wire by the `kind` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    Began(BeganInfo),
    Skipped(SkippedInfo),
    Finished(OutputInfo),
    Signalled(OutputInfo),
    /// Synthetic; the compiler never sends this kind.
    #[serde(skip_deserializing)]
    UnparsableOutput { text: String },
}

impl MessageKind {
    /// Process id of the compiler job, when the kind carries one.
    pub const fn pid(&self) -> Option<i64> {
        match self {
            Self::Began(info) => Some(info.pid),
            Self::Finished(info) | Self::Signalled(info) => Some(info.pid),
            Self::Skipped(_) | Self::UnparsableOutput { .. } => None,
        }
    }

    /// Whether this record ends the stream for its parser.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Signalled(_))
    }

    /// Wire name of the kind.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Began(_) => "began",
            Self::Skipped(_) => "skipped",
            Self::Finished(_) => "finished",
            Self::Signalled(_) => "signalled",
            Self::UnparsableOutput { .. } => "unparsable_output",
        }
    }
}

/// An artifact produced by a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRef {
    /// Artifact type, e.g. `object` or `swiftmodule`.
    #[serde(rename = "type")]
    pub output_type: String,
    pub path: String,
}

/// Payload of a `began` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeganInfo {
    pub pid: i64,
    pub inputs: Vec<String>,
    pub outputs: Vec<OutputRef>,
    pub command_executable: String,
    pub command_arguments: Vec<String>,
}

/// Payload of a `skipped` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInfo {
    pub inputs: Vec<String>,
    pub outputs: Vec<OutputRef>,
}

/// Payload shared by `finished` and `signalled` records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    pub pid: i64,
    /// Captured diagnostics of the job, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}
