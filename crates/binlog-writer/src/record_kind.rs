//! Record kind tags.
//!
//! The tag is the first `i32` of every record. Values are shared with the
//! decoder and must never be renumbered.

use std::fmt;

/// Which event variant a record encodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RecordKind {
    /// `0` marks the end of a stream. Never produced by the event writer.
    EndOfFile = 0,
    /// Build started.
    BuildStarted = 1,
    /// Build finished.
    BuildFinished = 2,
    /// Project started.
    ProjectStarted = 3,
    /// Project finished.
    ProjectFinished = 4,
    /// Target started.
    TargetStarted = 5,
    /// Target finished.
    TargetFinished = 6,
    /// Task started.
    TaskStarted = 7,
    /// Task finished.
    TaskFinished = 8,
    /// Build error.
    Error = 9,
    /// Build warning.
    Warning = 10,
    /// Message.
    Message = 11,
    /// Custom event.
    CustomEvent = 12,
}

/// Every kind, in tag order.
pub const ALL_RECORD_KINDS: [RecordKind; 13] = [
    RecordKind::EndOfFile,
    RecordKind::BuildStarted,
    RecordKind::BuildFinished,
    RecordKind::ProjectStarted,
    RecordKind::ProjectFinished,
    RecordKind::TargetStarted,
    RecordKind::TargetFinished,
    RecordKind::TaskStarted,
    RecordKind::TaskFinished,
    RecordKind::Error,
    RecordKind::Warning,
    RecordKind::Message,
    RecordKind::CustomEvent,
];

impl RecordKind {
    /// Wire tag.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Parse a wire tag.
    #[must_use]
    pub fn from_i32(tag: i32) -> Option<Self> {
        usize::try_from(tag)
            .ok()
            .and_then(|i| ALL_RECORD_KINDS.get(i))
            .copied()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
