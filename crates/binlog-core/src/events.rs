//! The build event object model.
//!
//! [`BuildEvent`] is a closed union of the twelve event kinds the log can
//! record, plus an explicit [`BuildEvent::Unrecognized`] arm for anything a
//! producer raises that the log has no record kind for. Every variant carries
//! an [`EventBase`] with the common, independently optional fields.
//!
//! Optionality follows the producer's conventions: strings and contexts are
//! `Option`s, while the thread id and timestamp use sentinel values
//! ([`NO_THREAD_ID`] and the zero [`Timestamp`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::BuildEventContext;
use crate::items::{ItemEntry, ItemValue, PropertyBag};
use crate::message::EventMessage;
use crate::timestamp::Timestamp;

/// Thread id sentinel meaning "not recorded".
pub const NO_THREAD_ID: i32 = -1;

/// Fields shared by every build event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventBase {
    /// Message text, possibly with deferred arguments.
    pub message: Option<EventMessage>,
    /// Where in the build the event originated.
    pub build_event_context: Option<BuildEventContext>,
    /// Raising thread, or [`NO_THREAD_ID`].
    pub thread_id: i32,
    /// Help keyword.
    pub help_keyword: Option<String>,
    /// Name of the component that raised the event.
    pub sender_name: Option<String>,
    /// When the event was raised; the zero instant means unset.
    pub timestamp: Timestamp,
}

impl Default for EventBase {
    fn default() -> Self {
        Self {
            message: None,
            build_event_context: None,
            thread_id: NO_THREAD_ID,
            help_keyword: None,
            sender_name: None,
            timestamp: Timestamp::default(),
        }
    }
}

impl EventBase {
    /// A base with only a message set.
    #[must_use]
    pub fn with_message(message: impl Into<EventMessage>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Whether a thread id was recorded.
    #[must_use]
    pub fn has_thread_id(&self) -> bool {
        self.thread_id != NO_THREAD_ID
    }
}

/// How prominently a message should be shown.
///
/// The numeric values are written to the log and must not change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum MessageImportance {
    /// Always shown.
    High = 0,
    /// Shown at normal verbosity.
    #[default]
    Normal = 1,
    /// Shown only at detailed verbosity.
    Low = 2,
}

impl MessageImportance {
    /// Wire value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Parse a wire value.
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::High),
            1 => Some(Self::Normal),
            2 => Some(Self::Low),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variant payloads
// ─────────────────────────────────────────────────────────────────────────────

/// The build began.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildStartedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Environment variables at build start, in order.
    pub build_environment: Option<Vec<(String, String)>>,
}

/// The build ended.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildFinishedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Overall result.
    pub succeeded: bool,
}

/// A project began building.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStartedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Context of the project that requested this one.
    pub parent_project_context: Option<BuildEventContext>,
    /// Project file path.
    pub project_file: Option<String>,
    /// Project id.
    pub project_id: i32,
    /// Requested targets, `;`-separated.
    pub target_names: Option<String>,
    /// Tools version.
    pub tools_version: Option<String>,
    /// Global and project properties.
    pub properties: Option<PropertyBag>,
    /// Evaluated items keyed by item type.
    pub items: Option<Vec<ItemEntry>>,
}

/// A project finished building.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectFinishedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Project file path.
    pub project_file: Option<String>,
    /// Project result.
    pub succeeded: bool,
}

/// A target began executing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetStartedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Target name.
    pub target_name: Option<String>,
    /// Project file path.
    pub project_file: Option<String>,
    /// File the target is defined in.
    pub target_file: Option<String>,
    /// Target that caused this one to run.
    pub parent_target: Option<String>,
}

/// A target finished executing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetFinishedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Target result.
    pub succeeded: bool,
    /// Project file path.
    pub project_file: Option<String>,
    /// File the target is defined in.
    pub target_file: Option<String>,
    /// Target name.
    pub target_name: Option<String>,
    /// Items the target returned.
    pub target_outputs: Option<Vec<ItemValue>>,
}

/// A task began executing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskStartedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Task name.
    pub task_name: Option<String>,
    /// Project file path.
    pub project_file: Option<String>,
    /// File the task is invoked from.
    pub task_file: Option<String>,
}

/// A task finished executing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFinishedEvent {
    /// Common fields.
    pub base: EventBase,
    /// Task result.
    pub succeeded: bool,
    /// Task name.
    pub task_name: Option<String>,
    /// Project file path.
    pub project_file: Option<String>,
    /// File the task is invoked from.
    pub task_file: Option<String>,
}

/// An error or warning with a source location.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticEvent {
    /// Common fields.
    pub base: EventBase,
    /// Subcategory (e.g. the tool that reported it).
    pub subcategory: Option<String>,
    /// Diagnostic code.
    pub code: Option<String>,
    /// Source file.
    pub file: Option<String>,
    /// Project file path.
    pub project_file: Option<String>,
    /// Start line, `0` if unknown.
    pub line_number: i32,
    /// Start column, `0` if unknown.
    pub column_number: i32,
    /// End line, `0` if unknown.
    pub end_line_number: i32,
    /// End column, `0` if unknown.
    pub end_column_number: i32,
}

/// An informational message, optionally with a source location.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageEvent {
    /// Common fields.
    pub base: EventBase,
    /// Importance.
    pub importance: MessageImportance,
    /// Subcategory.
    pub subcategory: Option<String>,
    /// Message code.
    pub code: Option<String>,
    /// Source file.
    pub file: Option<String>,
    /// Project file path.
    pub project_file: Option<String>,
    /// Start line, `0` if unknown.
    pub line_number: i32,
    /// Start column, `0` if unknown.
    pub column_number: i32,
    /// End line, `0` if unknown.
    pub end_line_number: i32,
    /// End column, `0` if unknown.
    pub end_column_number: i32,
}

/// A producer-defined event; only the common fields are recorded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomEvent {
    /// Common fields.
    pub base: EventBase,
}

/// An event kind the log has no record for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnrecognizedEvent {
    /// Producer's name for the event type.
    pub type_name: String,
    /// Common fields.
    pub base: EventBase,
}

// ─────────────────────────────────────────────────────────────────────────────
// BuildEvent
// ─────────────────────────────────────────────────────────────────────────────

/// One build lifecycle event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BuildEvent {
    /// Build started.
    BuildStarted(BuildStartedEvent),
    /// Build finished.
    BuildFinished(BuildFinishedEvent),
    /// Project started.
    ProjectStarted(ProjectStartedEvent),
    /// Project finished.
    ProjectFinished(ProjectFinishedEvent),
    /// Target started.
    TargetStarted(TargetStartedEvent),
    /// Target finished.
    TargetFinished(TargetFinishedEvent),
    /// Task started.
    TaskStarted(TaskStartedEvent),
    /// Task finished.
    TaskFinished(TaskFinishedEvent),
    /// Build error.
    Error(DiagnosticEvent),
    /// Build warning.
    Warning(DiagnosticEvent),
    /// Informational message.
    Message(MessageEvent),
    /// Producer-defined event.
    Custom(CustomEvent),
    /// Anything else.
    Unrecognized(UnrecognizedEvent),
}

impl BuildEvent {
    /// Common fields of any variant.
    #[must_use]
    pub fn base(&self) -> &EventBase {
        match self {
            Self::BuildStarted(e) => &e.base,
            Self::BuildFinished(e) => &e.base,
            Self::ProjectStarted(e) => &e.base,
            Self::ProjectFinished(e) => &e.base,
            Self::TargetStarted(e) => &e.base,
            Self::TargetFinished(e) => &e.base,
            Self::TaskStarted(e) => &e.base,
            Self::TaskFinished(e) => &e.base,
            Self::Error(e) | Self::Warning(e) => &e.base,
            Self::Message(e) => &e.base,
            Self::Custom(e) => &e.base,
            Self::Unrecognized(e) => &e.base,
        }
    }

    /// Short type name, for logs.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::BuildStarted(_) => "BuildStarted",
            Self::BuildFinished(_) => "BuildFinished",
            Self::ProjectStarted(_) => "ProjectStarted",
            Self::ProjectFinished(_) => "ProjectFinished",
            Self::TargetStarted(_) => "TargetStarted",
            Self::TargetFinished(_) => "TargetFinished",
            Self::TaskStarted(_) => "TaskStarted",
            Self::TaskFinished(_) => "TaskFinished",
            Self::Error(_) => "Error",
            Self::Warning(_) => "Warning",
            Self::Message(_) => "Message",
            Self::Custom(_) => "Custom",
            Self::Unrecognized(e) => &e.type_name,
        }
    }

    /// Whether this is the [`Unrecognized`](Self::Unrecognized) arm.
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

impl fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

macro_rules! impl_from_payload {
    ($($payload:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for BuildEvent {
                fn from(e: $payload) -> Self {
                    Self::$variant(e)
                }
            }
        )*
    };
}

impl_from_payload! {
    BuildStartedEvent => BuildStarted,
    BuildFinishedEvent => BuildFinished,
    ProjectStartedEvent => ProjectStarted,
    ProjectFinishedEvent => ProjectFinished,
    TargetStartedEvent => TargetStarted,
    TargetFinishedEvent => TargetFinished,
    TaskStartedEvent => TaskStarted,
    TaskFinishedEvent => TaskFinished,
    MessageEvent => Message,
    CustomEvent => Custom,
    UnrecognizedEvent => Unrecognized,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
