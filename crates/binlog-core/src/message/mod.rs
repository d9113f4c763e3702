//! Deferred event messages.
//!
//! An event's message is either ready text or a composite format string plus
//! captured arguments that have not been interpolated yet. Interpolation is
//! left to whoever serializes the event, using the culture that is current at
//! that moment.
//!
//! - [`EventMessage`]: the stored representation
//! - [`DeferredMessage`]: read-only accessors the writer consumes
//! - [`FormatArg`]: a captured argument
//! - [`Culture`]: number-formatting conventions
//! - [`format_string`]: the composite formatter, also usable as a [`FormatFn`]

pub mod culture;
pub mod format;

pub use culture::Culture;
pub use format::{FormatError, FormatFn, format_string};

use serde::{Deserialize, Serialize};

/// A captured message argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum FormatArg {
    /// Renders as an empty string.
    Null,
    /// Renders as `True` / `False`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Single character.
    Char(char),
    /// Text.
    Str(String),
}

impl From<&str> for FormatArg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for FormatArg {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FormatArg {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for FormatArg {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FormatArg {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u64> for FormatArg {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<f64> for FormatArg {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<char> for FormatArg {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl<T: Into<FormatArg>> From<Option<T>> for FormatArg {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Read-only view of a possibly-uninterpolated message.
pub trait DeferredMessage {
    /// The message text, or the format string if arguments are pending.
    fn raw_message(&self) -> &str;

    /// Captured arguments; empty when the message is ready text.
    fn arguments(&self) -> &[FormatArg];
}

/// An event message with optional deferred arguments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    /// Text or format string.
    pub raw: String,
    /// Arguments still to be interpolated into `raw`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<FormatArg>,
}

impl EventMessage {
    /// Ready text with nothing to interpolate.
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            arguments: Vec::new(),
        }
    }

    /// A format string with captured arguments.
    #[must_use]
    pub fn deferred(format: impl Into<String>, arguments: Vec<FormatArg>) -> Self {
        Self {
            raw: format.into(),
            arguments,
        }
    }

    /// Whether arguments are still pending.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        !self.arguments.is_empty()
    }
}

impl DeferredMessage for EventMessage {
    fn raw_message(&self) -> &str {
        &self.raw
    }

    fn arguments(&self) -> &[FormatArg] {
        &self.arguments
    }
}

impl From<&str> for EventMessage {
    fn from(s: &str) -> Self {
        Self::text(s)
    }
}

impl From<String> for EventMessage {
    fn from(s: String) -> Self {
        Self::text(s)
    }
}
