//! # binlog-core
//!
//! Object model and shared utilities for the binary build-event log.
//!
//! - **Events**: [`BuildEvent`] closed union of the twelve loggable kinds plus
//!   an explicit `Unrecognized` arm, each carrying an [`EventBase`]
//! - **Context and time**: [`BuildEventContext`], tick-based [`Timestamp`]
//! - **Collections**: [`Item`] with ordered metadata, [`ItemEntry`],
//!   [`PropertyBag`] of loosely typed entries
//! - **Messages**: [`EventMessage`] with deferred arguments, [`Culture`] and
//!   the composite [`format_string`] routine
//! - **Logging**: `tracing` subscriber setup and log capture for tests

#![deny(unsafe_code)]

pub mod context;
pub mod events;
pub mod items;
pub mod logging;
pub mod message;
pub mod timestamp;

pub use context::BuildEventContext;
pub use events::{
    BuildEvent, BuildFinishedEvent, BuildStartedEvent, CustomEvent, DiagnosticEvent, EventBase,
    MessageEvent, MessageImportance, NO_THREAD_ID, ProjectFinishedEvent, ProjectStartedEvent,
    TargetFinishedEvent, TargetStartedEvent, TaskFinishedEvent, TaskStartedEvent,
    UnrecognizedEvent,
};
pub use items::{Item, ItemEntry, ItemValue, PropertyBag, PropertyEntry, TaskItem};
pub use message::{
    Culture, DeferredMessage, EventMessage, FormatArg, FormatError, FormatFn, format_string,
};
pub use timestamp::{DateTimeKind, Timestamp, TimestampOutOfRange};
