//! # binlog-writer
//!
//! Single-pass binary encoder for structured build events.
//!
//! Each [`BuildEvent`](binlog_core::BuildEvent) becomes one record:
//! `[i32 kind][i32 flags]{base fields}{variant fields}`, with message records
//! carrying their importance before the flags. Nothing is buffered; every
//! record goes straight to the sink.
//!
//! - [`EventWriter`]: dispatches on the event variant and drives the record
//! - [`FieldFlags`]: optional-field presence mask with stable bit positions
//! - [`MessageResolver`]: interpolates deferred messages at write time
//! - [`BinaryWriter`]: scalar and collection encodings
//! - [`RecordKind`]: record tags
//!
//! ```ignore
//! binlog_writer::init();
//! let mut writer = EventWriter::from_global_settings(std::fs::File::create("build.binlog")?);
//! writer.write(&event)?;
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod flags;
pub mod primitive;
pub mod record_kind;
pub mod resolver;
pub mod structured;
pub mod writer;

pub use errors::{Result, WriteError};
pub use flags::{FieldFlags, base_flags, message_flags};
pub use primitive::BinaryWriter;
pub use record_kind::{ALL_RECORD_KINDS, RecordKind};
pub use resolver::MessageResolver;
pub use writer::{EventWriter, WriteOutcome, WriteSummary};

/// Load the global settings and apply them to the process.
///
/// Installs the tracing subscriber and seeds the current culture; see
/// [`binlog_settings::apply_settings`].
pub fn init() -> &'static binlog_settings::WriterSettings {
    let settings = binlog_settings::get_settings();
    binlog_settings::apply_settings(settings);
    settings
}
