//! Record dispatch.
//!
//! [`EventWriter::write`] matches the event variant, emits its record tag and
//! presence mask, then the common base fields and the variant's own fields in
//! a fixed order. Each record is written in a single pass straight to the
//! sink; a fault mid-record leaves the partial bytes in place.

use std::io::Write;

use binlog_core::{
    BuildEvent, BuildStartedEvent, DiagnosticEvent, EventBase, MessageEvent, ProjectStartedEvent,
    TargetFinishedEvent,
};
use binlog_settings::WriterSettings;
use tracing::{debug, trace};

use crate::errors::Result;
use crate::flags::{FieldFlags, base_flags, message_flags};
use crate::primitive::BinaryWriter;
use crate::record_kind::RecordKind;
use crate::resolver::MessageResolver;

/// What [`EventWriter::write`] did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A record was written.
    Written {
        /// Record tag.
        kind: RecordKind,
        /// Bytes the record occupies.
        bytes: u64,
    },
    /// The event has no record kind; nothing was written.
    Skipped,
}

/// Totals from [`EventWriter::write_all`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Records written.
    pub written: usize,
    /// Events skipped.
    pub skipped: usize,
}

/// Serializes build events to a byte sink.
#[derive(Debug)]
pub struct EventWriter<W> {
    out: BinaryWriter<W>,
    resolver: MessageResolver,
}

impl<W: Write> EventWriter<W> {
    /// Writer using the process-wide current culture.
    pub fn new(sink: W) -> Self {
        Self::with_resolver(sink, MessageResolver::default())
    }

    /// Writer with an explicit message resolver.
    pub fn with_resolver(sink: W, resolver: MessageResolver) -> Self {
        Self {
            out: BinaryWriter::new(sink),
            resolver,
        }
    }

    /// Writer configured from settings.
    pub fn from_settings(sink: W, settings: &WriterSettings) -> Self {
        Self::with_resolver(sink, MessageResolver::from_settings(settings))
    }

    /// Writer configured from the global settings.
    ///
    /// Call [`crate::init`] first so an unpinned writer sees the configured
    /// culture.
    pub fn from_global_settings(sink: W) -> Self {
        Self::from_settings(sink, binlog_settings::get_settings())
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.out.position()
    }

    /// Borrow the sink.
    pub fn get_ref(&self) -> &W {
        self.out.get_ref()
    }

    /// Mutably borrow the sink.
    pub fn get_mut(&mut self) -> &mut W {
        self.out.get_mut()
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()
    }

    /// Write every event in order, stopping at the first fault.
    pub fn write_all<'a, I>(&mut self, events: I) -> Result<WriteSummary>
    where
        I: IntoIterator<Item = &'a BuildEvent>,
    {
        let mut summary = WriteSummary::default();
        for event in events {
            match self.write(event)? {
                WriteOutcome::Written { .. } => summary.written += 1,
                WriteOutcome::Skipped => summary.skipped += 1,
            }
        }
        Ok(summary)
    }

    /// Write one event as a record.
    pub fn write(&mut self, event: &BuildEvent) -> Result<WriteOutcome> {
        let start = self.out.position();
        let (kind, flags) = match event {
            BuildEvent::BuildStarted(e) => (RecordKind::BuildStarted, self.build_started(e)?),
            BuildEvent::BuildFinished(e) => {
                let flags = self.head(RecordKind::BuildFinished, &e.base)?;
                self.out.write_bool(e.succeeded)?;
                (RecordKind::BuildFinished, flags)
            }
            BuildEvent::ProjectStarted(e) => {
                (RecordKind::ProjectStarted, self.project_started(e)?)
            }
            BuildEvent::ProjectFinished(e) => {
                let flags = self.head(RecordKind::ProjectFinished, &e.base)?;
                self.out.write_optional_string(e.project_file.as_deref())?;
                self.out.write_bool(e.succeeded)?;
                (RecordKind::ProjectFinished, flags)
            }
            BuildEvent::TargetStarted(e) => {
                let flags = self.head(RecordKind::TargetStarted, &e.base)?;
                self.out.write_optional_string(e.target_name.as_deref())?;
                self.out.write_optional_string(e.project_file.as_deref())?;
                self.out.write_optional_string(e.target_file.as_deref())?;
                self.out.write_optional_string(e.parent_target.as_deref())?;
                (RecordKind::TargetStarted, flags)
            }
            BuildEvent::TargetFinished(e) => {
                (RecordKind::TargetFinished, self.target_finished(e)?)
            }
            BuildEvent::TaskStarted(e) => {
                let flags = self.head(RecordKind::TaskStarted, &e.base)?;
                self.out.write_optional_string(e.task_name.as_deref())?;
                self.out.write_optional_string(e.project_file.as_deref())?;
                self.out.write_optional_string(e.task_file.as_deref())?;
                (RecordKind::TaskStarted, flags)
            }
            BuildEvent::TaskFinished(e) => {
                let flags = self.head(RecordKind::TaskFinished, &e.base)?;
                self.out.write_bool(e.succeeded)?;
                self.out.write_optional_string(e.task_name.as_deref())?;
                self.out.write_optional_string(e.project_file.as_deref())?;
                self.out.write_optional_string(e.task_file.as_deref())?;
                (RecordKind::TaskFinished, flags)
            }
            BuildEvent::Error(e) => (RecordKind::Error, self.diagnostic(RecordKind::Error, e)?),
            BuildEvent::Warning(e) => {
                (RecordKind::Warning, self.diagnostic(RecordKind::Warning, e)?)
            }
            BuildEvent::Message(e) => (RecordKind::Message, self.message(e)?),
            BuildEvent::Custom(e) => {
                let flags = self.head(RecordKind::CustomEvent, &e.base)?;
                (RecordKind::CustomEvent, flags)
            }
            BuildEvent::Unrecognized(e) => {
                debug!(event_type = %e.type_name, "skipping unrecognized build event");
                return Ok(WriteOutcome::Skipped);
            }
        };

        let bytes = self.out.position() - start;
        trace!(kind = %kind, flags = ?flags, bytes, "record written");
        Ok(WriteOutcome::Written { kind, bytes })
    }

    // ── Shared parts ────────────────────────────────────────────────────────

    /// Tag, presence mask and base fields.
    fn head(&mut self, kind: RecordKind, base: &EventBase) -> Result<FieldFlags> {
        let flags = base_flags(base);
        self.out.write_i32(kind.as_i32())?;
        self.out.write_i32(flags.to_wire())?;
        self.base_fields(base, flags)?;
        Ok(flags)
    }

    /// Base fields whose bits are set, in wire order.
    fn base_fields(&mut self, base: &EventBase, flags: FieldFlags) -> Result<()> {
        if flags.contains(FieldFlags::MESSAGE) {
            if let Some(message) = &base.message {
                let text = self.resolver.resolve(message);
                self.out.write_string(&text)?;
            }
        }
        if flags.contains(FieldFlags::BUILD_EVENT_CONTEXT) {
            if let Some(context) = &base.build_event_context {
                self.out.write_context(context)?;
            }
        }
        if flags.contains(FieldFlags::THREAD_ID) {
            self.out.write_i32(base.thread_id)?;
        }
        if flags.contains(FieldFlags::HELP_KEYWORD) {
            self.out.write_string_or_empty(base.help_keyword.as_deref())?;
        }
        if flags.contains(FieldFlags::SENDER_NAME) {
            self.out.write_string_or_empty(base.sender_name.as_deref())?;
        }
        if flags.contains(FieldFlags::TIMESTAMP) {
            self.out.write_timestamp(&base.timestamp)?;
        }
        Ok(())
    }

    // ── Variants with more than a few fields ────────────────────────────────

    fn build_started(&mut self, e: &BuildStartedEvent) -> Result<FieldFlags> {
        let flags = self.head(RecordKind::BuildStarted, &e.base)?;
        self.out.write_key_value_pairs(e.build_environment.as_deref())?;
        Ok(flags)
    }

    fn project_started(&mut self, e: &ProjectStartedEvent) -> Result<FieldFlags> {
        let flags = self.head(RecordKind::ProjectStarted, &e.base)?;
        match &e.parent_project_context {
            Some(parent) => {
                self.out.write_bool(true)?;
                self.out.write_context(parent)?;
            }
            None => self.out.write_bool(false)?,
        }
        self.out.write_optional_string(e.project_file.as_deref())?;
        self.out.write_i32(e.project_id)?;
        self.out.write_string_or_empty(e.target_names.as_deref())?;
        self.out.write_optional_string(e.tools_version.as_deref())?;
        self.out.write_properties(e.properties.as_deref())?;
        self.out.write_items(e.items.as_deref())?;
        Ok(flags)
    }

    fn target_finished(&mut self, e: &TargetFinishedEvent) -> Result<FieldFlags> {
        let flags = self.head(RecordKind::TargetFinished, &e.base)?;
        self.out.write_bool(e.succeeded)?;
        self.out.write_optional_string(e.project_file.as_deref())?;
        self.out.write_optional_string(e.target_file.as_deref())?;
        self.out.write_optional_string(e.target_name.as_deref())?;
        self.out.write_item_values(e.target_outputs.as_deref())?;
        Ok(flags)
    }

    /// Errors and warnings share a layout; only the tag differs.
    fn diagnostic(&mut self, kind: RecordKind, e: &DiagnosticEvent) -> Result<FieldFlags> {
        let flags = self.head(kind, &e.base)?;
        self.out.write_optional_string(e.subcategory.as_deref())?;
        self.out.write_optional_string(e.code.as_deref())?;
        self.out.write_optional_string(e.file.as_deref())?;
        self.out.write_optional_string(e.project_file.as_deref())?;
        self.out.write_i32(e.line_number)?;
        self.out.write_i32(e.column_number)?;
        self.out.write_i32(e.end_line_number)?;
        self.out.write_i32(e.end_column_number)?;
        Ok(flags)
    }

    /// Importance comes before the mask, and every location field is gated.
    fn message(&mut self, e: &MessageEvent) -> Result<FieldFlags> {
        let flags = message_flags(e);
        self.out.write_i32(RecordKind::Message.as_i32())?;
        self.out.write_i32(e.importance.as_i32())?;
        self.out.write_i32(flags.to_wire())?;
        self.base_fields(&e.base, flags)?;

        let strings = [
            (FieldFlags::SUBCATEGORY, &e.subcategory),
            (FieldFlags::CODE, &e.code),
            (FieldFlags::FILE, &e.file),
            (FieldFlags::PROJECT_FILE, &e.project_file),
        ];
        for (flag, value) in strings {
            if let Some(value) = value.as_deref().filter(|_| flags.contains(flag)) {
                self.out.write_string(value)?;
            }
        }

        let numbers = [
            (FieldFlags::LINE_NUMBER, e.line_number),
            (FieldFlags::COLUMN_NUMBER, e.column_number),
            (FieldFlags::END_LINE_NUMBER, e.end_line_number),
            (FieldFlags::END_COLUMN_NUMBER, e.end_column_number),
        ];
        for (flag, value) in numbers {
            if flags.contains(flag) {
                self.out.write_i32(value)?;
            }
        }
        Ok(flags)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
