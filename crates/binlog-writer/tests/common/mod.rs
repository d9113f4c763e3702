//! Test-only decoder for the record format.
//!
//! Reads records back into `BuildEvent`s so integration tests can compare
//! whole events. Messages come back as resolved text.

#![allow(dead_code, missing_docs, unused_results)]

use binlog_core::{
    BuildEvent, BuildEventContext, BuildFinishedEvent, BuildStartedEvent, CustomEvent,
    DateTimeKind, DiagnosticEvent, EventBase, EventMessage, Item, ItemEntry, ItemValue,
    MessageEvent, MessageImportance, NO_THREAD_ID, ProjectFinishedEvent, ProjectStartedEvent,
    PropertyEntry, TargetFinishedEvent, TargetStartedEvent, TaskFinishedEvent, TaskStartedEvent,
    Timestamp,
};
use binlog_writer::{FieldFlags, RecordKind};

pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.bytes.len()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    pub fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take(4).try_into().unwrap())
    }

    pub fn i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take(8).try_into().unwrap())
    }

    pub fn bool(&mut self) -> bool {
        match self.take(1)[0] {
            0 => false,
            1 => true,
            other => panic!("bad bool byte {other} at {}", self.pos - 1),
        }
    }

    pub fn seven_bit(&mut self) -> u32 {
        let mut value = 0u32;
        let mut shift = 0;
        loop {
            let byte = self.take(1)[0];
            value |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return value;
            }
            shift += 7;
        }
    }

    pub fn string(&mut self) -> String {
        let len = self.seven_bit() as usize;
        String::from_utf8(self.take(len).to_vec()).unwrap()
    }

    pub fn optional_string(&mut self) -> Option<String> {
        self.bool().then(|| self.string())
    }

    pub fn count(&mut self) -> usize {
        usize::try_from(self.i32()).unwrap()
    }

    pub fn timestamp(&mut self) -> Timestamp {
        let ticks = self.i64();
        let kind = DateTimeKind::from_i32(self.i32()).unwrap();
        Timestamp::from_ticks(ticks, kind)
    }

    pub fn context(&mut self) -> BuildEventContext {
        BuildEventContext::new(
            self.i32(),
            self.i32(),
            self.i32(),
            self.i32(),
            self.i32(),
            self.i32(),
        )
    }

    pub fn flags(&mut self) -> FieldFlags {
        FieldFlags::from_bits(u32::try_from(self.i32()).unwrap())
    }

    fn base(&mut self, flags: FieldFlags) -> EventBase {
        let mut base = EventBase::default();
        if flags.contains(FieldFlags::MESSAGE) {
            base.message = Some(EventMessage::text(self.string()));
        }
        if flags.contains(FieldFlags::BUILD_EVENT_CONTEXT) {
            base.build_event_context = Some(self.context());
        }
        base.thread_id = if flags.contains(FieldFlags::THREAD_ID) {
            self.i32()
        } else {
            NO_THREAD_ID
        };
        if flags.contains(FieldFlags::HELP_KEYWORD) {
            base.help_keyword = Some(self.string());
        }
        if flags.contains(FieldFlags::SENDER_NAME) {
            base.sender_name = Some(self.string());
        }
        if flags.contains(FieldFlags::TIMESTAMP) {
            base.timestamp = self.timestamp();
        }
        base
    }

    fn task_item(&mut self) -> Item {
        let mut item = Item::new(self.string());
        for _ in 0..self.count() {
            let name = self.string();
            let value = self.string();
            item = item.with_metadata(name, value);
        }
        item
    }

    /// Decode one record.
    pub fn record(&mut self) -> BuildEvent {
        let kind = RecordKind::from_i32(self.i32()).expect("known record kind");
        if kind == RecordKind::Message {
            return BuildEvent::Message(self.message());
        }
        let flags = self.flags();
        let base = self.base(flags);
        match kind {
            RecordKind::BuildStarted => {
                let build_environment = self.bool().then(|| {
                    (0..self.count())
                        .map(|_| (self.string(), self.string()))
                        .collect()
                });
                BuildEvent::BuildStarted(BuildStartedEvent {
                    base,
                    build_environment,
                })
            }
            RecordKind::BuildFinished => BuildEvent::BuildFinished(BuildFinishedEvent {
                base,
                succeeded: self.bool(),
            }),
            RecordKind::ProjectStarted => {
                let parent_project_context = self.bool().then(|| self.context());
                let project_file = self.optional_string();
                let project_id = self.i32();
                let target_names = Some(self.string()).filter(|s| !s.is_empty());
                let tools_version = self.optional_string();
                let properties = (0..self.count())
                    .map(|_| PropertyEntry::new(self.string(), self.string()))
                    .collect::<Vec<_>>();
                let items = (0..self.count())
                    .map(|_| {
                        let key = self.string();
                        ItemEntry::new(key, self.task_item())
                    })
                    .collect::<Vec<_>>();
                BuildEvent::ProjectStarted(ProjectStartedEvent {
                    base,
                    parent_project_context,
                    project_file,
                    project_id,
                    target_names,
                    tools_version,
                    properties: Some(properties).filter(|p| !p.is_empty()),
                    items: Some(items).filter(|i| !i.is_empty()),
                })
            }
            RecordKind::ProjectFinished => BuildEvent::ProjectFinished(ProjectFinishedEvent {
                base,
                project_file: self.optional_string(),
                succeeded: self.bool(),
            }),
            RecordKind::TargetStarted => BuildEvent::TargetStarted(TargetStartedEvent {
                base,
                target_name: self.optional_string(),
                project_file: self.optional_string(),
                target_file: self.optional_string(),
                parent_target: self.optional_string(),
            }),
            RecordKind::TargetFinished => {
                let succeeded = self.bool();
                let project_file = self.optional_string();
                let target_file = self.optional_string();
                let target_name = self.optional_string();
                let outputs = (0..self.count())
                    .map(|_| ItemValue::Item(self.task_item()))
                    .collect::<Vec<_>>();
                BuildEvent::TargetFinished(TargetFinishedEvent {
                    base,
                    succeeded,
                    project_file,
                    target_file,
                    target_name,
                    target_outputs: Some(outputs).filter(|o| !o.is_empty()),
                })
            }
            RecordKind::TaskStarted => BuildEvent::TaskStarted(TaskStartedEvent {
                base,
                task_name: self.optional_string(),
                project_file: self.optional_string(),
                task_file: self.optional_string(),
            }),
            RecordKind::TaskFinished => BuildEvent::TaskFinished(TaskFinishedEvent {
                base,
                succeeded: self.bool(),
                task_name: self.optional_string(),
                project_file: self.optional_string(),
                task_file: self.optional_string(),
            }),
            RecordKind::Error => BuildEvent::Error(self.diagnostic(base)),
            RecordKind::Warning => BuildEvent::Warning(self.diagnostic(base)),
            RecordKind::CustomEvent => BuildEvent::Custom(CustomEvent { base }),
            RecordKind::EndOfFile | RecordKind::Message => {
                panic!("unexpected record kind {kind}")
            }
        }
    }

    fn diagnostic(&mut self, base: EventBase) -> DiagnosticEvent {
        DiagnosticEvent {
            base,
            subcategory: self.optional_string(),
            code: self.optional_string(),
            file: self.optional_string(),
            project_file: self.optional_string(),
            line_number: self.i32(),
            column_number: self.i32(),
            end_line_number: self.i32(),
            end_column_number: self.i32(),
        }
    }

    fn message(&mut self) -> MessageEvent {
        let importance = MessageImportance::from_i32(self.i32()).expect("known importance");
        let flags = self.flags();
        let base = self.base(flags);
        let mut gated_string = |flag| flags.contains(flag).then(|| self.string());
        let subcategory = gated_string(FieldFlags::SUBCATEGORY);
        let code = gated_string(FieldFlags::CODE);
        let file = gated_string(FieldFlags::FILE);
        let project_file = gated_string(FieldFlags::PROJECT_FILE);
        let mut gated_int = |flag| if flags.contains(flag) { self.i32() } else { 0 };
        MessageEvent {
            base,
            importance,
            subcategory,
            code,
            file,
            project_file,
            line_number: gated_int(FieldFlags::LINE_NUMBER),
            column_number: gated_int(FieldFlags::COLUMN_NUMBER),
            end_line_number: gated_int(FieldFlags::END_LINE_NUMBER),
            end_column_number: gated_int(FieldFlags::END_COLUMN_NUMBER),
        }
    }
}

/// Decode every record in `bytes`.
pub fn decode_all(bytes: &[u8]) -> Vec<BuildEvent> {
    let mut reader = Reader::new(bytes);
    let mut events = Vec::new();
    while !reader.is_empty() {
        events.push(reader.record());
    }
    events
}

/// Builds expected byte strings field by field.
#[derive(Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn i32(mut self, v: i32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(mut self, v: i64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bool(mut self, v: bool) -> Self {
        self.0.push(u8::from(v));
        self
    }

    pub fn str(mut self, s: &str) -> Self {
        assert!(s.len() < 0x80, "helper only handles one-byte lengths");
        self.0.push(u8::try_from(s.len()).unwrap());
        self.0.extend_from_slice(s.as_bytes());
        self
    }

    pub fn flags(self, flags: FieldFlags) -> Self {
        self.i32(flags.to_wire())
    }
}
