//! Exact byte layouts for representative records.

mod common;

use std::io;

use assert_matches::assert_matches;
use binlog_core::{
    BuildEvent, BuildEventContext, Culture, DateTimeKind, EventBase, Item, ItemEntry, ItemValue,
    MessageEvent, MessageImportance, ProjectStartedEvent, PropertyEntry, TargetFinishedEvent,
    Timestamp, UnrecognizedEvent,
};
use binlog_writer::{
    EventWriter, FieldFlags, MessageResolver, RecordKind, WriteError, WriteOutcome,
};
use common::Bytes;
use serde_json::json;

fn encode(event: &BuildEvent) -> Vec<u8> {
    let mut w =
        EventWriter::with_resolver(Vec::new(), MessageResolver::pinned(Culture::invariant()));
    let _ = w.write(event).unwrap();
    w.into_inner()
}

#[test]
fn target_finished_with_two_outputs() {
    let event: BuildEvent = TargetFinishedEvent {
        succeeded: true,
        target_name: Some("Build".into()),
        target_outputs: Some(vec![
            ItemValue::Item(
                Item::new("bin/a.dll")
                    .with_metadata("TargetPath", "/out/a.dll")
                    .with_metadata("Culture", "neutral"),
            ),
            ItemValue::Item(
                Item::new("bin/b.dll")
                    .with_metadata("TargetPath", "/out/b.dll")
                    .with_metadata("Culture", "neutral"),
            ),
        ]),
        ..TargetFinishedEvent::default()
    }
    .into();

    let expected = Bytes::default()
        .i32(6)
        .flags(FieldFlags::NONE)
        .bool(true)
        .bool(false)
        .bool(false)
        .bool(true)
        .str("Build")
        .i32(2)
        .str("bin/a.dll")
        .i32(2)
        .str("TargetPath")
        .str("/out/a.dll")
        .str("Culture")
        .str("neutral")
        .str("bin/b.dll")
        .i32(2)
        .str("TargetPath")
        .str("/out/b.dll")
        .str("Culture")
        .str("neutral");
    assert_eq!(encode(&event), expected.0);
}

#[test]
fn message_layout_with_gated_fields() {
    let event: BuildEvent = MessageEvent {
        base: EventBase {
            message: Some("Restored".into()),
            build_event_context: Some(BuildEventContext::new(1, 2, 3, 4, 5, 6)),
            timestamp: Timestamp::from_ticks(42, DateTimeKind::Utc),
            ..EventBase::default()
        },
        importance: MessageImportance::Low,
        file: Some("app.csproj".into()),
        column_number: 7,
        ..MessageEvent::default()
    }
    .into();

    let flags = FieldFlags::MESSAGE
        | FieldFlags::BUILD_EVENT_CONTEXT
        | FieldFlags::TIMESTAMP
        | FieldFlags::FILE
        | FieldFlags::COLUMN_NUMBER;
    let expected = Bytes::default()
        .i32(11)
        .i32(2)
        .flags(flags)
        .str("Restored")
        .i32(1)
        .i32(2)
        .i32(3)
        .i32(4)
        .i32(5)
        .i32(6)
        .i64(42)
        .i32(1)
        .str("app.csproj")
        .i32(7);
    assert_eq!(encode(&event), expected.0);
}

#[test]
fn project_started_collections() {
    let event: BuildEvent = ProjectStartedEvent {
        project_id: 3,
        properties: Some(vec![
            PropertyEntry::new("A", "1"),
            PropertyEntry {
                key: json!("B"),
                value: json!(2),
            },
        ]),
        items: Some(vec![
            ItemEntry::new("Compile", Item::new("x.cs")),
            ItemEntry {
                key: json!("Content"),
                value: ItemValue::Opaque(json!("y.txt")),
            },
        ]),
        ..ProjectStartedEvent::default()
    }
    .into();

    let expected = Bytes::default()
        .i32(3)
        .flags(FieldFlags::NONE)
        .bool(false)
        .bool(false)
        .i32(3)
        .str("")
        .bool(false)
        .i32(2)
        .str("A")
        .str("1")
        .str("")
        .str("")
        .i32(1)
        .str("Compile")
        .str("x.cs")
        .i32(0);
    assert_eq!(encode(&event), expected.0);
}

#[test]
fn unrecognized_event_writes_nothing() {
    let mut w = EventWriter::new(Vec::new());
    let outcome = w
        .write(&BuildEvent::Unrecognized(UnrecognizedEvent {
            type_name: "ProjectImported".into(),
            base: EventBase::with_message("ignored"),
        }))
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(w.get_ref().is_empty());
    assert_eq!(w.position(), 0);
}

/// Accepts `limit` bytes, then fails every write.
struct FailingSink {
    written: Vec<u8>,
    limit: usize,
}

impl io::Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit - self.written.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "sink full"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_fault_surfaces_and_keeps_partial_output() {
    let sink = FailingSink {
        written: Vec::new(),
        limit: 6,
    };
    let mut w = EventWriter::new(sink);
    let event: BuildEvent = TargetFinishedEvent::default().into();

    assert_matches!(w.write(&event), Err(WriteError::Io(e)) if e.kind() == io::ErrorKind::StorageFull);
    let sink = w.into_inner();
    assert_eq!(sink.written.len(), 6);
    assert_eq!(&sink.written[..4], &RecordKind::TargetFinished.as_i32().to_le_bytes());
}

#[test]
fn write_all_stops_at_first_fault() {
    let sink = FailingSink {
        written: Vec::new(),
        limit: 10,
    };
    let mut w = EventWriter::new(sink);
    let events: Vec<BuildEvent> = vec![
        binlog_core::BuildFinishedEvent::default().into(),
        binlog_core::BuildFinishedEvent::default().into(),
    ];
    assert_matches!(w.write_all(&events), Err(WriteError::Io(_)));
    assert_eq!(w.position(), 9);
}
