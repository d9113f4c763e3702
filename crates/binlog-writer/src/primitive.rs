//! Fixed binary encodings for scalar values.
//!
//! | Value | Encoding |
//! |-------|----------|
//! | `i32` / `i64` | little-endian |
//! | `bool` | one byte, `1` or `0` |
//! | string | 7-bit encoded UTF-8 byte length, then the bytes |
//! | nullable string | `bool` presence, then the string if present |
//! | timestamp | `i64` ticks, then `i32` kind |
//! | build event context | six `i32` ids |
//!
//! The 7-bit length prefix stores seven bits per byte, low bits first, with
//! the high bit set on every byte except the last.

use std::io::Write;

use binlog_core::{BuildEventContext, Timestamp};

use crate::errors::{Result, WriteError};

/// Scalar encoder over an owned sink, counting bytes written.
#[derive(Debug)]
pub struct BinaryWriter<W> {
    inner: W,
    position: u64,
}

impl<W: Write> BinaryWriter<W> {
    /// Wrap a sink.
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes written through this encoder.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Borrow the sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the sink. Writing to it directly skews [`position`](Self::position).
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Little-endian `i32`.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// Little-endian `i64`.
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    /// One byte, `1` for true.
    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_bytes(&[u8::from(value)])
    }

    /// A collection length as an `i32` count prefix.
    pub fn write_count(&mut self, what: &'static str, count: usize) -> Result<()> {
        let count = i32::try_from(count).map_err(|_| WriteError::CountOverflow { what, count })?;
        self.write_i32(count)
    }

    /// 7-bit encoded unsigned length.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_7bit_encoded(&mut self, mut value: u32) -> Result<()> {
        let mut buf = [0u8; 5];
        let mut len = 0;
        while value >= 0x80 {
            buf[len] = (value & 0x7F) as u8 | 0x80;
            value >>= 7;
            len += 1;
        }
        buf[len] = value as u8;
        self.write_bytes(&buf[..=len])
    }

    /// Length-prefixed UTF-8 text.
    pub fn write_string(&mut self, text: &str) -> Result<()> {
        let len = u32::try_from(text.len()).map_err(|_| WriteError::CountOverflow {
            what: "string byte",
            count: text.len(),
        })?;
        self.write_7bit_encoded(len)?;
        self.write_bytes(text.as_bytes())
    }

    /// A plain string slot; absent text is written as the empty string.
    pub fn write_string_or_empty(&mut self, text: Option<&str>) -> Result<()> {
        self.write_string(text.unwrap_or_default())
    }

    /// Presence flag followed by the string when present.
    pub fn write_optional_string(&mut self, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) => {
                self.write_bool(true)?;
                self.write_string(text)
            }
            None => self.write_bool(false),
        }
    }

    /// Tick count then kind.
    pub fn write_timestamp(&mut self, timestamp: &Timestamp) -> Result<()> {
        self.write_i64(timestamp.ticks())?;
        self.write_i32(timestamp.kind().as_i32())
    }

    /// The six context ids in field order.
    pub fn write_context(&mut self, context: &BuildEventContext) -> Result<()> {
        for id in context.to_array() {
            self.write_i32(id)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
