//! Optional-field presence bitmask.
//!
//! Every record carries an `i32` mask right after its tag (after the
//! importance for messages). A set bit means the corresponding optional field
//! follows; the decoder reads exactly the fields whose bits are set, so the
//! mask must match what is written.
//!
//! Bit positions are part of the wire contract. They are declared once, in
//! the `field_flags!` invocation below, which also generates the names used
//! by [`FieldFlags::names`] and the `Debug` output.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use binlog_core::{EventBase, MessageEvent};

/// Declares each presence flag with its bit position, plus the `NAMED`
/// table listing them lowest bit first.
macro_rules! field_flags {
    ($( $(#[doc = $doc:literal])* $name:ident = $bit:literal ),* $(,)?) => {
        impl FieldFlags {
            $(
                $(#[doc = $doc])*
                #[doc = concat!("\n\nBit ", stringify!($bit), ".")]
                pub const $name: Self = Self(1 << $bit);
            )*

            const NAMED: [(Self, &'static str); [$($bit),*].len()] =
                [$((Self::$name, stringify!($name))),*];
        }
    };
}

/// Fixed-width set of optional-field presence bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldFlags(u32);

field_flags! {
    /// Build event context present.
    BUILD_EVENT_CONTEXT = 0,
    /// Help keyword present.
    HELP_KEYWORD = 1,
    /// Message present.
    MESSAGE = 2,
    /// Sender name present.
    SENDER_NAME = 3,
    /// Thread id recorded.
    THREAD_ID = 4,
    /// Timestamp set.
    TIMESTAMP = 5,
    /// Message subcategory present.
    SUBCATEGORY = 6,
    /// Message code present.
    CODE = 7,
    /// Message file present.
    FILE = 8,
    /// Message project file present.
    PROJECT_FILE = 9,
    /// Message line number non-zero.
    LINE_NUMBER = 10,
    /// Message column number non-zero.
    COLUMN_NUMBER = 11,
    /// Message end line number non-zero.
    END_LINE_NUMBER = 12,
    /// Message end column number non-zero.
    END_COLUMN_NUMBER = 13,
}

impl FieldFlags {
    /// No optional fields.
    pub const NONE: Self = Self(0);
    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Wrap raw bits (as read back from a stream).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The mask as written to the wire.
    #[must_use]
    pub fn to_wire(self) -> i32 {
        i32::from_ne_bytes(self.0.to_ne_bytes())
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether no bit is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Set `other` if `condition` holds.
    pub fn set_if(&mut self, other: Self, condition: bool) {
        if condition {
            self.insert(other);
        }
    }

    /// Names of the set bits, lowest first.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for FieldFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FieldFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("FieldFlags(NONE)");
        }
        f.write_str("FieldFlags(")?;
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }
        f.write_str(")")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Flag computation
// ─────────────────────────────────────────────────────────────────────────────

/// Presence flags for the common base fields.
#[must_use]
pub fn base_flags(base: &EventBase) -> FieldFlags {
    let mut flags = FieldFlags::NONE;
    flags.set_if(FieldFlags::BUILD_EVENT_CONTEXT, base.build_event_context.is_some());
    flags.set_if(FieldFlags::HELP_KEYWORD, base.help_keyword.is_some());
    flags.set_if(FieldFlags::MESSAGE, base.message.is_some());
    flags.set_if(FieldFlags::SENDER_NAME, base.sender_name.is_some());
    flags.set_if(FieldFlags::THREAD_ID, base.has_thread_id());
    flags.set_if(FieldFlags::TIMESTAMP, base.timestamp.is_set());
    flags
}

/// Presence flags for a message record: base flags plus location fields.
#[must_use]
pub fn message_flags(e: &MessageEvent) -> FieldFlags {
    let mut flags = base_flags(&e.base);
    flags.set_if(FieldFlags::SUBCATEGORY, e.subcategory.is_some());
    flags.set_if(FieldFlags::CODE, e.code.is_some());
    flags.set_if(FieldFlags::FILE, e.file.is_some());
    flags.set_if(FieldFlags::PROJECT_FILE, e.project_file.is_some());
    flags.set_if(FieldFlags::LINE_NUMBER, e.line_number != 0);
    flags.set_if(FieldFlags::COLUMN_NUMBER, e.column_number != 0);
    flags.set_if(FieldFlags::END_LINE_NUMBER, e.end_line_number != 0);
    flags.set_if(FieldFlags::END_COLUMN_NUMBER, e.end_column_number != 0);
    flags
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
