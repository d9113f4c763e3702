//! Tick-based timestamps.
//!
//! The log stores instants as a 64-bit count of 100-nanosecond ticks since
//! `0001-01-01T00:00:00` plus a [`DateTimeKind`] tag saying how the wall-clock
//! value should be interpreted. A zero tick count is the "not set" sentinel.
//!
//! Chrono covers a far wider range than ticks do, so conversions from chrono
//! are fallible: anything outside `0001-01-01` ..= `9999-12-31T23:59:59.9999999`
//! is a [`TimestampOutOfRange`].

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ticks per second (one tick is 100 ns).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Tick count of `1970-01-01T00:00:00`.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Tick count of `9999-12-31T23:59:59.9999999`, the last representable instant.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// A chrono value that has no tick representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{0} is outside the tick range 0001-01-01 ..= 9999-12-31")]
pub struct TimestampOutOfRange(pub NaiveDateTime);

/// How a [`Timestamp`]'s wall-clock value should be interpreted.
///
/// The numeric values are written to the log and must not change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum DateTimeKind {
    /// No zone information.
    #[default]
    Unspecified = 0,
    /// Coordinated universal time.
    Utc = 1,
    /// Local wall-clock time of the producing machine.
    Local = 2,
}

impl DateTimeKind {
    /// Wire value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Parse a wire value. Unknown values map to `None`.
    #[must_use]
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Utc),
            2 => Some(Self::Local),
            _ => None,
        }
    }
}

impl fmt::Display for DateTimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => write!(f, "unspecified"),
            Self::Utc => write!(f, "utc"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// An instant as a tick count plus a kind tag.
///
/// `Timestamp::default()` is the zero instant, which marks the field as
/// absent. Equality of the sentinel ignores the kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    ticks: i64,
    kind: DateTimeKind,
}

impl Timestamp {
    /// Build from a raw tick count and kind.
    #[must_use]
    pub fn from_ticks(ticks: i64, kind: DateTimeKind) -> Self {
        Self { ticks, kind }
    }

    /// The current instant in UTC.
    #[must_use]
    pub fn now_utc() -> Self {
        // The system clock never leaves the tick range.
        Self::try_from(Utc::now()).unwrap_or_default()
    }

    /// Ticks since `0001-01-01T00:00:00`.
    #[must_use]
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Kind tag.
    #[must_use]
    pub fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// Whether this is anything other than the zero instant.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.ticks != 0
    }

    /// Wall-clock value, or `None` if outside chrono's range.
    #[must_use]
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let since_epoch = self.ticks.checked_sub(UNIX_EPOCH_TICKS)?;
        let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
        let sub_ticks = since_epoch.rem_euclid(TICKS_PER_SECOND);
        let nanos = u32::try_from(sub_ticks * 100).ok()?;
        DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
    }
}

fn ticks_from_naive(naive: &NaiveDateTime) -> Result<i64, TimestampOutOfRange> {
    let utc = naive.and_utc();
    utc.timestamp()
        .checked_mul(TICKS_PER_SECOND)
        .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
        .and_then(|t| t.checked_add(i64::from(utc.timestamp_subsec_nanos() / 100)))
        .filter(|t| (0..=MAX_TICKS).contains(t))
        .ok_or(TimestampOutOfRange(*naive))
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = TimestampOutOfRange;

    fn try_from(dt: DateTime<Utc>) -> Result<Self, Self::Error> {
        let ticks = ticks_from_naive(&dt.naive_utc())?;
        Ok(Self::from_ticks(ticks, DateTimeKind::Utc))
    }
}

impl TryFrom<DateTime<Local>> for Timestamp {
    type Error = TimestampOutOfRange;

    fn try_from(dt: DateTime<Local>) -> Result<Self, Self::Error> {
        let ticks = ticks_from_naive(&dt.naive_local())?;
        Ok(Self::from_ticks(ticks, DateTimeKind::Local))
    }
}

impl TryFrom<NaiveDateTime> for Timestamp {
    type Error = TimestampOutOfRange;

    fn try_from(naive: NaiveDateTime) -> Result<Self, Self::Error> {
        let ticks = ticks_from_naive(&naive)?;
        Ok(Self::from_ticks(ticks, DateTimeKind::Unspecified))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
