//! Error types for the event writer.
//!
//! A [`WriteError`] aborts the current record. Bytes already handed to the
//! sink stay there; nothing is rolled back or retried.

use thiserror::Error;

/// Errors that can occur while writing a record.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The sink rejected a write.
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A collection is too large for its `i32` count prefix.
    #[error("{what} count {count} exceeds the int32 count prefix")]
    CountOverflow {
        /// Which collection overflowed.
        what: &'static str,
        /// Its actual length.
        count: usize,
    },
}

/// Convenience type alias for writer results.
pub type Result<T> = std::result::Result<T, WriteError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
