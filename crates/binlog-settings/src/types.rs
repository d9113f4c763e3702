//! Settings type definitions.

use serde::{Deserialize, Serialize};

/// Writer configuration.
///
/// Field names are `snake_case` in JSON and map one-to-one to `BINLOG_*`
/// environment variables (`culture` ↔ `BINLOG_CULTURE`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    /// Culture used to format deferred messages (`"invariant"`, `"de-DE"`, ...).
    pub culture: String,
    /// Use `culture` for every write instead of the process-wide current culture.
    pub pin_culture: bool,
    /// Default tracing filter for hosts that call `init_subscriber`.
    pub log_level: String,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            culture: "invariant".to_string(),
            pin_culture: false,
            log_level: "warn".to_string(),
        }
    }
}
