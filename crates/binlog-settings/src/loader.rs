//! Settings loading with `figment`.
//!
//! Loading flow (later layers win):
//! 1. Compiled [`WriterSettings::default()`]
//! 2. `settings.json` in the settings directory, if it exists
//! 3. `BINLOG_*` environment variables
//!
//! The settings directory is `$BINLOG_HOME`, or `~/.binlog` when unset.

use std::path::{Path, PathBuf};

use binlog_core::Culture;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized};
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::WriterSettings;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BINLOG_";

/// Resolve the settings file path.
pub fn settings_path() -> PathBuf {
    if let Some(dir) = std::env::var_os("BINLOG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir).join("settings.json");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".binlog").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<WriterSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific file with env var overrides.
///
/// A missing file is not an error; defaults and env vars still apply.
pub fn load_settings_from_path(path: &Path) -> Result<WriterSettings> {
    debug!(?path, exists = path.exists(), "loading writer settings");

    let settings: WriterSettings = Figment::from(Serialized::defaults(WriterSettings::default()))
        .merge(Json::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["home"]))
        .extract()?;

    validate(&settings)?;
    Ok(settings)
}

/// Reject values the writer cannot use.
pub fn validate(settings: &WriterSettings) -> Result<()> {
    if Culture::from_name(&settings.culture).is_none() {
        return Err(SettingsError::InvalidValue(format!(
            "unknown culture {:?}",
            settings.culture
        )));
    }
    if settings.log_level.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "log_level must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
