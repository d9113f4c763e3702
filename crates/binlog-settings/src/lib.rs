//! # binlog-settings
//!
//! Layered configuration for the binlog writer.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`WriterSettings::default()`]
//! 2. **Settings file**: `$BINLOG_HOME/settings.json` or `~/.binlog/settings.json`
//! 3. **Environment variables**: `BINLOG_*` overrides (highest priority)
//!
//! [`apply_settings`] installs the process-wide pieces: the tracing
//! subscriber at `log_level` and, when the culture is not pinned per writer,
//! the current culture.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path, validate};
pub use types::WriterSettings;

use std::sync::OnceLock;

use binlog_core::Culture;

/// Global settings singleton, loaded on first access.
static SETTINGS: OnceLock<WriterSettings> = OnceLock::new();

/// Get the global settings.
///
/// The first call loads from disk and environment; if that fails the compiled
/// defaults are used and a warning is logged.
pub fn get_settings() -> &'static WriterSettings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load writer settings, using defaults");
            WriterSettings::default()
        })
    })
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
pub fn init_settings(settings: WriterSettings) -> std::result::Result<(), WriterSettings> {
    SETTINGS.set(settings)
}

/// Install the process-wide state described by `settings`.
///
/// Initializes the stderr subscriber with `log_level` as its default filter.
/// Unless `pin_culture` is set, `culture` becomes the current culture, so
/// unpinned writers format with it until something else replaces it.
pub fn apply_settings(settings: &WriterSettings) {
    binlog_core::logging::init_subscriber(&settings.log_level);
    if !settings.pin_culture {
        let previous = Culture::set_current(Culture::resolve(&settings.culture));
        tracing::debug!(
            culture = %settings.culture,
            previous = %previous.name(),
            "current culture seeded from settings"
        );
    }
}
