//! Deferred message resolution.
//!
//! A message with captured arguments is interpolated once, when its record is
//! written. A malformed format string never fails the write: the raw text is
//! encoded instead and a warning is logged.

use std::borrow::Cow;

use binlog_core::{Culture, DeferredMessage, FormatFn, format_string};
use binlog_settings::WriterSettings;
use tracing::warn;

/// Turns a possibly-deferred message into the text to encode.
#[derive(Clone, Debug)]
pub struct MessageResolver {
    pinned: Option<Culture>,
    format: FormatFn,
}

impl Default for MessageResolver {
    /// Formats with the process-wide current culture at write time.
    fn default() -> Self {
        Self {
            pinned: None,
            format: format_string,
        }
    }
}

impl MessageResolver {
    /// Always format with `culture`, ignoring the current culture.
    #[must_use]
    pub fn pinned(culture: Culture) -> Self {
        Self {
            pinned: Some(culture),
            ..Self::default()
        }
    }

    /// Replace the formatting routine.
    #[must_use]
    pub fn with_format_fn(mut self, format: FormatFn) -> Self {
        self.format = format;
        self
    }

    /// Build from settings. The culture is only pinned when `pin_culture` is set.
    #[must_use]
    pub fn from_settings(settings: &WriterSettings) -> Self {
        if settings.pin_culture {
            Self::pinned(Culture::resolve(&settings.culture))
        } else {
            Self::default()
        }
    }

    /// The pinned culture, if any.
    #[must_use]
    pub fn pinned_culture(&self) -> Option<&Culture> {
        self.pinned.as_ref()
    }

    /// Final message text.
    ///
    /// Without arguments the raw text is returned untouched, braces included.
    pub fn resolve<'a>(&self, message: &'a dyn DeferredMessage) -> Cow<'a, str> {
        let raw = message.raw_message();
        let args = message.arguments();
        if args.is_empty() {
            return Cow::Borrowed(raw);
        }

        let result = match &self.pinned {
            Some(culture) => (self.format)(culture, raw, args),
            None => (self.format)(&Culture::current(), raw, args),
        };
        match result {
            Ok(text) => Cow::Owned(text),
            Err(error) => {
                warn!(%error, format = raw, args = args.len(), "message format failed, writing raw text");
                Cow::Borrowed(raw)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
