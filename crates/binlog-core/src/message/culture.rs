//! Number-formatting cultures and the process-wide current culture.
//!
//! Deferred messages are formatted with whatever culture is current when the
//! record is written, not when the event was raised. The current culture is
//! initialized lazily to [`Culture::invariant`] and can be replaced at any
//! time with [`Culture::set_current`].

use std::fmt;
use std::sync::LazyLock;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number-formatting conventions for a named culture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Culture {
    name: String,
    decimal_separator: String,
    group_separator: String,
    negative_sign: String,
}

/// `(name, decimal separator, group separator)` for every built-in culture.
const KNOWN_CULTURES: &[(&str, &str, &str)] = &[
    ("en-US", ".", ","),
    ("en-GB", ".", ","),
    ("de-DE", ",", "."),
    ("fr-FR", ",", "\u{202f}"),
    ("es-ES", ",", "."),
    ("ja-JP", ".", ","),
];

static CURRENT: LazyLock<RwLock<Culture>> = LazyLock::new(|| RwLock::new(Culture::invariant()));

impl Culture {
    /// The culture-independent conventions (`.` decimal, `,` groups).
    #[must_use]
    pub fn invariant() -> Self {
        Self::custom("", ".", ",")
    }

    /// A culture with explicit separators.
    #[must_use]
    pub fn custom(
        name: impl Into<String>,
        decimal_separator: impl Into<String>,
        group_separator: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            decimal_separator: decimal_separator.into(),
            group_separator: group_separator.into(),
            negative_sign: "-".to_string(),
        }
    }

    /// Look up a built-in culture by name (case-insensitive).
    ///
    /// `""` and `"invariant"` both name the invariant culture.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.is_empty() || name.eq_ignore_ascii_case("invariant") {
            return Some(Self::invariant());
        }
        KNOWN_CULTURES
            .iter()
            .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
            .map(|(n, dec, group)| Self::custom(*n, *dec, *group))
    }

    /// Like [`from_name`](Self::from_name) but falls back to invariant.
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(culture = name, "unknown culture, using invariant");
            Self::invariant()
        })
    }

    /// Snapshot of the process-wide current culture.
    #[must_use]
    pub fn current() -> Self {
        CURRENT.read().clone()
    }

    /// Replace the process-wide current culture, returning the previous one.
    pub fn set_current(culture: Culture) -> Culture {
        std::mem::replace(&mut *CURRENT.write(), culture)
    }

    /// Culture name (`""` for invariant).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the invariant culture.
    #[must_use]
    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }

    /// Decimal separator.
    #[must_use]
    pub fn decimal_separator(&self) -> &str {
        &self.decimal_separator
    }

    /// Digit group separator.
    #[must_use]
    pub fn group_separator(&self) -> &str {
        &self.group_separator
    }

    /// Negative sign.
    #[must_use]
    pub fn negative_sign(&self) -> &str {
        &self.negative_sign
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invariant() {
            f.write_str("invariant")
        } else {
            f.write_str(&self.name)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
