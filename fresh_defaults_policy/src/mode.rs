//! The three default-policy modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a record treats its declared default expressions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Defaults are evaluated once and the frozen values are reused.
    #[default]
    Keep,
    /// Defaults are stripped from the literal and generic constructors.
    IgnoreDefaults,
    /// Literal sites freeze defaults per call site; the generic constructor
    /// re-evaluates them on every call.
    Override,
}

impl Mode {
    /// Every recognised mode, in declaration order.
    pub const ALL: [Self; 3] = [Self::Keep, Self::IgnoreDefaults, Self::Override];

    /// Canonical attribute spelling of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::IgnoreDefaults => "ignore_defaults",
            Self::Override => "override",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    /// Parses a mode, ignoring ASCII case and `-`/`_` separators so that
    /// `ignore_defaults`, `ignore-defaults` and `IgnoreDefaults` agree.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '_' | '-'))
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "keep" => Ok(Self::Keep),
            "ignoredefaults" => Ok(Self::IgnoreDefaults),
            "override" => Ok(Self::Override),
            _ => Err(ConfigError::UnknownMode {
                value: value.to_owned(),
            }),
        }
    }
}
