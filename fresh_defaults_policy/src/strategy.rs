//! Policy resolution: mapping a [`Mode`] onto per-path default sources.

use crate::{ConfigError, Mode};

/// Where a construction path takes the value of a field the caller omitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefaultSource {
    /// Evaluated once for the record type, then frozen for every path that
    /// uses this source.
    Declaration,
    /// Evaluated once per literal call site, then frozen for that site.
    CallSite,
    /// Evaluated again on every construction.
    Fresh,
    /// No default: the field is empty, or the construction fails when the
    /// field is required.
    Stripped,
}

impl DefaultSource {
    /// Returns `true` when the source supplies default values at all.
    #[must_use]
    pub const fn applies_defaults(self) -> bool {
        !matches!(self, Self::Stripped)
    }
}

/// Generation strategy derived from a [`Mode`].
///
/// The factory path is absent on purpose: factories always evaluate their
/// defaults fresh whatever the mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Strategy {
    /// Source used by the literal (`literal!`) form.
    pub literal: DefaultSource,
    /// Source used by the base generic constructor, before any override.
    pub base: DefaultSource,
    /// Whether the generic-by-type constructor is regenerated so it
    /// recomputes every default on each call.
    pub overrides_generic: bool,
}

impl Strategy {
    /// Source used by the generic-by-type constructor once any override is
    /// applied.
    #[must_use]
    pub const fn generic(&self) -> DefaultSource {
        if self.overrides_generic {
            DefaultSource::Fresh
        } else {
            self.base
        }
    }
}

/// Resolves a mode into its strategy.
///
/// | mode | literal | base | generic |
/// |---|---|---|---|
/// | `Keep` | declaration | declaration | declaration |
/// | `IgnoreDefaults` | stripped | stripped | stripped |
/// | `Override` | call site | stripped | fresh |
#[must_use]
pub const fn resolve(mode: Mode) -> Strategy {
    match mode {
        Mode::Keep => Strategy {
            literal: DefaultSource::Declaration,
            base: DefaultSource::Declaration,
            overrides_generic: false,
        },
        Mode::IgnoreDefaults => Strategy {
            literal: DefaultSource::Stripped,
            base: DefaultSource::Stripped,
            overrides_generic: false,
        },
        Mode::Override => Strategy {
            literal: DefaultSource::CallSite,
            base: DefaultSource::Stripped,
            overrides_generic: true,
        },
    }
}

/// Parses a textual mode and resolves it.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownMode`] when `mode` is not recognised.
pub fn resolve_str(mode: &str) -> Result<Strategy, ConfigError> {
    mode.parse::<Mode>().map(resolve)
}
