//! Per-record policy configuration.

use crate::{ConfigError, Mode, Strategy, resolve};

/// Factory name used when a record does not configure one.
pub const DEFAULT_FACTORY_NAME: &str = "new";

/// Policy configured on a record declaration.
///
/// The type is constructible in `const` context so derive output can keep it
/// inside a `static` schema.
///
/// ```rust
/// use fresh_defaults_policy::{Mode, PolicyConfig};
///
/// const POLICY: PolicyConfig = PolicyConfig::new()
///     .with_mode(Mode::Override)
///     .forbidding_direct_construction()
///     .with_factory("create");
/// assert_eq!(POLICY.factory_name(), Some("create"));
/// assert_eq!(POLICY.validate(), Ok(()));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PolicyConfig {
    /// Default-policy mode.
    pub mode: Mode,
    /// Whether direct struct-literal construction is banned by the guard.
    pub forbid_direct_construction: bool,
    /// Name of the generated factory; `None` suppresses the factory.
    pub factory_name: Option<&'static str>,
}

impl PolicyConfig {
    /// The default policy: `Keep`, construction allowed, factory `new`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: Mode::Keep,
            forbid_direct_construction: false,
            factory_name: Some(DEFAULT_FACTORY_NAME),
        }
    }

    /// Replaces the mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Bans direct construction of the record.
    #[must_use]
    pub const fn forbidding_direct_construction(mut self) -> Self {
        self.forbid_direct_construction = true;
        self
    }

    /// Names the generated factory.
    #[must_use]
    pub const fn with_factory(mut self, name: &'static str) -> Self {
        self.factory_name = Some(name);
        self
    }

    /// Suppresses factory generation.
    #[must_use]
    pub const fn without_factory(mut self) -> Self {
        self.factory_name = None;
        self
    }

    /// Returns the factory name, if a factory is generated.
    #[must_use]
    pub const fn factory_name(&self) -> Option<&'static str> {
        self.factory_name
    }

    /// Resolves the configured mode.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        resolve(self.mode)
    }

    /// Checks the parts of the policy that the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFactoryName`] when the factory name is
    /// not a Rust identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.factory_name().map_or(Ok(()), check_factory_name)
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `name` can name a generated factory method.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidFactoryName`] when `name` is not a Rust
/// identifier.
pub fn check_factory_name(name: &str) -> Result<(), ConfigError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidFactoryName {
            value: name.to_owned(),
        })
    }
}

/// Returns `true` when `name` is a plain (non-raw) Rust identifier.
///
/// Keywords are not rejected here; the derive reports those through `syn`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if name == "_" || !(first == '_' || first.is_alphabetic()) {
        return false;
    }
    chars.all(|ch| ch == '_' || ch.is_alphanumeric())
}
