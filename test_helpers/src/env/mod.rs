//! Helpers for safely mutating environment variables in tests.
//!
//! Build-script helpers read `OUT_DIR`, `CARGO_MANIFEST_DIR` and friends
//! from the process environment. An [`EnvScope`] holds a global re-entrant
//! lock for its whole lifetime, so a test can set several variables, run the
//! code under test, and have every variable restored on drop without another
//! test observing the intermediate state.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env::EnvScope;
//!
//! let mut scope = EnvScope::new();
//! scope.set("FRESH_EXAMPLE", "on");
//! assert_eq!(std::env::var("FRESH_EXAMPLE").as_deref(), Ok("on"));
//! drop(scope);
//! assert!(std::env::var("FRESH_EXAMPLE").is_err());
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

#[cfg(test)]
mod tests;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Holds the environment lock and restores every touched variable on drop.
///
/// Variables are restored in reverse order of mutation, so touching the same
/// key twice still restores its value from before the scope.
#[must_use = "dropping releases the environment lock and restores variables"]
pub struct EnvScope {
    saved: Vec<(String, Option<OsString>)>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl EnvScope {
    /// Acquires the environment lock.
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_MUTEX.lock(),
        }
    }

    /// Sets `key` to `value` until the scope ends.
    pub fn set(&mut self, key: impl Into<String>, value: impl AsRef<OsStr>) -> &mut Self {
        let name = self.remember(key.into());
        // SAFETY: every mutation goes through a scope holding ENV_MUTEX.
        unsafe { env::set_var(name, value.as_ref()) };
        self
    }

    /// Removes `key` until the scope ends.
    pub fn remove(&mut self, key: impl Into<String>) -> &mut Self {
        let name = self.remember(key.into());
        // SAFETY: every mutation goes through a scope holding ENV_MUTEX.
        unsafe { env::remove_var(name) };
        self
    }

    fn remember(&mut self, key: String) -> &str {
        let original = env::var_os(&key);
        self.saved.push((key, original));
        self.saved.last().map_or("", |(name, _)| name.as_str())
    }
}

impl Default for EnvScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some((key, original)) = self.saved.pop() {
            // SAFETY: the scope still holds ENV_MUTEX while restoring.
            match original {
                Some(value) => unsafe { env::set_var(&key, value) },
                None => unsafe { env::remove_var(&key) },
            }
        }
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field(
                "keys",
                &self.saved.iter().map(|(key, _)| key).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
