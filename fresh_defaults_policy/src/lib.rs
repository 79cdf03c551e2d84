//! Default-policy vocabulary shared by the `fresh_defaults` crates.
//!
//! A record type chooses a [`Mode`] that decides whether declared default
//! expressions are frozen or re-evaluated on each construction path. The
//! [`resolve`] function turns that mode into a [`Strategy`] naming the
//! [`DefaultSource`] of every path. [`PolicyConfig`] bundles the mode with
//! the factory name and the direct-construction ban, and [`GuardMarker`] is
//! the persisted form of that ban consumed by the construction guard.
//!
//! ```rust
//! use fresh_defaults_policy::{DefaultSource, Mode, resolve};
//!
//! let strategy = resolve(Mode::Override);
//! assert_eq!(strategy.literal, DefaultSource::CallSite);
//! assert_eq!(strategy.generic(), DefaultSource::Fresh);
//! ```

mod config;
mod error;
mod marker;
mod mode;
mod strategy;

pub use config::{DEFAULT_FACTORY_NAME, PolicyConfig, check_factory_name, is_identifier};
pub use error::ConfigError;
pub use marker::GuardMarker;
pub use mode::Mode;
pub use strategy::{DefaultSource, Strategy, resolve, resolve_str};
