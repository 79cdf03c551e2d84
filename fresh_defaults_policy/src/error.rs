//! Errors raised while interpreting a policy configuration.

use thiserror::Error;

/// Rejected policy configuration.
///
/// Detected while a record's schema is processed; it aborts generation for
/// that record only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configured mode is not one of the recognised values.
    #[error(
        "unknown default policy mode '{value}'; expected one of \"keep\", \"ignore_defaults\", or \"override\""
    )]
    UnknownMode {
        /// Mode text as written in the configuration.
        value: String,
    },

    /// The configured factory name cannot name a generated method.
    #[error("invalid factory name '{value}'; expected a Rust identifier such as \"new\"")]
    InvalidFactoryName {
        /// Factory name as written in the configuration.
        value: String,
    },
}
