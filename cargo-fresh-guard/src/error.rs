//! Error types for the construction guard.

use std::fmt;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Position of an event inside a source unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Path or label of the unit.
    pub origin: String,
    /// One-based line.
    pub line: usize,
    /// One-based column.
    pub column: usize,
}

impl Location {
    /// Creates a location.
    pub fn new(origin: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            origin: origin.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.origin, self.line, self.column)
    }
}

/// A direct construction of a type whose marker forbids it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error(
    "{location}: direct construction of `{type_id}` is forbidden; use {} instead",
    .alternatives.join(", ")
)]
pub struct ConstructionForbidden {
    /// Simple name of the constructed type.
    pub type_id: String,
    /// Where the construction appears.
    pub location: Location,
    /// Entry points to use instead.
    pub alternatives: Vec<String>,
}

/// Errors surfaced by a guard run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GuardError {
    /// A forbidden construction ended the run.
    #[error(transparent)]
    Forbidden(#[from] Box<ConstructionForbidden>),

    /// A source file, directory or manifest could not be read or written.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A source unit is not valid Rust.
    #[error("{origin}:{line}:{column}: failed to parse source: {message}")]
    Parse {
        /// Path or label of the unit.
        origin: String,
        /// One-based line of the error.
        line: usize,
        /// One-based column of the error.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// A marker manifest could not be decoded or encoded.
    #[error("invalid marker manifest {path}: {source}")]
    Manifest {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },

    /// A required environment variable is missing or not UTF-8.
    #[error("environment variable {name} is not set or is not valid UTF-8")]
    Env {
        /// Variable name.
        name: &'static str,
    },
}

impl GuardError {
    /// Returns the violation when the run stopped at a forbidden construction.
    #[must_use]
    pub fn as_forbidden(&self) -> Option<&ConstructionForbidden> {
        match self {
            Self::Forbidden(violation) => Some(violation),
            _ => None,
        }
    }
}

impl From<ConstructionForbidden> for GuardError {
    fn from(violation: ConstructionForbidden) -> Self {
        Self::Forbidden(Box::new(violation))
    }
}
