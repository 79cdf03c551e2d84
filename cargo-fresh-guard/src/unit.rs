//! Source units: the pieces of Rust source a guard run inspects.
//!
//! A unit is hand-written source read from disk, build-script output, the
//! output of `cargo expand`, or tokens produced by another code-generation
//! pass. Each is parsed once and then visited by both guard phases.

use camino::Utf8Path;
use proc_macro2::TokenStream;

use crate::GuardError;
use crate::fs::read_utf8;

/// One parseable piece of Rust source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    origin: String,
    text: String,
}

impl SourceUnit {
    /// Wraps source text. `origin` labels locations in diagnostics.
    pub fn new(origin: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            text: text.into(),
        }
    }

    /// Reads a unit from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Io`] when the file cannot be read.
    pub fn from_file(path: &Utf8Path) -> Result<Self, GuardError> {
        Ok(Self::new(path.as_str(), read_utf8(path)?))
    }

    /// Wraps tokens produced by a code-generation pass.
    ///
    /// The tokens are rendered to text, so locations refer to positions in
    /// that rendering.
    pub fn from_tokens(origin: impl Into<String>, tokens: &TokenStream) -> Self {
        Self::new(origin, tokens.to_string())
    }

    /// Path or label of the unit.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Source text of the unit.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parses the unit as a Rust file.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Parse`] with the position of the first syntax
    /// error.
    pub fn parse(&self) -> Result<syn::File, GuardError> {
        syn::parse_file(&self.text).map_err(|err| {
            let start = err.span().start();
            GuardError::Parse {
                origin: self.origin.clone(),
                line: start.line,
                column: start.column + 1,
                message: err.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;
    use rstest::rstest;

    #[rstest]
    fn parse_errors_carry_positions() {
        let unit = SourceUnit::new("broken.rs", "fn ok() {}\nfn broken( {}\n");
        let err = unit.parse().expect_err("invalid source");
        match err {
            GuardError::Parse { origin, line, .. } => {
                assert_eq!(origin, "broken.rs");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn token_units_parse_like_text() {
        let tokens = quote! { fn generated() -> u8 { 1 } };
        let unit = SourceUnit::from_tokens("generated", &tokens);
        let file = unit.parse().expect("tokens render to valid source");
        assert_eq!(file.items.len(), 1);
    }
}
