//! Procedural macros for `fresh_defaults`.
//!
//! The [`Record`] derive reads `#[record(...)]` attributes on a named-field
//! struct and generates:
//!
//! - a static field schema with one default thunk per `default = ...`
//!   expression, so each evaluation runs the expression anew;
//! - an implementation of `fresh_defaults::Record` whose construction paths
//!   follow the configured mode;
//! - the factory methods (`new`/`new_with` unless renamed or disabled);
//! - a `fresh_defaults::DirectConstructionForbidden` implementation when
//!   direct construction is banned.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;


/// Derive macro for `fresh_defaults::Record`.
///
/// Struct attributes: `mode = "keep" | "ignore_defaults" | "override"`,
/// `forbid_direct_construction`, `factory = "name"`, `factory = false` (or
/// `no_factory`), and `crate = "path"`. Field attributes: `default = expr`
/// and `required`.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::derive_record(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
