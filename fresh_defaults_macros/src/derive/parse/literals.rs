//! Literal parsing helpers for `#[record(...)]` attributes.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitBool, LitStr, Token};

/// Parses the literal after `key =` using `extractor`, naming the expected
/// kind in the error when the literal has another type.
fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal)
        .ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

/// Parses a string literal value.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses a boolean literal value.
pub(crate) fn lit_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitBool> {
    parse_lit(meta, key, "bool", |lit| match lit {
        Lit::Bool(b) => Some(b),
        _ => None,
    })
}

/// Accepts both `key` and `key = <bool>`.
pub(crate) fn flag(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        Ok(lit_bool(meta, key)?.value)
    } else {
        Ok(true)
    }
}
