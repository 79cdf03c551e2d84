//! Serde attribute checks.
//!
//! Records are assembled as JSON objects keyed by Rust field names and then
//! deserialised, so any serde attribute that changes the key set breaks the
//! correspondence between the schema and the serialised form.

use syn::meta::ParseNestedMeta;
use syn::parenthesized;
use syn::{Attribute, Token};

const KEY_CHANGING: &[&str] = &[
    "rename",
    "rename_all",
    "rename_all_fields",
    "flatten",
    "skip",
    "skip_serializing",
    "skip_deserializing",
    "tag",
    "untagged",
    "transparent",
];

/// Consumes a key-value or list without recording it.
fn discard(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Rejects `#[serde(...)]` keys that change the serialised field names.
pub(crate) fn reject_serde_renames(attrs: &[Attribute]) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if let Some(key) = KEY_CHANGING.iter().find(|key| meta.path.is_ident(key)) {
                return Err(meta.error(format!(
                    "`#[serde({key})]` is not supported on Record types; \
                     fields are keyed by their Rust names"
                )));
            }
            discard(&meta)
        })?;
    }
    Ok(())
}
