//! Where generated code finds the runtime crate.
//!
//! Every path emitted by the derive starts at the root returned by
//! [`resolve`]. A crate that renames its dependency, or re-exports the
//! runtime from a facade, points the derive elsewhere with
//! `#[record(crate = "path::to::runtime")]`.

use proc_macro2::TokenStream;
use quote::quote;

/// Root of the runtime crate for one derive: `fresh_defaults` unless the
/// record names another path.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { fresh_defaults }, |path| quote! { #path })
}

/// The serializer used by generated default and empty-value thunks.
///
/// It lives in the runtime's hidden module, so it moves with the root.
pub(crate) fn to_value_fn(krate: &TokenStream) -> TokenStream {
    quote! { #krate::__private::to_value }
}
