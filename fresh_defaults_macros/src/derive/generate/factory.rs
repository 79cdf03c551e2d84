//! Generates the factory pair: `name()` and `name_with(attrs)`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::derive::model::RecordModel;

/// Generates the inherent factory methods, or nothing when the factory is
/// disabled.
pub(crate) fn generate_factory(model: &RecordModel) -> TokenStream {
    let Some(name) = &model.factory else {
        return TokenStream::new();
    };
    let RecordModel {
        ident, vis, krate, ..
    } = model;
    let name_with = format_ident!("{}_with", name);
    let doc = format!(
        "Builds a `{ident}` with every default evaluated now.\n\n\
         # Errors\n\n\
         Returns a `RecordError` when a default cannot be serialised or a \
         required field has no default."
    );
    let doc_with = format!(
        "Builds a `{ident}` from `attrs`, evaluating the default of every \
         omitted field now.\n\n\
         # Errors\n\n\
         Returns `RecordError::UnknownField` when `attrs` names a field \
         `{ident}` does not declare, and otherwise as [`Self::{name}`]."
    );

    quote! {
        impl #ident {
            #[doc = #doc]
            #[allow(dead_code, reason = "factories are optional entry points")]
            #vis fn #name() -> #krate::RecordResult<Self> {
                #krate::factory::<Self>(#krate::Attrs::new())
            }

            #[doc = #doc_with]
            #[allow(dead_code, reason = "factories are optional entry points")]
            #vis fn #name_with(attrs: #krate::Attrs) -> #krate::RecordResult<Self> {
                #krate::factory::<Self>(attrs)
            }
        }
    }
}
