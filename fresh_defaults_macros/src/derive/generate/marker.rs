//! Generates the direct-construction marker.
//!
//! The construction guard recognises both the `forbid_direct_construction`
//! attribute on a derive and this trait implementation, so expanded output
//! stays covered.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive::model::RecordModel;

/// Implements `DirectConstructionForbidden` for records that ban direct
/// construction.
pub(crate) fn generate_marker(model: &RecordModel) -> TokenStream {
    if !model.forbid_direct_construction {
        return TokenStream::new();
    }
    let RecordModel { ident, krate, .. } = model;
    quote! {
        #[automatically_derived]
        impl #krate::DirectConstructionForbidden for #ident {}
    }
}
