//! Code generation for the `Record` derive.

mod factory;
mod marker;
mod transform;

use proc_macro2::TokenStream;

use super::model::RecordModel;

pub(crate) use factory::generate_factory;
pub(crate) use marker::generate_marker;
pub(crate) use transform::generate_record_impl;

/// Generates every item the derive emits for `model`.
pub(crate) fn generate(model: &RecordModel) -> TokenStream {
    let mut tokens = generate_record_impl(model);
    tokens.extend(generate_factory(model));
    tokens.extend(generate_marker(model));
    tokens
}
