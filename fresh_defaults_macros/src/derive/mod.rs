//! Implementation of `#[derive(Record)]`.

mod crate_path;
mod generate;
mod model;
mod parse;

use proc_macro2::TokenStream;
use syn::DeriveInput;

pub(crate) use generate::generate;
pub(crate) use model::RecordModel;
pub(crate) use parse::parse_input;

/// Parses, validates and expands one derive input.
pub(crate) fn derive_record(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse_input(input)?;
    let model = RecordModel::from_input(parsed)?;
    Ok(generate(&model))
}
