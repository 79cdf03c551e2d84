//! Input parsing for the `Record` derive macro.
//!
//! This module gathers the struct identifier, fields, and attribute metadata
//! in one pass so macro expansion can fail fast with useful errors.

use syn::{Data, DeriveInput, Fields};

use super::{FieldAttrs, StructAttrs, parse_field_attrs, parse_struct_attrs};

/// Everything the derive reads from the annotated struct.
pub(crate) struct RecordInput {
    pub ident: syn::Ident,
    pub vis: syn::Visibility,
    pub fields: Vec<syn::Field>,
    pub struct_attrs: StructAttrs,
    pub field_attrs: Vec<FieldAttrs>,
}

/// Gathers information from the user-provided struct.
///
/// Rejects enums, unions, tuple and unit structs, and generic parameters.
/// The schema lives in a `static`, which cannot depend on type parameters.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<RecordInput> {
    let ident = input.ident.clone();
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().cloned().collect::<Vec<_>>(),
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Record requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Record can only be derived for structs",
            ));
        }
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let field_attrs = fields
        .iter()
        .map(parse_field_attrs)
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(RecordInput {
        ident,
        vis: input.vis.clone(),
        fields,
        struct_attrs,
        field_attrs,
    })
}
