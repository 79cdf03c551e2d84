//! The compile-time field schema of a record.
//!
//! Built from the parsed input once attribute values have been validated
//! against the policy vocabulary. Generators read only this model.

use fresh_defaults_policy::{DEFAULT_FACTORY_NAME, Mode, check_factory_name};
use proc_macro2::{Span, TokenStream};
use syn::ext::IdentExt;
use syn::{Expr, Ident, Type, Visibility};

use super::crate_path;
use super::parse::{FactoryAttr, RecordInput};

/// One declared field.
pub(crate) struct FieldModel {
    pub ident: Ident,
    /// Field name as serde sees it: the identifier without any `r#` prefix.
    pub name: String,
    pub ty: Type,
    pub default: Option<Expr>,
    pub required: bool,
}

/// A record type ready for code generation.
pub(crate) struct RecordModel {
    pub ident: Ident,
    /// Visibility given to the generated factory methods.
    pub vis: Visibility,
    /// Tokens naming the runtime crate.
    pub krate: TokenStream,
    pub mode: Mode,
    pub forbid_direct_construction: bool,
    pub factory: Option<Ident>,
    pub fields: Vec<FieldModel>,
}

impl RecordModel {
    /// Validates `input` and builds the model.
    pub(crate) fn from_input(input: RecordInput) -> syn::Result<Self> {
        let RecordInput {
            ident,
            vis,
            fields,
            struct_attrs,
            field_attrs,
        } = input;

        let mode = struct_attrs.mode.as_ref().map_or(Ok(Mode::default()), |lit| {
            lit.value()
                .parse::<Mode>()
                .map_err(|err| syn::Error::new(lit.span(), err))
        })?;

        let factory = match &struct_attrs.factory {
            FactoryAttr::Default => Some(Ident::new(DEFAULT_FACTORY_NAME, Span::call_site())),
            FactoryAttr::Disabled => None,
            FactoryAttr::Named(lit) => {
                check_factory_name(&lit.value()).map_err(|err| syn::Error::new(lit.span(), err))?;
                Some(lit.parse::<Ident>()?)
            }
        };

        let fields = fields
            .into_iter()
            .zip(field_attrs)
            .map(|(field, attrs)| {
                let field_ident = field.ident.ok_or_else(|| {
                    syn::Error::new_spanned(&field.ty, "Record requires named fields")
                })?;
                Ok(FieldModel {
                    name: field_ident.unraw().to_string(),
                    ident: field_ident,
                    ty: field.ty,
                    default: attrs.default,
                    required: attrs.required,
                })
            })
            .collect::<syn::Result<Vec<_>>>()?;

        Ok(Self {
            krate: crate_path::resolve(struct_attrs.crate_path.as_ref()),
            ident,
            vis,
            mode,
            forbid_direct_construction: struct_attrs.forbid_direct_construction,
            factory,
            fields,
        })
    }
}
