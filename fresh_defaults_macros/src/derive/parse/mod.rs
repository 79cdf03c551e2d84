//! Parsing utilities for the `Record` derive macro.
//!
//! Every key inside `#[record(...)]` must be recognised. A misspelt policy
//! key would otherwise silently fall back to the permissive defaults.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, Lit, LitStr, Token};

mod input;
mod literals;
mod serde_attrs;
#[cfg(test)]
mod tests;

pub(crate) use input::{RecordInput, parse_input};
use literals::{flag, lit_str};
use serde_attrs::reject_serde_renames;

/// Factory configuration as written on the struct.
#[derive(Clone, Debug, Default)]
pub(crate) enum FactoryAttr {
    /// No `factory` key: the default name.
    #[default]
    Default,
    /// `factory = "name"`.
    Named(LitStr),
    /// `factory = false` or `no_factory`.
    Disabled,
}

/// Struct-level `#[record(...)]` attributes.
#[derive(Clone, Debug, Default)]
pub(crate) struct StructAttrs {
    /// `mode = "..."`, validated when the model is built.
    pub mode: Option<LitStr>,
    pub forbid_direct_construction: bool,
    pub factory: FactoryAttr,
    /// Overrides the generated crate path for dependency aliasing.
    ///
    /// When set via `#[record(crate = "my_alias")]`, generated code
    /// references types through `my_alias::` instead of `fresh_defaults::`.
    pub crate_path: Option<syn::Path>,
}

/// Field-level `#[record(...)]` attributes.
///
/// - `default` supplies the expression re-evaluated by every fresh
///   evaluation of the field's default.
/// - `required` marks a field with no empty value: omitting it without a
///   default fails construction.
#[derive(Clone, Debug, Default)]
pub(crate) struct FieldAttrs {
    pub default: Option<Expr>,
    pub required: bool,
}

/// Iterate all `#[record(...)]` attributes once and apply a callback.
fn parse_record_attrs<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown_key(meta: &ParseNestedMeta, allowed: &str) -> syn::Error {
    let key = meta
        .path
        .get_ident()
        .map_or_else(|| "<path>".to_owned(), ToString::to_string);
    meta.error(format!("unknown record attribute '{key}'; expected one of {allowed}"))
}

fn parse_factory(meta: &ParseNestedMeta) -> syn::Result<FactoryAttr> {
    if !meta.input.peek(Token![=]) {
        return Ok(FactoryAttr::Default);
    }
    match meta.value()?.parse::<Lit>()? {
        Lit::Str(name) => Ok(FactoryAttr::Named(name)),
        Lit::Bool(enabled) if enabled.value => Ok(FactoryAttr::Default),
        Lit::Bool(_) => Ok(FactoryAttr::Disabled),
        other => Err(syn::Error::new(
            other.span(),
            "factory must be a string naming the factory, or false",
        )),
    }
}

/// Extracts `#[record(...)]` metadata applied to a struct.
///
/// Recognised keys are `mode`, `forbid_direct_construction`, `factory`,
/// `no_factory` and `crate`. Any other key is an error.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_record_attrs(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("mode") => {
                out.mode = Some(lit_str(meta, "mode")?);
            }
            Some("forbid_direct_construction") => {
                out.forbid_direct_construction = flag(meta, "forbid_direct_construction")?;
            }
            Some("factory") => {
                out.factory = parse_factory(meta)?;
            }
            Some("no_factory") => {
                if flag(meta, "no_factory")? {
                    out.factory = FactoryAttr::Disabled;
                }
            }
            Some("crate") => {
                let s = lit_str(meta, "crate")?;
                let path: syn::Path =
                    syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
                out.crate_path = Some(path);
            }
            _ => {
                return Err(unknown_key(
                    meta,
                    "`mode`, `forbid_direct_construction`, `factory`, `no_factory`, or `crate`",
                ));
            }
        }
        Ok(())
    })?;
    reject_serde_renames(attrs)?;
    Ok(out)
}

/// Parses field-level `#[record(...)]` attributes.
///
/// Recognised keys are `default = <expr>` and `required`.
pub(crate) fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_record_attrs(&field.attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("default") => {
                if out.default.is_some() {
                    return Err(meta.error("duplicate `default` for this field"));
                }
                out.default = Some(meta.value()?.parse()?);
            }
            Some("required") => {
                out.required = flag(meta, "required")?;
            }
            _ => return Err(unknown_key(meta, "`default` or `required`")),
        }
        Ok(())
    })?;
    reject_serde_renames(&field.attrs)?;
    Ok(out)
}
