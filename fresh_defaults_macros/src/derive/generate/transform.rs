//! Generates the `Record` implementation: the static schema, the per-type
//! declaration cache, and the generic constructor override for
//! `mode = "override"`.

use fresh_defaults_policy::Mode;
use proc_macro2::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;

use crate::derive::crate_path;
use crate::derive::model::{FieldModel, RecordModel};

/// Thunk functions for one field plus the `FieldSpec` expression using them.
struct FieldTokens {
    thunks: TokenStream,
    spec: TokenStream,
}

fn field_tokens(krate: &TokenStream, field: &FieldModel) -> FieldTokens {
    let FieldModel {
        ident,
        name,
        ty,
        default,
        required,
    } = field;
    let value_result = quote! { #krate::serde_json::Result<#krate::serde_json::Value> };
    let to_value = crate_path::to_value_fn(krate);
    let mut thunks = TokenStream::new();
    let mut spec = quote! { #krate::FieldSpec::new(#name) };

    if let Some(expr) = default {
        let thunk = format_ident!("__fresh_defaults_default_{}", name, span = ident.span());
        thunks.extend(quote! {
            fn #thunk() -> #value_result {
                let value: #ty = #expr;
                #to_value(&value)
            }
        });
        spec.extend(quote! { .with_default(#thunk) });
    }

    if *required {
        spec.extend(quote! { .required() });
    } else {
        let thunk = format_ident!("__fresh_defaults_empty_{}", name, span = ident.span());
        let empty = quote_spanned! {ty.span()=>
            <#ty as ::core::default::Default>::default()
        };
        thunks.extend(quote! {
            fn #thunk() -> #value_result {
                #to_value(&#empty)
            }
        });
        spec.extend(quote! { .with_empty(#thunk) });
    }

    FieldTokens { thunks, spec }
}

/// Tokens building the record's `PolicyConfig` in const context.
pub(crate) fn policy_tokens(model: &RecordModel) -> TokenStream {
    let krate = &model.krate;
    let mode = match model.mode {
        Mode::Keep => quote! { Keep },
        Mode::IgnoreDefaults => quote! { IgnoreDefaults },
        Mode::Override => quote! { Override },
    };
    let mut policy = quote! { #krate::PolicyConfig::new().with_mode(#krate::Mode::#mode) };
    if model.forbid_direct_construction {
        policy.extend(quote! { .forbidding_direct_construction() });
    }
    match &model.factory {
        Some(name) => {
            let factory = name.to_string();
            policy.extend(quote! { .with_factory(#factory) });
        }
        None => policy.extend(quote! { .without_factory() }),
    }
    policy
}

/// Generates `impl Record for T`.
pub(crate) fn generate_record_impl(model: &RecordModel) -> TokenStream {
    let RecordModel {
        ident, krate, mode, ..
    } = model;
    let type_id = ident.unraw().to_string();
    let (thunks, specs): (Vec<_>, Vec<_>) = model
        .fields
        .iter()
        .map(|field| {
            let FieldTokens { thunks, spec } = field_tokens(krate, field);
            (thunks, spec)
        })
        .unzip();
    let len = specs.len();
    let policy = policy_tokens(model);

    let construct = (*mode == Mode::Override).then(|| {
        quote! {
            fn construct(attrs: #krate::Attrs) -> #krate::RecordResult<Self> {
                #krate::construct_fresh::<Self>(attrs)
            }
        }
    });

    quote! {
        #[automatically_derived]
        impl #krate::Record for #ident {
            fn schema() -> &'static #krate::RecordSchema {
                #( #thunks )*
                static FIELDS: [#krate::FieldSpec; #len] = [ #( #specs ),* ];
                static SCHEMA: #krate::RecordSchema =
                    #krate::RecordSchema::new(#type_id, &FIELDS, #policy);
                &SCHEMA
            }

            fn declaration_defaults() -> &'static #krate::CallSite {
                static DECLARATION: #krate::CallSite = #krate::CallSite::new();
                &DECLARATION
            }

            #construct
        }
    }
}
