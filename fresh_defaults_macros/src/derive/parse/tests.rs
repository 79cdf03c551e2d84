//! Tests for `#[record(...)]` parsing behaviour.

use super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

fn parse_err(input: &DeriveInput) -> Result<String> {
    match parse_input(input) {
        Ok(_) => Err(anyhow!("expected a parse error")),
        Err(err) => Ok(err.to_string()),
    }
}

#[rstest]
fn parses_struct_and_field_attributes() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[record(mode = "override", forbid_direct_construction, factory = "create")]
        #[record(crate = "deps::fresh_defaults")]
        struct Session {
            #[record(default = make_token())]
            token: String,
            #[record(required)]
            user: String,
            note: Option<String>,
        }
    };

    let parsed = parse_input(&input).map_err(|err| anyhow!(err))?;
    ensure!(parsed.ident == "Session", "unexpected ident {}", parsed.ident);
    let attrs = &parsed.struct_attrs;
    ensure!(
        attrs.mode.as_ref().map(LitStr::value).as_deref() == Some("override"),
        "mode not parsed"
    );
    ensure!(attrs.forbid_direct_construction, "forbid flag not parsed");
    ensure!(
        matches!(&attrs.factory, FactoryAttr::Named(name) if name.value() == "create"),
        "factory not parsed"
    );
    ensure!(attrs.crate_path.is_some(), "crate path not parsed");

    let [token, user, note] = parsed.field_attrs.as_slice() else {
        return Err(anyhow!("expected three field attribute sets"));
    };
    ensure!(token.default.is_some() && !token.required, "token attrs wrong");
    ensure!(user.default.is_none() && user.required, "user attrs wrong");
    ensure!(note.default.is_none() && !note.required, "note attrs wrong");
    Ok(())
}

#[rstest]
#[case::forbid_false(parse_quote! { #[record(forbid_direct_construction = false)] }, false)]
#[case::forbid_true(parse_quote! { #[record(forbid_direct_construction = true)] }, true)]
#[case::absent(parse_quote! { #[doc = "plain"] }, false)]
fn forbid_flag_accepts_bare_and_boolean_forms(
    #[case] attr: syn::Attribute,
    #[case] expected: bool,
) -> Result<()> {
    let attrs = parse_struct_attrs(&[attr]).map_err(|err| anyhow!(err))?;
    ensure!(attrs.forbid_direct_construction == expected, "flag mismatch");
    Ok(())
}

#[rstest]
#[case::struct_key(
    parse_quote! {
        #[record(forbid_direct_constructon)]
        struct Typo { x: u8 }
    },
    "unknown record attribute 'forbid_direct_constructon'"
)]
#[case::field_key(
    parse_quote! {
        struct Typo {
            #[record(defualt = 1)]
            x: u8,
        }
    },
    "unknown record attribute 'defualt'"
)]
#[case::enum_input(
    parse_quote! { enum Choice { A, B } },
    "Record can only be derived for structs"
)]
#[case::tuple_struct(
    parse_quote! { struct Pair(u8, u8); },
    "Record requires named fields"
)]
#[case::generic_struct(
    parse_quote! { struct Wrapper<T> { inner: T } },
    "Record cannot be derived for generic structs"
)]
#[case::serde_rename(
    parse_quote! {
        #[serde(rename_all = "camelCase")]
        struct Renamed { first_name: String }
    },
    "`#[serde(rename_all)]` is not supported"
)]
#[case::serde_field_skip(
    parse_quote! {
        struct Skipping {
            #[serde(skip)]
            cache: u8,
        }
    },
    "`#[serde(skip)]` is not supported"
)]
#[case::duplicate_default(
    parse_quote! {
        struct Twice {
            #[record(default = 1, default = 2)]
            x: u8,
        }
    },
    "duplicate `default`"
)]
#[case::factory_number(
    parse_quote! {
        #[record(factory = 3)]
        struct Odd { x: u8 }
    },
    "factory must be a string"
)]
#[case::mode_not_string(
    parse_quote! {
        #[record(mode = keep)]
        struct Bare { x: u8 }
    },
    "expected literal"
)]
fn rejects_invalid_input(#[case] input: DeriveInput, #[case] fragment: &str) -> Result<()> {
    let message = parse_err(&input)?;
    ensure!(
        message.contains(fragment),
        "error '{message}' does not mention '{fragment}'"
    );
    Ok(())
}

#[rstest]
fn unrelated_serde_attributes_are_allowed() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[serde(deny_unknown_fields)]
        struct Strict {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            hint: Option<String>,
        }
    };
    parse_input(&input).map_err(|err| anyhow!(err))?;
    Ok(())
}

#[rstest]
#[case::disabled(parse_quote! { #[record(factory = false)] })]
#[case::no_factory(parse_quote! { #[record(no_factory)] })]
fn factory_can_be_disabled(#[case] attr: syn::Attribute) -> Result<()> {
    let attrs = parse_struct_attrs(&[attr]).map_err(|err| anyhow!(err))?;
    ensure!(matches!(attrs.factory, FactoryAttr::Disabled), "factory still enabled");
    Ok(())
}
