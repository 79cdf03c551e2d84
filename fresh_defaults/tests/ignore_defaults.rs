//! Behavioural tests for `mode = "ignore_defaults"`: literal and generic
//! constructions ignore declared defaults, while factories still apply them.

use anyhow::{Result, bail, ensure};
use fresh_defaults::{Attrs, RecordError, build, literal};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use test_helpers::next_ticket;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, fresh_defaults::Record)]
#[record(mode = "ignore_defaults")]
struct Pair {
    #[record(default = next_ticket())]
    x: u64,
    #[record(default = String::from("expr_b"))]
    y: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, fresh_defaults::Record)]
#[record(mode = "IgnoreDefaults")]
struct Lease {
    #[record(required)]
    owner: String,
    #[record(default = 30)]
    seconds: u32,
    note: Option<String>,
}

#[rstest]
fn generic_construction_leaves_every_field_empty() -> Result<()> {
    let pair = build::<Pair>()?;
    ensure!(
        pair == Pair {
            x: 0,
            y: String::new(),
        },
        "defaults must be ignored: {pair:?}"
    );
    ensure!(literal!(Pair {})? == pair);
    Ok(())
}

#[rstest]
fn factory_applies_defaults_around_supplied_values() -> Result<()> {
    let pair = Pair::new_with(Attrs::new().with("x", &7)?)?;
    ensure!(pair.x == 7);
    ensure!(pair.y == "expr_b");
    Ok(())
}

#[rstest]
fn required_fields_fail_when_omitted() -> Result<()> {
    let Err(err) = build::<Lease>() else {
        bail!("owner is required");
    };
    ensure!(
        matches!(
            &err,
            RecordError::MissingRequiredField { field, record: "Lease" } if field == "owner"
        ),
        "unexpected error: {err}"
    );
    ensure!(matches!(Lease::new(), Err(RecordError::MissingRequiredField { .. })));
    Ok(())
}

#[rstest]
fn required_fields_can_be_supplied_on_every_path() -> Result<()> {
    let literal = literal!(Lease { owner: String::from("ops") })?;
    ensure!(
        literal
            == Lease {
                owner: "ops".to_owned(),
                seconds: 0,
                note: None,
            }
    );
    let made = Lease::new_with(Attrs::new().with("owner", &"ops")?)?;
    ensure!(made.seconds == 30);
    ensure!(made.note.is_none());
    Ok(())
}
