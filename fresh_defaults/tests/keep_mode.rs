//! Behavioural tests for `mode = "keep"`: defaults are evaluated once for
//! the record type and every literal and generic construction reuses them.
#![expect(
    clippy::expect_used,
    reason = "tests panic to surface construction failures"
)]

use anyhow::{Result, ensure};
use fresh_defaults::{Attrs, Record, RecordResult, build, build_with, literal};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use test_helpers::next_ticket;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
struct Retry {
    #[record(default = 3)]
    attempts: u32,
    #[record(default = String::from("linear"))]
    backoff: String,
    jitter: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(mode = "keep")]
struct Deployment {
    #[record(default = next_ticket())]
    revision: u64,
    #[record(default = String::from("staging"))]
    target: String,
}

fn retry_site_a() -> RecordResult<Retry> {
    literal!(Retry {})
}

fn retry_site_b() -> RecordResult<Retry> {
    literal!(Retry { jitter: false })
}

#[rstest]
fn literal_sites_share_the_declared_defaults() -> Result<()> {
    let a = retry_site_a()?;
    let b = retry_site_b()?;
    ensure!(a == b, "{a:?} != {b:?}");
    ensure!(
        a == Retry {
            attempts: 3,
            backoff: "linear".to_owned(),
            jitter: false,
        }
    );
    ensure!(build::<Retry>()? == a);
    Ok(())
}

#[rstest]
fn keep_is_the_default_mode() {
    assert_eq!(Retry::schema().policy(), &fresh_defaults::PolicyConfig::new());
    assert_eq!(
        Retry::schema().strategy(),
        fresh_defaults::resolve(fresh_defaults::Mode::Keep)
    );
}

#[rstest]
fn non_deterministic_defaults_are_frozen_for_the_type() -> Result<()> {
    let first = literal!(Deployment {})?;
    let second = literal!(Deployment { target: String::from("staging") })?;
    let generic = build::<Deployment>()?;
    ensure!(first == second);
    ensure!(generic == first);
    ensure!(Deployment::declaration_defaults().is_frozen());
    Ok(())
}

#[rstest]
fn supplied_attributes_win_over_frozen_defaults() -> Result<()> {
    let frozen = build::<Deployment>()?;
    let pinned = build_with::<Deployment>(Attrs::new().with("target", &"production")?)?;
    ensure!(pinned.target == "production");
    ensure!(pinned.revision == frozen.revision);
    Ok(())
}

#[rstest]
fn factories_evaluate_fresh_even_under_keep() -> Result<()> {
    let frozen = build::<Deployment>()?;
    let a = Deployment::new()?;
    let b = Deployment::new()?;
    ensure!(a.revision != b.revision);
    ensure!(a.revision != frozen.revision);
    ensure!(a.target == "staging");
    Ok(())
}

#[rstest]
fn omitted_fields_without_defaults_are_empty() {
    let retry = literal!(Retry { attempts: 5 }).expect("literal construction");
    assert_eq!(retry.attempts, 5);
    assert!(!retry.jitter);
}
