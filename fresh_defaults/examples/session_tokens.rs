//! Example: issuing session tokens with per-field default policies.
//!
//! `Session` re-evaluates its token on every generic or factory
//! construction, `Limits` freezes its defaults the first time it is built,
//! and `Audit` strips its defaults so only explicit values are recorded.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use fresh_defaults::{Attrs, Record, RecordResult, build, literal};
use serde::{Deserialize, Serialize};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1000);

fn mint() -> u64 {
    NEXT_TOKEN.fetch_add(1, Ordering::Relaxed)
}

/// A login session. Direct struct expressions are rejected by
/// `cargo fresh-guard`; use `Session::open` or `build::<Session>()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(mode = "override", forbid_direct_construction, factory = "open")]
pub struct Session {
    #[record(default = mint())]
    token: u64,
    #[record(required)]
    user: String,
}

/// Rate limits shared by every session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
pub struct Limits {
    #[record(default = mint())]
    generation: u64,
    #[record(default = 60)]
    per_minute: u32,
}

/// An audit entry recording only what the caller supplied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(mode = "ignore_defaults", no_factory)]
pub struct Audit {
    #[record(default = String::from("login"))]
    action: String,
    user: String,
}

fn write_line(out: &mut dyn Write, message: &str) -> io::Result<()> {
    out.write_all(message.as_bytes())?;
    out.write_all(b"\n")
}

/// Error type for the example's entry points.
type ExampleResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn report(out: &mut dyn Write) -> ExampleResult<()> {
    let alice = Session::open_with(Attrs::new().with("user", &"alice")?)?;
    let bob = build_with_user("bob")?;
    let limits = literal!(Limits {})?;
    let audit = literal!(Audit { user: alice.user.clone() })?;
    write_line(out, &format!("alice: token {}", alice.token))?;
    write_line(out, &format!("bob: token {}", bob.token))?;
    write_line(
        out,
        &format!(
            "limits: generation {}, {} per minute",
            limits.generation, limits.per_minute
        ),
    )?;
    write_line(out, &format!("audit: {:?} by {}", audit.action, audit.user))?;
    Ok(())
}

fn build_with_user(user: &str) -> RecordResult<Session> {
    Session::construct(Attrs::new().with("user", user)?)
}

fn main() -> ExampleResult<()> {
    let mut stdout = io::stdout().lock();
    report(&mut stdout)?;
    let frozen: Limits = build()?;
    write_line(&mut stdout, &format!("limits frozen at generation {}", frozen.generation))?;
    Ok(())
}
