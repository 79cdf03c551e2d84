//! Test helpers shared across crates.
//!
//! - [`ticket`] hands out process-unique numbers for defaults that must
//!   differ on every evaluation.
//! - [`tree`] builds temporary source trees for the construction guard.
//! - [`env`] serialises environment mutation for build-script tests.

pub mod env;
pub mod ticket;
pub mod tree;

pub use ticket::next_ticket;
pub use tree::SourceTree;
