//! Unit tests for environment helpers.

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok()
}

#[test]
fn restores_previous_values_in_reverse_order() {
    let mut outer = EnvScope::new();
    outer.set("FRESH_HELPERS_STACKED", "original");
    {
        let mut inner = EnvScope::new();
        inner
            .set("FRESH_HELPERS_STACKED", "first")
            .set("FRESH_HELPERS_STACKED", "second");
        assert_eq!(env_value("FRESH_HELPERS_STACKED").as_deref(), Some("second"));
    }
    assert_eq!(env_value("FRESH_HELPERS_STACKED").as_deref(), Some("original"));
    drop(outer);
    assert_eq!(env_value("FRESH_HELPERS_STACKED"), None);
}

#[test]
fn removal_is_undone() {
    let mut outer = EnvScope::new();
    outer.set("FRESH_HELPERS_REMOVED", "kept");
    {
        let mut inner = EnvScope::new();
        inner.remove("FRESH_HELPERS_REMOVED");
        assert_eq!(env_value("FRESH_HELPERS_REMOVED"), None);
    }
    assert_eq!(env_value("FRESH_HELPERS_REMOVED").as_deref(), Some("kept"));
}

#[test]
fn scopes_on_other_threads_do_not_interleave() {
    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let start = Arc::clone(&barrier);
            thread::spawn(move || {
                start.wait();
                for iteration in 0..16 {
                    let value = format!("{worker}-{iteration}");
                    let mut scope = EnvScope::new();
                    scope.set("FRESH_HELPERS_SHARED", &value);
                    assert_eq!(env_value("FRESH_HELPERS_SHARED"), Some(value));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }
    assert_eq!(env_value("FRESH_HELPERS_SHARED"), None);
}
