//! A non-deterministic default source.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT: AtomicU64 = AtomicU64::new(1);

/// Returns a number never returned before in this process.
///
/// Stands in for timestamps, random identifiers and other defaults whose
/// value changes between evaluations.
///
/// ```
/// let first = test_helpers::next_ticket();
/// assert!(test_helpers::next_ticket() > first);
/// ```
#[must_use]
pub fn next_ticket() -> u64 {
    NEXT.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::next_ticket;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn tickets_are_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| thread::spawn(|| (0..64).map(|_| next_ticket()).collect::<Vec<_>>()))
            .collect();
        let mut seen = HashSet::new();
        for handle in handles {
            for ticket in handle.join().expect("worker panicked") {
                assert!(seen.insert(ticket), "ticket {ticket} handed out twice");
            }
        }
    }
}
