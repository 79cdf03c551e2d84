//! Concurrent first use of frozen defaults.
#![expect(
    clippy::expect_used,
    reason = "worker threads panic to surface construction failures"
)]

use std::sync::Barrier;
use std::thread;

use fresh_defaults::{Record, RecordResult, build, literal};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use test_helpers::next_ticket;

const WORKERS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
struct Shard {
    #[record(default = next_ticket())]
    epoch: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(mode = "override")]
struct Worker {
    #[record(default = next_ticket())]
    started: u64,
}

fn worker_site() -> RecordResult<Worker> {
    literal!(Worker {})
}

fn race<T, F>(make: F) -> Vec<T>
where
    T: Send,
    F: Fn() -> T + Sync,
{
    let barrier = Barrier::new(WORKERS);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    make()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("worker panicked"))
            .collect()
    })
}

#[rstest]
fn declaration_defaults_freeze_once_across_threads() {
    let shards = race(|| build::<Shard>().expect("build shard"));
    let first = shards.first().expect("at least one worker");
    assert!(shards.iter().all(|shard| shard == first), "{shards:?}");
    assert!(Shard::declaration_defaults().is_frozen());
}

#[rstest]
fn literal_sites_freeze_once_across_threads() {
    let workers = race(|| worker_site().expect("literal construction"));
    let first = workers.first().expect("at least one worker");
    assert!(workers.iter().all(|worker| worker == first), "{workers:?}");
}

#[rstest]
fn fresh_paths_never_share_values() {
    let mut started: Vec<u64> = race(|| Worker::new().expect("factory construction").started);
    started.sort_unstable();
    started.dedup();
    assert_eq!(started.len(), WORKERS);
}
