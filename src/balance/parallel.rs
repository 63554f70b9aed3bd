//! Partitioned variant of the balancing engine.
//!
//! The lexicographic index space is cut into contiguous slices. Each slice is
//! scanned on the rayon pool into its own local best; a short locked merge
//! keeps the best by `(score, global index)`, so the result always matches
//! the sequential fold.

use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, warn};

use super::engine::{balance, finish, scan_range, BalanceOutcome, Best, PreparedPool, Scan};
use super::params::BalanceParams;
use super::progress::{CancellationToken, ProgressSink, Throttle};
use crate::roster::Player;

/// Slices handed out per worker, so a slow slice does not idle the pool.
const SLICES_PER_WORKER: u64 = 4;

/// Candidates a worker scans before publishing its progress.
const PROGRESS_BATCH: u64 = 1024;

/// Same contract as [`balance`], spread over `workers` threads.
/// `workers <= 1` runs the sequential fold.
pub fn balance_parallel(
    pool: &[Player],
    params: &BalanceParams,
    workers: usize,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> BalanceOutcome {
    if workers <= 1 {
        return balance(pool, params, progress, cancel);
    }

    let prep = match PreparedPool::new(pool, params) {
        Ok(prep) => prep,
        Err(issue) => {
            debug!(%issue, "rejecting balance run");
            return BalanceOutcome::InvalidConfiguration(issue);
        }
    };

    let thread_pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(tp) => tp,
        Err(e) => {
            warn!(error = %e, "failed to start worker pool, falling back to sequential scan");
            return balance(pool, params, progress, cancel);
        }
    };

    let slices = slice_ranges(prep.total, workers as u64 * SLICES_PER_WORKER);
    debug!(
        candidates = prep.total,
        workers,
        slices = slices.len(),
        "starting partitioned balance run"
    );

    let throttle = Throttle::new(progress, prep.total);
    let processed = AtomicU64::new(0);
    let cancelled = AtomicBool::new(false);
    let global: Mutex<Option<Best>> = Mutex::new(None);

    thread_pool.install(|| {
        slices.par_iter().for_each(|&(start, end)| {
            let mut pending = 0u64;
            let publish = |count: u64| {
                let done = processed.fetch_add(count, Ordering::Relaxed) + count;
                throttle.processed(done);
            };

            let scan = scan_range(&prep, params, start, end, cancel, || {
                pending += 1;
                if pending == PROGRESS_BATCH {
                    publish(pending);
                    pending = 0;
                }
            });
            if pending > 0 {
                publish(pending);
            }

            match scan {
                Scan::Cancelled => cancelled.store(true, Ordering::Relaxed),
                Scan::Completed(None) => {}
                Scan::Completed(Some(local)) => {
                    let mut best = global.lock();
                    if best.as_ref().map_or(true, |b| local.beats(b)) {
                        *best = Some(local);
                    }
                }
            }
        });
    });

    let scan = if cancelled.load(Ordering::Relaxed) {
        Scan::Cancelled
    } else {
        Scan::Completed(global.into_inner())
    };
    finish(&prep, scan)
}

/// Cut `0..total` into at most `parts` contiguous, non-empty ranges.
fn slice_ranges(total: u64, parts: u64) -> Vec<(u64, u64)> {
    let parts = parts.clamp(1, total.max(1));
    let base = total / parts;
    let extra = total % parts;
    let mut ranges = Vec::with_capacity(parts as usize);
    let mut start = 0;
    for i in 0..parts {
        let len = base + u64::from(i < extra);
        if len == 0 {
            break;
        }
        ranges.push((start, start + len));
        start += len;
    }
    ranges
}
