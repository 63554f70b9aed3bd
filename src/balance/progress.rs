use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Receives `(processed, total)` candidate counts while a run is in flight.
///
/// Implementations must not block; the engine's result never depends on
/// what the sink does with an update.
pub trait ProgressSink: Sync {
    fn report(&self, processed: u64, total: u64);
}

/// Sink that drops every update.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _processed: u64, _total: u64) {}
}

impl<F> ProgressSink for F
where
    F: Fn(u64, u64) + Sync,
{
    fn report(&self, processed: u64, total: u64) {
        self(processed, total)
    }
}

/// Cooperative stop signal shared between the host and the engine.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Most updates forwarded to the host sink per run, plus the final one.
pub const MAX_PROGRESS_UPDATES: u64 = 1000;

/// Forwards a bounded number of evenly spaced updates to the host sink.
///
/// Spacing depends only on candidate counts, so progress looks the same no
/// matter how fast the machine is. Runs with at most `MAX_PROGRESS_UPDATES`
/// candidates report every candidate.
pub(crate) struct Throttle<'a> {
    sink: &'a dyn ProgressSink,
    total: u64,
    step: u64,
    next: AtomicU64,
}

impl<'a> Throttle<'a> {
    pub(crate) fn new(sink: &'a dyn ProgressSink, total: u64) -> Self {
        let step = total.div_ceil(MAX_PROGRESS_UPDATES).max(1);
        Self {
            sink,
            total,
            step,
            next: AtomicU64::new(step),
        }
    }

    pub(crate) fn processed(&self, processed: u64) {
        if processed >= self.total {
            if self.next.swap(u64::MAX, Ordering::AcqRel) != u64::MAX {
                self.sink.report(self.total, self.total);
            }
            return;
        }
        let next = self.next.load(Ordering::Acquire);
        if processed >= next
            && self
                .next
                .compare_exchange(next, next + self.step, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
        {
            self.sink.report(processed, self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_token_starts_clear() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_visible_through_clone() {
        let token = CancellationToken::new();
        let handle = token.clone();
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: u64, t: u64| seen.lock().unwrap().push((p, t));
        sink.report(1, 6);
        assert_eq!(*seen.lock().unwrap(), vec![(1, 6)]);
    }

    #[test]
    fn test_throttle_small_runs_report_everything() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: u64, _t: u64| seen.lock().unwrap().push(p);
        let throttle = Throttle::new(&sink, 6);
        for i in 1..=6 {
            throttle.processed(i);
        }
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_throttle_bounds_large_runs() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: u64, _t: u64| seen.lock().unwrap().push(p);
        let total = 184_756;
        let throttle = Throttle::new(&sink, total);
        for i in 1..=total {
            throttle.processed(i);
        }
        let seen = seen.into_inner().unwrap();
        assert!(seen.len() as u64 <= MAX_PROGRESS_UPDATES + 1);
        assert_eq!(*seen.last().unwrap(), total);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_throttle_final_update_once() {
        let seen = Mutex::new(Vec::new());
        let sink = |p: u64, _t: u64| seen.lock().unwrap().push(p);
        let throttle = Throttle::new(&sink, 3);
        throttle.processed(3);
        throttle.processed(3);
        assert_eq!(*seen.lock().unwrap(), vec![3]);
    }
}
