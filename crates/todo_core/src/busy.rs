//! Idempotent outstanding-work counter.
//!
//! # Responsibility
//! - Track how many asynchronous requests are still in flight so external
//!   test instrumentation can wait for the app to settle.
//!
//! # Invariants
//! - The count never goes below zero.
//! - `decrement()` at rest is a silent no-op, so a data source that fires
//!   its "done" callback twice (cache hit, then network hit) cannot corrupt
//!   the counter.

use log::trace;
use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static GLOBAL: Lazy<Arc<BusyCounter>> = Lazy::new(|| Arc::new(BusyCounter::new()));

/// Lock-free busy counter. Readable from any thread.
#[derive(Debug, Default)]
pub struct BusyCounter {
    count: AtomicUsize,
}

impl BusyCounter {
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    /// Process-wide instance shared by view-models built with defaults.
    pub fn global() -> Arc<BusyCounter> {
        Arc::clone(&GLOBAL)
    }

    /// Marks one more request as outstanding.
    pub fn increment(&self) {
        let previous = self.count.fetch_add(1, Ordering::AcqRel);
        trace!("event=busy_increment module=busy status=ok count={}", previous + 1);
    }

    /// Settles one request. Returns `false` when the counter was already idle.
    pub fn decrement(&self) -> bool {
        let result = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(1)
            });
        match result {
            Ok(previous) => {
                trace!("event=busy_decrement module=busy status=ok count={}", previous - 1);
                true
            }
            Err(_) => {
                trace!("event=busy_decrement module=busy status=skipped reason=idle");
                false
            }
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn is_idle(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::BusyCounter;

    #[test]
    fn extra_decrement_is_a_no_op() {
        let counter = BusyCounter::new();
        counter.increment();
        assert!(!counter.is_idle());
        assert!(counter.decrement());
        assert!(!counter.decrement());
        assert_eq!(counter.count(), 0);
        assert!(counter.is_idle());
    }

    #[test]
    fn nested_requests_settle_one_at_a_time() {
        let counter = BusyCounter::new();
        counter.increment();
        counter.increment();
        counter.decrement();
        assert_eq!(counter.count(), 1);
        counter.decrement();
        assert!(counter.is_idle());
    }

    #[test]
    fn global_instance_is_shared() {
        let a = BusyCounter::global();
        let b = BusyCounter::global();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
    }
}
