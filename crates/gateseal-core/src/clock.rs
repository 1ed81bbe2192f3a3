use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gateseal_types::{Seconds, Timestamp};

/// Source of "now" for a GateSeal.
///
/// Expiry is always recomputed from this clock; an instance never caches
/// whether it has expired.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock UTC time in whole seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch clocks read as the epoch.
        u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, to: Timestamp) {
        self.now.store(to, Ordering::SeqCst);
    }

    /// Move forward by `by` seconds, saturating at the maximum timestamp.
    pub fn advance(&self, by: Seconds) {
        // fetch_update only fails when the closure returns None.
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.saturating_add(by))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

/// Never reads earlier than a value it has already returned.
///
/// Wall clocks can step backwards (NTP corrections, manual resets). Expiry is
/// `now >= expiry_timestamp`, so a backwards step would revive an expired
/// instance; every instance reads time through this wrapper instead.
pub struct MonotonicClock {
    inner: Arc<dyn Clock>,
    high_water: AtomicU64,
}

impl MonotonicClock {
    pub fn new(inner: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            high_water: AtomicU64::new(0),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        let observed = self.inner.now();
        let previous = self.high_water.fetch_max(observed, Ordering::SeqCst);
        previous.max(observed)
    }
}

impl std::fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonotonicClock")
            .field("high_water", &self.high_water.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
