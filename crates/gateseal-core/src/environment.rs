use std::fmt;
use std::sync::Arc;

use gateseal_types::Timestamp;

use crate::clock::{Clock, MonotonicClock, SystemClock};
use crate::sealable::{SealableDirectory, SealableRegistry};
use crate::sink::{EventSink, TracingEventSink};

/// Everything a GateSeal instance needs from the outside world: a clock, a way
/// to reach its sealables, and somewhere to emit records.
///
/// The supplied clock is always read through a [`MonotonicClock`], so time
/// seen through one environment (and its clones) never goes backwards.
#[derive(Clone)]
pub struct SealEnvironment {
    clock: Arc<MonotonicClock>,
    pub directory: Arc<dyn SealableDirectory>,
    pub events: Arc<dyn EventSink>,
}

impl SealEnvironment {
    pub fn new(
        clock: Arc<dyn Clock>,
        directory: Arc<dyn SealableDirectory>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            clock: Arc::new(MonotonicClock::new(clock)),
            directory,
            events,
        }
    }

    /// Wall-clock time, the given directory, records written to the log.
    pub fn system(directory: Arc<dyn SealableDirectory>) -> Self {
        Self::new(Arc::new(SystemClock), directory, Arc::new(TracingEventSink))
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

impl Default for SealEnvironment {
    fn default() -> Self {
        Self::system(Arc::new(SealableRegistry::new()))
    }
}

impl fmt::Debug for SealEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealEnvironment")
            .field("now", &self.now())
            .finish_non_exhaustive()
    }
}
