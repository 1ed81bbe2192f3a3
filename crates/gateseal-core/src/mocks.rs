//! Test doubles for pausable resources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gateseal_types::{Address, Seconds, Timestamp};
use parking_lot::{Mutex, RwLock};

use crate::clock::{Clock, ManualClock};
use crate::environment::SealEnvironment;
use crate::error::{GateSealError, ResourceError};
use crate::sealable::{PausableResource, SealableRegistry};
use crate::shared::WeakGateSeal;
use crate::sink::MemoryEventLog;

/// How a [`SealableMock`] answers `pause_for`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseBehavior {
    /// Pauses until `now + duration`, extending an existing pause.
    Normal,
    /// Reports success without pausing anything.
    Unpausable,
    /// Reverts every call.
    Reverting,
    /// Spins for `loops` iterations, then pauses normally.
    BudgetBurner { loops: u64 },
}

/// Mock pausable resource.
///
/// Paused while the clock is before `paused_until`. Every accepted pause is
/// journaled so `undo_pause` can restore the previous deadline.
pub struct SealableMock {
    clock: Arc<dyn Clock>,
    behavior: PauseBehavior,
    failing_is_paused: bool,
    inverted_is_paused: bool,
    paused_until: Mutex<Timestamp>,
    history: Mutex<Vec<Timestamp>>,
    pause_calls: AtomicUsize,
}

impl SealableMock {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_behavior(clock, PauseBehavior::Normal)
    }

    pub fn with_behavior(clock: Arc<dyn Clock>, behavior: PauseBehavior) -> Self {
        Self {
            clock,
            behavior,
            failing_is_paused: false,
            inverted_is_paused: false,
            paused_until: Mutex::new(0),
            history: Mutex::new(Vec::new()),
            pause_calls: AtomicUsize::new(0),
        }
    }

    pub fn unpausable(clock: Arc<dyn Clock>) -> Self {
        Self::with_behavior(clock, PauseBehavior::Unpausable)
    }

    pub fn reverting(clock: Arc<dyn Clock>) -> Self {
        Self::with_behavior(clock, PauseBehavior::Reverting)
    }

    pub fn budget_burner(clock: Arc<dyn Clock>, loops: u64) -> Self {
        Self::with_behavior(clock, PauseBehavior::BudgetBurner { loops })
    }

    /// `is_paused` reverts instead of answering.
    pub fn with_failing_is_paused(mut self) -> Self {
        self.failing_is_paused = true;
        self
    }

    /// `is_paused` reports the opposite of the truth.
    pub fn with_inverted_is_paused(mut self) -> Self {
        self.inverted_is_paused = true;
        self
    }

    /// Pause directly, bypassing the configured behavior and the journal.
    pub fn force_pause_for(&self, duration: Seconds) {
        let until = self.clock.now().saturating_add(duration);
        let mut paused_until = self.paused_until.lock();
        *paused_until = (*paused_until).max(until);
    }

    pub fn paused_until(&self) -> Timestamp {
        *self.paused_until.lock()
    }

    /// Ground truth, regardless of what `is_paused` reports.
    pub fn actually_paused(&self) -> bool {
        self.clock.now() < self.paused_until()
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    fn apply_pause(&self, duration: Seconds) {
        let until = self.clock.now().saturating_add(duration);
        let mut paused_until = self.paused_until.lock();
        self.history.lock().push(*paused_until);
        *paused_until = (*paused_until).max(until);
    }
}

impl PausableResource for SealableMock {
    fn pause_for(&self, duration: Seconds) -> Result<(), ResourceError> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            PauseBehavior::Normal => self.apply_pause(duration),
            PauseBehavior::Unpausable => {}
            PauseBehavior::Reverting => {
                return Err(ResourceError::Reverted("pause rejected".into()));
            }
            PauseBehavior::BudgetBurner { loops } => {
                let mut acc = 0u64;
                for i in 0..loops {
                    acc = std::hint::black_box(acc.wrapping_add(i));
                }
                std::hint::black_box(acc);
                self.apply_pause(duration);
            }
        }
        Ok(())
    }

    fn is_paused(&self) -> Result<bool, ResourceError> {
        if self.failing_is_paused {
            return Err(ResourceError::Reverted("state unavailable".into()));
        }
        Ok(self.actually_paused() != self.inverted_is_paused)
    }

    fn undo_pause(&self) -> Result<(), ResourceError> {
        let previous = self
            .history
            .lock()
            .pop()
            .ok_or(ResourceError::Irreversible)?;
        *self.paused_until.lock() = previous;
        Ok(())
    }
}

/// A resource that calls back into the seal pausing it.
///
/// Once armed, every `pause_for` first tries `prolong_lifetime` and then
/// `seal` on the target as `caller`, records both outcomes, and then pauses
/// like a normal mock.
pub struct ReentrantSealable {
    inner: SealableMock,
    target: Mutex<Option<(WeakGateSeal, Address)>>,
    attempts: Mutex<Vec<GateSealError>>,
    subset: Vec<Address>,
}

impl ReentrantSealable {
    /// `subset` is what the nested `seal` call asks for.
    pub fn new(clock: Arc<dyn Clock>, subset: Vec<Address>) -> Self {
        Self {
            inner: SealableMock::new(clock),
            target: Mutex::new(None),
            attempts: Mutex::new(Vec::new()),
            subset,
        }
    }

    pub fn arm(&self, target: WeakGateSeal, caller: Address) {
        *self.target.lock() = Some((target, caller));
    }

    /// Errors returned by the nested calls, in call order.
    pub fn attempts(&self) -> Vec<GateSealError> {
        self.attempts.lock().clone()
    }

    pub fn actually_paused(&self) -> bool {
        self.inner.actually_paused()
    }
}

impl PausableResource for ReentrantSealable {
    fn pause_for(&self, duration: Seconds) -> Result<(), ResourceError> {
        let target = self.target.lock().clone();
        if let Some((weak, caller)) = target {
            if let Some(seal) = weak.upgrade() {
                let mut attempts = Vec::new();
                if let Err(e) = seal.prolong_lifetime(&caller) {
                    attempts.push(e);
                }
                if let Err(e) = seal.seal(&caller, &self.subset) {
                    attempts.push(e);
                }
                self.attempts.lock().extend(attempts);
            }
        }
        self.inner.pause_for(duration)
    }

    fn is_paused(&self) -> Result<bool, ResourceError> {
        self.inner.is_paused()
    }

    fn undo_pause(&self) -> Result<(), ResourceError> {
        self.inner.undo_pause()
    }
}

/// A manual clock, an event log and `n` normal mocks registered under
/// derived addresses.
pub struct MockFixture {
    pub clock: Arc<ManualClock>,
    pub registry: Arc<SealableRegistry>,
    pub log: Arc<MemoryEventLog>,
    addresses: Vec<Address>,
    mocks: RwLock<Vec<Arc<SealableMock>>>,
}

impl MockFixture {
    pub fn new(start: Timestamp, n: usize) -> Self {
        let clock = Arc::new(ManualClock::new(start));
        let registry = Arc::new(SealableRegistry::new());
        let mut addresses = Vec::with_capacity(n);
        let mut mocks = Vec::with_capacity(n);
        for i in 0..n {
            let address = Address::derive(format!("sealable-{i}").as_bytes());
            let mock = Arc::new(SealableMock::new(clock.clone()));
            registry.register(address, mock.clone());
            addresses.push(address);
            mocks.push(mock);
        }
        Self {
            clock,
            registry,
            log: Arc::new(MemoryEventLog::new()),
            addresses,
            mocks: RwLock::new(mocks),
        }
    }

    pub fn env(&self) -> SealEnvironment {
        SealEnvironment::new(self.clock.clone(), self.registry.clone(), self.log.clone())
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn mocks(&self) -> Vec<Arc<SealableMock>> {
        self.mocks.read().clone()
    }

    /// Swap the mock behind the `index`th address.
    pub fn replace(&self, index: usize, mock: SealableMock) -> Arc<SealableMock> {
        let mock = Arc::new(mock);
        self.registry.register(self.addresses[index], mock.clone());
        self.mocks.write()[index] = mock.clone();
        mock
    }
}
