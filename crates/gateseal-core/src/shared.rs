//! Shared, serialized access to a GateSeal instance.
//!
//! Sealing calls out to untrusted resources while the instance is mid-update.
//! A resource that calls back into the same instance from inside `pause_for`
//! must not observe or mutate half-applied state, so every entry point here
//! takes a re-entrant lock and then a `RefCell` borrow. Other threads wait on
//! the lock; a call back in from the same thread fails the borrow and is
//! rejected with [`GateSealError::ReentrantCall`].

use std::cell::RefCell;
use std::sync::{Arc, Weak};

use gateseal_types::{Address, ProlongationUsed, Sealed};
use parking_lot::ReentrantMutex;

use crate::error::GateSealError;
use crate::gate_seal::GateSeal;

type Cell = ReentrantMutex<RefCell<GateSeal>>;

/// Cloneable handle to one GateSeal instance.
#[derive(Clone)]
pub struct SharedGateSeal {
    id: Address,
    inner: Arc<Cell>,
}

impl SharedGateSeal {
    pub fn new(seal: GateSeal) -> Self {
        Self {
            id: seal.id(),
            inner: Arc::new(ReentrantMutex::new(RefCell::new(seal))),
        }
    }

    pub fn id(&self) -> Address {
        self.id
    }

    pub fn seal(&self, caller: &Address, subset: &[Address]) -> Result<Vec<Sealed>, GateSealError> {
        let guard = self.inner.lock();
        let mut seal = guard
            .try_borrow_mut()
            .map_err(|_| GateSealError::ReentrantCall)?;
        seal.seal(caller, subset)
    }

    pub fn prolong_lifetime(&self, caller: &Address) -> Result<ProlongationUsed, GateSealError> {
        let guard = self.inner.lock();
        let mut seal = guard
            .try_borrow_mut()
            .map_err(|_| GateSealError::ReentrantCall)?;
        seal.prolong_lifetime(caller)
    }

    /// Run `f` against a consistent view of the instance.
    ///
    /// Fails with `ReentrantCall` when invoked while the instance is being
    /// mutated on this thread.
    pub fn read<R>(&self, f: impl FnOnce(&GateSeal) -> R) -> Result<R, GateSealError> {
        let guard = self.inner.lock();
        let seal = guard
            .try_borrow()
            .map_err(|_| GateSealError::ReentrantCall)?;
        Ok(f(&seal))
    }

    /// Handle that does not keep the instance alive, for resources that need
    /// to refer back to the seal pausing them.
    pub fn downgrade(&self) -> WeakGateSeal {
        WeakGateSeal {
            id: self.id,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for SharedGateSeal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGateSeal")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct WeakGateSeal {
    id: Address,
    inner: Weak<Cell>,
}

impl WeakGateSeal {
    pub fn id(&self) -> Address {
        self.id
    }

    pub fn upgrade(&self) -> Option<SharedGateSeal> {
        self.inner.upgrade().map(|inner| SharedGateSeal { id: self.id, inner })
    }
}
