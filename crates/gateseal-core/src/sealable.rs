use std::collections::HashMap;
use std::sync::Arc;

use gateseal_types::{Address, Seconds};
use parking_lot::RwLock;

use crate::error::ResourceError;

/// A resource a GateSeal can pause.
///
/// Implementations are external and untrusted: a call may revert, report
/// success without pausing anything, or take a long time. The seal operation
/// copes with all three by confirming every pause with a fresh observation.
pub trait PausableResource: Send + Sync {
    /// Pause the resource for `duration` seconds. `Err` means the call reverted.
    fn pause_for(&self, duration: Seconds) -> Result<(), ResourceError>;

    /// Observe whether the resource is currently paused.
    ///
    /// `Err` means the state could not be observed, which a seal treats as
    /// "not paused".
    fn is_paused(&self) -> Result<bool, ResourceError>;

    /// Undo the most recent pause applied by `pause_for`.
    ///
    /// Called when a seal aborts after this resource accepted its pause.
    /// Resources that cannot take a pause back keep the default.
    fn undo_pause(&self) -> Result<(), ResourceError> {
        Err(ResourceError::Irreversible)
    }
}

/// Resolves sealable addresses to live resources.
pub trait SealableDirectory: Send + Sync {
    fn resolve(&self, address: &Address) -> Option<Arc<dyn PausableResource>>;
}

/// In-memory sealable directory.
#[derive(Default)]
pub struct SealableRegistry {
    resources: RwLock<HashMap<Address, Arc<dyn PausableResource>>>,
}

impl SealableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under `address`, replacing any previous registration.
    pub fn register(&self, address: Address, resource: Arc<dyn PausableResource>) {
        self.resources.write().insert(address, resource);
    }

    pub fn deregister(&self, address: &Address) -> Option<Arc<dyn PausableResource>> {
        self.resources.write().remove(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.resources.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

impl SealableDirectory for SealableRegistry {
    fn resolve(&self, address: &Address) -> Option<Arc<dyn PausableResource>> {
        self.resources.read().get(address).cloned()
    }
}
