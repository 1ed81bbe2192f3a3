use std::collections::HashMap;
use std::sync::Arc;

use gateseal_core::{validate_params, EventSink, GateSealError, GateSealParams, SharedGateSeal};
use gateseal_types::{Address, GateSealCreated};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::provisioner::InstanceProvisioner;

/// Creates GateSeal instances from a single template.
///
/// `create` re-validates the parameters, derives the next instance id from
/// `(template, nonce)`, and hands the rest to the provisioner. The nonce only
/// advances on success, so a failed creation leaves no trace.
///
/// The bookkeeping lock is never held across the provisioner call, so a
/// provisioner may freely read the factory it serves.
pub struct GateSealFactory {
    template: Address,
    provisioner: Arc<dyn InstanceProvisioner>,
    events: Arc<dyn EventSink>,
    defaults: Option<GateSealParams>,
    state: Mutex<FactoryState>,
}

#[derive(Default)]
struct FactoryState {
    nonce: u64,
    order: Vec<Address>,
    instances: HashMap<Address, SharedGateSeal>,
}

impl GateSealFactory {
    pub fn new(
        template: Address,
        provisioner: Arc<dyn InstanceProvisioner>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, GateSealError> {
        if template.is_zero() {
            return Err(GateSealError::InvalidTemplate(template));
        }
        info!(template = %template, "GateSeal factory ready");
        Ok(Self {
            template,
            provisioner,
            events,
            defaults: None,
            state: Mutex::new(FactoryState::default()),
        })
    }

    pub fn template(&self) -> Address {
        self.template
    }

    /// Pre-flight check with the same rules `create` enforces. Touches no state.
    pub fn validate_params(&self, params: &GateSealParams) -> bool {
        validate_params(params)
    }

    /// Default parameter set used by [`create_default`](Self::create_default).
    pub fn with_defaults(mut self, defaults: GateSealParams) -> Self {
        self.defaults = Some(defaults);
        self
    }

    pub fn defaults(&self) -> Option<&GateSealParams> {
        self.defaults.as_ref()
    }

    /// Validate `params` and provision a new instance, returning its id.
    pub fn create(&self, params: GateSealParams) -> Result<Address, GateSealError> {
        if let Err(e) = params.validate() {
            warn!(template = %self.template, error = %e, "Rejected GateSeal parameters");
            return Err(e);
        }

        loop {
            let nonce = self.state.lock().nonce;
            let id = Address::derive_instance(&self.template, nonce);
            let seal = self.provisioner.provision(&self.template, id, params.clone())?;
            if seal.id() != id {
                warn!(expected = %id, actual = %seal.id(), "Provisioner returned a foreign instance");
                return Err(GateSealError::InvalidTemplate(self.template));
            }

            let mut state = self.state.lock();
            if state.nonce != nonce {
                // Another creation took this id while we were provisioning.
                debug!(instance = %id, "Nonce moved during provisioning, retrying");
                continue;
            }
            state.nonce += 1;
            state.order.push(id);
            state.instances.insert(id, SharedGateSeal::new(seal));
            drop(state);

            self.events
                .emit(GateSealCreated { new_instance_id: id }.into());
            info!(template = %self.template, instance = %id, "GateSeal created");

            return Ok(id);
        }
    }

    /// Create an instance from the default parameter set.
    pub fn create_default(&self) -> Result<Address, GateSealError> {
        let params = self.defaults.clone().ok_or(GateSealError::MissingDefaults)?;
        self.create(params)
    }

    pub fn instance(&self, id: &Address) -> Option<SharedGateSeal> {
        self.state.lock().instances.get(id).cloned()
    }

    /// Every created instance id, oldest first.
    pub fn instances(&self) -> Vec<Address> {
        self.state.lock().order.clone()
    }

    pub fn instance_count(&self) -> usize {
        self.state.lock().order.len()
    }
}

impl std::fmt::Debug for GateSealFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateSealFactory")
            .field("template", &self.template)
            .field("instances", &self.instance_count())
            .finish_non_exhaustive()
    }
}
