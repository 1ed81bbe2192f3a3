use std::collections::HashMap;

use gateseal_core::{GateSeal, GateSealError, GateSealParams, SealEnvironment};
use gateseal_types::Address;
use parking_lot::RwLock;
use tracing::debug;

/// Materializes a new GateSeal instance from a template.
///
/// How an instance is physically provisioned is up to the implementation. The
/// factory only relies on this contract:
/// - an unknown or unusable template fails with [`GateSealError::InvalidTemplate`]
/// - the returned instance carries `id`, the given parameters, no used
///   prolongations and an expiry of `now + lifetime_duration`
pub trait InstanceProvisioner: Send + Sync {
    fn provision(
        &self,
        template: &Address,
        id: Address,
        params: GateSealParams,
    ) -> Result<GateSeal, GateSealError>;
}

/// In-memory provisioner: each registered template is bound to the
/// environment its instances run in.
#[derive(Default)]
pub struct TemplateProvisioner {
    templates: RwLock<HashMap<Address, SealEnvironment>>,
}

impl TemplateProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template`, replacing any previous binding.
    pub fn register_template(&self, template: Address, env: SealEnvironment) {
        self.templates.write().insert(template, env);
    }

    pub fn deregister_template(&self, template: &Address) -> bool {
        self.templates.write().remove(template).is_some()
    }

    pub fn has_template(&self, template: &Address) -> bool {
        self.templates.read().contains_key(template)
    }
}

impl InstanceProvisioner for TemplateProvisioner {
    fn provision(
        &self,
        template: &Address,
        id: Address,
        params: GateSealParams,
    ) -> Result<GateSeal, GateSealError> {
        let env = self
            .templates
            .read()
            .get(template)
            .cloned()
            .ok_or(GateSealError::InvalidTemplate(*template))?;
        debug!(template = %template, instance = %id, "Provisioning instance");
        GateSeal::new(id, params, env)
    }
}
