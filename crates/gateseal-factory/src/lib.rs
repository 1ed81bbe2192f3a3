//! GateSeal factory: validate-then-provision.
//!
//! Data flows one way: the factory validates a parameter set with the same
//! rules direct construction uses, then asks an [`InstanceProvisioner`] to
//! materialize the instance from the factory's template, records it, and emits
//! a `GateSealCreated` record. Created instances operate independently of the
//! factory thereafter.

pub mod config;
pub mod factory;
pub mod provisioner;

pub use config::FactoryConfig;
pub use factory::GateSealFactory;
pub use provisioner::{InstanceProvisioner, TemplateProvisioner};
