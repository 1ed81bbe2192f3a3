//! Factory configuration: the template to provision from and the default
//! parameter set for new instances.
//!
//! ```toml
//! template = "0x5a1e..."
//!
//! [defaults]
//! committee = "0x8f2a..."
//! seal_duration = 604800
//! sealables = ["0x1111...", "0x2222..."]
//! lifetime_duration = 31536000
//! max_prolongations = 5
//! prolongation_window = 1209600
//! ```

use std::path::Path;
use std::sync::Arc;

use gateseal_core::{ConfigError, EventSink, GateSealError, GateSealParams};
use gateseal_types::Address;
use serde::{Deserialize, Serialize};

use crate::factory::GateSealFactory;
use crate::provisioner::InstanceProvisioner;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    pub template: Address,
    pub defaults: GateSealParams,
}

impl FactoryConfig {
    /// Parse from TOML without validating.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a TOML file and validate.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The template must not be null and the defaults must be constructible.
    pub fn validate(&self) -> Result<(), GateSealError> {
        if self.template.is_zero() {
            return Err(GateSealError::InvalidTemplate(self.template));
        }
        self.defaults.validate()
    }

    /// Build a factory for `template` whose `create_default` uses `defaults`.
    pub fn build(
        &self,
        provisioner: Arc<dyn InstanceProvisioner>,
        events: Arc<dyn EventSink>,
    ) -> Result<GateSealFactory, GateSealError> {
        self.validate()?;
        Ok(GateSealFactory::new(self.template, provisioner, events)?
            .with_defaults(self.defaults.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
template = "0x5a1e000000000000000000000000000000000001"

[defaults]
committee = "0x8f2a0c1b7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a"
seal_duration = 604800
sealables = [
    "0x1111111111111111111111111111111111111111",
    "0x2222222222222222222222222222222222222222",
]
lifetime_duration = 31536000
max_prolongations = 5
prolongation_window = 1209600
"#;

    #[test]
    fn parse_sample() {
        let config = FactoryConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(
            config.template.to_string(),
            "0x5a1e000000000000000000000000000000000001"
        );
        assert_eq!(config.defaults.sealables.len(), 2);
        assert_eq!(config.defaults.max_prolongations, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let config = FactoryConfig::from_toml(SAMPLE).unwrap();
        let back = FactoryConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn null_template_fails_validation() {
        let mut config = FactoryConfig::from_toml(SAMPLE).unwrap();
        config.template = Address::ZERO;
        assert_eq!(
            config.validate(),
            Err(GateSealError::InvalidTemplate(Address::ZERO))
        );
    }

    #[test]
    fn from_file_validates_defaults() {
        let broken = SAMPLE.replace("max_prolongations = 5", "max_prolongations = 6");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(broken.as_bytes()).unwrap();

        let err = FactoryConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(GateSealError::TooManyProlongations { actual: 6, max: 5 })
        ));
    }

    #[test]
    fn missing_section_is_parse_error() {
        let err = FactoryConfig::from_toml("template = \"0x5a1e000000000000000000000000000000000001\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
