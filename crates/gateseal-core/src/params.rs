use std::path::Path;

use gateseal_types::{Address, Seconds};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GateSealError};
use crate::validator;

/// Construction parameters of a GateSeal.
///
/// Fixed once an instance exists. The positional order of [`GateSealParams::new`]
/// matches the order callers pass them to a factory:
/// `committee, seal_duration, sealables, lifetime_duration, max_prolongations,
/// prolongation_window`.
///
/// Loadable from TOML, with addresses written as hex strings:
///
/// ```toml
/// committee = "0x8f2a0c1b7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a"
/// seal_duration = 604800
/// sealables = ["0x1111111111111111111111111111111111111111"]
/// lifetime_duration = 31536000
/// max_prolongations = 5
/// prolongation_window = 1209600
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealParams {
    /// The sole identity allowed to seal and prolong
    pub committee: Address,
    /// How long each resource is paused for when sealed
    pub seal_duration: Seconds,
    /// Resources this instance may pause, in significant order
    pub sealables: Vec<Address>,
    /// Added to "now" at construction and on every prolongation
    pub lifetime_duration: Seconds,
    /// Total prolongations ever allowed
    pub max_prolongations: u32,
    /// Trailing window before expiry in which a prolongation may be requested
    pub prolongation_window: Seconds,
}

impl GateSealParams {
    pub fn new(
        committee: Address,
        seal_duration: Seconds,
        sealables: Vec<Address>,
        lifetime_duration: Seconds,
        max_prolongations: u32,
        prolongation_window: Seconds,
    ) -> Self {
        Self {
            committee,
            seal_duration,
            sealables,
            lifetime_duration,
            max_prolongations,
            prolongation_window,
        }
    }

    /// Run the full validation, reporting the first violation.
    pub fn validate(&self) -> Result<(), GateSealError> {
        validator::check_params(self)
    }

    pub fn is_valid(&self) -> bool {
        validator::validate_params(self)
    }

    /// Load parameters from TOML. The result is parsed, not validated.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load parameters from a TOML file and validate them.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let params = Self::from_toml(&content)?;
        params.validate()?;
        Ok(params)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateseal_types::SECONDS_PER_DAY;
    use std::io::Write;

    const SAMPLE: &str = r#"
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
    fn parses_toml() {
        let params = GateSealParams::from_toml(SAMPLE).unwrap();
        assert_eq!(params.seal_duration, SECONDS_PER_DAY * 7);
        assert_eq!(params.sealables.len(), 2);
        assert_eq!(params.lifetime_duration, SECONDS_PER_DAY * 365);
        assert_eq!(params.max_prolongations, 5);
        assert_eq!(params.prolongation_window, SECONDS_PER_DAY * 14);
        assert!(params.is_valid());
    }

    #[test]
    fn toml_survives_serialization() {
        let params = GateSealParams::from_toml(SAMPLE).unwrap();
        let text = params.to_toml().unwrap();
        assert_eq!(GateSealParams::from_toml(&text).unwrap(), params);
    }

    #[test]
    fn rejects_malformed_address() {
        let bad = SAMPLE.replace(
            "0x8f2a0c1b7d6e5f4a3b2c1d0e9f8a7b6c5d4e3f2a",
            "0x8f2a",
        );
        assert!(matches!(
            GateSealParams::from_toml(&bad),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        assert!(GateSealParams::from_file(file.path()).is_ok());

        let invalid = SAMPLE.replace("max_prolongations = 5", "max_prolongations = 6");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(invalid.as_bytes()).unwrap();
        assert!(matches!(
            GateSealParams::from_file(file.path()),
            Err(ConfigError::Invalid(GateSealError::TooManyProlongations { .. }))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            GateSealParams::from_file("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
