//! Finalization settings.
//!
//! Loaded from TOML or built in code. Every field has a default, so an
//! empty document is a valid configuration:
//!
//! ```toml
//! max_passes = 8
//! discover_keys = true
//! index_foreign_keys = true
//! provider = "sqlite"   # "sqlite" | "postgres" | "sql_server"
//! ```

use crate::mapping::provider::ProviderKind;
use serde::Deserialize;
use thiserror::Error as ThisError;

pub const DEFAULT_MAX_PASSES: u32 = 8;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to parse finalize config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid finalize config: {0}")]
    Invalid(String),
}

///
/// FinalizeConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FinalizeConfig {
    /// Upper bound on full convention passes before finalization gives up.
    pub max_passes: u32,

    pub discover_keys: bool,
    pub index_foreign_keys: bool,
    pub provider: ProviderKind,
}

impl Default for FinalizeConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            discover_keys: true,
            index_foreign_keys: true,
            provider: ProviderKind::default(),
        }
    }
}

impl FinalizeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_passes == 0 {
            return Err(ConfigError::Invalid("max_passes must be at least 1".to_string()));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    #[must_use]
    pub const fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorClass, ErrorOrigin, InternalError};

    #[test]
    fn empty_document_yields_defaults() {
        let config = FinalizeConfig::from_toml_str("").expect("defaults");

        assert_eq!(config, FinalizeConfig::default());
        assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
        assert_eq!(config.provider, ProviderKind::Sqlite);
    }

    #[test]
    fn fields_override_defaults() {
        let config = FinalizeConfig::from_toml_str(
            "max_passes = 3\nprovider = \"sql_server\"\nindex_foreign_keys = false\n",
        )
        .expect("config");

        assert_eq!(config.max_passes, 3);
        assert_eq!(config.provider, ProviderKind::SqlServer);
        assert!(!config.index_foreign_keys);
        assert!(config.discover_keys);
    }

    #[test]
    fn zero_passes_is_rejected_as_an_argument_error() {
        let err = FinalizeConfig::from_toml_str("max_passes = 0").expect_err("zero");
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = InternalError::from(err);
        assert_eq!(err.class, ErrorClass::InvalidArgument);
        assert_eq!(err.origin, ErrorOrigin::Config);
    }

    #[test]
    fn unknown_fields_and_providers_fail_to_parse() {
        assert!(matches!(
            FinalizeConfig::from_toml_str("passes = 2"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            FinalizeConfig::from_toml_str("provider = \"oracle\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            FinalizeConfig::from_toml_str("require_type_mappings = false"),
            Err(ConfigError::Parse(_))
        ));
    }
}
