//! Main configuration types.

use hypatia_core::{BodyShortcut, PathParamPolicy, SignatureOptions};
use hypatia_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Complete Hypatia configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use hypatia_config::HypatiaConfig;
/// use hypatia_core::PathParamPolicy;
///
/// let config = HypatiaConfig::default();
/// assert_eq!(config.signature.path_params, PathParamPolicy::Warn);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HypatiaConfig {
    /// Signature analysis options.
    #[serde(default)]
    pub signature: SignatureOptions,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LogConfig,
}

impl HypatiaConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the log filter does not parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging
            .validate()
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))
    }

    /// Development preset: pretty logs, analysis debug events, and unread
    /// path names reported as warnings.
    ///
    /// # Example
    ///
    /// ```
    /// use hypatia_config::HypatiaConfig;
    ///
    /// let config = HypatiaConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            signature: SignatureOptions::default(),
            logging: LogConfig::development(),
        }
    }

    /// Production preset: JSON logs, and unread path names fail registration.
    ///
    /// # Example
    ///
    /// ```
    /// use hypatia_config::HypatiaConfig;
    /// use hypatia_core::PathParamPolicy;
    ///
    /// let config = HypatiaConfig::production();
    /// assert_eq!(config.signature.path_params, PathParamPolicy::Deny);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        Self {
            signature: SignatureOptions::default()
                .with_body_shortcut(BodyShortcut::AnyField)
                .with_path_params(PathParamPolicy::Deny),
            logging: LogConfig::production(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HypatiaConfig::default().validate().is_ok());
        assert!(HypatiaConfig::development().validate().is_ok());
        assert!(HypatiaConfig::production().validate().is_ok());
    }

    #[test]
    fn test_invalid_level() {
        let mut config = HypatiaConfig::default();
        config.logging.level = "hypatia=loud".to_string();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<HypatiaConfig, _> = toml::from_str("[server]\nport = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = HypatiaConfig::production();
        let text = toml::to_string(&config).unwrap();
        let parsed: HypatiaConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
