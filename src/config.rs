//! Configuration management for `nomenclator`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::NomenclatorError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the reverse geocoding API key
pub const LOCATOR_API_KEY_VAR: &str = "LOCATOR_API_KEY";
/// Environment variable holding the weather API key
pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NomenclatorConfig {
    /// Reverse geocoding API configuration
    pub locator: LocatorConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Reverse geocoding (positionstack) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorConfig {
    pub api_key: Option<String>,
    /// Base URL for the geocoding API
    #[serde(default = "default_locator_base_url")]
    pub base_url: String,
    /// Maximum number of results requested per lookup, 0 for the API default
    #[serde(default = "default_locator_limit")]
    pub limit: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Historical weather (Visual Crossing) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    /// Base URL for the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Response elements requested from the API
    #[serde(default = "default_weather_elements")]
    pub elements: Vec<String>,
    /// Unit group (metric, UK or US)
    #[serde(default = "default_unit_group")]
    pub unit_group: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_locator_base_url() -> String {
    "http://api.positionstack.com/v1".to_string()
}

fn default_locator_limit() -> u32 {
    1
}

fn default_weather_base_url() -> String {
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services".to_string()
}

fn default_weather_elements() -> Vec<String> {
    ["datetime", "datetimeEpoch", "conditions"]
        .iter()
        .map(|e| (*e).to_string())
        .collect()
}

fn default_unit_group() -> String {
    "metric".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_locator_base_url(),
            limit: default_locator_limit(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            elements: default_weather_elements(),
            unit_group: default_unit_group(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl NomenclatorConfig {
    /// Load configuration from a file (or the default location) and environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // NOMENCLATOR_WEATHER__UNIT_GROUP=US and friends
        builder = builder.add_source(
            Environment::with_prefix("NOMENCLATOR")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("weather.elements")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: NomenclatorConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_api_keys();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nomenclator").join("config.toml"))
    }

    /// Take API keys from `LOCATOR_API_KEY` / `WEATHER_API_KEY` when set
    pub fn apply_env_api_keys(&mut self) {
        if let Ok(key) = std::env::var(LOCATOR_API_KEY_VAR) {
            self.locator.api_key = Some(key);
        }
        if let Ok(key) = std::env::var(WEATHER_API_KEY_VAR) {
            self.weather.api_key = Some(key);
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.locator.base_url.is_empty() {
            self.locator.base_url = default_locator_base_url();
        }
        if self.locator.timeout_seconds == 0 {
            self.locator.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.elements.is_empty() {
            self.weather.elements = default_weather_elements();
        }
        if self.weather.unit_group.is_empty() {
            self.weather.unit_group = default_unit_group();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Both lookups need a key; fail naming the variable that is missing
    pub fn require_api_keys(&self) -> Result<(), NomenclatorError> {
        let missing = |key: &Option<String>| key.as_deref().is_none_or(str::is_empty);

        if missing(&self.locator.api_key) {
            return Err(NomenclatorError::config(format!(
                "{LOCATOR_API_KEY_VAR} env var not set. Please set a valid API key"
            )));
        }
        if missing(&self.weather.api_key) {
            return Err(NomenclatorError::config(format!(
                "{WEATHER_API_KEY_VAR} env var not set. Please set a valid API key"
            )));
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.locator.timeout_seconds > 300 || self.weather.timeout_seconds > 300 {
            return Err(NomenclatorError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.locator.limit > 80 {
            return Err(NomenclatorError::config("Locator result limit cannot exceed 80").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(NomenclatorError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(NomenclatorError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_unit_groups = ["metric", "UK", "US"];
        if !valid_unit_groups.contains(&self.weather.unit_group.as_str()) {
            return Err(NomenclatorError::config(format!(
                "Invalid unit group '{}'. Must be one of: {}",
                self.weather.unit_group,
                valid_unit_groups.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Locator", &self.locator.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(NomenclatorError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = NomenclatorConfig::default();
        assert_eq!(config.locator.base_url, "http://api.positionstack.com/v1");
        assert_eq!(config.locator.limit, 1);
        assert_eq!(config.weather.unit_group, "metric");
        assert_eq!(
            config.weather.elements,
            vec!["datetime", "datetimeEpoch", "conditions"]
        );
        assert_eq!(config.logging.level, "warn");
        assert!(config.locator.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_require_api_keys() {
        let mut config = NomenclatorConfig::default();
        let err = config.require_api_keys().unwrap_err();
        assert!(err.to_string().contains(LOCATOR_API_KEY_VAR));

        config.locator.api_key = Some("locator_key".to_string());
        config.weather.api_key = Some(String::new());
        let err = config.require_api_keys().unwrap_err();
        assert!(err.to_string().contains(WEATHER_API_KEY_VAR));

        config.weather.api_key = Some("weather_key".to_string());
        assert!(config.require_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = NomenclatorConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_unit_group() {
        let mut config = NomenclatorConfig::default();
        config.weather.unit_group = "imperial".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid unit group"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = NomenclatorConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = NomenclatorConfig::default();
        config.locator.base_url = "api.positionstack.com".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Locator API base URL"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = NomenclatorConfig::default();
        config.weather.elements.clear();
        config.logging.format = String::new();
        config.locator.timeout_seconds = 0;

        config.apply_defaults();

        assert_eq!(config.weather.elements.len(), 3);
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.locator.timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[locator]
limit = 5

[weather]
unit_group = "US"
elements = ["conditions"]

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = NomenclatorConfig::load_from_path(Some(path)).unwrap();
        assert_eq!(config.locator.limit, 5);
        assert_eq!(config.locator.base_url, "http://api.positionstack.com/v1");
        assert_eq!(config.weather.unit_group, "US");
        assert_eq!(config.weather.elements, vec!["conditions"]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = NomenclatorConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("nomenclator"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
