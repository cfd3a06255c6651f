//! Configuration management for finview
//!
//! Handles loading and validation of finview configuration
//! from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the finance API (including the version prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

/// Login credentials (optional)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub email: String,
    pub password: String,
}

/// List display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows per page for the transaction list
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
        }
    }
}

fn default_rows_per_page() -> u32 {
    15
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Login credentials (optional)
    #[serde(default)]
    pub auth: Option<AuthConfig>,
    /// List display settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Page sizes the transaction list accepts
const ROWS_PER_PAGE_CHOICES: [u32; 4] = [15, 30, 50, 100];

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            message: e.to_string(),
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::InvalidYaml {
                message: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "base URL must not be empty".to_string(),
            });
        }

        if !ROWS_PER_PAGE_CHOICES.contains(&self.display.rows_per_page) {
            return Err(ConfigError::InvalidValue {
                field: "display.rows_per_page".to_string(),
                reason: format!(
                    "must be one of {:?}, got {}",
                    ROWS_PER_PAGE_CHOICES, self.display.rows_per_page
                ),
            });
        }

        Ok(())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.display.rows_per_page, 15);
        assert_eq!(config.logging.level, "info");
        assert!(config.auth.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
api:
  base_url: "https://finance.example.org/api/v1"
auth:
  email: "user@example.org"
  password: "secret"
display:
  rows_per_page: 50
logging:
  level: "debug"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://finance.example.org/api/v1");
        assert_eq!(config.auth.as_ref().unwrap().email, "user@example.org");
        assert_eq!(config.display.rows_per_page, 50);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = "api:\n  base_url: \"https://money.example.org/v1\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://money.example.org/v1");
        assert_eq!(config.display.rows_per_page, 15);
    }

    #[test]
    fn test_invalid_rows_per_page_rejected() {
        let yaml = "display:\n  rows_per_page: 42\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load("/nonexistent/finview.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }
}
