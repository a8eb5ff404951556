//! Gateway configuration file and environment support.
//!
//! Settings come from three layers, each overriding the previous one:
//! built-in defaults, an optional `reachscope.toml` file, and the
//! `REACHSCOPE_BASE_URL` / `REACHSCOPE_TIMEOUT_SECS` environment
//! variables.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::error::GatewayError;

/// Connection settings for the HTTP gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// File wrapper: settings live under a `[gateway]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    gateway: Option<GatewayConfig>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        GatewayConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Load gateway configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GatewayError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            GatewayError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| {
            GatewayError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(file.gateway.unwrap_or_default())
    }

    /// Load configuration from the default locations, then apply
    /// environment overrides.
    ///
    /// Searches for `reachscope.toml` in the current directory and the
    /// parent directory; a missing file is not an error, the defaults
    /// simply apply.
    pub fn load() -> Result<Self, GatewayError> {
        let search_paths = vec![
            PathBuf::from("reachscope.toml"),
            PathBuf::from("../reachscope.toml"),
        ];

        let mut config = GatewayConfig::default();
        for path in search_paths {
            if path.exists() {
                config = Self::from_file(&path)?;
                break;
            }
        }
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overlay `REACHSCOPE_*` environment variables onto this config.
    pub fn apply_env_overrides(&mut self) -> Result<(), GatewayError> {
        if let Ok(base_url) = std::env::var("REACHSCOPE_BASE_URL") {
            if !base_url.is_empty() {
                self.base_url = base_url;
            }
        }
        if let Ok(raw) = std::env::var("REACHSCOPE_TIMEOUT_SECS") {
            if !raw.is_empty() {
                self.timeout_secs = raw.parse().map_err(|_| {
                    GatewayError::configuration(format!(
                        "REACHSCOPE_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Validate settings that cannot be checked by the type system.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.base_url.is_empty() {
            return Err(GatewayError::configuration("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(GatewayError::configuration(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(GatewayError::configuration("timeout_secs must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[gateway]
base_url = "https://city.example.org/api"
timeout_secs = 10
"#;

        let file: ConfigFile = toml::from_str(toml).unwrap();
        let config = file.gateway.unwrap();
        assert_eq!(config.base_url, "https://city.example.org/api");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let toml = r#"
[gateway]
base_url = "http://backend:9000"
"#;

        let file: ConfigFile = toml::from_str(toml).unwrap();
        let config = file.gateway.unwrap();
        assert_eq!(config.base_url, "http://backend:9000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert!(file.gateway.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = GatewayConfig::default();
        config.base_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        config.base_url = String::new();
        assert!(config.validate().is_err());

        config = GatewayConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
