//! Server configuration.
//!
//! Read from a TOML file (`blood-bank.toml` by default). Every section and
//! key is optional:
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//!
//! [database]
//! path = "blood-bank.db"
//!
//! [registration]
//! accepted_city = "Lahore"   # empty accepts every city
//!
//! [transfusions]
//! check_expiry = true
//! ```

use std::path::{Path, PathBuf};

use blood_bank_core::{CoreSettings, TransfusionPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub registration: RegistrationConfig,

    #[serde(default)]
    pub transfusions: TransfusionConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the host is blank.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation("server.host must not be empty".into()));
        }
        Ok(())
    }

    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Creation-time rules for the core facade.
    pub fn core_settings(&self) -> CoreSettings {
        let city = self.registration.accepted_city.trim();
        CoreSettings {
            accepted_city: (!city.is_empty()).then(|| city.to_string()),
            policy: TransfusionPolicy {
                check_expiry: self.transfusions.check_expiry,
            },
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file, created on first start.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("blood-bank.db")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Donors must live in a city containing this text. Empty disables the check.
    #[serde(default = "default_accepted_city")]
    pub accepted_city: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            accepted_city: default_accepted_city(),
        }
    }
}

fn default_accepted_city() -> String {
    "Lahore".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfusionConfig {
    /// Fail transfusions whose donor's latest donation has expired.
    #[serde(default = "default_check_expiry")]
    pub check_expiry: bool,
}

impl Default for TransfusionConfig {
    fn default() -> Self {
        Self {
            check_expiry: default_check_expiry(),
        }
    }
}

const fn default_check_expiry() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
