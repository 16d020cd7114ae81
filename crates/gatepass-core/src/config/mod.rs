//! Configuration loading and validation.
//!
//! Config is JSON5 with camelCase keys. Location: `$GATEPASS_CONFIG`, or
//! `<config dir>/gatepass/gatepass.json5`.

mod auth;

pub use auth::{AuthConfig, AuthConfigBuilder};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::IdentityStore;
use crate::error::IdentityError;
use crate::identity::IdentityRecord;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON5 parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] json5::Error),

    /// Config validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing required field.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Identity material could not be loaded.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token and signing configuration.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Static identity list.
    #[serde(default)]
    pub users: Vec<UserEntry>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses `GATEPASS_CONFIG` if set.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("GATEPASS_CONFIG") {
            PathBuf::from(path)
        } else if let Some(dir) = dirs::config_dir() {
            dir.join("gatepass").join("gatepass.json5")
        } else {
            PathBuf::from("gatepass.json5")
        }
    }

    /// Apply environment variable overrides and validate the result.
    ///
    /// # Errors
    ///
    /// Returns error if an override value cannot be parsed or the overridden
    /// config is invalid.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        self.auth = self.auth.apply_overrides(&lookup)?;

        if let Some(port) = lookup("GATEPASS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Validation(format!("Invalid GATEPASS_PORT: {port}")))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "Server port cannot be 0".to_string(),
            ));
        }

        self.auth.validate()?;

        for (idx, user) in self.users.iter().enumerate() {
            if user.username.is_empty() {
                return Err(ConfigError::MissingField(format!("users[{idx}].username")));
            }
            if user.role.is_empty() {
                return Err(ConfigError::MissingField(format!("users[{idx}].role")));
            }
            user.to_record()?;
        }

        Ok(())
    }

    /// Build the read-only identity store from the `users` list.
    ///
    /// # Errors
    ///
    /// Returns error if a password hash is not a valid PHC string.
    pub fn identity_store(&self) -> Result<IdentityStore, ConfigError> {
        let records = self
            .users
            .iter()
            .map(UserEntry::to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IdentityStore::new(records))
    }

    /// Copy with the signing secret and password hashes masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.auth.signing_secret.is_some() {
            copy.auth.signing_secret = Some("[REDACTED]".to_string());
        }
        for user in &mut copy.users {
            user.password_hash = "[REDACTED]".to_string();
        }
        copy
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Enable permissive CORS.
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Directory holding the built frontend. Probed from defaults if unset.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            cors: true,
            static_dir: None,
            request_timeout_secs: default_timeout(),
        }
    }
}

const fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_timeout() -> u64 {
    30
}

/// One configured identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntry {
    /// Numeric identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Argon2 PHC hash (see `gatepass hash-password`).
    pub password_hash: String,
    /// Role tag.
    pub role: String,
}

impl UserEntry {
    fn to_record(&self) -> Result<IdentityRecord, IdentityError> {
        IdentityRecord::with_hash(
            self.id,
            self.username.as_str(),
            self.password_hash.as_str(),
            self.role.as_str(),
        )
    }
}
