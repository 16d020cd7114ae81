//! Authentication configuration.

use std::time::Duration;

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::token::SigningSecret;

/// Default token lifetime in seconds (24 hours).
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 3600;

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Signing secret (hex-encoded). Auto-generated if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// HMAC signing algorithm.
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
}

const fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

const fn default_algorithm() -> Algorithm {
    Algorithm::HS256
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_secret: None,
            token_ttl_secs: default_token_ttl(),
            algorithm: default_algorithm(),
        }
    }
}

impl AuthConfig {
    /// Create a new auth config builder.
    #[must_use]
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Get token TTL as Duration.
    #[must_use]
    pub const fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Decode the configured signing secret, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the secret is not valid hex or too short.
    pub fn signing_secret(&self) -> Result<Option<SigningSecret>, ConfigError> {
        self.signing_secret
            .as_deref()
            .map(SigningSecret::from_hex)
            .transpose()
    }

    /// Validate the auth section.
    ///
    /// # Errors
    ///
    /// Returns error on a zero TTL, a non-HMAC algorithm, or a bad secret.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::Validation("Token TTL cannot be 0".to_string()));
        }

        if !matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Validation(format!(
                "Unsupported signing algorithm: {:?} (expected HS256, HS384 or HS512)",
                self.algorithm
            )));
        }

        self.signing_secret()?;
        Ok(())
    }

    /// Apply `GATEPASS_SIGNING_SECRET` and `GATEPASS_TOKEN_TTL_SECS` as
    /// resolved by `lookup`.
    pub(crate) fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(secret) = lookup("GATEPASS_SIGNING_SECRET") {
            self.signing_secret = Some(secret);
        }

        if let Some(ttl) = lookup("GATEPASS_TOKEN_TTL_SECS") {
            self.token_ttl_secs = ttl.parse().map_err(|_| {
                ConfigError::Validation(format!("Invalid GATEPASS_TOKEN_TTL_SECS: {ttl}"))
            })?;
        }

        Ok(self)
    }
}

/// Builder for `AuthConfig`.
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    config: AuthConfig,
}

impl AuthConfigBuilder {
    /// Set the hex-encoded signing secret.
    #[must_use]
    pub fn signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.signing_secret = Some(secret.into());
        self
    }

    /// Set token TTL in seconds.
    #[must_use]
    pub fn token_ttl_secs(mut self, secs: u64) -> Self {
        self.config.token_ttl_secs = secs;
        self
    }

    /// Set the signing algorithm.
    #[must_use]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Build the config.
    #[must_use]
    pub fn build(self) -> AuthConfig {
        self.config
    }
}
