//! Boundary facade consumed by the HTTP layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AuthConfig, ConfigError};
use crate::credentials::{CredentialValidator, IdentityLookup};
use crate::error::{AuthError, TokenError};
use crate::gate::AccessGate;
use crate::identity::PublicIdentity;
use crate::token::{Claims, SigningSecret, TokenCodec};

/// Successful login result. Carries no password material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Token expiration.
    pub expires_at: DateTime<Utc>,
    /// The authenticated identity.
    pub user: PublicIdentity,
}

/// Login and access checks over a validator, codec and gate.
#[derive(Debug, Clone)]
pub struct AuthService {
    validator: CredentialValidator,
    codec: Arc<TokenCodec>,
    gate: AccessGate,
}

impl AuthService {
    /// Wire the service from config and an identity lookup.
    ///
    /// A missing signing secret is replaced by a random one.
    ///
    /// # Errors
    ///
    /// Returns error if the config is invalid.
    pub fn new(
        config: &AuthConfig,
        lookup: impl IdentityLookup + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let secret = if let Some(secret) = config.signing_secret()? {
            secret
        } else {
            tracing::warn!(
                "No signing secret configured; generated a random one. Tokens will not survive a restart"
            );
            SigningSecret::generate()
        };

        let codec = Arc::new(TokenCodec::new(&secret, config.algorithm, config.token_ttl())?);
        let validator = CredentialValidator::new(Arc::new(lookup))?;

        Ok(Self {
            validator,
            gate: AccessGate::new(codec.clone()),
            codec,
        })
    }

    /// Authenticate and mint a token.
    ///
    /// # Errors
    ///
    /// See [`AuthService::login_at`].
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, AuthError> {
        self.login_at(username, password, Utc::now())
    }

    /// Authenticate and mint a token valid from `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] on wrong credentials and
    /// [`AuthError::Internal`] if signing fails.
    pub fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginResponse, AuthError> {
        let Some(identity) = self.validator.validate(username, password) else {
            tracing::warn!(username, "Login failed: invalid credentials");
            return Err(AuthError::Unauthorized);
        };

        let (token, expires_at) = self.codec.issue(&identity, now).map_err(|e| {
            tracing::error!(error = %e, "Token issue failed");
            match e {
                TokenError::Signing(msg) => AuthError::Internal(msg),
                other => AuthError::Internal(other.to_string()),
            }
        })?;

        tracing::info!(username, user_id = identity.id(), "Login succeeded");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            user: identity.to_public(),
        })
    }

    /// Gate a request by its `Authorization` header value.
    ///
    /// # Errors
    ///
    /// See [`AuthService::check_access_at`].
    pub fn check_access(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        self.check_access_at(header, Utc::now())
    }

    /// Gate a request at instant `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] for every rejection; the reason is
    /// only logged.
    pub fn check_access_at(
        &self,
        header: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        self.gate.check(header, now).map_err(|reason| {
            tracing::debug!(%reason, "Request rejected");
            AuthError::from(reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use crate::credentials::IdentityStore;

    const T0: i64 = 1_700_000_000;

    fn service() -> AuthService {
        let config = AuthConfig::builder()
            .signing_secret(SigningSecret::generate_hex())
            .build();
        AuthService::new(&config, IdentityStore::demo().unwrap()).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_login_success() {
        let service = service();
        let response = service.login_at("admin", "password", at(T0)).unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_at.timestamp(), T0 + 86400);
        assert_eq!(
            response.user,
            PublicIdentity {
                id: 1,
                username: "admin".to_string(),
                role: "admin".into(),
            }
        );
    }

    #[test]
    fn test_login_response_has_no_password() {
        let response = service().login("user", "userpass").unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["token"].is_string());
        assert_eq!(json["user"]["username"], "user");
        assert!(json["user"].get("password").is_none());
        assert!(!json.to_string().contains("userpass"));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let service = service();
        let wrong_password = service.login("admin", "userpass").unwrap_err();
        let unknown_user = service.login("nobody", "password").unwrap_err();
        let empty = service.login("", "").unwrap_err();

        assert_eq!(wrong_password, AuthError::Unauthorized);
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.to_string(), empty.to_string());
    }

    #[test]
    fn test_check_access_round_trip() {
        let service = service();
        let response = service.login_at("user", "userpass", at(T0)).unwrap();
        let header = format!("Bearer {}", response.token);

        let claims = service.check_access_at(Some(&header), at(T0 + 10)).unwrap();
        assert_eq!(claims.user_id(), response.user.id);
        assert_eq!(claims.username(), response.user.username);
        assert_eq!(claims.role(), &response.user.role);
    }

    #[test]
    fn test_check_access_rejections() {
        let service = service();
        for header in [Some("Bearer garbage"), Some("Token xyz"), Some(""), None] {
            assert_eq!(
                service.check_access_at(header, at(T0)),
                Err(AuthError::Unauthorized),
                "{header:?}"
            );
        }
    }

    #[test]
    fn test_check_access_after_expiry() {
        let service = service();
        let response = service.login_at("admin", "password", at(T0)).unwrap();
        let header = format!("Bearer {}", response.token);

        assert!(service.check_access_at(Some(&header), at(T0 + 86399)).is_ok());
        assert_eq!(
            service.check_access_at(Some(&header), at(T0 + 86400)),
            Err(AuthError::Unauthorized)
        );
    }

    #[test]
    fn test_tokens_not_shared_across_secrets() {
        let a = service();
        let b = service();
        let response = a.login("admin", "password").unwrap();
        let header = format!("Bearer {}", response.token);

        assert!(a.check_access(Some(&header)).is_ok());
        assert_eq!(b.check_access(Some(&header)), Err(AuthError::Unauthorized));
    }

    #[test]
    fn test_generated_secret_when_unset() {
        let service =
            AuthService::new(&AuthConfig::default(), IdentityStore::demo().unwrap()).unwrap();
        let response = service.login("admin", "password").unwrap();
        assert!(
            service
                .check_access(Some(&format!("Bearer {}", response.token)))
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AuthConfig::builder().token_ttl_secs(0).build();
        assert!(AuthService::new(&config, IdentityStore::default()).is_err());
    }
}
