//! Token command - inspect a bearer token.

use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use gatepass_core::{AuthConfig, Claims, TokenCodec, TokenError};

use crate::ui;

/// Verify a token against the configured secret and print its claims.
pub fn run_token_verify(token: &str, config_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(config_path)?;

    match verify_at(&config.auth, token, Utc::now())? {
        Ok(claims) => {
            ui::success("Token is valid");
            ui::kv("User ID", &claims.user_id().to_string());
            ui::kv("Username", claims.username());
            ui::kv("Role", claims.role().as_str());
            ui::kv("Issued", &format_timestamp(claims.issued_at()));
            ui::kv("Expires", &format_timestamp(claims.expires_at()));
        }
        Err(e) => {
            ui::error(&format!("Token rejected: {e}"));
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Verify with a codec built from `auth`.
///
/// The outer error is a config problem, the inner one a token rejection.
fn verify_at(
    auth: &AuthConfig,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Result<Claims, TokenError>> {
    let Some(secret) = auth.signing_secret()? else {
        bail!("No signing secret configured; set auth.signingSecret or GATEPASS_SIGNING_SECRET");
    };

    let codec = TokenCodec::new(&secret, auth.algorithm, auth.token_ttl())?;
    Ok(codec.verify(token.trim(), now))
}

fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map_or_else(|| secs.to_string(), |t| t.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatepass_core::{IdentityRecord, SigningSecret};

    fn config() -> AuthConfig {
        AuthConfig::builder()
            .signing_secret(SigningSecret::generate_hex())
            .build()
    }

    fn issue(auth: &AuthConfig, now: DateTime<Utc>) -> String {
        let secret = auth.signing_secret().unwrap().unwrap();
        let codec = TokenCodec::new(&secret, auth.algorithm, auth.token_ttl()).unwrap();
        let record = IdentityRecord::new(7, "ops", "pw", "admin").unwrap();
        codec.issue(&record, now).unwrap().0
    }

    #[test]
    fn test_verify_valid_token() {
        let auth = config();
        let now = Utc::now();
        let token = issue(&auth, now);

        let claims = verify_at(&auth, &token, now).unwrap().unwrap();
        assert_eq!(claims.user_id(), 7);
        assert_eq!(claims.username(), "ops");
    }

    #[test]
    fn test_verify_foreign_token() {
        let now = Utc::now();
        let token = issue(&config(), now);

        assert_eq!(
            verify_at(&config(), &token, now).unwrap(),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_verify_requires_secret() {
        assert!(verify_at(&AuthConfig::default(), "a.b.c", Utc::now()).is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00+00:00");
    }
}
