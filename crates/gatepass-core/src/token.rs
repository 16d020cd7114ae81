//! Signed, time-bounded bearer tokens.
//!
//! Wire format: `base64url(header).base64url(payload).base64url(signature)`,
//! unpadded. The header is `{"typ":"JWT","alg":"HS256"}` (or the configured
//! HMAC algorithm) and the signature is the HMAC of `header.payload` keyed by
//! the signing secret.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, decode_header,
    encode,
};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::TokenError;
use crate::identity::{IdentityRecord, Role};

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Process-wide key used to sign and check tokens.
pub struct SigningSecret(SecretBox<[u8]>);

impl SigningSecret {
    /// Wrap raw key bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(SecretBox::new(bytes.into_boxed_slice()))
    }

    /// Decode a hex-encoded secret.
    ///
    /// # Errors
    ///
    /// Returns error if decoding fails or the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn from_hex(hex_secret: &str) -> Result<Self, ConfigError> {
        let bytes = hex::decode(hex_secret.trim())
            .map_err(|e| ConfigError::Validation(format!("Invalid hex signing secret: {e}")))?;

        if bytes.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Validation(format!(
                "Signing secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        Ok(Self::new(bytes))
    }

    /// Generate a random 256-bit secret.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Generate a random 256-bit secret as a hex string.
    #[must_use]
    pub fn generate_hex() -> String {
        hex::encode(Self::generate().expose())
    }

    /// Expose the key bytes.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret([REDACTED])")
    }
}

/// Identity and timing facts carried inside a verified token.
///
/// Only produced by [`TokenCodec::issue`] or [`TokenCodec::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claims {
    user_id: i64,
    username: String,
    role: Role,
    exp: i64,
    iat: i64,
    sub: String,
}

impl Claims {
    /// Numeric identity id.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Role tag.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Expiry (Unix seconds).
    #[must_use]
    pub const fn expires_at(&self) -> i64 {
        self.exp
    }

    /// Issued at (Unix seconds).
    #[must_use]
    pub const fn issued_at(&self) -> i64 {
        self.iat
    }

    /// Subject (string form of the id).
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }
}

/// Payload as it appears on the wire.
#[derive(Serialize, Deserialize)]
struct WireClaims {
    user_id: i64,
    username: String,
    role: Role,
    exp: i64,
    iat: i64,
    sub: String,
}

impl From<WireClaims> for Claims {
    fn from(wire: WireClaims) -> Self {
        Self {
            user_id: wire.user_id,
            username: wire.username,
            role: wire.role,
            exp: wire.exp,
            iat: wire.iat,
            sub: wire.sub,
        }
    }
}

/// Issues and verifies tokens with a single HMAC key.
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenCodec {
    /// Create a codec.
    ///
    /// # Errors
    ///
    /// Returns error if `algorithm` is not HMAC-based or `ttl` is zero or
    /// out of range.
    pub fn new(
        secret: &SigningSecret,
        algorithm: Algorithm,
        ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(ConfigError::Validation(format!(
                "Unsupported signing algorithm: {algorithm:?}"
            )));
        }

        let ttl_secs = i64::try_from(ttl.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError::Validation("Token TTL must be positive".to_string()))?;

        // Expiry is checked against the caller's clock in `verify`.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
            ttl_secs,
        })
    }

    /// Signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Token lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.unsigned_abs())
    }

    /// Mint a token for `identity`, valid from `now` for the configured TTL.
    ///
    /// `now` is truncated to whole seconds. Returns the token and its expiry.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(
        &self,
        identity: &IdentityRecord,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let iat = now.timestamp();
        let exp = iat
            .checked_add(self.ttl_secs)
            .ok_or_else(|| TokenError::Signing("Expiry out of range".to_string()))?;
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| TokenError::Signing("Expiry out of range".to_string()))?;

        let claims = WireClaims {
            user_id: identity.id(),
            username: identity.username().to_string(),
            role: identity.role().clone(),
            exp,
            iat,
            sub: identity.id().to_string(),
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(format!("Encoding failed: {e}")))?;

        Ok((token, expires_at))
    }

    /// Verify `token` at instant `now` and return its claims.
    ///
    /// Order: structure, signature, claims shape, expiry. The payload is
    /// never interpreted before the signature has been checked.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`TokenError`].
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        check_structure(token)?;

        let data: TokenData<WireClaims> = decode(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(&e))?;
        let claims = Claims::from(data.claims);

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

/// Three non-empty base64url segments and a parseable header.
fn check_structure(token: &str) -> Result<(), TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::MalformedToken);
    }

    for segment in &segments {
        if segment.is_empty() || URL_SAFE_NO_PAD.decode(segment).is_err() {
            return Err(TokenError::MalformedToken);
        }
    }

    decode_header(token).map_err(|_| TokenError::MalformedToken)?;
    Ok(())
}

/// Map a decode failure that happened after the structural check.
fn classify(err: &jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidToken => TokenError::MalformedToken,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
            TokenError::BadSignature
        }
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::MalformedClaims,
    }
}
