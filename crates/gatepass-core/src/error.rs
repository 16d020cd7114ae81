//! Error taxonomy for credential validation, token handling and gating.

use thiserror::Error;

/// Token codec errors.
///
/// These are internal diagnostics. At the service boundary every variant
/// except [`TokenError::Signing`] collapses into [`AuthError::Unauthorized`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong number of segments, or a segment that is not valid base64url.
    #[error("Malformed token")]
    MalformedToken,

    /// Signature does not match the header and payload.
    #[error("Bad signature")]
    BadSignature,

    /// Signature verified but the payload is not well-formed claims.
    #[error("Malformed claims")]
    MalformedClaims,

    /// Token is past its expiry.
    #[error("Token expired")]
    Expired,

    /// The signing step itself could not complete.
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Access gate errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// No credential header was supplied.
    #[error("Missing authorization header")]
    MissingHeader,

    /// Header is not exactly `Bearer <token>`.
    #[error("Invalid authorization format")]
    MalformedHeader,

    /// Token verification failed.
    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),
}

/// Errors raised while building identity records.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    Hash(String),

    /// A stored password hash is not a valid PHC string.
    #[error("Invalid password hash for '{username}': {reason}")]
    InvalidHash {
        /// Owner of the hash.
        username: String,
        /// Parser message.
        reason: String,
    },
}

/// Errors visible to the HTTP-layer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Wrong credentials, or any gate/verification failure.
    #[error("Unauthorized")]
    Unauthorized,

    /// Operational fault (e.g. token signing failed).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GateError> for AuthError {
    fn from(_: GateError) -> Self {
        Self::Unauthorized
    }
}
