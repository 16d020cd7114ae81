//! Request-time access gate.
//!
//! Each call moves one request from unauthenticated to either authenticated
//! (verified claims) or rejected. The gate keeps no state between calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::GateError;
use crate::token::{Claims, TokenCodec};

/// Authorization scheme keyword.
pub const BEARER: &str = "Bearer";

/// Admits or rejects requests based on their `Authorization` header.
#[derive(Debug, Clone)]
pub struct AccessGate {
    codec: Arc<TokenCodec>,
}

impl AccessGate {
    /// Create a gate over a shared codec.
    #[must_use]
    pub const fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Check a raw header value at instant `now`.
    ///
    /// `None` and the empty string are both a missing header.
    ///
    /// # Errors
    ///
    /// Returns the internal rejection reason; callers must not echo it.
    pub fn check(&self, header: Option<&str>, now: DateTime<Utc>) -> Result<Claims, GateError> {
        let header = header
            .filter(|h| !h.is_empty())
            .ok_or(GateError::MissingHeader)?;
        let token = extract_bearer(header)?;

        Ok(self.codec.verify(token, now)?)
    }
}

/// Split `Bearer <token>` on single spaces; exactly two parts are accepted.
///
/// # Errors
///
/// Returns [`GateError::MalformedHeader`] for any other shape.
pub fn extract_bearer(header: &str) -> Result<&str, GateError> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER), Some(token), None) => Ok(token),
        _ => Err(GateError::MalformedHeader),
    }
}
