use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use gatepass_core::{AuthError, AuthService, Claims, Role};
use serde::Serialize;

/// Error returned by gateway handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Login with wrong credentials.
    InvalidCredentials,
    /// Gated route without a valid token.
    Unauthorized,
    /// Request body could not be understood.
    BadRequest(String),
    /// Server-side failure. The detail is logged, never returned.
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Unauthorized,
            AuthError::Internal(msg) => Self::Internal(msg),
        }
    }
}

/// Error body for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = match self {
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid username or password".to_string(),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Invalid or missing token".to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error, code })).into_response()
    }
}

/// Extractor for authenticated requests.
///
/// The only way a handler obtains claims: they come from a token that the
/// access gate has verified.
#[derive(Debug, Clone)]
pub struct RequireAuth {
    /// The verified claims.
    pub claims: Claims,
}

impl RequireAuth {
    /// Get the user ID.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.claims.user_id()
    }

    /// Get the username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.claims.username()
    }

    /// Get the role.
    #[must_use]
    pub const fn role(&self) -> &Role {
        self.claims.role()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Arc::<AuthService>::from_ref(state);

        let header = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => Some(value.to_str().map_err(|_| {
                tracing::debug!("Request rejected: non-ASCII authorization header");
                ApiError::Unauthorized
            })?),
        };

        let claims = auth.check_access(header)?;
        Ok(Self { claims })
    }
}
