//! # Gatepass Gateway
//!
//! HTTP front for the gatepass core: login, gated API routes, CORS and the
//! static frontend.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Request authentication and error responses.
pub mod auth;
mod server;

pub use auth::{ApiError, RequireAuth};
pub use server::{Gateway, GatewayState, resolve_static_dir, router};

/// Start the gateway server.
///
/// # Errors
///
/// Returns error if server fails to start.
pub async fn start(gateway: Gateway) -> Result<(), GatewayError> {
    gateway.run().await
}

/// Gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
