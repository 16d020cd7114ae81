//! Gateway server.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{FromRef, State, rejection::JsonRejection},
    http::{Method, header},
    routing::{get, post},
};
use gatepass_core::{AuthError, AuthService, LoginResponse, ServerConfig};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::GatewayError;
use crate::auth::{ApiError, RequireAuth};

/// Frontend build locations probed when none is configured.
const STATIC_DIR_CANDIDATES: [&str; 2] = ["./frontend/dist", "../frontend/dist"];

/// State shared across handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Login and access checks.
    pub auth: Arc<AuthService>,
}

impl FromRef<GatewayState> for Arc<AuthService> {
    fn from_ref(state: &GatewayState) -> Self {
        state.auth.clone()
    }
}

/// Gateway server.
#[derive(Debug)]
pub struct Gateway {
    config: ServerConfig,
    state: GatewayState,
}

impl Gateway {
    /// Create a gateway over a configured auth service.
    #[must_use]
    pub const fn new(config: ServerConfig, auth: Arc<AuthService>) -> Self {
        Self {
            config,
            state: GatewayState { auth },
        }
    }

    /// Socket address from the configured bind address and port.
    ///
    /// # Errors
    ///
    /// Returns error if the bind address is not an IP address.
    pub fn address(&self) -> Result<SocketAddr, GatewayError> {
        let ip: IpAddr = self
            .config
            .bind_address
            .parse()
            .map_err(|e| GatewayError::Config(format!("Invalid bind address: {e}")))?;
        Ok(SocketAddr::new(ip, self.config.port))
    }

    /// Run the gateway server until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns error if binding or serving fails.
    pub async fn run(self) -> Result<(), GatewayError> {
        let addr = self.address()?;
        let app = router(self.state, &self.config);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Gateway listening on http://{}", addr);
        tracing::info!("  GET  /api/hello       public");
        tracing::info!("  POST /api/auth/login  login");
        tracing::info!("  GET  /api/protected   requires bearer token");
        tracing::info!("  GET  /api/auth/me     requires bearer token");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Build the application router.
pub fn router(state: GatewayState, config: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/hello", get(hello_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/protected", get(protected_handler))
        .with_state(state);

    if let Some(dir) = resolve_static_dir(config.static_dir.as_deref()) {
        tracing::info!(dir = %dir.display(), "Serving static frontend");
        app = app.fallback_service(ServeDir::new(dir));
    }

    if config.cors {
        app = app.layer(cors_layer());
    }

    app.layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Pick the frontend directory: the configured one if it exists, else the
/// first existing default candidate.
#[must_use]
pub fn resolve_static_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        if dir.is_dir() {
            return Some(dir.to_path_buf());
        }
        tracing::warn!(dir = %dir.display(), "Configured static directory does not exist");
        return None;
    }

    STATIC_DIR_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_dir())
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn hello_handler() -> Json<Value> {
    Json(json!({
        "message": "Hello from gatepass!",
        "status": "running",
    }))
}

/// Login request body.
#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login_handler(
    State(state): State<GatewayState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Rejected login body");
        ApiError::BadRequest("Invalid JSON".to_string())
    })?;

    // Password hashing is CPU-bound; keep it off the async workers.
    let auth = state.auth.clone();
    let response =
        tokio::task::spawn_blocking(move || auth.login(&request.username, &request.password))
            .await
            .map_err(|e| ApiError::Internal(format!("Login task failed: {e}")))?
            .map_err(|e| match e {
                AuthError::Unauthorized => ApiError::InvalidCredentials,
                AuthError::Internal(msg) => ApiError::Internal(msg),
            })?;

    Ok(Json(response))
}

async fn me_handler(auth: RequireAuth) -> Json<Value> {
    Json(json!({
        "user_id": auth.user_id(),
        "username": auth.username(),
        "role": auth.role(),
        "expires_at": auth.claims.expires_at(),
    }))
}

async fn protected_handler(auth: RequireAuth) -> Json<Value> {
    Json(json!({
        "message": "This is a protected resource",
        "user_id": auth.user_id(),
        "username": auth.username(),
        "role": auth.role(),
    }))
}
