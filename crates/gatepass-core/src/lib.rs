//! # Gatepass Core
//!
//! Bearer credential issuance and verification for a small HTTP service.
//!
//! This crate provides:
//! - Identity records with Argon2 password hashes and a read-only identity store
//! - Credential validation (username/password to identity record)
//! - A signed, time-bounded token codec (HMAC JWT)
//! - The access gate that turns an `Authorization` header into verified claims
//! - `AuthService`, the boundary facade consumed by the HTTP layer
//! - Configuration loading (JSON5) with environment overrides

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod identity;
pub mod service;
pub mod token;

pub use config::{AuthConfig, AuthConfigBuilder, Config, ConfigError, ServerConfig};
pub use credentials::{CredentialValidator, IdentityLookup, IdentityStore};
pub use error::{AuthError, GateError, IdentityError, TokenError};
pub use gate::AccessGate;
pub use identity::{IdentityRecord, PublicIdentity, Role};
pub use service::{AuthService, LoginResponse};
pub use token::{Claims, SigningSecret, TokenCodec};
