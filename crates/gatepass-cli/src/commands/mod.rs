//! CLI command implementations.

pub mod config;
pub mod hash;
pub mod serve;
pub mod status;
pub mod token;

pub use config::run_config;
pub use hash::{run_gen_secret, run_hash_password};
pub use serve::run_serve;
pub use status::run_status;
pub use token::run_token_verify;

use std::path::Path;

use anyhow::{Context, Result};
use gatepass_core::Config;

/// Load config from `path`, or the default location, then apply env overrides.
///
/// The result has been validated after the overrides.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_default().context("Failed to load default config")?,
    };

    Ok(config.with_env_overrides()?)
}
