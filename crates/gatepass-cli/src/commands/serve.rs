//! Serve command - run the gateway server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use gatepass_core::{AuthService, IdentityStore};
use gatepass_gateway::Gateway;

use crate::ui;

/// Serve command arguments.
#[derive(Debug, Clone, Default)]
pub struct ServeArgs {
    /// Config file override.
    pub config: Option<PathBuf>,
    /// Port override.
    pub port: Option<u16>,
    /// Bind address override.
    pub bind: Option<String>,
    /// Static frontend directory override.
    pub static_dir: Option<PathBuf>,
    /// Use the demo identity fixture.
    pub demo_users: bool,
}

/// Run the gateway until Ctrl+C.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if args.static_dir.is_some() {
        config.server.static_dir = args.static_dir;
    }
    config.validate()?;

    let store = if args.demo_users {
        ui::warning("Serving demo users; do not use in production");
        IdentityStore::demo()?
    } else {
        config.identity_store()?
    };

    if store.is_empty() {
        ui::warning("No users configured; every login will fail");
        ui::info("Add entries to `users` or pass --demo-users");
    }

    ui::header("Starting Gatepass Gateway");
    ui::kv(
        "Address",
        &format!("{}:{}", config.server.bind_address, config.server.port),
    );
    ui::kv("Users", &store.len().to_string());
    ui::kv("Algorithm", &format!("{:?}", config.auth.algorithm));
    ui::kv("Token TTL", &format!("{}s", config.auth.token_ttl_secs));
    println!();

    let auth = Arc::new(AuthService::new(&config.auth, store)?);
    let gateway = Gateway::new(config.server, auth);

    ui::info("Press Ctrl+C to stop");
    println!();

    gatepass_gateway::start(gateway).await?;

    Ok(())
}
