//! Status command - probe a running gateway.

use std::time::Duration;

use anyhow::Result;

use crate::ui::{self, HealthStatus};

/// Status command arguments.
#[derive(Debug, Clone, Default)]
pub struct StatusArgs {
    /// Port override.
    pub port: Option<u16>,
}

/// Run the status command.
pub async fn run_status(args: StatusArgs) -> Result<()> {
    let port = args.port.unwrap_or_else(configured_port);

    ui::header("Gatepass Status");
    ui::kv("Port", &port.to_string());
    println!();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    match probe(&client, &format!("http://127.0.0.1:{port}/health")).await {
        Ok(body) => ui::health_check("Health", HealthStatus::Ok, Some(body.trim())),
        Err(e) => {
            ui::health_check("Health", HealthStatus::Error, Some(&e));
            ui::info("Start with: gatepass serve");
            return Ok(());
        }
    }

    match probe(&client, &format!("http://127.0.0.1:{port}/api/hello")).await {
        Ok(body) => {
            let status = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("status").and_then(|s| s.as_str()).map(String::from))
                .unwrap_or_else(|| "unknown".to_string());
            ui::health_check("API", HealthStatus::Ok, Some(&status));
        }
        Err(e) => ui::health_check("API", HealthStatus::Warning, Some(&e)),
    }

    Ok(())
}

/// Port from `GATEPASS_PORT`, the config file, or the default.
fn configured_port() -> u16 {
    super::load_config(None).map_or_else(
        |_| gatepass_core::ServerConfig::default().port,
        |config| config.server.port,
    )
}

async fn probe(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let resp = client.get(url).send().await.map_err(|e| e.to_string())?;

    if resp.status().is_success() {
        resp.text().await.map_err(|e| e.to_string())
    } else {
        Err(format!("HTTP {}", resp.status()))
    }
}
