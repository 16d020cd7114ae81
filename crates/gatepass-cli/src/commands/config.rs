//! Config command - show and validate configuration.

use std::path::Path;

use anyhow::Result;
use gatepass_core::Config;

use crate::ui;

/// Config actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the effective config with secrets masked.
    Show,
    /// Load and validate, reporting the first problem.
    Validate,
}

/// Run the config command.
pub fn run_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    let shown_path = path.map_or_else(Config::default_path, Path::to_path_buf);

    match action {
        ConfigAction::Show => {
            let config = super::load_config(path)?;
            ui::kv("Path", &shown_path.display().to_string());
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
        ConfigAction::Validate => match super::load_config(path) {
            Ok(config) => {
                ui::success(&format!("Configuration is valid: {}", shown_path.display()));
                ui::kv("Users", &config.users.len().to_string());
                if config.auth.signing_secret.is_none() {
                    ui::warning("No signing secret set; a random one is generated per start");
                }
            }
            Err(e) => {
                ui::error(&format!("Configuration is invalid: {e:#}"));
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::load_config;
    use gatepass_core::identity::hash_password;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gatepass.json5");
        let hash = hash_password("pw").unwrap();
        std::fs::write(
            &path,
            format!(
                r#"{{
                    // comments are fine
                    server: {{ port: 9090 }},
                    users: [{{ id: 1, username: "ops", passwordHash: "{hash}", role: "admin" }}],
                }}"#
            ),
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].username, "ops");
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_config(Some(&temp_dir.path().join("absent.json5"))).is_err());
    }
}
