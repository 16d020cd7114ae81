//! Secret material helpers: password hashes and signing secrets.

use anyhow::{Result, bail};
use gatepass_core::SigningSecret;
use gatepass_core::identity::hash_password;

use crate::ui;

/// Hash a password, prompting for it when not given.
pub fn run_hash_password(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let first = ui::prompts::password("Password")?;
            let second = ui::prompts::password("Confirm password")?;
            if first != second {
                bail!("Passwords do not match");
            }
            first
        }
    };

    if password.is_empty() {
        bail!("Password cannot be empty");
    }

    let hash = hash_password(&password)?;
    println!("{hash}");
    Ok(())
}

/// Print a fresh hex signing secret.
pub fn run_gen_secret() {
    println!("{}", SigningSecret::generate_hex());
}
