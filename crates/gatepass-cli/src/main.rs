//! Gatepass CLI - run and operate the gatepass gateway.

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "gatepass")]
#[command(about = "Gatepass - bearer token gateway")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Serve {
        /// Config file path
        #[arg(short, long, env = "GATEPASS_CONFIG")]
        config: Option<PathBuf>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address
        #[arg(long)]
        bind: Option<String>,

        /// Directory with the built frontend
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Serve the built-in demo users instead of the configured ones
        #[arg(long)]
        demo_users: bool,
    },

    /// Check whether a gateway is running
    Status {
        /// Port to probe
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Hash a password for the `users` config list
    HashPassword {
        /// Password to hash (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Generate a random signing secret
    GenSecret,

    /// Token utilities
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },

    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,

        /// Config file path
        #[arg(short, long, global = true, env = "GATEPASS_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Verify a token against the configured secret
    Verify {
        /// The token to check
        token: String,

        /// Config file path
        #[arg(short, long, env = "GATEPASS_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show configuration with secrets masked
    Show,

    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    if cli.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    match cli.command {
        Commands::Serve {
            config,
            port,
            bind,
            static_dir,
            demo_users,
        } => {
            let args = commands::serve::ServeArgs {
                config,
                port,
                bind,
                static_dir,
                demo_users,
            };
            commands::run_serve(args).await?;
        }

        Commands::Status { port } => {
            commands::run_status(commands::status::StatusArgs { port }).await?;
        }

        Commands::HashPassword { password } => {
            commands::run_hash_password(password)?;
        }

        Commands::GenSecret => commands::run_gen_secret(),

        Commands::Token { action } => match action {
            TokenCommands::Verify { token, config } => {
                commands::run_token_verify(&token, config.as_deref())?;
            }
        },

        Commands::Config { action, config } => {
            let action = match action {
                Some(ConfigCommands::Validate) => commands::config::ConfigAction::Validate,
                Some(ConfigCommands::Show) | None => commands::config::ConfigAction::Show,
            };
            commands::run_config(action, config.as_deref())?;
        }
    }

    Ok(())
}
