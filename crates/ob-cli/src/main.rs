//! Onboarder CLI
//!
//! Command-line interface for the onboarder user-provisioning service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{run_server, ServeConfig};
use config::AppConfig;

#[derive(Parser)]
#[command(name = "onboarder")]
#[command(version)]
#[command(about = "Webhook-driven analytics account provisioning", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Validate configuration and exit
    Validate {
        /// Configuration file to validate
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Show secrets (redacted by default)
        #[arg(long)]
        show_secrets: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; a missing file falls back to defaults so
    // that env vars alone can configure a deployment
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config/onboarder.yaml"));
    let mut config = AppConfig::load(&config_path).unwrap_or_else(|_| {
        if cli.verbose {
            eprintln!("Using default configuration (no config file found)");
        }
        AppConfig::default()
    });
    config.apply_env_overrides()?;

    // Initialize logging
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config
            .logging
            .level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    };
    ob_observability::init_logging_with_config(ob_observability::LoggingConfig {
        level: log_level,
        json_format: config.logging.json_format,
        ..Default::default()
    });

    match cli.command {
        Commands::Serve { port, host } => {
            let serve_config = ServeConfig {
                host: host.unwrap_or_else(|| config.server.host.clone()),
                port: port.unwrap_or(config.server.port),
            };
            cmd_serve(serve_config, config).await
        }
        Commands::Validate { config: cfg_path } => {
            cmd_validate(cfg_path.unwrap_or(config_path)).await
        }
        Commands::Config { show_secrets } => cmd_config(config, show_secrets).await,
    }
}

async fn cmd_serve(serve_config: ServeConfig, config: AppConfig) -> Result<()> {
    let errors = config.validate();
    if !errors.is_empty() {
        eprintln!("Configuration errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(1);
    }

    run_server(serve_config, config).await
}

async fn cmd_validate(config_path: PathBuf) -> Result<()> {
    println!("Validating configuration: {}", config_path.display());

    let mut config = match AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration file error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.apply_env_overrides()?;

    let errors = config.validate();
    if errors.is_empty() {
        println!("Configuration is valid.");
        Ok(())
    } else {
        println!("Configuration errors:");
        for error in &errors {
            println!("  - {}", error);
        }
        std::process::exit(1);
    }
}

async fn cmd_config(config: AppConfig, show_secrets: bool) -> Result<()> {
    let display_config = if show_secrets {
        config
    } else {
        config.redact_secrets()
    };

    println!("{}", serde_yaml::to_string(&display_config)?);
    Ok(())
}
