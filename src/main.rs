use anyhow::Result;
use clap::{Parser, Subcommand};

use qdash::cli::{self, OutputFormat, ViewFormat};

#[derive(Debug, Parser)]
#[command(name = "qdash")]
#[command(about = "Dashboard client for quantum datacenter monitoring backends")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the backend and render the full dashboard
    Dashboard {
        /// Output format: text (default), html
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// One-shot status check against the backend
    Status {
        /// Output format: text (default), json (raw response)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Trigger the optimize action, then reload status after the configured delay
    Optimize,
    /// Serve the rendered dashboard as a local web page
    Serve {
        /// Listen address (default from config, 127.0.0.1:9810)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Check system health: backend, config, request log
    Health,
    /// Show request history from the request log
    History {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
        /// Only include endpoints matching this regex
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write the default config file to ~/.qdash/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a config value by dotted key (e.g. backend.url)
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Dashboard { format } => {
            cli::run_dashboard(ViewFormat::from_str_opt(Some(&format)))
        }
        Commands::Status { format } => cli::run_status(ViewFormat::from_str_opt(Some(&format))),
        Commands::Optimize => cli::run_optimize(),
        Commands::Serve { addr } => cli::run_serve(addr),
        Commands::Health => cli::run_health(),
        Commands::History {
            format,
            days,
            endpoint,
        } => cli::run_history(
            OutputFormat::from_str_opt(Some(&format)),
            days,
            endpoint.as_deref(),
        ),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
