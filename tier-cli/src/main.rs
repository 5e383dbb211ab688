//! Tier CLI Entry Point
//!
//! Configuration is loaded from environment variables (via .env file).
//! Command-line arguments override environment variables.
//!
//! Usage:
//!   tiers show     - List objects and their tiers
//!   tiers rotate   - Move every object to its next tier
//!   tiers cycle    - Show, rotate, show

use clap::Parser;
use tier_cli::{handler, Cli};
use tier_storage::{init_logging, LogConfig, LogFormat, LogLevel};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(&log_config(&cli)) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    if let Err(e) = handler::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn log_config(cli: &Cli) -> LogConfig {
    let mut config = if cli.verbose {
        LogConfig::development()
    } else {
        LogConfig::new(LogLevel::Warn)
    };
    if cli.log_json {
        config.format = LogFormat::Json;
    }
    if let Some(filter) = &cli.log_filter {
        config = config.with_filter(filter);
    }
    config
}
