//! CLI Commands
//!
//! Argument and subcommand definitions for the `tiers` binary.

use clap::{Parser, Subcommand};
use tier_storage::DEFAULT_PAGE_SIZE;

/// Blob storage tier sweeps
#[derive(Parser, Debug)]
#[command(name = "tiers")]
#[command(version)]
#[command(about = "Rotate blobs in a container through the Hot, Cool and Archive tiers")]
#[command(long_about = "Lists every object in a container and moves each one to its next \
    access tier (Hot -> Cool -> Archive -> Hot).\n\n\
    Leaving Archive requires rehydration, so those objects are reported as \
    pending until the new tier becomes visible.")]
pub struct Cli {
    /// Storage connection string: a path, file:// URL or LocalRoot=<path>
    #[arg(long, env = "STORAGE_CONNECTION_STRING", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// Container to sweep
    #[arg(short, long, env = "CONTAINER_NAME")]
    pub container: Option<String>,

    /// Objects requested per listing page
    #[arg(long, env = "TIERS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Only sweep objects whose name starts with this prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Tier changes issued at once
    #[arg(long, env = "TIERS_CONCURRENCY", default_value_t = 1)]
    pub concurrency: usize,

    /// Seconds an Archive exit takes to become visible (local containers)
    #[arg(long, env = "TIERS_REHYDRATION_DELAY_SECS", default_value_t = 3600)]
    pub rehydration_delay_secs: u64,

    /// Output format (json, table, plain)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Print sweep counters in Prometheus format to stderr when done
    #[arg(long)]
    pub metrics: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Log filter directive (e.g. "tier_storage=trace")
    #[arg(long, env = "TIERS_LOG")]
    pub log_filter: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// How reports are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed `SweepReport` JSON
    Json,
    /// Aligned columns with a summary footer
    #[default]
    Table,
    /// Tab-separated, one object per line
    Plain,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// List every object and its current tier
    Show,

    /// Move every object to its next tier
    Rotate,

    /// Show, rotate, then show again
    Cycle {
        /// Wait for Enter between steps
        #[arg(long)]
        pause: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_help() {
        let result = Cli::try_parse_from(["tiers", "--help"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_parse_rotate_with_options() {
        let cli = Cli::try_parse_from([
            "tiers",
            "--connection-string",
            "/srv/blobs",
            "--container",
            "media",
            "--page-size",
            "100",
            "--concurrency",
            "8",
            "--format",
            "json",
            "rotate",
        ])
        .unwrap();

        assert_eq!(cli.connection_string.as_deref(), Some("/srv/blobs"));
        assert_eq!(cli.container.as_deref(), Some("media"));
        assert_eq!(cli.page_size, 100);
        assert_eq!(cli.concurrency, 8);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.command, Commands::Rotate);
    }

    #[test]
    fn test_parse_cycle_pause() {
        let cli = Cli::try_parse_from(["tiers", "-c", "media", "cycle", "--pause"]).unwrap();
        assert_eq!(cli.command, Commands::Cycle { pause: true });
        assert_eq!(cli.rehydration_delay_secs, 3600);
    }

    #[test]
    fn test_missing_subcommand_rejected() {
        assert!(Cli::try_parse_from(["tiers", "--container", "media"]).is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["tiers", "--format", "xml", "show"]).is_err());
    }
}
