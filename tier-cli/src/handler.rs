//! Command Handlers
//!
//! Opens the configured container and drives sweeps for each command.

use std::sync::Arc;
use tier_storage::{
    EnvironmentConfig, LocalContainer, LocalContainerConfig, SweepMetrics, SweepOptions,
    SweepReport, TierReconciler,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::commands::{Cli, Commands, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;

type Reconciler = TierReconciler<LocalContainer>;

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    let options = SweepOptions::mutate().with_concurrency(cli.concurrency);
    if options.validate().is_err() {
        return Err(CliError::invalid_arg("--concurrency must be at least 1"));
    }

    let config = container_config(&cli)?;
    let container = Arc::new(LocalContainer::open(config).await?);
    let metrics = Arc::new(SweepMetrics::new("tiers"));
    let reconciler = TierReconciler::new(container).with_metrics(metrics.clone());

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let result = match cli.command {
        Commands::Show => handle_show(&reconciler, &cancel, cli.format).await,
        Commands::Rotate => handle_rotate(&reconciler, &options, &cancel, cli.format).await,
        Commands::Cycle { pause } => {
            handle_cycle(&reconciler, &options, &cancel, cli.format, pause).await
        }
    };

    // stderr keeps stdout a single parseable report
    if cli.metrics {
        eprint!("{}", metrics.render_prometheus());
    }

    result
}

/// Build the local container config from flags and environment
fn container_config(cli: &Cli) -> CliResult<LocalContainerConfig> {
    if cli.page_size == 0 {
        return Err(CliError::invalid_arg("--page-size must be at least 1"));
    }

    let env = match (&cli.connection_string, &cli.container) {
        (Some(connection), Some(container)) => EnvironmentConfig::new(connection, container),
        _ => EnvironmentConfig::from_env().map_err(|e| {
            CliError::config(format!(
                "{} (pass --connection-string and --container, or set them in .env)",
                e
            ))
        })?,
    };

    let mut config = LocalContainerConfig::from_environment(&env)?
        .with_page_size(cli.page_size)
        .with_rehydration_delay_secs(cli.rehydration_delay_secs);
    if let Some(prefix) = &cli.prefix {
        config = config.with_prefix(prefix);
    }

    Ok(config)
}

fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling sweep");
            cancel.cancel();
        }
    });
}

/// Handle `show`
async fn handle_show(
    reconciler: &Reconciler,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> CliResult<()> {
    let report = reconciler.display(cancel).await;
    output::print_report(&report, format)?;
    check_listing(&report)
}

/// Handle `rotate`
async fn handle_rotate(
    reconciler: &Reconciler,
    options: &SweepOptions,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> CliResult<()> {
    let report = reconciler.reconcile(options, cancel).await?;
    output::print_report(&report, format)?;
    check_listing(&report)?;
    check_transitions(&report)
}

/// Handle `cycle`: show, rotate, show, each over a fresh listing
async fn handle_cycle(
    reconciler: &Reconciler,
    options: &SweepOptions,
    cancel: &CancellationToken,
    format: OutputFormat,
    pause: bool,
) -> CliResult<()> {
    output::print_step("Current tiers", format);
    handle_show(reconciler, cancel, format).await?;

    if pause && !wait_for_enter(cancel).await? {
        return Err(CliError::interrupted("cancelled while paused"));
    }

    output::print_step("Rotating tiers", format);
    let rotated = reconciler.reconcile(options, cancel).await?;
    output::print_report(&rotated, format)?;
    check_listing(&rotated)?;

    if rotated.pending().next().is_some() {
        output::print_warning("archived objects are rehydrating and still list as Archive");
    }

    if pause && !wait_for_enter(cancel).await? {
        return Err(CliError::interrupted("cancelled while paused"));
    }

    output::print_step("Tiers after rotation", format);
    handle_show(reconciler, cancel, format).await?;

    check_transitions(&rotated)
}

/// Wait for Enter; false if cancelled first
async fn wait_for_enter(cancel: &CancellationToken) -> CliResult<bool> {
    eprintln!("Press Enter to continue...");
    let mut line = String::new();
    let mut stdin = BufReader::new(tokio::io::stdin());

    tokio::select! {
        _ = cancel.cancelled() => Ok(false),
        read = stdin.read_line(&mut line) => {
            read?;
            Ok(true)
        }
    }
}

fn check_listing(report: &SweepReport) -> CliResult<()> {
    if report.completed_fully {
        return Ok(());
    }
    if report.was_cancelled() {
        return Err(CliError::interrupted("cancelled"));
    }
    let reason = report
        .enumeration_error()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "listing did not finish".to_string());
    Err(CliError::interrupted(reason))
}

fn check_transitions(report: &SweepReport) -> CliResult<()> {
    let failed = report.failures().count();
    if failed > 0 {
        return Err(CliError::TransitionsFailed { count: failed });
    }
    info!(sweep_id = %report.sweep_id, "All tier changes accepted");
    Ok(())
}
