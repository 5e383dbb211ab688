//! Output Formatting
//!
//! Renders sweep reports as a table, plain lines or JSON.

use std::fmt::Write as _;

use crate::commands::OutputFormat;
use crate::error::CliResult;
use tier_storage::{SweepInterruption, SweepMode, SweepReport};

/// Print a sweep report in the requested format
pub fn print_report(report: &SweepReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Table => print!("{}", render_table(report)),
        OutputFormat::Plain => print!("{}", render_plain(report)),
    }
    Ok(())
}

/// Render a report as an aligned table with a summary footer
pub fn render_table(report: &SweepReport) -> String {
    let mut out = String::new();
    let width = report
        .entries
        .iter()
        .map(|e| e.object_name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let _ = writeln!(
        out,
        "Container {} ({}, policy {})",
        report.container,
        report.mode.as_str(),
        report.policy
    );
    let _ = writeln!(out, "Sweep     {}", report.sweep_id);
    let _ = writeln!(out);

    match report.mode {
        SweepMode::DisplayOnly => {
            let _ = writeln!(out, "{:<width$}  {:<8}  {:>12}", "NAME", "TIER", "SIZE");
            for entry in &report.entries {
                let size = entry.size_bytes.map(|s| s.to_string()).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<width$}  {:<8}  {:>12}",
                    entry.object_name,
                    entry.from_tier.to_string(),
                    size
                );
            }
        }
        SweepMode::Mutate => {
            let _ = writeln!(
                out,
                "{:<width$}  {:<8}  {:<8}  {}",
                "NAME", "FROM", "TO", "OUTCOME"
            );
            for entry in &report.entries {
                let to = entry.to_tier.map(|t| t.to_string()).unwrap_or_default();
                let outcome = entry.outcome.as_ref().map(|o| o.to_string()).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{:<width$}  {:<8}  {:<8}  {}",
                    entry.object_name,
                    entry.from_tier.to_string(),
                    to,
                    outcome
                );
            }
        }
    }

    let _ = writeln!(out, "{}", "-".repeat(width + 30));
    let summary = report.summary();
    match report.mode {
        SweepMode::DisplayOnly => {
            let _ = writeln!(out, "{} object(s) listed in {} page(s)", summary.total, report.pages_fetched);
        }
        SweepMode::Mutate => {
            let _ = writeln!(
                out,
                "{} object(s): {} applied, {} pending, {} no-op, {} failed",
                summary.total, summary.applied, summary.pending, summary.no_op, summary.failed
            );
        }
    }

    if let Some(line) = interruption_line(report) {
        let _ = writeln!(out, "{}", line);
    }
    out
}

/// Render a report as one tab-separated line per object
pub fn render_plain(report: &SweepReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        match (&entry.to_tier, &entry.outcome) {
            (Some(to), Some(outcome)) => {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    entry.object_name, entry.from_tier, to, outcome
                );
            }
            _ => {
                let _ = writeln!(out, "{}\t{}", entry.object_name, entry.from_tier);
            }
        }
    }
    if let Some(line) = interruption_line(report) {
        let _ = writeln!(out, "# {}", line);
    }
    out
}

fn interruption_line(report: &SweepReport) -> Option<String> {
    report.interruption.as_ref().map(|interruption| match interruption {
        SweepInterruption::Cancelled if report.unvisited > 0 => format!(
            "INCOMPLETE: sweep cancelled, {} listed object(s) not processed",
            report.unvisited
        ),
        SweepInterruption::Cancelled => "INCOMPLETE: sweep cancelled".to_string(),
        SweepInterruption::EnumerationFailed { error } => format!("INCOMPLETE: {}", error),
    })
}

/// Print a step heading (cycle command)
pub fn print_step(title: &str, format: OutputFormat) {
    if format != OutputFormat::Json {
        println!();
        println!("== {} ==", title);
    }
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("Warning: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_core::{AccessTier, ObjectDescriptor, TierTransitionOutcome};
    use tier_storage::SweepEntry;

    fn mutate_report() -> SweepReport {
        let mut report = SweepReport::begin("media", SweepMode::Mutate, "rotation");
        report.entries.push(SweepEntry::transitioned(
            ObjectDescriptor::new("blob1", AccessTier::Archive),
            AccessTier::Hot,
            TierTransitionOutcome::Pending,
        ));
        report.entries.push(SweepEntry::transitioned(
            ObjectDescriptor::new("blob2", AccessTier::Cool),
            AccessTier::Archive,
            TierTransitionOutcome::failed("denied"),
        ));
        report
    }

    #[test]
    fn test_table_lists_outcomes() {
        let table = render_table(&mutate_report());
        assert!(table.contains("Container media"));
        assert!(table.contains("pending"));
        assert!(table.contains("failed: denied"));
        assert!(table.contains("2 object(s): 0 applied, 1 pending, 0 no-op, 1 failed"));
    }

    #[test]
    fn test_plain_lines() {
        let plain = render_plain(&mutate_report());
        let lines: Vec<_> = plain.lines().collect();
        assert_eq!(lines[0], "blob1\tArchive\tHot\tpending");
        assert_eq!(lines[1], "blob2\tCool\tArchive\tfailed: denied");
    }

    #[test]
    fn test_cancelled_report_counts_unvisited() {
        let mut report = mutate_report();
        report.unvisited = 7;
        report.interruption = Some(SweepInterruption::Cancelled);

        let plain = render_plain(&report);
        assert!(plain.ends_with("# INCOMPLETE: sweep cancelled, 7 listed object(s) not processed\n"));
        assert!(render_table(&report).contains("1 failed"));
    }

    #[test]
    fn test_display_only_plain() {
        let mut report = SweepReport::begin("media", SweepMode::DisplayOnly, "rotation");
        report
            .entries
            .push(SweepEntry::listed(ObjectDescriptor::new("a", AccessTier::Unknown)));
        assert_eq!(render_plain(&report), "a\tUnknown\n");
    }
}
