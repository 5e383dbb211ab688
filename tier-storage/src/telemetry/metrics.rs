//! Sweep Metrics
//!
//! Process-wide counters fed by finished sweeps, rendered in the
//! Prometheus text exposition format. Counters only observe sweeps; the
//! reconciler never reads them back.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::reconciler::SweepReport;

/// Counter metric (only increases)
#[derive(Debug)]
pub struct Counter {
    name: String,
    help: String,
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            value: AtomicU64::new(0),
        }
    }

    /// Increment by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment by n
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Get name
    pub fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, prefix: &str, out: &mut String) {
        let full = format!("{}_{}", prefix, self.name);
        let _ = writeln!(out, "# HELP {} {}", full, self.help);
        let _ = writeln!(out, "# TYPE {} counter", full);
        let _ = writeln!(out, "{} {}", full, self.get());
    }
}

/// Counters describing sweeps run by this process
#[derive(Debug)]
pub struct SweepMetrics {
    prefix: String,
    pub sweeps_started: Counter,
    pub sweeps_interrupted: Counter,
    pub pages_fetched: Counter,
    pub objects_listed: Counter,
    pub objects_unvisited: Counter,
    pub transitions_applied: Counter,
    pub transitions_pending: Counter,
    pub transitions_no_op: Counter,
    pub transitions_failed: Counter,
}

impl Default for SweepMetrics {
    fn default() -> Self {
        Self::new("tier_storage")
    }
}

impl SweepMetrics {
    /// Create a counter set with a metric name prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            sweeps_started: Counter::new("sweeps_started_total", "Sweeps started"),
            sweeps_interrupted: Counter::new(
                "sweeps_interrupted_total",
                "Sweeps that stopped before the listing was exhausted",
            ),
            pages_fetched: Counter::new("pages_fetched_total", "Listing pages fetched"),
            objects_listed: Counter::new("objects_listed_total", "Objects visited by sweeps"),
            objects_unvisited: Counter::new(
                "objects_unvisited_total",
                "Objects listed but dropped by a cancelled sweep",
            ),
            transitions_applied: Counter::new("transitions_applied_total", "Tier changes applied"),
            transitions_pending: Counter::new(
                "transitions_pending_total",
                "Tier changes accepted pending rehydration",
            ),
            transitions_no_op: Counter::new(
                "transitions_no_op_total",
                "Objects already at their target tier",
            ),
            transitions_failed: Counter::new("transitions_failed_total", "Tier changes that failed"),
        }
    }

    /// Fold a finished sweep into the counters
    pub fn record_report(&self, report: &SweepReport) {
        let summary = report.summary();

        if !report.completed_fully {
            self.sweeps_interrupted.inc();
        }
        self.pages_fetched.inc_by(report.pages_fetched as u64);
        self.objects_listed.inc_by(summary.total as u64);
        self.objects_unvisited.inc_by(report.unvisited as u64);
        self.transitions_applied.inc_by(summary.applied as u64);
        self.transitions_pending.inc_by(summary.pending as u64);
        self.transitions_no_op.inc_by(summary.no_op as u64);
        self.transitions_failed.inc_by(summary.failed as u64);
    }

    /// Render all counters in Prometheus text format
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        for counter in [
            &self.sweeps_started,
            &self.sweeps_interrupted,
            &self.pages_fetched,
            &self.objects_listed,
            &self.objects_unvisited,
            &self.transitions_applied,
            &self.transitions_pending,
            &self.transitions_no_op,
            &self.transitions_failed,
        ] {
            counter.render(&self.prefix, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::{SweepEntry, SweepMode};
    use tier_core::{AccessTier, ObjectDescriptor, TierTransitionOutcome};

    #[test]
    fn test_counter() {
        let counter = Counter::new("test_total", "Test counter");
        counter.inc();
        counter.inc_by(4);
        assert_eq!(counter.get(), 5);
        assert_eq!(counter.name(), "test_total");
    }

    #[test]
    fn test_record_report() {
        let metrics = SweepMetrics::default();
        let mut report = SweepReport::begin("c", SweepMode::Mutate, "rotation");
        report.pages_fetched = 2;
        report.unvisited = 3;
        report.entries.push(SweepEntry::transitioned(
            ObjectDescriptor::new("a", AccessTier::Archive),
            AccessTier::Hot,
            TierTransitionOutcome::Pending,
        ));
        report.entries.push(SweepEntry::transitioned(
            ObjectDescriptor::new("b", AccessTier::Hot),
            AccessTier::Cool,
            TierTransitionOutcome::failed("denied"),
        ));

        metrics.record_report(&report);

        assert_eq!(metrics.pages_fetched.get(), 2);
        assert_eq!(metrics.objects_listed.get(), 2);
        assert_eq!(metrics.objects_unvisited.get(), 3);
        assert_eq!(metrics.transitions_pending.get(), 1);
        assert_eq!(metrics.transitions_failed.get(), 1);
        assert_eq!(metrics.sweeps_interrupted.get(), 1);
    }

    #[test]
    fn test_render_prometheus() {
        let metrics = SweepMetrics::new("tiers");
        metrics.sweeps_started.inc();

        let text = metrics.render_prometheus();
        assert!(text.contains("# TYPE tiers_sweeps_started_total counter"));
        assert!(text.contains("tiers_sweeps_started_total 1"));
    }
}
