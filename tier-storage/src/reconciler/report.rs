//! Sweep Report
//!
//! Itemized result of one pass over a container.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tier_core::{AccessTier, ObjectDescriptor, TierTransitionOutcome};

use crate::error::EnumerationError;

/// What a sweep does with each listed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    /// List objects and their tiers, no mutation
    DisplayOnly,
    /// Move every object to its policy target
    Mutate,
}

impl Default for SweepMode {
    fn default() -> Self {
        Self::Mutate
    }
}

impl SweepMode {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DisplayOnly => "display_only",
            Self::Mutate => "mutate",
        }
    }
}

/// One object's line in a sweep report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepEntry {
    /// Object name
    pub object_name: String,
    /// Tier observed at listing time
    pub from_tier: AccessTier,
    /// Policy target (Mutate sweeps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_tier: Option<AccessTier>,
    /// Transition outcome (Mutate sweeps only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<TierTransitionOutcome>,
    /// Object size, if listed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Last modification time, if listed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl SweepEntry {
    /// Entry for a display-only sweep
    pub fn listed(descriptor: ObjectDescriptor) -> Self {
        Self {
            object_name: descriptor.name,
            from_tier: descriptor.current_tier,
            to_tier: None,
            outcome: None,
            size_bytes: descriptor.size_bytes,
            last_modified: descriptor.last_modified,
        }
    }

    /// Entry for a mutate sweep
    pub fn transitioned(
        descriptor: ObjectDescriptor,
        to_tier: AccessTier,
        outcome: TierTransitionOutcome,
    ) -> Self {
        Self {
            object_name: descriptor.name,
            from_tier: descriptor.current_tier,
            to_tier: Some(to_tier),
            outcome: Some(outcome),
            size_bytes: descriptor.size_bytes,
            last_modified: descriptor.last_modified,
        }
    }
}

/// Why a sweep stopped before covering the whole container
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SweepInterruption {
    /// Listing failed; objects after the failed page were never visited
    EnumerationFailed {
        /// The terminal listing error
        error: EnumerationError,
    },
    /// Cancellation was requested
    Cancelled,
}

/// Per-outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Entries in the report
    pub total: usize,
    /// Display-only entries
    pub listed: usize,
    /// Applied transitions
    pub applied: usize,
    /// Accepted, completing asynchronously
    pub pending: usize,
    /// Target equal to current tier
    pub no_op: usize,
    /// Failed transitions
    pub failed: usize,
}

/// Result of one sweep
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Sweep ID
    pub sweep_id: String,
    /// Container swept
    pub container: String,
    /// Sweep mode
    pub mode: SweepMode,
    /// Policy used to pick targets
    pub policy: String,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// Completion time
    pub finished_at: Option<DateTime<Utc>>,
    /// Listing pages fetched
    pub pages_fetched: usize,
    /// Entries in listing order
    pub entries: Vec<SweepEntry>,
    /// Objects listed from the store but left out of `entries` because the
    /// sweep was cancelled first; none of them reached the store
    pub unvisited: usize,
    /// Whether the whole listing was visited
    pub completed_fully: bool,
    /// Set when `completed_fully` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interruption: Option<SweepInterruption>,
}

impl SweepReport {
    /// Start an empty report
    pub fn begin(container: &str, mode: SweepMode, policy: &str) -> Self {
        Self {
            sweep_id: uuid::Uuid::new_v4().to_string(),
            container: container.to_string(),
            mode,
            policy: policy.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            entries: Vec::new(),
            unvisited: 0,
            completed_fully: false,
            interruption: None,
        }
    }

    /// Close the report
    pub(crate) fn finish(&mut self, interruption: Option<SweepInterruption>) {
        self.completed_fully = interruption.is_none();
        self.interruption = interruption;
        self.finished_at = Some(Utc::now());
    }

    /// The terminal listing error, if the listing failed
    pub fn enumeration_error(&self) -> Option<&EnumerationError> {
        match &self.interruption {
            Some(SweepInterruption::EnumerationFailed { error }) => Some(error),
            _ => None,
        }
    }

    /// Whether the sweep was cancelled
    pub fn was_cancelled(&self) -> bool {
        matches!(self.interruption, Some(SweepInterruption::Cancelled))
    }

    /// Find the entry for an object
    pub fn entry(&self, object_name: &str) -> Option<&SweepEntry> {
        self.entries.iter().find(|e| e.object_name == object_name)
    }

    /// Entries whose transition failed
    pub fn failures(&self) -> impl Iterator<Item = &SweepEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome.as_ref().is_some_and(TierTransitionOutcome::is_failed))
    }

    /// Entries accepted but still completing (rehydrations)
    pub fn pending(&self) -> impl Iterator<Item = &SweepEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Some(TierTransitionOutcome::Pending)))
    }

    /// Count entries per outcome
    pub fn summary(&self) -> SweepSummary {
        let mut summary = SweepSummary {
            total: self.entries.len(),
            ..Default::default()
        };

        for entry in &self.entries {
            match &entry.outcome {
                None => summary.listed += 1,
                Some(TierTransitionOutcome::Applied) => summary.applied += 1,
                Some(TierTransitionOutcome::Pending) => summary.pending += 1,
                Some(TierTransitionOutcome::NoOp) => summary.no_op += 1,
                Some(TierTransitionOutcome::Failed { .. }) => summary.failed += 1,
            }
        }

        summary
    }

    /// Duration in milliseconds, once finished
    pub fn duration_ms(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
    }
}
