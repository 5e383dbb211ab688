//! Tier Reconciliation Module
//!
//! Sweeps a container, computing each object's target tier and issuing
//! the tier change. Produces an itemized [`SweepReport`] per sweep.

pub mod executor;
pub mod report;

pub use executor::TierReconciler;
pub use report::{SweepEntry, SweepInterruption, SweepMode, SweepReport, SweepSummary};
