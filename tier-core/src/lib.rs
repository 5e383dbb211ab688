//! Tier Core - Blob Storage Tier Domain
//!
//! Domain types shared by every part of the tier reconciliation stack.
//! Nothing in this crate performs I/O.
//!
//! # Tier Ring
//!
//! Objects rotate through three stable access tiers across repeated sweeps:
//!
//! ```text
//!        ┌──────────┐        ┌──────────┐        ┌──────────┐
//!   ┌───▶│   Hot    │───────▶│   Cool   │───────▶│ Archive  │───┐
//!   │    └──────────┘        └──────────┘        └──────────┘   │
//!   │                                                 │         │
//!   │                                       rehydrating (async) │
//!   │                                                 ▼         │
//!   └───────────────────────────────────────────── Pending ◀────┘
//! ```
//!
//! Leaving Archive is asynchronous server-side: the request is accepted but
//! the new tier only becomes visible once rehydration finishes. The policy
//! never sees the rehydrating state; it only shows up as a
//! [`TierTransitionOutcome::Pending`] outcome.
//!
//! # Core Types
//!
//! - [`AccessTier`]: Hot, Cool, Archive or Unknown
//! - [`ObjectDescriptor`]: one listed object and the tier observed at listing time
//! - [`TierTransitionRequest`]: `(object, from, to)` derived per object
//! - [`TierTransitionOutcome`]: Applied, Pending, NoOp or Failed
//! - [`TierPolicy`]: maps a current tier to a target tier
//! - [`RotationPolicy`]: the fixed Hot → Cool → Archive → Hot rotation

pub mod error;
pub mod policy;
pub mod types;

pub use error::{TierError, TierResult};
pub use policy::{RotationPolicy, TierPolicy};
pub use types::{
    AccessTier, ObjectDescriptor, TierTransitionOutcome, TierTransitionRequest, TransitionAck,
};

/// Tier core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_ring_is_closed() {
        let policy = RotationPolicy;
        let start = AccessTier::Hot;
        let after_three = policy.next_tier(policy.next_tier(policy.next_tier(start)));
        assert_eq!(after_three, start);
    }
}
