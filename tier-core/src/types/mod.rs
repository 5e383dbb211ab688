//! Tier domain types

pub mod descriptor;
pub mod tier;
pub mod transition;

pub use descriptor::ObjectDescriptor;
pub use tier::AccessTier;
pub use transition::{TierTransitionOutcome, TierTransitionRequest, TransitionAck};
