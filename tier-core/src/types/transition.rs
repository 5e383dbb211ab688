//! Tier Transitions

use serde::{Deserialize, Serialize};
use std::fmt;

use super::descriptor::ObjectDescriptor;
use super::tier::AccessTier;
use crate::error::{TierError, TierResult};

/// A single tier change derived from a listed object
///
/// Built per object, handed to the mutator and then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTransitionRequest {
    /// Object name
    pub object_name: String,
    /// Tier observed at listing time
    pub from_tier: AccessTier,
    /// Tier requested
    pub to_tier: AccessTier,
}

impl TierTransitionRequest {
    /// Create a request for a listed object
    pub fn for_object(descriptor: &ObjectDescriptor, to_tier: AccessTier) -> Self {
        Self {
            object_name: descriptor.name.clone(),
            from_tier: descriptor.current_tier,
            to_tier,
        }
    }

    /// Target equals the observed tier, nothing to send
    pub fn is_noop(&self) -> bool {
        self.from_tier == self.to_tier
    }

    /// Leaving Archive for an online tier
    pub fn is_rehydration(&self) -> bool {
        self.from_tier.is_archival() && self.to_tier.is_stable() && !self.to_tier.is_archival()
    }

    /// Check the request can be sent to a store
    pub fn validate(&self) -> TierResult<()> {
        if self.object_name.is_empty() {
            return Err(TierError::EmptyObjectName);
        }
        if !self.to_tier.is_stable() {
            return Err(TierError::InvalidTarget(self.to_tier.to_string()));
        }
        Ok(())
    }
}

/// Acknowledgement returned by a store that accepted a tier change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAck {
    /// The new tier is already in effect
    Applied,
    /// Accepted, completes asynchronously
    Pending,
}

/// Recorded result of one object's transition within a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierTransitionOutcome {
    /// Mutation accepted and in effect
    Applied,
    /// Mutation accepted, not yet visible (rehydration in flight)
    Pending,
    /// Target equals the current tier, no mutation issued
    NoOp,
    /// Mutation rejected or the call failed
    Failed {
        /// Failure reason
        reason: String,
    },
}

impl TierTransitionOutcome {
    /// Build a failed outcome
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether the mutation was accepted by the store
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Applied | Self::Pending)
    }

    /// Whether this outcome is a failure
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Pending => "pending",
            Self::NoOp => "no-op",
            Self::Failed { .. } => "failed",
        }
    }
}

impl From<TransitionAck> for TierTransitionOutcome {
    fn from(ack: TransitionAck) -> Self {
        match ack {
            TransitionAck::Applied => Self::Applied,
            TransitionAck::Pending => Self::Pending,
        }
    }
}

impl fmt::Display for TierTransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { reason } => write!(f, "failed: {}", reason),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rehydration_classification() {
        let archived = ObjectDescriptor::new("a", AccessTier::Archive);
        assert!(TierTransitionRequest::for_object(&archived, AccessTier::Hot).is_rehydration());
        assert!(TierTransitionRequest::for_object(&archived, AccessTier::Cool).is_rehydration());
        assert!(!TierTransitionRequest::for_object(&archived, AccessTier::Archive).is_rehydration());

        let hot = ObjectDescriptor::new("h", AccessTier::Hot);
        assert!(!TierTransitionRequest::for_object(&hot, AccessTier::Cool).is_rehydration());
    }

    #[test]
    fn test_noop_detection() {
        let cool = ObjectDescriptor::new("c", AccessTier::Cool);
        assert!(TierTransitionRequest::for_object(&cool, AccessTier::Cool).is_noop());
        assert!(!TierTransitionRequest::for_object(&cool, AccessTier::Archive).is_noop());
    }

    #[test]
    fn test_validate() {
        let cool = ObjectDescriptor::new("c", AccessTier::Cool);
        assert!(TierTransitionRequest::for_object(&cool, AccessTier::Hot).validate().is_ok());
        assert_eq!(
            TierTransitionRequest::for_object(&cool, AccessTier::Unknown).validate(),
            Err(TierError::InvalidTarget("Unknown".to_string()))
        );

        let unnamed = ObjectDescriptor::new("", AccessTier::Cool);
        assert_eq!(
            TierTransitionRequest::for_object(&unnamed, AccessTier::Hot).validate(),
            Err(TierError::EmptyObjectName)
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(TierTransitionOutcome::failed("throttled")).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "throttled");

        let json = serde_json::to_value(TierTransitionOutcome::Pending).unwrap();
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_ack_conversion() {
        assert_eq!(TierTransitionOutcome::from(TransitionAck::Applied), TierTransitionOutcome::Applied);
        assert_eq!(TierTransitionOutcome::from(TransitionAck::Pending), TierTransitionOutcome::Pending);
        assert!(TierTransitionOutcome::Pending.is_accepted());
        assert!(!TierTransitionOutcome::NoOp.is_accepted());
    }
}
