//! Tier Policy
//!
//! Maps the tier an object was listed with to the tier it should move to.
//! Policies are pure: the same input always yields the same output and
//! evaluation never consults outcome history or the store.

use crate::types::AccessTier;

/// Tier selection policy
pub trait TierPolicy: Send + Sync {
    /// Policy name used in logs and reports
    fn name(&self) -> &str;

    /// Target tier for an object currently in `current`
    fn next_tier(&self, current: AccessTier) -> AccessTier;
}

/// Fixed three-tier rotation
///
/// Hot → Cool, Cool → Archive, anything else (Archive or Unknown) → Hot.
/// Repeated sweeps walk every object around the full ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationPolicy;

impl TierPolicy for RotationPolicy {
    fn name(&self) -> &str {
        "rotation"
    }

    fn next_tier(&self, current: AccessTier) -> AccessTier {
        match current {
            AccessTier::Hot => AccessTier::Cool,
            AccessTier::Cool => AccessTier::Archive,
            // Unset tiers are normalized to Hot
            AccessTier::Archive | AccessTier::Unknown => AccessTier::Hot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_mapping() {
        let policy = RotationPolicy;
        assert_eq!(policy.next_tier(AccessTier::Hot), AccessTier::Cool);
        assert_eq!(policy.next_tier(AccessTier::Cool), AccessTier::Archive);
        assert_eq!(policy.next_tier(AccessTier::Archive), AccessTier::Hot);
        assert_eq!(policy.next_tier(AccessTier::Unknown), AccessTier::Hot);
    }

    #[test]
    fn test_three_steps_return_to_start() {
        let policy = RotationPolicy;
        for start in AccessTier::STABLE {
            let mut tier = start;
            for _ in 0..3 {
                tier = policy.next_tier(tier);
            }
            assert_eq!(tier, start, "ring not closed from {}", start);
        }
    }

    #[test]
    fn test_no_fixed_point_on_stable_tiers() {
        let policy = RotationPolicy;
        for tier in AccessTier::STABLE {
            assert_ne!(policy.next_tier(tier), tier);
        }
    }

    #[test]
    fn test_targets_are_always_stable() {
        let policy = RotationPolicy;
        for tier in [
            AccessTier::Hot,
            AccessTier::Cool,
            AccessTier::Archive,
            AccessTier::Unknown,
        ] {
            assert!(policy.next_tier(tier).is_stable());
        }
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let policy = RotationPolicy;
        let first = policy.next_tier(AccessTier::Cool);
        let second = policy.next_tier(AccessTier::Cool);
        assert_eq!(first, second);
        assert_eq!(policy, RotationPolicy);
    }
}
