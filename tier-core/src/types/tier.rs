//! Access Tier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TierError;

/// Storage access tier
///
/// Determines storage cost and access latency of an object. `Unknown` is
/// what a listing reports when the store has no tier recorded for the
/// object (for example a freshly uploaded blob) or reports a tier this
/// crate does not model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTier {
    /// Hot storage: low latency, high storage cost
    Hot,
    /// Cool storage: infrequent access, lower storage cost
    Cool,
    /// Archive storage: offline, must be rehydrated before reads
    Archive,
    /// No tier recorded, or a tier outside the rotation
    #[serde(other)]
    Unknown,
}

impl Default for AccessTier {
    fn default() -> Self {
        Self::Unknown
    }
}

impl AccessTier {
    /// The three tiers a transition may target
    pub const STABLE: [AccessTier; 3] = [AccessTier::Hot, AccessTier::Cool, AccessTier::Archive];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Cool => "cool",
            Self::Archive => "archive",
            Self::Unknown => "unknown",
        }
    }

    /// Whether this is one of Hot, Cool or Archive
    pub fn is_stable(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether objects in this tier must be rehydrated before they can be read
    pub fn is_archival(&self) -> bool {
        matches!(self, Self::Archive)
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Hot => "Hot",
            Self::Cool => "Cool",
            Self::Archive => "Archive",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for AccessTier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(Self::Hot),
            "cool" => Ok(Self::Cool),
            "archive" => Ok(Self::Archive),
            "unknown" => Ok(Self::Unknown),
            other => Err(TierError::UnrecognizedTier(other.to_string())),
        }
    }
}
