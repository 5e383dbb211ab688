//! Object Descriptor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tier::AccessTier;

/// One object as observed by a listing page
///
/// `current_tier` is the value seen at listing time only. The live store may
/// already differ (for example while an archived object is rehydrating).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Object name, unique within its container
    pub name: String,
    /// Tier reported by the listing
    pub current_tier: AccessTier,
    /// Last modification time, if the listing provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Object size in bytes, if the listing provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl ObjectDescriptor {
    /// Create a descriptor with no pass-through metadata
    pub fn new(name: impl Into<String>, current_tier: AccessTier) -> Self {
        Self {
            name: name.into(),
            current_tier,
            last_modified: None,
            size_bytes: None,
        }
    }

    /// Set last modification time
    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = Some(at);
        self
    }

    /// Set size
    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let now = Utc::now();
        let d = ObjectDescriptor::new("blob1", AccessTier::Cool)
            .with_size(42)
            .with_last_modified(now);

        assert_eq!(d.name, "blob1");
        assert_eq!(d.size_bytes, Some(42));
        assert_eq!(d.last_modified, Some(now));
    }
}
