//! Container Backend Traits
//!
//! Defines the two collaborator interfaces a reconciliation sweep needs:
//! a paginated listing ([`PageFetcher`]) and a per-object tier change
//! ([`TierMutator`]). Backends are replaceable - local filesystem,
//! in-memory, or a cloud SDK adapter.

use async_trait::async_trait;
use tier_core::{AccessTier, ObjectDescriptor, TransitionAck};

use crate::error::{MutationResult, StorageResult};

/// One page of a container listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    /// Objects on this page, in listing order
    pub objects: Vec<ObjectDescriptor>,
    /// Opaque token for the next page; `None` or empty ends the listing
    pub next_token: Option<String>,
}

impl ObjectPage {
    /// Final page of a listing
    pub fn last(objects: Vec<ObjectDescriptor>) -> Self {
        Self {
            objects,
            next_token: None,
        }
    }

    /// Page followed by more pages
    pub fn with_next(objects: Vec<ObjectDescriptor>, next_token: impl Into<String>) -> Self {
        Self {
            objects,
            next_token: Some(next_token.into()),
        }
    }

    /// Whether the listing ends after this page
    pub fn is_last(&self) -> bool {
        self.next_token.as_deref().map_or(true, str::is_empty)
    }
}

/// Paginated listing of a container
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page that starts at `continuation` (`None` for the first page)
    async fn fetch(&self, continuation: Option<&str>) -> StorageResult<ObjectPage>;
}

/// Per-object tier change
#[async_trait]
pub trait TierMutator: Send + Sync {
    /// Request that `object_name` move to `target`
    ///
    /// Returns once the store accepted or rejected the request. Any
    /// rehydration happens out of band.
    async fn set_tier(&self, object_name: &str, target: AccessTier) -> MutationResult<TransitionAck>;
}

/// A container that can be both listed and retiered
pub trait TierContainer: PageFetcher + TierMutator {
    /// Container identifier
    fn container_name(&self) -> &str;

    /// Backend type identifier
    fn backend_type(&self) -> BackendType;
}

/// Backend type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// Local filesystem
    Local,
    /// In-memory (testing only)
    Memory,
    /// Custom backend
    Custom,
}

impl BackendType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
