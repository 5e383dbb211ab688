//! Tier Storage Error Types

use serde::Serialize;
use thiserror::Error;

/// Storage errors raised by backends and configuration
#[derive(Debug, Clone, Error, Serialize)]
pub enum StorageError {
    /// Container or object not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Backend unavailable (network, throttling, auth)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Continuation token not understood by the backend
    #[error("Invalid continuation token: {0}")]
    InvalidContinuation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Storage result type
pub type StorageResult<T> = Result<T, StorageError>;

/// Terminal failure of an object listing
///
/// Carries the point the listing had reached so a caller can decide to
/// restart the sweep from scratch.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnumerationError {
    /// A page fetch failed
    #[error(
        "Listing failed fetching page {page_index} (continuation: {}): {source}",
        .continuation_token.as_deref().unwrap_or("<start>")
    )]
    PageFetch {
        /// Zero-based index of the page that failed
        page_index: usize,
        /// Token the failed fetch was issued with
        continuation_token: Option<String>,
        /// Objects handed out before the failure
        objects_listed: usize,
        /// Underlying backend error
        source: StorageError,
    },

    /// The listing was cancelled before it was exhausted
    #[error("Listing cancelled after {pages_fetched} pages ({objects_listed} objects)")]
    Cancelled {
        /// Pages fetched before cancellation
        pages_fetched: usize,
        /// Objects handed out before cancellation
        objects_listed: usize,
    },
}

impl EnumerationError {
    /// Whether this error is a cancellation rather than a fetch failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Objects handed out before the listing stopped
    pub fn objects_listed(&self) -> usize {
        match self {
            Self::PageFetch { objects_listed, .. } | Self::Cancelled { objects_listed, .. } => {
                *objects_listed
            }
        }
    }
}

/// Enumeration result type
pub type EnumerationResult<T> = Result<T, EnumerationError>;

/// Failure of a single tier change request
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum MutationError {
    /// Object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Object name cannot be addressed by this backend
    #[error("Invalid object name: {0}")]
    InvalidName(String),

    /// Target tier cannot be set
    #[error("Invalid target tier {tier} for {object}")]
    InvalidTarget { object: String, tier: String },

    /// Conflicting operation in progress on the object
    #[error("Conflict on {object}: {reason}")]
    Conflict { object: String, reason: String },

    /// Store rejected the request
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Call did not complete (network, timeout)
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Mutation result type
pub type MutationResult<T> = Result<T, MutationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_fetch_error_context() {
        let err = EnumerationError::PageFetch {
            page_index: 1,
            continuation_token: Some("blob-049".to_string()),
            objects_listed: 50,
            source: StorageError::Unavailable("throttled".to_string()),
        };

        let msg = err.to_string();
        assert!(msg.contains("page 1"));
        assert!(msg.contains("blob-049"));
        assert!(msg.contains("throttled"));
        assert_eq!(err.objects_listed(), 50);
        assert!(!err.is_cancelled());
    }

    #[test]
    fn test_first_page_failure_mentions_start() {
        let err = EnumerationError::PageFetch {
            page_index: 0,
            continuation_token: None,
            objects_listed: 0,
            source: StorageError::Backend("denied".to_string()),
        };
        assert!(err.to_string().contains("<start>"));
    }

    #[test]
    fn test_mutation_error_messages() {
        let err = MutationError::Conflict {
            object: "blob1".to_string(),
            reason: "rehydration in progress".to_string(),
        };
        assert!(err.to_string().contains("blob1"));
    }
}
