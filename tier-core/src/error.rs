//! Tier Core Error Types

use thiserror::Error;

/// Errors raised while building or validating tier domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TierError {
    /// Tier name could not be parsed
    #[error("Unrecognized access tier: {0}")]
    UnrecognizedTier(String),

    /// Target tier is not one of the stable tiers
    #[error("Tier {0} cannot be used as a transition target")]
    InvalidTarget(String),

    /// Object name is empty
    #[error("Object name must not be empty")]
    EmptyObjectName,
}

/// Tier core result type
pub type TierResult<T> = Result<T, TierError>;
