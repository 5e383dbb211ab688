//! `tiers` Errors
//!
//! Every failure maps to a distinct process exit code so scripts can tell
//! a bad invocation from an unreachable container or a partial sweep.

use thiserror::Error;
use tier_storage::StorageError;

#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or unusable connection settings
    #[error("Configuration: {message}")]
    Config { message: String },

    #[error("Bad argument: {message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Reading stdin or writing stdout failed
    #[error("Terminal I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Sweep stopped before covering the container
    #[error("Sweep interrupted: {reason}")]
    SweepInterrupted { reason: String },

    /// Some tier changes failed
    #[error("{count} tier change(s) failed")]
    TransitionsFailed { count: usize },
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_arg(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::SweepInterrupted {
            reason: reason.into(),
        }
    }

    /// Process exit code
    ///
    /// 1-9 are setup failures, 10 and up mean a sweep ran but did not
    /// fully succeed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } | Self::Storage(StorageError::Configuration(_)) => 1,
            Self::InvalidArgument { .. } => 2,
            Self::Storage(StorageError::NotFound(_)) => 3,
            Self::Storage(_) => 4,
            Self::Io(_) => 5,
            Self::Json(_) => 6,
            Self::SweepInterrupted { .. } => 10,
            Self::TransitionsFailed { .. } => 11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_setting() {
        let err = CliError::config("Missing container name");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Missing container name"));
    }

    #[test]
    fn test_storage_config_error_shares_exit_code() {
        let err: CliError = StorageError::Configuration("CONTAINER_NAME is not set".into()).into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_container_exit_code() {
        let err: CliError = StorageError::NotFound("container".into()).into();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_sweep_outcome_errors() {
        assert_eq!(CliError::interrupted("cancelled").exit_code(), 10);

        let err = CliError::TransitionsFailed { count: 2 };
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().starts_with("2 tier change"));
    }
}
