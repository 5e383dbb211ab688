//! Tier Storage - Container Enumeration and Tier Reconciliation
//!
//! Sweeps a blob container page by page and moves every object to the tier
//! chosen by a [`TierPolicy`](tier_core::TierPolicy).
//!
//! # Components
//!
//! - **Enumerator**: lazy, pull-based listing that follows continuation tokens
//! - **Reconciler**: one tier change per listed object, failures isolated per object
//! - **Backends**: local filesystem container and an in-memory container
//! - **Telemetry**: structured logging setup and sweep counters
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tier_storage::{LocalContainer, LocalContainerConfig, TierReconciler};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LocalContainerConfig::new("/srv/blobs", "media");
//!     let container = Arc::new(LocalContainer::open(config).await?);
//!
//!     let reconciler = TierReconciler::new(container);
//!     let report = reconciler.rotate(&CancellationToken::new()).await;
//!
//!     for entry in report.failures() {
//!         eprintln!("{} failed", entry.object_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod enumerator;
pub mod error;
pub mod reconciler;
pub mod telemetry;

pub use backend::{
    BackendType, LocalContainer, LocalContainerConfig, MemoryContainer, ObjectPage, PageFetcher,
    TierContainer, TierMutator,
};
pub use config::{EnvironmentConfig, SweepOptions, DEFAULT_PAGE_SIZE};
pub use enumerator::ObjectEnumerator;
pub use error::{
    EnumerationError, EnumerationResult, MutationError, MutationResult, StorageError,
    StorageResult,
};
pub use reconciler::{
    SweepEntry, SweepInterruption, SweepMode, SweepReport, SweepSummary, TierReconciler,
};
pub use telemetry::{init_logging, LogConfig, LogFormat, LogInitError, LogLevel, SweepMetrics};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
