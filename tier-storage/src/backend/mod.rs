//! Container Backends
//!
//! This module contains container backend implementations.

pub mod local;
pub mod memory;
pub mod traits;

pub use local::{LocalContainer, LocalContainerConfig};
pub use memory::MemoryContainer;
pub use traits::{BackendType, ObjectPage, PageFetcher, TierContainer, TierMutator};
