//! Telemetry Module
//!
//! Structured logging setup and sweep counters.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogConfig, LogFormat, LogInitError, LogLevel};
pub use metrics::{Counter, SweepMetrics};
