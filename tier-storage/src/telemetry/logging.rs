//! Log Output Setup
//!
//! Installs the global `tracing` subscriber for binaries built on this
//! crate. Every sweep runs inside a `sweep` span carrying its `sweep_id`,
//! so JSON output can be grouped per sweep downstream.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

/// Verbosity for the workspace crates when no explicit filter is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Line format written to stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event, span fields included
    Json,
    /// Multi-line, human oriented
    Pretty,
    /// Single line per event
    #[default]
    Compact,
}

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Annotate events with file and line
    pub with_source: bool,
    /// Emit an event when a span closes (sweep durations)
    pub span_close_events: bool,
    /// Full `EnvFilter` directive; overrides `level` and `targets`
    pub filter: Option<String>,
    /// Crates `level` applies to
    pub targets: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl LogConfig {
    /// Compact output for the workspace crates at `level`
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            format: LogFormat::Compact,
            with_source: false,
            span_close_events: false,
            filter: None,
            targets: vec!["tier_storage".to_string(), "tier_cli".to_string()],
        }
    }

    /// JSON lines with sweep span timings, for log shipping
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            span_close_events: true,
            ..Self::new(LogLevel::Info)
        }
    }

    /// Debug-level pretty output with source locations
    pub fn development() -> Self {
        Self {
            format: LogFormat::Pretty,
            with_source: true,
            ..Self::new(LogLevel::Debug)
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }

    /// `EnvFilter` directive this config resolves to
    pub fn directive(&self) -> String {
        if let Some(filter) = &self.filter {
            return filter.clone();
        }
        self.targets
            .iter()
            .map(|target| format!("{}={}", target.replace('-', "_"), self.level.as_str()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Why the subscriber could not be installed
#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("logging already initialized: {0}")]
    Install(#[from] TryInitError),
}

/// Install the global subscriber
///
/// Fails if the directive does not parse or a subscriber is already set.
pub fn init_logging(config: &LogConfig) -> Result<(), LogInitError> {
    let filter = EnvFilter::try_new(config.directive())?;

    let span_events = if config.span_close_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(span_events)
        .with_file(config.with_source)
        .with_line_number(config.with_source);

    let output: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => base.json().boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(output)
        .with(filter)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_crates() {
        let config = LogConfig::default();
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.directive(), "tier_storage=info,tier_cli=info");
    }

    #[test]
    fn test_presets() {
        let production = LogConfig::production();
        assert_eq!(production.format, LogFormat::Json);
        assert!(production.span_close_events);

        let development = LogConfig::development();
        assert_eq!(development.level, LogLevel::Debug);
        assert!(development.with_source);
        assert_eq!(development.directive(), "tier_storage=debug,tier_cli=debug");
    }

    #[test]
    fn test_explicit_filter_wins() {
        let config = LogConfig::new(LogLevel::Warn).with_filter("tier_storage=trace");
        assert_eq!(config.directive(), "tier_storage=trace");
    }

    #[test]
    fn test_level_parsing_and_order() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert!(LogLevel::Trace > LogLevel::Info);
    }

    #[test]
    fn test_bad_filter_rejected() {
        let config = LogConfig::default().with_filter("tier_storage=[");
        assert!(matches!(init_logging(&config), Err(LogInitError::Filter(_))));
    }
}
