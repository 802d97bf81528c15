//! Logging setup.
//!
//! The engine only emits `tracing` events (detector gating decisions,
//! window evaluations, ring counts); installing a subscriber is the
//! embedding service's choice. `LogConfig` covers the two setups the
//! pipeline is normally run under: readable output while working on
//! detectors, JSON lines in production. The detector and graph crates can
//! be escalated to debug on their own, so window and DFS emissions become
//! visible without drowning the rest of the service.

use serde::{Deserialize, Serialize};

/// Base log level for the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a level from its name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscriber configuration for services embedding the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base log level.
    pub level: LogLevel,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Include source file and line on each event.
    pub show_origin: bool,
    /// Raise the detector and graph crates to debug regardless of the
    /// base level.
    pub trace_detectors: bool,
}

impl LogConfig {
    /// Preset for working on detectors locally.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            show_origin: true,
            trace_detectors: true,
            ..Self::default()
        }
    }

    /// Preset for production ingestion services.
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            json: true,
            ..Self::default()
        }
    }

    /// Filter directives for this configuration.
    ///
    /// A `RUST_LOG` environment variable takes precedence when set.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut directives = self.level.as_str().to_string();
        if self.trace_detectors {
            directives.push_str(",muleflow_detect=debug,muleflow_graph=debug");
        }
        directives
    }

    /// Install a global subscriber for this configuration.
    ///
    /// Only the first install wins; later calls are no-ops, so tests and
    /// embedding services can both call this freely.
    pub fn init(&self) {
        use tracing_subscriber::{
            fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.directives()));

        let output = fmt::layer()
            .with_file(self.show_origin)
            .with_line_number(self.show_origin);
        let output = if self.json {
            output.json().boxed()
        } else {
            output.boxed()
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .try_init()
            .ok();
    }
}
