//! # Muleflow Core
//!
//! Core abstractions and shared types for the muleflow transaction-graph
//! analysis engine.
//!
//! This crate provides:
//! - Pattern definitions for the reportable mule typologies
//! - Transaction and time-window types shared by all stages
//! - Detector metadata and the base detector trait
//! - Analysis configuration with every detection threshold
//! - Error types
//! - Logging setup helpers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod pattern;
pub mod types;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::AnalysisConfig;
    pub use crate::detector::{Detector, DetectorMetadata};
    pub use crate::error::{EngineError, Result};
    pub use crate::logging::{LogConfig, LogLevel};
    pub use crate::pattern::Pattern;
    pub use crate::types::{AccountId, TimeWindow, Transaction, TxId, HOUR_MS};
}
