//! # Muleflow
//!
//! Forensic transaction-graph analysis for money-muling patterns.
//!
//! Muleflow ingests a validated list of directed monetary transactions and
//! produces a report identifying accounts and subgraphs exhibiting three
//! typologies:
//!
//! - **Circular fund routing** - simple directed cycles of 3-5 accounts
//!   with chronologically ordered transfers
//! - **Smurfing / structuring** - fan-in aggregation and fan-out dispersal
//!   bursts within a 72-hour sliding window
//! - **Layered shell chains** - relays through low-activity intermediary
//!   accounts
//!
//! The engine is a pure synchronous function: no I/O, no clocks, no
//! randomness, and byte-identical output for identical input. Stages emit
//! `tracing` events (gating decisions, ring counts); embedding services
//! install a subscriber with `core::logging::LogConfig`, e.g.
//! `LogConfig::production().init()`.
//!
//! ## Quick Start
//!
//! ```rust
//! use muleflow::prelude::*;
//!
//! let transactions = vec![
//!     Transaction::new("T1", "A", "B", 1_000.0, 36_000_000),
//!     Transaction::new("T2", "B", "C", 1_000.0, 39_600_000),
//!     Transaction::new("T3", "C", "A", 1_000.0, 43_200_000),
//! ];
//!
//! let report = analyze(&transactions);
//! assert_eq!(report.report.fraud_rings.len(), 1);
//! assert_eq!(report.report.fraud_rings[0].risk_score, 85);
//! ```
//!
//! ## Crate organization
//!
//! - [`core`] - patterns, configuration, errors, shared types
//! - [`graph`] - graph construction and betweenness centrality
//! - [`detect`] - the three ring detectors and deduplication
//! - [`engine`] - the `analyze` pipeline
//! - [`report`] - native and export report shapes

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export the stage crates
pub use muleflow_core as core;
pub use muleflow_detect as detect;
pub use muleflow_graph as graph;

pub mod engine;
pub mod report;
mod scoring;

pub use engine::{analyze, analyze_with_config};
pub use report::{export_report, AnalysisReport, ExportReport};

/// Prelude module for convenient imports.
///
/// Import everything you need with:
/// ```rust
/// use muleflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{analyze, analyze_with_config};
    pub use crate::report::{
        export_report, AnalysisReport, ExportReport, GraphEdge, GraphNode, NodeFlags,
        SuspiciousAccount,
    };
    pub use muleflow_core::prelude::*;
    pub use muleflow_detect::prelude::*;
    pub use muleflow_graph::prelude::*;
}

/// Version information.
pub mod version {
    /// Crate version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
