//! Analysis configuration.
//!
//! Every detection threshold lives here. Changing a threshold changes
//! which rings are emitted, but the engine stays deterministic for any
//! fixed configuration.
//!
//! # Example
//!
//! ```rust
//! use muleflow_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default()
//!     .with_small_tx_amount(500.0)
//!     .with_fan_in_minimum(8);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{EngineError, Result};
use crate::types::HOUR_MS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds and caps for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sliding-window width for smurfing scans, in milliseconds.
    pub window_ms: i64,
    /// Minimum distinct senders for a fan-in ring.
    pub fan_in_minimum: usize,
    /// Minimum distinct receivers for a fan-out ring.
    pub fan_out_minimum: usize,
    /// Upper bound for a transfer to count as "small", in currency units.
    pub small_tx_amount: f64,
    /// Minimum fraction of fan-in senders that must have contributed at
    /// least one small transfer within the window.
    pub small_counterparty_ratio: f64,
    /// Look-ahead window after a fan-in window for outflow velocity,
    /// in milliseconds.
    pub velocity_window_ms: i64,
    /// Minimum outflow/inflow ratio for the velocity bonus.
    pub velocity_out_ratio: f64,
    /// Risk bonus added when the velocity condition holds.
    pub velocity_bonus: u8,
    /// Minimum cycle length (member count) reported.
    pub cycle_min_len: usize,
    /// Maximum cycle length (member count) explored.
    pub cycle_max_len: usize,
    /// Account-count cap above which the cycle detector is gated off.
    pub cycle_max_accounts: usize,
    /// Transaction-count cap above which the cycle detector is gated off.
    pub cycle_max_transactions: usize,
    /// Maximum hops explored by the layering detector.
    pub layering_max_depth: usize,
    /// Minimum hops for a layered chain to be reported.
    pub layering_min_hops: usize,
    /// Maximum gap between consecutive chain hops, in milliseconds.
    pub layering_max_gap_ms: i64,
    /// Maximum total degree for an account to count as low-activity.
    pub low_activity_max_degree: u64,
    /// Account-count cap above which betweenness degrades to zero.
    pub centrality_max_accounts: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_ms: 72 * HOUR_MS,
            fan_in_minimum: 10,
            fan_out_minimum: 10,
            small_tx_amount: 1_000.0,
            small_counterparty_ratio: 0.70,
            velocity_window_ms: 6 * HOUR_MS,
            velocity_out_ratio: 0.90,
            velocity_bonus: 15,
            cycle_min_len: 3,
            cycle_max_len: 5,
            cycle_max_accounts: 2_000,
            cycle_max_transactions: 200_000,
            layering_max_depth: 6,
            layering_min_hops: 3,
            layering_max_gap_ms: 72 * HOUR_MS,
            low_activity_max_degree: 2,
            centrality_max_accounts: 2_000,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized overrides (all optional):
    /// - `MULEFLOW_WINDOW_HOURS`
    /// - `MULEFLOW_FAN_IN_MIN` / `MULEFLOW_FAN_OUT_MIN`
    /// - `MULEFLOW_SMALL_TX`
    /// - `MULEFLOW_CENTRALITY_MAX_ACCOUNTS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MULEFLOW_WINDOW_HOURS") {
            let hours: i64 = val
                .parse()
                .map_err(|_| EngineError::config(format!("bad MULEFLOW_WINDOW_HOURS: {val}")))?;
            config.window_ms = hours * HOUR_MS;
        }

        if let Ok(val) = std::env::var("MULEFLOW_FAN_IN_MIN") {
            config.fan_in_minimum = val
                .parse()
                .map_err(|_| EngineError::config(format!("bad MULEFLOW_FAN_IN_MIN: {val}")))?;
        }

        if let Ok(val) = std::env::var("MULEFLOW_FAN_OUT_MIN") {
            config.fan_out_minimum = val
                .parse()
                .map_err(|_| EngineError::config(format!("bad MULEFLOW_FAN_OUT_MIN: {val}")))?;
        }

        if let Ok(val) = std::env::var("MULEFLOW_SMALL_TX") {
            config.small_tx_amount = val
                .parse()
                .map_err(|_| EngineError::config(format!("bad MULEFLOW_SMALL_TX: {val}")))?;
        }

        if let Ok(val) = std::env::var("MULEFLOW_CENTRALITY_MAX_ACCOUNTS") {
            config.centrality_max_accounts = val.parse().map_err(|_| {
                EngineError::config(format!("bad MULEFLOW_CENTRALITY_MAX_ACCOUNTS: {val}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EngineError::config(format!("failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| EngineError::config(format!("failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::config(format!("failed to serialize config: {e}")))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| EngineError::config(format!("failed to write config: {e}")))?;

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.window_ms <= 0 {
            return Err(EngineError::config("window_ms must be positive"));
        }
        if self.fan_in_minimum == 0 || self.fan_out_minimum == 0 {
            return Err(EngineError::config("fan minimums must be at least 1"));
        }
        if !(self.small_counterparty_ratio > 0.0 && self.small_counterparty_ratio <= 1.0) {
            return Err(EngineError::config(
                "small_counterparty_ratio must be in (0, 1]",
            ));
        }
        if self.small_tx_amount < 0.0 || !self.small_tx_amount.is_finite() {
            return Err(EngineError::config(
                "small_tx_amount must be finite and non-negative",
            ));
        }
        if self.velocity_window_ms < 0 {
            return Err(EngineError::config("velocity_window_ms must not be negative"));
        }
        if self.cycle_min_len < 3 || self.cycle_max_len < self.cycle_min_len {
            return Err(EngineError::config("cycle length bounds are degenerate"));
        }
        if self.layering_min_hops < 1 || self.layering_max_depth < self.layering_min_hops {
            return Err(EngineError::config("layering depth bounds are degenerate"));
        }
        if self.layering_max_gap_ms <= 0 {
            return Err(EngineError::config("layering_max_gap_ms must be positive"));
        }
        Ok(())
    }

    /// Set the smurfing window, in hours.
    #[must_use]
    pub fn with_window_hours(mut self, hours: i64) -> Self {
        self.window_ms = hours * HOUR_MS;
        self
    }

    /// Set the fan-in minimum.
    #[must_use]
    pub fn with_fan_in_minimum(mut self, min: usize) -> Self {
        self.fan_in_minimum = min;
        self
    }

    /// Set the fan-out minimum.
    #[must_use]
    pub fn with_fan_out_minimum(mut self, min: usize) -> Self {
        self.fan_out_minimum = min;
        self
    }

    /// Set the small-transfer bound.
    #[must_use]
    pub fn with_small_tx_amount(mut self, amount: f64) -> Self {
        self.small_tx_amount = amount;
        self
    }

    /// Set the centrality account cap.
    #[must_use]
    pub fn with_centrality_max_accounts(mut self, cap: usize) -> Self {
        self.centrality_max_accounts = cap;
        self
    }

    /// Set the cycle detector caps.
    #[must_use]
    pub fn with_cycle_caps(mut self, max_accounts: usize, max_transactions: usize) -> Self {
        self.cycle_max_accounts = max_accounts;
        self.cycle_max_transactions = max_transactions;
        self
    }
}
