//! Shared domain types.

use serde::{Deserialize, Serialize};

/// Account identifier as supplied by the upstream parser.
pub type AccountId = String;

/// Transaction identifier, unique within one analysis batch.
pub type TxId = String;

/// One hour in milliseconds.
pub const HOUR_MS: i64 = 3_600_000;

/// A validated monetary transfer between two accounts.
///
/// The upstream parser guarantees a unique `tx_id`, a finite non-negative
/// `amount`, and a millisecond epoch `ts`. Self-transfers
/// (`sender == receiver`) are permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID.
    pub tx_id: TxId,
    /// Sending account.
    pub sender: AccountId,
    /// Receiving account.
    pub receiver: AccountId,
    /// Transferred amount in currency units.
    pub amount: f64,
    /// Timestamp (Unix epoch milliseconds).
    pub ts: i64,
}

impl Transaction {
    /// Create a new transaction.
    pub fn new(
        tx_id: impl Into<TxId>,
        sender: impl Into<AccountId>,
        receiver: impl Into<AccountId>,
        amount: f64,
        ts: i64,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            ts,
        }
    }

    /// Returns true when sender and receiver are the same account.
    #[must_use]
    pub fn is_self_transfer(&self) -> bool {
        self.sender == self.receiver
    }
}

/// Time window for analysis, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start timestamp (inclusive).
    pub start: i64,
    /// End timestamp (inclusive).
    pub end: i64,
}

impl TimeWindow {
    /// Create a new time window.
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Check if a timestamp is within this window.
    #[must_use]
    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}
