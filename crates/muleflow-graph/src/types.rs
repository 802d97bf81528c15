//! Common graph types and data structures.

use muleflow_core::types::{AccountId, TxId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One directed transfer as seen from an adjacency list.
///
/// `peer` is the receiver in an outgoing list and the sender in an
/// incoming list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    /// Counterparty account.
    pub peer: AccountId,
    /// Transaction ID.
    pub tx_id: TxId,
    /// Transferred amount.
    pub amount: f64,
    /// Timestamp (epoch milliseconds).
    pub ts: i64,
}

/// Per-account flow statistics, accumulated during graph build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountStats {
    /// Number of incoming transfers.
    pub in_count: u64,
    /// Number of outgoing transfers.
    pub out_count: u64,
    /// Sum of incoming amounts.
    pub in_sum: f64,
    /// Sum of outgoing amounts.
    pub out_sum: f64,
}

impl AccountStats {
    /// Total transfer count (in + out).
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.in_count + self.out_count
    }
}

/// Aggregated directed edge between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeAggregate {
    /// Sending account.
    pub source: AccountId,
    /// Receiving account.
    pub target: AccountId,
    /// Sum of transferred amounts.
    pub amount_sum: f64,
    /// Number of transfers.
    pub count: u64,
}

/// Aggregate figures for a built graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Number of distinct accounts.
    pub accounts: usize,
    /// Number of transactions folded in.
    pub transactions: usize,
    /// Sum of all transferred amounts.
    pub total_amount: f64,
    /// Highest outgoing transfer count over all accounts.
    pub max_out_degree: u64,
    /// Highest incoming transfer count over all accounts.
    pub max_in_degree: u64,
}

/// Directed transaction graph with per-account adjacency and statistics.
///
/// Built once per analysis run and read-only afterwards. Adjacency lists
/// are sorted ascending by `(ts, tx_id)` so detectors can iterate them
/// monotonically.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub(crate) out_adj: HashMap<AccountId, Vec<AdjacencyEntry>>,
    pub(crate) in_adj: HashMap<AccountId, Vec<AdjacencyEntry>>,
    pub(crate) stats: HashMap<AccountId, AccountStats>,
    pub(crate) edges: HashMap<(AccountId, AccountId), EdgeAggregate>,
    /// Sorted account roster for deterministic iteration.
    pub(crate) accounts: Vec<AccountId>,
    pub(crate) tx_count: usize,
}

impl FlowGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of distinct accounts.
    #[must_use]
    pub fn num_accounts(&self) -> usize {
        self.accounts.len()
    }

    /// Number of transactions folded into the graph.
    #[must_use]
    pub fn num_transactions(&self) -> usize {
        self.tx_count
    }

    /// Sorted roster of every account appearing as sender or receiver.
    #[must_use]
    pub fn accounts(&self) -> &[AccountId] {
        &self.accounts
    }

    /// Outgoing transfers of an account, sorted by `(ts, tx_id)`.
    #[must_use]
    pub fn outgoing(&self, account: &str) -> &[AdjacencyEntry] {
        self.out_adj.get(account).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming transfers of an account, sorted by `(ts, tx_id)`.
    #[must_use]
    pub fn incoming(&self, account: &str) -> &[AdjacencyEntry] {
        self.in_adj.get(account).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flow statistics of an account.
    #[must_use]
    pub fn stats(&self, account: &str) -> Option<&AccountStats> {
        self.stats.get(account)
    }

    /// Total transfer count of an account (0 for unknown accounts).
    #[must_use]
    pub fn total_degree(&self, account: &str) -> u64 {
        self.stats
            .get(account)
            .map(AccountStats::total_count)
            .unwrap_or(0)
    }

    /// Returns true when the account's total transfer count does not
    /// exceed `max_degree`.
    #[must_use]
    pub fn is_low_activity(&self, account: &str, max_degree: u64) -> bool {
        self.total_degree(account) <= max_degree
    }

    /// Aggregated edges sorted by `(source, target)`.
    #[must_use]
    pub fn edge_aggregates(&self) -> Vec<&EdgeAggregate> {
        let mut edges: Vec<&EdgeAggregate> = self.edges.values().collect();
        edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        edges
    }

    /// Aggregate figures for this graph.
    #[must_use]
    pub fn summary(&self) -> GraphSummary {
        let mut total_amount = 0.0;
        for edge in self.edges.values() {
            total_amount += edge.amount_sum;
        }

        let mut max_out_degree = 0;
        let mut max_in_degree = 0;
        for stats in self.stats.values() {
            max_out_degree = max_out_degree.max(stats.out_count);
            max_in_degree = max_in_degree.max(stats.in_count);
        }

        GraphSummary {
            accounts: self.accounts.len(),
            transactions: self.tx_count,
            total_amount,
            max_out_degree,
            max_in_degree,
        }
    }
}
