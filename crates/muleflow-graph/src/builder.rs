//! Graph construction.
//!
//! Single pass over the transaction list: update sender/receiver
//! statistics, append to both adjacency indexes, and fold into the
//! `(sender, receiver)` edge aggregate. Adjacency lists are sorted by
//! `(ts, tx_id)` afterwards so every later stage sees a deterministic
//! order regardless of input permutation.

use crate::types::{AccountStats, AdjacencyEntry, EdgeAggregate, FlowGraph};
use muleflow_core::types::Transaction;
use std::collections::BTreeSet;

impl FlowGraph {
    /// Build a graph from a validated transaction list.
    ///
    /// Duplicate transaction ids are accepted as-is; the upstream parser
    /// guarantees uniqueness. An empty input yields an empty graph.
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            return Self::empty();
        }

        let mut graph = Self::empty();
        let mut roster: BTreeSet<&str> = BTreeSet::new();

        for tx in transactions {
            roster.insert(&tx.sender);
            roster.insert(&tx.receiver);

            let sender_stats = graph.stats.entry(tx.sender.clone()).or_default();
            sender_stats.out_count += 1;
            sender_stats.out_sum += tx.amount;

            let receiver_stats = graph.stats.entry(tx.receiver.clone()).or_default();
            receiver_stats.in_count += 1;
            receiver_stats.in_sum += tx.amount;

            graph
                .out_adj
                .entry(tx.sender.clone())
                .or_default()
                .push(AdjacencyEntry {
                    peer: tx.receiver.clone(),
                    tx_id: tx.tx_id.clone(),
                    amount: tx.amount,
                    ts: tx.ts,
                });

            graph
                .in_adj
                .entry(tx.receiver.clone())
                .or_default()
                .push(AdjacencyEntry {
                    peer: tx.sender.clone(),
                    tx_id: tx.tx_id.clone(),
                    amount: tx.amount,
                    ts: tx.ts,
                });

            let edge = graph
                .edges
                .entry((tx.sender.clone(), tx.receiver.clone()))
                .or_insert_with(|| EdgeAggregate {
                    source: tx.sender.clone(),
                    target: tx.receiver.clone(),
                    amount_sum: 0.0,
                    count: 0,
                });
            edge.amount_sum += tx.amount;
            edge.count += 1;
        }

        for entries in graph.out_adj.values_mut() {
            entries.sort_by(|a, b| a.ts.cmp(&b.ts).then_with(|| a.tx_id.cmp(&b.tx_id)));
        }
        for entries in graph.in_adj.values_mut() {
            entries.sort_by(|a, b| a.ts.cmp(&b.ts).then_with(|| a.tx_id.cmp(&b.tx_id)));
        }

        graph.accounts = roster.into_iter().map(String::from).collect();
        graph.tx_count = transactions.len();

        tracing::debug!(
            accounts = graph.accounts.len(),
            transactions = graph.tx_count,
            edges = graph.edges.len(),
            "flow graph built"
        );

        graph
    }
}
