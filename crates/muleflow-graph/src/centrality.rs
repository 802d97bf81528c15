//! Betweenness centrality.
//!
//! Brandes' algorithm over the simple directed graph obtained by
//! collapsing multi-edges. Scores are normalized by the maximum observed
//! value so they land in [0, 1]; graphs above the account cap get all-zero
//! scores instead of an error.

use crate::types::FlowGraph;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_core::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Account with a centrality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeScore {
    /// Account ID.
    pub account: AccountId,
    /// Normalized centrality score in [0, 1].
    pub score: f64,
}

/// Centrality result for a graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CentralityResult {
    /// Scores per account, in roster order.
    pub scores: Vec<NodeScore>,
    /// True when the graph exceeded the size cap and scores degraded to 0.
    pub capped: bool,
}

impl CentralityResult {
    /// Get the score for one account (0 for unknown accounts).
    #[must_use]
    pub fn score_of(&self, account: &str) -> f64 {
        self.scores
            .iter()
            .find(|s| s.account == account)
            .map(|s| s.score)
            .unwrap_or(0.0)
    }

    /// Get the top-k accounts by score.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<NodeScore> {
        let mut sorted = self.scores.clone();
        sorted.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.account.cmp(&b.account))
        });
        sorted.truncate(k);
        sorted
    }

    /// Scores as an account-keyed map.
    #[must_use]
    pub fn as_map(&self) -> HashMap<&str, f64> {
        self.scores
            .iter()
            .map(|s| (s.account.as_str(), s.score))
            .collect()
    }
}

/// Betweenness centrality stage.
///
/// Runs a BFS from each account and accumulates dependency scores in a
/// single backward pass (Brandes). Edge multiplicity and amounts are
/// ignored; only reachability shapes the score.
#[derive(Debug, Clone)]
pub struct BetweennessCentrality {
    metadata: DetectorMetadata,
}

impl Default for BetweennessCentrality {
    fn default() -> Self {
        Self::new()
    }
}

impl BetweennessCentrality {
    /// Create a new betweenness centrality stage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::scoring("graph/betweenness-centrality")
                .with_description("Betweenness centrality (Brandes, max-normalized)"),
        }
    }

    /// Compute normalized betweenness for every account.
    ///
    /// Graphs with more than `max_accounts` accounts return all-zero
    /// scores with `capped = true`.
    #[must_use]
    pub fn compute(graph: &FlowGraph, max_accounts: usize) -> CentralityResult {
        let accounts = graph.accounts();
        let n = accounts.len();

        if n > max_accounts {
            tracing::info!(
                accounts = n,
                cap = max_accounts,
                "betweenness skipped, graph over size cap"
            );
            return CentralityResult {
                scores: accounts
                    .iter()
                    .map(|account| NodeScore {
                        account: account.clone(),
                        score: 0.0,
                    })
                    .collect(),
                capped: true,
            };
        }

        let index: HashMap<&str, usize> = accounts
            .iter()
            .enumerate()
            .map(|(i, account)| (account.as_str(), i))
            .collect();

        // Collapse multi-edges into a simple digraph over roster indices.
        let successors: Vec<Vec<usize>> = accounts
            .iter()
            .map(|account| {
                let unique: BTreeSet<usize> = graph
                    .outgoing(account)
                    .iter()
                    .map(|entry| index[entry.peer.as_str()])
                    .collect();
                unique.into_iter().collect()
            })
            .collect();

        let mut centrality = vec![0.0f64; n];

        for s in 0..n {
            // BFS structures
            let mut stack: Vec<usize> = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0f64; n]; // Number of shortest paths
            let mut dist = vec![-1i64; n]; // Distance from source

            sigma[s] = 1.0;
            dist[s] = 0;

            let mut queue = VecDeque::new();
            queue.push_back(s);

            // Forward BFS
            while let Some(v) = queue.pop_front() {
                stack.push(v);

                for &w in &successors[v] {
                    // First time visiting w?
                    if dist[w] < 0 {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }

                    // Is this a shortest path to w via v?
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        predecessors[w].push(v);
                    }
                }
            }

            // Backward pass - accumulate dependencies
            let mut delta = vec![0.0f64; n];

            while let Some(w) = stack.pop() {
                for &v in &predecessors[w] {
                    delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
                }

                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }

        // Normalize by the maximum observed value.
        let max = centrality.iter().cloned().fold(0.0f64, f64::max);
        if max > 0.0 {
            for c in &mut centrality {
                *c /= max;
            }
        }

        CentralityResult {
            scores: accounts
                .iter()
                .zip(centrality)
                .map(|(account, score)| NodeScore {
                    account: account.clone(),
                    score,
                })
                .collect(),
            capped: false,
        }
    }
}

impl Detector for BetweennessCentrality {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
