//! Circular fund routing detection.
//!
//! Bounded-depth DFS from every account over the outgoing adjacency,
//! emitting every simple directed cycle of 3-5 members whose edges are
//! chronologically ordered. Cycles are identified by the rotation that
//! puts the lexicographically smallest member first, so each cycle is
//! reported at most once regardless of which member the search entered
//! through.

use crate::types::{cycle_ring_id, Ring, RingEvidence};
use muleflow_core::config::AnalysisConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_core::pattern::Pattern;
use muleflow_graph::types::FlowGraph;
use std::collections::HashSet;

/// Circular fund routing detector.
#[derive(Debug, Clone)]
pub struct CircularRoutingDetector {
    metadata: DetectorMetadata,
}

impl Default for CircularRoutingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CircularRoutingDetector {
    /// Create a new circular routing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::ring_producer(
                "detect/circular-routing",
                Pattern::CircularRouting,
            )
            .with_description("Simple directed cycles of 3-5 accounts, chronologically ordered"),
        }
    }

    /// Enumerate every qualifying cycle in the graph.
    ///
    /// Emission order follows the sorted account roster and the sorted
    /// adjacency lists, so the result is deterministic for a given input.
    #[must_use]
    pub fn compute(graph: &FlowGraph, config: &AnalysisConfig) -> Vec<Ring> {
        let mut rings = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for start in graph.accounts() {
            let mut path: Vec<&str> = vec![start.as_str()];
            let mut tx_path: Vec<(&str, i64)> = Vec::new();
            Self::dfs(
                graph,
                config,
                start.as_str(),
                &mut path,
                &mut tx_path,
                i64::MIN,
                &mut seen,
                &mut rings,
            );
        }

        tracing::debug!(rings = rings.len(), "circular routing scan complete");
        rings
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs<'g>(
        graph: &'g FlowGraph,
        config: &AnalysisConfig,
        start: &'g str,
        path: &mut Vec<&'g str>,
        tx_path: &mut Vec<(&'g str, i64)>,
        last_ts: i64,
        seen: &mut HashSet<String>,
        rings: &mut Vec<Ring>,
    ) {
        let current = *path.last().expect("path never empty");

        for entry in graph.outgoing(current) {
            // Edges must stay chronologically ordered along the cycle.
            if entry.ts < last_ts {
                continue;
            }

            if entry.peer == start {
                let len = path.len();
                if len >= config.cycle_min_len && len <= config.cycle_max_len {
                    let rotated = Self::canonical_rotation(path);
                    let identity = rotated.join(",");
                    if seen.insert(identity.clone()) {
                        let mut tx_ids: Vec<String> =
                            tx_path.iter().map(|(id, _)| (*id).to_string()).collect();
                        tx_ids.push(entry.tx_id.clone());

                        rings.push(Ring {
                            id: cycle_ring_id(&identity),
                            pattern: Pattern::CircularRouting,
                            members: rotated.into_iter().map(String::from).collect(),
                            evidence: RingEvidence {
                                tx_ids,
                                ..RingEvidence::default()
                            },
                            risk_score: (70 + 5 * len) as u8,
                        });
                    }
                }
                continue;
            }

            // Simple cycles only.
            if path.contains(&entry.peer.as_str()) {
                continue;
            }

            if path.len() < config.cycle_max_len {
                path.push(entry.peer.as_str());
                tx_path.push((entry.tx_id.as_str(), entry.ts));
                Self::dfs(graph, config, start, path, tx_path, entry.ts, seen, rings);
                tx_path.pop();
                path.pop();
            }
        }
    }

    /// Rotate the member sequence so the lexicographically smallest id
    /// comes first, keeping traversal order.
    fn canonical_rotation<'a>(path: &[&'a str]) -> Vec<&'a str> {
        let pivot = path
            .iter()
            .enumerate()
            .min_by_key(|(_, member)| **member)
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mut rotated: Vec<&str> = Vec::with_capacity(path.len());
        rotated.extend_from_slice(&path[pivot..]);
        rotated.extend_from_slice(&path[..pivot]);
        rotated
    }
}

impl Detector for CircularRoutingDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muleflow_core::types::Transaction;

    fn tx(id: &str, from: &str, to: &str, ts: i64) -> Transaction {
        Transaction::new(id, from, to, 1_000.0, ts)
    }

    fn detect(txs: &[Transaction]) -> Vec<Ring> {
        let graph = FlowGraph::from_transactions(txs);
        CircularRoutingDetector::compute(&graph, &AnalysisConfig::default())
    }

    #[test]
    fn test_metadata() {
        let detector = CircularRoutingDetector::new();
        assert_eq!(detector.id(), "detect/circular-routing");
        assert_eq!(detector.pattern(), Some(Pattern::CircularRouting));
    }

    #[test]
    fn test_minimal_triangle() {
        let rings = detect(&[
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 20),
            tx("T3", "C", "A", 30),
        ]);

        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert_eq!(ring.members, vec!["A", "B", "C"]);
        assert_eq!(ring.risk_score, 85);
        assert_eq!(ring.evidence.tx_ids, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn test_chronology_pruning() {
        // C -> A happens before B -> C, so the cycle is never closed in
        // chronological order.
        let rings = detect(&[
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 30),
            tx("T3", "C", "A", 20),
        ]);
        assert!(rings.is_empty());
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        let rings = detect(&[
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 10),
            tx("T3", "C", "A", 10),
        ]);
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn test_two_cycles_not_merged() {
        let rings = detect(&[
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 20),
            tx("T3", "C", "A", 30),
            tx("T4", "D", "E", 10),
            tx("T5", "E", "F", 20),
            tx("T6", "F", "D", 30),
        ]);
        assert_eq!(rings.len(), 2);
    }

    #[test]
    fn test_self_loop_never_cycles() {
        let rings = detect(&[tx("T1", "A", "A", 10)]);
        assert!(rings.is_empty());
    }

    #[test]
    fn test_two_party_roundtrip_too_short() {
        let rings = detect(&[tx("T1", "A", "B", 10), tx("T2", "B", "A", 20)]);
        assert!(rings.is_empty());
    }

    #[test]
    fn test_five_member_cycle_found_six_not() {
        let five = detect(&[
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 20),
            tx("T3", "C", "D", 30),
            tx("T4", "D", "E", 40),
            tx("T5", "E", "A", 50),
        ]);
        assert_eq!(five.len(), 1);
        assert_eq!(five[0].risk_score, 95);

        let six = detect(&[
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 20),
            tx("T3", "C", "D", 30),
            tx("T4", "D", "E", 40),
            tx("T5", "E", "F", 50),
            tx("T6", "F", "A", 60),
        ]);
        assert!(six.is_empty());
    }

    #[test]
    fn test_canonical_rotation_dedups_across_starts() {
        // Timestamps chosen so the cycle closes chronologically from two
        // different entry points.
        let rings = detect(&[
            tx("T1", "B", "C", 10),
            tx("T2", "C", "A", 10),
            tx("T3", "A", "B", 10),
        ]);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].members[0], "A");
    }

    #[test]
    fn test_ring_id_deterministic() {
        let txs = [
            tx("T1", "A", "B", 10),
            tx("T2", "B", "C", 20),
            tx("T3", "C", "A", 30),
        ];
        let a = detect(&txs);
        let b = detect(&txs);
        assert_eq!(a[0].id, b[0].id);
    }
}
