//! Layered shell chain detection.
//!
//! Bounded-depth DFS over the outgoing adjacency, following chains whose
//! interior accounts are low-activity and whose hops are chronologically
//! ordered with a bounded gap. Qualifying prefixes are collected as
//! candidates; a final pass keeps only maximal chains so a relay is
//! reported once rather than once per sub-chain.

use crate::types::{layer_ring_id, Ring, RingEvidence};
use muleflow_core::config::AnalysisConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_core::pattern::Pattern;
use muleflow_graph::types::FlowGraph;
use std::collections::{BTreeSet, HashSet};

/// One candidate chain collected during the DFS.
#[derive(Debug, Clone)]
struct ChainCandidate {
    members: Vec<String>,
    member_set: BTreeSet<String>,
    tx_ids: Vec<String>,
    start_ts: i64,
    end_ts: i64,
}

/// Layered shell chain detector.
#[derive(Debug, Clone)]
pub struct LayeringDetector {
    metadata: DetectorMetadata,
}

impl Default for LayeringDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LayeringDetector {
    /// Create a new layering detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::ring_producer("detect/layering", Pattern::LayeredShell)
                .with_description("Relay chains through low-activity intermediaries"),
        }
    }

    /// Enumerate maximal layered chains in the graph.
    #[must_use]
    pub fn compute(graph: &FlowGraph, config: &AnalysisConfig) -> Vec<Ring> {
        let mut candidates: Vec<ChainCandidate> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for start in graph.accounts() {
            if graph.outgoing(start).is_empty() {
                continue;
            }
            let mut path: Vec<&str> = vec![start.as_str()];
            let mut tx_path: Vec<(&str, i64)> = Vec::new();
            Self::dfs(
                graph,
                config,
                &mut path,
                &mut tx_path,
                None,
                &mut seen,
                &mut candidates,
            );
        }

        let rings = Self::keep_maximal(candidates);
        tracing::debug!(rings = rings.len(), "layering scan complete");
        rings
    }

    fn dfs<'g>(
        graph: &'g FlowGraph,
        config: &AnalysisConfig,
        path: &mut Vec<&'g str>,
        tx_path: &mut Vec<(&'g str, i64)>,
        last_ts: Option<i64>,
        seen: &mut HashSet<String>,
        candidates: &mut Vec<ChainCandidate>,
    ) {
        let current = *path.last().expect("path never empty");

        // Interior accounts must be low-activity; the chain head is exempt.
        if path.len() >= 2
            && !graph.is_low_activity(current, config.low_activity_max_degree)
        {
            return;
        }

        // Depth bound on hops.
        if path.len() - 1 >= config.layering_max_depth {
            return;
        }

        for entry in graph.outgoing(current) {
            if path.contains(&entry.peer.as_str()) {
                continue;
            }
            if let Some(last) = last_ts {
                if entry.ts < last || entry.ts - last > config.layering_max_gap_ms {
                    continue;
                }
            }

            path.push(entry.peer.as_str());
            tx_path.push((entry.tx_id.as_str(), entry.ts));

            if path.len() - 1 >= config.layering_min_hops {
                let member_set: BTreeSet<String> =
                    path.iter().map(|m| (*m).to_string()).collect();
                let identity = member_set
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                if seen.insert(identity) {
                    candidates.push(ChainCandidate {
                        members: path.iter().map(|m| (*m).to_string()).collect(),
                        member_set,
                        tx_ids: tx_path.iter().map(|(id, _)| (*id).to_string()).collect(),
                        start_ts: tx_path.first().map(|(_, ts)| *ts).unwrap_or_default(),
                        end_ts: entry.ts,
                    });
                }
            }

            Self::dfs(graph, config, path, tx_path, Some(entry.ts), seen, candidates);

            tx_path.pop();
            path.pop();
        }
    }

    /// Drop candidates whose member set is a strict subset of another
    /// candidate's member set, then materialize the survivors.
    fn keep_maximal(candidates: Vec<ChainCandidate>) -> Vec<Ring> {
        let survivors: Vec<&ChainCandidate> = candidates
            .iter()
            .filter(|candidate| {
                !candidates.iter().any(|other| {
                    other.member_set.len() > candidate.member_set.len()
                        && candidate.member_set.is_subset(&other.member_set)
                })
            })
            .collect();

        survivors
            .into_iter()
            .map(|chain| {
                let identity = chain
                    .member_set
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(",");
                let interior = chain.members.len().saturating_sub(2);

                Ring {
                    id: layer_ring_id(&identity),
                    pattern: Pattern::LayeredShell,
                    members: chain.members.clone(),
                    evidence: RingEvidence {
                        tx_ids: chain.tx_ids.clone(),
                        start_ts: Some(chain.start_ts),
                        end_ts: Some(chain.end_ts),
                        hops: Some((chain.members.len() - 1) as u32),
                        roles: None,
                    },
                    risk_score: (65 + (5 * interior).min(25)) as u8,
                }
            })
            .collect()
    }
}

impl Detector for LayeringDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
