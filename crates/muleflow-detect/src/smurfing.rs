//! Smurfing detection (fan-in and fan-out).
//!
//! For each account the detector walks its time-sorted transfer list with
//! a sliding window. The window expands to the right and is evaluated at
//! maximal extent, i.e. just before the next entry would stretch it past
//! the configured width; the first qualifying window per account per
//! direction is emitted and the scan for that list stops.
//!
//! Fan-in additionally requires that enough distinct senders contributed
//! at least one small transfer within the window, and earns a velocity
//! bonus when the aggregated inflow leaves the account again shortly after
//! the window closes.

use crate::types::{smurf_ring_id, Ring, RingEvidence, RingRoles};
use muleflow_core::config::AnalysisConfig;
use muleflow_core::detector::{Detector, DetectorMetadata};
use muleflow_core::pattern::Pattern;
use muleflow_core::types::TimeWindow;
use muleflow_graph::types::{AdjacencyEntry, FlowGraph};
use std::collections::HashMap;

/// Which transfer list a scan walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FanDirection {
    In,
    Out,
}

/// Smurfing detector covering both the fan-in (aggregation) and fan-out
/// (dispersal) variants.
#[derive(Debug, Clone)]
pub struct SmurfingDetector {
    metadata: DetectorMetadata,
}

impl Default for SmurfingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingDetector {
    /// Create a new smurfing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::ring_producer("detect/smurfing", Pattern::Smurfing)
                .with_description("Sliding-window fan-in/fan-out burst detection"),
        }
    }

    /// Detect at most one fan-in and one fan-out ring per account.
    #[must_use]
    pub fn compute(graph: &FlowGraph, config: &AnalysisConfig) -> Vec<Ring> {
        let mut rings = Vec::new();

        for account in graph.accounts() {
            if let Some(ring) = Self::scan(graph, config, account, FanDirection::In) {
                rings.push(ring);
            }
            if let Some(ring) = Self::scan(graph, config, account, FanDirection::Out) {
                rings.push(ring);
            }
        }

        tracing::debug!(rings = rings.len(), "smurfing scan complete");
        rings
    }

    fn scan(
        graph: &FlowGraph,
        config: &AnalysisConfig,
        account: &str,
        direction: FanDirection,
    ) -> Option<Ring> {
        let (list, min_peers) = match direction {
            FanDirection::In => (graph.incoming(account), config.fan_in_minimum),
            FanDirection::Out => (graph.outgoing(account), config.fan_out_minimum),
        };

        // Self-transfers do not count toward the fan.
        let entries: Vec<&AdjacencyEntry> =
            list.iter().filter(|e| e.peer != account).collect();
        if entries.len() < min_peers {
            return None;
        }

        let mut left = 0usize;
        let mut peer_tx: HashMap<&str, u32> = HashMap::new();
        let mut peer_small: HashMap<&str, u32> = HashMap::new();

        for right in 0..entries.len() {
            let entry = entries[right];
            *peer_tx.entry(entry.peer.as_str()).or_insert(0) += 1;
            if direction == FanDirection::In && entry.amount <= config.small_tx_amount {
                *peer_small.entry(entry.peer.as_str()).or_insert(0) += 1;
            }

            // Evaluate only at maximal extent: either the list is
            // exhausted or the next entry would violate the window.
            let maximal = right + 1 == entries.len()
                || entries[right + 1].ts - entries[left].ts > config.window_ms;
            if !maximal {
                continue;
            }

            if peer_tx.len() >= min_peers && Self::passes_small_gate(config, direction, &peer_tx, &peer_small) {
                return Some(Self::emit(
                    graph,
                    config,
                    account,
                    direction,
                    &entries[left..=right],
                    &peer_tx,
                ));
            }

            // Contract until the next entry fits.
            if right + 1 < entries.len() {
                while entries[right + 1].ts - entries[left].ts > config.window_ms {
                    let old = entries[left];
                    Self::decrement(&mut peer_tx, old.peer.as_str());
                    if direction == FanDirection::In && old.amount <= config.small_tx_amount {
                        Self::decrement(&mut peer_small, old.peer.as_str());
                    }
                    left += 1;
                }
            }
        }

        None
    }

    /// Fan-in requires that enough distinct senders contributed at least
    /// one small transfer within the window. Fan-out carries no such gate.
    fn passes_small_gate(
        config: &AnalysisConfig,
        direction: FanDirection,
        peer_tx: &HashMap<&str, u32>,
        peer_small: &HashMap<&str, u32>,
    ) -> bool {
        if direction == FanDirection::Out {
            return true;
        }
        let small_peers = peer_tx
            .keys()
            .filter(|peer| peer_small.contains_key(*peer))
            .count();
        small_peers as f64 / peer_tx.len() as f64 >= config.small_counterparty_ratio
    }

    fn decrement(counts: &mut HashMap<&str, u32>, key: &str) {
        if let Some(count) = counts.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                counts.remove(key);
            }
        }
    }

    fn emit(
        graph: &FlowGraph,
        config: &AnalysisConfig,
        account: &str,
        direction: FanDirection,
        window: &[&AdjacencyEntry],
        peer_tx: &HashMap<&str, u32>,
    ) -> Ring {
        let start_ts = window.first().map(|e| e.ts).unwrap_or_default();
        let end_ts = window.last().map(|e| e.ts).unwrap_or_default();

        let mut peers: Vec<String> = peer_tx.keys().map(|p| (*p).to_string()).collect();
        peers.sort_unstable();
        let unique = peers.len();

        let tx_ids: Vec<String> = window.iter().map(|e| e.tx_id.clone()).collect();

        let mut risk = 60 + unique.min(20) as u8;
        if direction == FanDirection::In {
            risk += Self::velocity_bonus(graph, config, account, window, end_ts);
        }

        let peers_csv = peers.join(",");
        let id = smurf_ring_id(account, &peers_csv, start_ts, end_ts);

        let mut members = peers.clone();
        members.push(account.to_string());

        let (pattern, roles) = match direction {
            FanDirection::In => (
                Pattern::Smurfing,
                RingRoles {
                    senders: peers,
                    receivers: Vec::new(),
                },
            ),
            FanDirection::Out => (
                Pattern::Dispersal,
                RingRoles {
                    senders: Vec::new(),
                    receivers: peers,
                },
            ),
        };

        Ring {
            id,
            pattern,
            members,
            evidence: RingEvidence {
                tx_ids,
                start_ts: Some(start_ts),
                end_ts: Some(end_ts),
                hops: None,
                roles: Some(roles),
            },
            risk_score: risk,
        }
    }

    /// Bonus when at least `velocity_out_ratio` of the window's inflow
    /// leaves the aggregator within the velocity look-ahead.
    fn velocity_bonus(
        graph: &FlowGraph,
        config: &AnalysisConfig,
        account: &str,
        window: &[&AdjacencyEntry],
        end_ts: i64,
    ) -> u8 {
        let in_sum: f64 = window.iter().map(|e| e.amount).sum();
        if in_sum <= 0.0 {
            return 0;
        }

        let horizon = TimeWindow::new(end_ts, end_ts + config.velocity_window_ms);
        let out_sum: f64 = graph
            .outgoing(account)
            .iter()
            .filter(|e| horizon.contains(e.ts))
            .map(|e| e.amount)
            .sum();

        if out_sum / in_sum >= config.velocity_out_ratio {
            config.velocity_bonus
        } else {
            0
        }
    }
}

impl Detector for SmurfingDetector {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muleflow_core::types::{Transaction, HOUR_MS};

    fn tx(id: &str, from: &str, to: &str, amount: f64, ts: i64) -> Transaction {
        Transaction::new(id, from, to, amount, ts)
    }

    fn detect(txs: &[Transaction]) -> Vec<Ring> {
        let graph = FlowGraph::from_transactions(txs);
        SmurfingDetector::compute(&graph, &AnalysisConfig::default())
    }

    /// Twelve senders, each sending one small transfer within 24 hours.
    fn fan_in_fixture() -> Vec<Transaction> {
        (0..12)
            .map(|i| {
                tx(
                    &format!("T{i:02}"),
                    &format!("S{i:02}"),
                    "R",
                    900.0,
                    i * 2 * HOUR_MS,
                )
            })
            .collect()
    }

    #[test]
    fn test_metadata() {
        let detector = SmurfingDetector::new();
        assert_eq!(detector.id(), "detect/smurfing");
    }

    #[test]
    fn test_fan_in_detected_with_all_window_senders() {
        let rings = detect(&fan_in_fixture());

        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert_eq!(ring.pattern, Pattern::Smurfing);
        // All 12 senders are inside the maximal window, not just the
        // first 10 that crossed the threshold.
        assert_eq!(ring.members.len(), 13);
        assert_eq!(ring.risk_score, 60 + 12);
        assert_eq!(ring.evidence.tx_ids.len(), 12);

        let roles = ring.evidence.roles.as_ref().unwrap();
        assert_eq!(roles.senders.len(), 12);
        assert!(roles.receivers.is_empty());
        assert!(roles.senders.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_fan_in_small_ratio_gate() {
        // 12 senders but only half send small transfers: ratio 0.5 < 0.7.
        let txs: Vec<Transaction> = (0..12)
            .map(|i| {
                let amount = if i % 2 == 0 { 900.0 } else { 5_000.0 };
                tx(
                    &format!("T{i:02}"),
                    &format!("S{i:02}"),
                    "R",
                    amount,
                    i * HOUR_MS,
                )
            })
            .collect();

        assert!(detect(&txs).is_empty());
    }

    #[test]
    fn test_fan_in_velocity_bonus() {
        let mut txs = fan_in_fixture();
        // Window closes at 22h; R disburses 95% of the 10,800 inflow
        // within 6 hours.
        txs.push(tx("V1", "R", "X", 10_300.0, 23 * HOUR_MS));

        let rings = detect(&txs);
        let fan_in = rings
            .iter()
            .find(|r| r.pattern == Pattern::Smurfing)
            .unwrap();
        assert_eq!(fan_in.risk_score, 60 + 12 + 15);
    }

    #[test]
    fn test_fan_in_velocity_outside_horizon_no_bonus() {
        let mut txs = fan_in_fixture();
        txs.push(tx("V1", "R", "X", 10_300.0, 30 * HOUR_MS));

        let rings = detect(&txs);
        let fan_in = rings
            .iter()
            .find(|r| r.pattern == Pattern::Smurfing)
            .unwrap();
        assert_eq!(fan_in.risk_score, 60 + 12);
    }

    #[test]
    fn test_fan_out_detected_without_small_gate() {
        // Eleven large dispersals: the small-transfer gate only applies to
        // fan-in.
        let txs: Vec<Transaction> = (0..11)
            .map(|i| {
                tx(
                    &format!("T{i:02}"),
                    "D",
                    &format!("R{i:02}"),
                    5_000.0,
                    i * HOUR_MS,
                )
            })
            .collect();

        let rings = detect(&txs);
        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert_eq!(ring.pattern, Pattern::Dispersal);
        assert_eq!(ring.members.len(), 12);
        assert_eq!(ring.risk_score, 60 + 11);

        let roles = ring.evidence.roles.as_ref().unwrap();
        assert!(roles.senders.is_empty());
        assert_eq!(roles.receivers.len(), 11);
    }

    #[test]
    fn test_senders_spread_beyond_window_not_flagged() {
        // Ten senders, one every 10 hours: never 10 distinct within 72h.
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                tx(
                    &format!("T{i:02}"),
                    &format!("S{i:02}"),
                    "R",
                    900.0,
                    i * 10 * HOUR_MS,
                )
            })
            .collect();

        assert!(detect(&txs).is_empty());
    }

    #[test]
    fn test_repeat_senders_counted_once() {
        // Five senders sending twice each: only 5 distinct counterparties.
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                tx(
                    &format!("T{i:02}"),
                    &format!("S{}", i % 5),
                    "R",
                    900.0,
                    i * HOUR_MS,
                )
            })
            .collect();

        assert!(detect(&txs).is_empty());
    }

    #[test]
    fn test_first_qualifying_window_only() {
        // Two separate qualifying bursts; only the first is reported.
        let mut txs = fan_in_fixture();
        for i in 0..12 {
            txs.push(tx(
                &format!("U{i:02}"),
                &format!("Z{i:02}"),
                "R",
                900.0,
                (200 + i) * HOUR_MS,
            ));
        }

        let rings = detect(&txs);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].evidence.start_ts, Some(0));
    }

    #[test]
    fn test_self_transfers_ignored() {
        let mut txs = fan_in_fixture();
        txs.truncate(9); // nine distinct senders
        txs.push(tx("SL", "R", "R", 900.0, 5 * HOUR_MS));

        // The self-transfer must not be the tenth "sender".
        assert!(detect(&txs).is_empty());
    }

    #[test]
    fn test_ring_id_stable_across_runs() {
        let txs = fan_in_fixture();
        let a = detect(&txs);
        let b = detect(&txs);
        assert_eq!(a[0].id, b[0].id);
    }
}
