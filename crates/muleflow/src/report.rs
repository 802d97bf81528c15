//! Report structures and export serialization.
//!
//! `AnalysisReport` is the engine's native output: the annotated graph
//! plus the forensic findings. `ExportReport` is the flattened JSON shape
//! consumed by the download serializer, with fixed-point rounding on every
//! float field.

use muleflow_core::error::{EngineError, Result};
use muleflow_core::pattern::Pattern;
use muleflow_core::types::{AccountId, Transaction};
use muleflow_detect::types::Ring;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-pattern flags for one account, derived from ring membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags {
    /// Member of a circular routing ring.
    pub cycle: bool,
    /// Member of a smurfing or dispersal ring.
    pub smurfing: bool,
    /// Member of a layered shell ring.
    pub layering: bool,
}

impl NodeFlags {
    /// True when at least one flag is set.
    #[must_use]
    pub fn any(&self) -> bool {
        self.cycle || self.smurfing || self.layering
    }

    /// Record membership in a ring of the given pattern.
    pub fn set(&mut self, pattern: Pattern) {
        match pattern {
            Pattern::CircularRouting => self.cycle = true,
            Pattern::Smurfing | Pattern::Dispersal => self.smurfing = true,
            Pattern::LayeredShell => self.layering = true,
        }
    }
}

/// One account in the annotated output graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Account ID.
    pub id: AccountId,
    /// Suspicion score in [0, 100].
    pub suspicion_score: u8,
    /// Normalized betweenness centrality in [0, 1].
    pub centrality: f64,
    /// Per-pattern flags.
    pub flags: NodeFlags,
}

/// One aggregated directed edge in the output graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Sending account.
    pub source: AccountId,
    /// Receiving account.
    pub target: AccountId,
    /// Sum of transferred amounts.
    pub amount: f64,
    /// Number of transfers.
    pub count: u64,
}

/// A flagged account in the findings section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account ID.
    pub account_id: AccountId,
    /// Suspicion score in [0, 100].
    pub suspicion_score: u8,
    /// Per-pattern flags.
    pub flags: NodeFlags,
}

/// Annotated graph section of the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// All accounts, sorted by id.
    pub nodes: Vec<GraphNode>,
    /// Aggregated edges, sorted by (source, target).
    pub edges: Vec<GraphEdge>,
}

/// Findings section of the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportBody {
    /// Accounts with a positive suspicion score, highest first.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Detected rings after deduplication, highest risk first.
    pub fraud_rings: Vec<Ring>,
}

/// Complete engine output for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Annotated graph.
    pub graph: GraphView,
    /// Forensic findings.
    pub report: ReportBody,
}

impl AnalysisReport {
    /// Empty report, produced for empty inputs.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

// ============================================================================
// Export schema
// ============================================================================

/// Suspicious account entry in the export schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSuspiciousAccount {
    /// Account ID.
    pub account_id: AccountId,
    /// Suspicion score, one decimal place.
    pub suspicion_score: f64,
    /// Human-readable pattern labels.
    pub detected_patterns: Vec<String>,
    /// Id of the highest-risk ring containing this account, or empty.
    pub ring_id: String,
}

/// Ring entry in the export schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRing {
    /// Deterministic ring id.
    pub ring_id: String,
    /// Human-readable pattern label.
    pub pattern: String,
    /// Participating accounts.
    pub involved_accounts: Vec<AccountId>,
    /// Sum of evidence transaction amounts, two decimal places.
    pub total_amount: f64,
    /// Risk score, one decimal place.
    pub risk_score: f64,
}

/// Summary block of the export schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Accounts seen in the input.
    pub total_accounts_analyzed: usize,
    /// Accounts with a positive suspicion score.
    pub suspicious_accounts_flagged: usize,
    /// Rings surviving deduplication.
    pub fraud_rings_detected: usize,
    /// Wall-clock processing time, three decimal places.
    pub processing_time_seconds: f64,
}

/// Flattened report shape consumed by the download serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    /// Flagged accounts.
    pub suspicious_accounts: Vec<ExportSuspiciousAccount>,
    /// Detected rings.
    pub fraud_rings: Vec<ExportRing>,
    /// Run summary.
    pub summary: ExportSummary,
}

impl ExportReport {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::serialization(e.to_string()))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Pattern labels for an account's ring memberships, in pattern order.
fn labels_for_rings(rings: &[&Ring]) -> Vec<String> {
    Pattern::ALL
        .iter()
        .filter(|pattern| rings.iter().any(|ring| ring.pattern == **pattern))
        .map(|pattern| pattern.label().to_string())
        .collect()
}

/// Fallback labels derived from flags when no ring membership survives.
fn labels_for_flags(flags: &NodeFlags) -> Vec<String> {
    let mut labels = Vec::new();
    if flags.cycle {
        labels.push(Pattern::CircularRouting.label().to_string());
    }
    if flags.smurfing {
        labels.push(Pattern::Smurfing.label().to_string());
    }
    if flags.layering {
        labels.push(Pattern::LayeredShell.label().to_string());
    }
    labels
}

/// Flatten an analysis report into the export schema.
///
/// `total_amount` sums the amount of every evidence transaction; ids not
/// present in `transactions` contribute 0. `processing_seconds` is
/// measured by the caller — the engine itself reads no clock.
#[must_use]
pub fn export_report(
    analysis: &AnalysisReport,
    transactions: &[Transaction],
    processing_seconds: f64,
) -> ExportReport {
    let amounts: HashMap<&str, f64> = transactions
        .iter()
        .map(|tx| (tx.tx_id.as_str(), tx.amount))
        .collect();

    let fraud_rings: Vec<ExportRing> = analysis
        .report
        .fraud_rings
        .iter()
        .map(|ring| {
            let total: f64 = ring
                .evidence
                .tx_ids
                .iter()
                .map(|id| amounts.get(id.as_str()).copied().unwrap_or(0.0))
                .sum();

            ExportRing {
                ring_id: ring.id.clone(),
                pattern: ring.pattern.label().to_string(),
                involved_accounts: ring.members.clone(),
                total_amount: round2(total),
                risk_score: round1(f64::from(ring.risk_score)),
            }
        })
        .collect();

    let suspicious_accounts: Vec<ExportSuspiciousAccount> = analysis
        .report
        .suspicious_accounts
        .iter()
        .map(|account| {
            // fraud_rings are sorted by risk desc / id asc, so the first
            // membership hit is the account's highest-risk ring.
            let member_rings: Vec<&Ring> = analysis
                .report
                .fraud_rings
                .iter()
                .filter(|ring| ring.members.contains(&account.account_id))
                .collect();

            let detected_patterns = if member_rings.is_empty() {
                labels_for_flags(&account.flags)
            } else {
                labels_for_rings(&member_rings)
            };

            ExportSuspiciousAccount {
                account_id: account.account_id.clone(),
                suspicion_score: round1(f64::from(account.suspicion_score)),
                detected_patterns,
                ring_id: member_rings
                    .first()
                    .map(|ring| ring.id.clone())
                    .unwrap_or_default(),
            }
        })
        .collect();

    ExportReport {
        summary: ExportSummary {
            total_accounts_analyzed: analysis.graph.nodes.len(),
            suspicious_accounts_flagged: suspicious_accounts.len(),
            fraud_rings_detected: fraud_rings.len(),
            processing_time_seconds: round3(processing_seconds),
        },
        suspicious_accounts,
        fraud_rings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muleflow_detect::types::RingEvidence;

    fn ring(id: &str, pattern: Pattern, members: &[&str], tx_ids: &[&str], risk: u8) -> Ring {
        Ring {
            id: id.to_string(),
            pattern,
            members: members.iter().map(|m| (*m).to_string()).collect(),
            evidence: RingEvidence {
                tx_ids: tx_ids.iter().map(|t| (*t).to_string()).collect(),
                ..RingEvidence::default()
            },
            risk_score: risk,
        }
    }

    #[test]
    fn test_flags_set() {
        let mut flags = NodeFlags::default();
        assert!(!flags.any());
        flags.set(Pattern::Dispersal);
        assert!(flags.smurfing);
        assert!(flags.any());
    }

    #[test]
    fn test_export_total_amount_missing_ids_contribute_zero() {
        let analysis = AnalysisReport {
            graph: GraphView::default(),
            report: ReportBody {
                suspicious_accounts: Vec::new(),
                fraud_rings: vec![ring(
                    "r1",
                    Pattern::CircularRouting,
                    &["A", "B", "C"],
                    &["T1", "T2", "GONE"],
                    85,
                )],
            },
        };
        let txs = vec![
            Transaction::new("T1", "A", "B", 100.555, 1),
            Transaction::new("T2", "B", "C", 200.0, 2),
        ];

        let export = export_report(&analysis, &txs, 0.1234);
        assert_eq!(export.fraud_rings[0].total_amount, 300.56);
        assert_eq!(export.fraud_rings[0].pattern, "Circular Fund Routing");
        assert_eq!(export.summary.processing_time_seconds, 0.123);
    }

    #[test]
    fn test_export_account_ring_id_is_highest_risk() {
        let flags = NodeFlags {
            cycle: true,
            smurfing: false,
            layering: true,
        };
        let analysis = AnalysisReport {
            graph: GraphView::default(),
            report: ReportBody {
                suspicious_accounts: vec![SuspiciousAccount {
                    account_id: "A".to_string(),
                    suspicion_score: 85,
                    flags,
                }],
                fraud_rings: vec![
                    ring("high", Pattern::CircularRouting, &["A", "B", "C"], &[], 90),
                    ring("low", Pattern::LayeredShell, &["A", "X", "Y", "Z"], &[], 75),
                ],
            },
        };

        let export = export_report(&analysis, &[], 0.0);
        let account = &export.suspicious_accounts[0];
        assert_eq!(account.ring_id, "high");
        assert_eq!(
            account.detected_patterns,
            vec!["Circular Fund Routing", "Layered Shell Network"]
        );
    }

    #[test]
    fn test_export_patterns_fall_back_to_flags() {
        let analysis = AnalysisReport {
            graph: GraphView::default(),
            report: ReportBody {
                suspicious_accounts: vec![SuspiciousAccount {
                    account_id: "A".to_string(),
                    suspicion_score: 50,
                    flags: NodeFlags {
                        cycle: false,
                        smurfing: true,
                        layering: false,
                    },
                }],
                fraud_rings: Vec::new(),
            },
        };

        let export = export_report(&analysis, &[], 0.0);
        let account = &export.suspicious_accounts[0];
        assert!(account.ring_id.is_empty());
        assert_eq!(account.detected_patterns, vec!["Smurfing (Fan-in)"]);
    }

    #[test]
    fn test_export_json_shape() {
        let export = export_report(&AnalysisReport::empty(), &[], 0.5);
        let json = export.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["suspicious_accounts"].is_array());
        assert!(value["fraud_rings"].is_array());
        assert_eq!(value["summary"]["fraud_rings_detected"], 0);
        assert_eq!(value["summary"]["processing_time_seconds"], 0.5);
    }
}
