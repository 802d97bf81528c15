//! The analysis pipeline.
//!
//! One synchronous pass: build the graph, run the three detectors,
//! deduplicate rings, compute centrality, score accounts, and assemble
//! the report. The engine holds no state between calls and never fails;
//! oversize inputs degrade (cycle detection gated off, centrality zeroed)
//! instead of erroring.

use crate::report::{
    AnalysisReport, GraphEdge, GraphNode, GraphView, ReportBody, SuspiciousAccount,
};
use crate::scoring::assess_accounts;
use muleflow_core::config::AnalysisConfig;
use muleflow_core::types::Transaction;
use muleflow_detect::cycles::CircularRoutingDetector;
use muleflow_detect::dedup::dedupe_rings;
use muleflow_detect::layering::LayeringDetector;
use muleflow_detect::smurfing::SmurfingDetector;
use muleflow_detect::types::Ring;
use muleflow_graph::centrality::BetweennessCentrality;
use muleflow_graph::types::FlowGraph;

/// Analyze a validated transaction list with the reference thresholds.
#[must_use]
pub fn analyze(transactions: &[Transaction]) -> AnalysisReport {
    analyze_with_config(transactions, &AnalysisConfig::default())
}

/// Analyze a validated transaction list with explicit thresholds.
#[must_use]
pub fn analyze_with_config(
    transactions: &[Transaction],
    config: &AnalysisConfig,
) -> AnalysisReport {
    if transactions.is_empty() {
        return AnalysisReport::empty();
    }

    let graph = FlowGraph::from_transactions(transactions);

    let mut rings: Vec<Ring> = Vec::new();

    if graph.num_accounts() <= config.cycle_max_accounts
        && graph.num_transactions() <= config.cycle_max_transactions
    {
        rings.extend(CircularRoutingDetector::compute(&graph, config));
    } else {
        tracing::info!(
            accounts = graph.num_accounts(),
            transactions = graph.num_transactions(),
            "cycle detector gated off, input over caps"
        );
    }

    rings.extend(SmurfingDetector::compute(&graph, config));
    rings.extend(LayeringDetector::compute(&graph, config));

    let rings = dedupe_rings(rings);

    let centrality = BetweennessCentrality::compute(&graph, config.centrality_max_accounts);
    let centrality_scores = centrality.as_map();

    let assessments = assess_accounts(&graph, &rings, &centrality);

    let nodes: Vec<GraphNode> = graph
        .accounts()
        .iter()
        .map(|account| {
            let assessment = assessments.get(account).copied().unwrap_or_default();
            GraphNode {
                id: account.clone(),
                suspicion_score: assessment.score,
                centrality: centrality_scores
                    .get(account.as_str())
                    .copied()
                    .unwrap_or(0.0),
                flags: assessment.flags,
            }
        })
        .collect();

    let edges: Vec<GraphEdge> = graph
        .edge_aggregates()
        .into_iter()
        .map(|edge| GraphEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
            amount: edge.amount_sum,
            count: edge.count,
        })
        .collect();

    let mut suspicious_accounts: Vec<SuspiciousAccount> = nodes
        .iter()
        .filter(|node| node.suspicion_score > 0)
        .map(|node| SuspiciousAccount {
            account_id: node.id.clone(),
            suspicion_score: node.suspicion_score,
            flags: node.flags,
        })
        .collect();
    suspicious_accounts.sort_by(|a, b| {
        b.suspicion_score
            .cmp(&a.suspicion_score)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });

    tracing::info!(
        accounts = nodes.len(),
        rings = rings.len(),
        suspicious = suspicious_accounts.len(),
        "analysis complete"
    );

    AnalysisReport {
        graph: GraphView { nodes, edges },
        report: ReportBody {
            suspicious_accounts,
            fraud_rings: rings,
        },
    }
}
