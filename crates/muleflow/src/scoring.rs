//! Account suspicion scoring.
//!
//! Combines ring-membership flags, smurfing roles, and centrality into a
//! per-account score in [0, 100]. Accounts without any ring flag score 0;
//! centrality alone never flags an account.

use crate::report::NodeFlags;
use muleflow_core::pattern::Pattern;
use muleflow_detect::types::Ring;
use muleflow_graph::centrality::CentralityResult;
use muleflow_graph::types::FlowGraph;
use std::collections::{HashMap, HashSet};

const CYCLE_BASE: u32 = 45;
const LAYERING_BASE: u32 = 40;
const AGGREGATOR_BONUS: u32 = 50;
const SENDER_BONUS: u32 = 25;
const DISPERSAL_RECEIVER_BONUS: u32 = 10;
const GENERIC_SMURF_BONUS: u32 = 25;

/// Degree at or below which the larger centrality multiplier applies.
const LOW_DEGREE_CUTOFF: u64 = 6;

/// Flags and score for one account.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Assessment {
    pub flags: NodeFlags,
    pub score: u8,
}

/// Score every account against the surviving ring set.
pub(crate) fn assess_accounts(
    graph: &FlowGraph,
    rings: &[Ring],
    centrality: &CentralityResult,
) -> HashMap<String, Assessment> {
    let mut flags: HashMap<&str, NodeFlags> = HashMap::new();
    let mut aggregators: HashSet<&str> = HashSet::new();
    let mut senders: HashSet<&str> = HashSet::new();
    let mut dispersal_receivers: HashSet<&str> = HashSet::new();

    for ring in rings {
        for member in &ring.members {
            flags.entry(member.as_str()).or_default().set(ring.pattern);
        }

        if let Some(roles) = ring.evidence.roles.as_ref() {
            for sender in &roles.senders {
                senders.insert(sender.as_str());
            }
            if ring.pattern == Pattern::Dispersal {
                for receiver in &roles.receivers {
                    dispersal_receivers.insert(receiver.as_str());
                }
            }
            if ring.pattern == Pattern::Smurfing {
                // The aggregator is the one member a fan-in ring does not
                // list among its senders.
                for member in &ring.members {
                    if !roles.senders.contains(member) {
                        aggregators.insert(member.as_str());
                    }
                }
            }
        }
    }

    let centrality_scores = centrality.as_map();
    let mut assessments = HashMap::with_capacity(graph.num_accounts());

    for account in graph.accounts() {
        let account_flags = flags.get(account.as_str()).copied().unwrap_or_default();

        // Centrality points only accrue to accounts already implicated by
        // a ring; a well-connected but clean account stays at 0.
        if !account_flags.any() {
            assessments.insert(account.clone(), Assessment::default());
            continue;
        }

        let mut score: u32 = 0;
        if account_flags.cycle {
            score += CYCLE_BASE;
        }
        if account_flags.layering {
            score += LAYERING_BASE;
        }

        score += if aggregators.contains(account.as_str()) {
            AGGREGATOR_BONUS
        } else if senders.contains(account.as_str()) {
            SENDER_BONUS
        } else if dispersal_receivers.contains(account.as_str()) {
            DISPERSAL_RECEIVER_BONUS
        } else if account_flags.smurfing {
            GENERIC_SMURF_BONUS
        } else {
            0
        };

        let c = centrality_scores
            .get(account.as_str())
            .copied()
            .unwrap_or(0.0);
        let (k, cap) = if graph.total_degree(account) <= LOW_DEGREE_CUTOFF {
            (0.20, 20)
        } else {
            (0.10, 10)
        };
        score += ((c * 100.0 * k).round() as u32).min(cap);

        assessments.insert(
            account.clone(),
            Assessment {
                flags: account_flags,
                score: score.min(100) as u8,
            },
        );
    }

    assessments
}
