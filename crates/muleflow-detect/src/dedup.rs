//! Ring deduplication.
//!
//! Detector outputs can cover the same accounts: a cycle whose members
//! also qualify as a layered chain, for instance. Rings are keyed by
//! their sorted member set and only the highest-priority variant per key
//! survives, ties broken by risk score.

use crate::types::Ring;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Collapse rings sharing a member set, keeping the highest-priority one.
///
/// The result is sorted by risk score descending, then ring id ascending,
/// so the ordering is stable regardless of detector emission order.
#[must_use]
pub fn dedupe_rings(rings: Vec<Ring>) -> Vec<Ring> {
    let mut best: HashMap<String, Ring> = HashMap::new();

    for ring in rings {
        match best.entry(ring.member_key()) {
            Entry::Vacant(slot) => {
                slot.insert(ring);
            }
            Entry::Occupied(mut slot) => {
                if outranks(&ring, slot.get()) {
                    slot.insert(ring);
                }
            }
        }
    }

    let mut survivors: Vec<Ring> = best.into_values().collect();
    survivors.sort_by(|a, b| {
        b.risk_score
            .cmp(&a.risk_score)
            .then_with(|| a.id.cmp(&b.id))
    });
    survivors
}

/// True when `candidate` should replace `incumbent` for the same member
/// set: higher pattern priority, then higher risk score, then smaller id
/// for a stable final tiebreak.
fn outranks(candidate: &Ring, incumbent: &Ring) -> bool {
    let by_priority = candidate
        .pattern
        .dedup_priority()
        .cmp(&incumbent.pattern.dedup_priority());
    let by_risk = candidate.risk_score.cmp(&incumbent.risk_score);

    by_priority
        .then(by_risk)
        .then_with(|| incumbent.id.cmp(&candidate.id))
        .is_gt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RingEvidence;
    use muleflow_core::pattern::Pattern;

    fn ring(id: &str, pattern: Pattern, members: &[&str], risk: u8) -> Ring {
        Ring {
            id: id.to_string(),
            pattern,
            members: members.iter().map(|m| (*m).to_string()).collect(),
            evidence: RingEvidence::default(),
            risk_score: risk,
        }
    }

    #[test]
    fn test_cycle_outranks_layering_on_same_members() {
        let survivors = dedupe_rings(vec![
            ring("layer1", Pattern::LayeredShell, &["A", "B", "C", "D"], 90),
            ring("cycle1", Pattern::CircularRouting, &["B", "A", "D", "C"], 90),
        ]);

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].pattern, Pattern::CircularRouting);
    }

    #[test]
    fn test_risk_breaks_equal_priority() {
        let survivors = dedupe_rings(vec![
            ring("s1", Pattern::Smurfing, &["A", "B"], 72),
            ring("d1", Pattern::Dispersal, &["B", "A"], 80),
        ]);

        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].id, "d1");
    }

    #[test]
    fn test_distinct_member_sets_untouched() {
        let survivors = dedupe_rings(vec![
            ring("r1", Pattern::Smurfing, &["A", "B"], 72),
            ring("r2", Pattern::Smurfing, &["A", "C"], 61),
        ]);
        assert_eq!(survivors.len(), 2);
    }

    #[test]
    fn test_sorted_by_risk_then_id() {
        let survivors = dedupe_rings(vec![
            ring("bb", Pattern::Smurfing, &["A", "B"], 70),
            ring("aa", Pattern::Smurfing, &["C", "D"], 70),
            ring("cc", Pattern::Smurfing, &["E", "F"], 90),
        ]);

        let ids: Vec<&str> = survivors.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["cc", "aa", "bb"]);
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = dedupe_rings(vec![
            ring("layer1", Pattern::LayeredShell, &["A", "B", "C"], 95),
            ring("cycle1", Pattern::CircularRouting, &["A", "B", "C"], 85),
        ]);
        let b = dedupe_rings(vec![
            ring("cycle1", Pattern::CircularRouting, &["A", "B", "C"], 85),
            ring("layer1", Pattern::LayeredShell, &["A", "B", "C"], 95),
        ]);

        assert_eq!(a[0].id, b[0].id);
        assert_eq!(a[0].id, "cycle1");
    }
}
