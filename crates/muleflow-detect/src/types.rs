//! Ring types and deterministic identifiers.

use muleflow_core::pattern::Pattern;
use muleflow_core::types::{AccountId, TxId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Role metadata for smurfing rings, consumed by the scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingRoles {
    /// Sending counterparties (fan-in), sorted.
    pub senders: Vec<AccountId>,
    /// Receiving counterparties (fan-out), sorted.
    pub receivers: Vec<AccountId>,
}

/// Evidence backing one detected ring.
///
/// Every transaction id references an actual transfer connecting two
/// adjacent members in the pattern's semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingEvidence {
    /// Transaction ids, in pattern traversal order.
    pub tx_ids: Vec<TxId>,
    /// Window start (epoch ms), for windowed patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_ts: Option<i64>,
    /// Window end (epoch ms), for windowed patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_ts: Option<i64>,
    /// Hop count, for chain patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hops: Option<u32>,
    /// Counterparty roles, for smurfing patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RingRoles>,
}

/// One detected pattern instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    /// Deterministic hex identifier, stable across runs.
    pub id: String,
    /// Pattern family.
    pub pattern: Pattern,
    /// Participating accounts.
    pub members: Vec<AccountId>,
    /// Backing evidence.
    pub evidence: RingEvidence,
    /// Risk score in [0, 100].
    pub risk_score: u8,
}

impl Ring {
    /// Sorted member-set key used for deduplication.
    #[must_use]
    pub fn member_key(&self) -> String {
        let mut members: Vec<&str> = self.members.iter().map(AccountId::as_str).collect();
        members.sort_unstable();
        members.dedup();
        members.join(",")
    }
}

/// Stable hex digest of a pattern identity string.
///
/// First 16 bytes of SHA-256, hex-encoded. Re-running the engine on the
/// same input produces the same digest.
#[must_use]
pub fn stable_digest(identity: &str) -> String {
    let digest = Sha256::digest(identity.as_bytes());
    hex::encode(&digest[..16])
}

/// Ring id for a cycle, from its canonical member rotation.
#[must_use]
pub fn cycle_ring_id(identity: &str) -> String {
    stable_digest(&format!("cycle|{identity}"))
}

/// Ring id for a smurfing window.
#[must_use]
pub fn smurf_ring_id(account: &str, sorted_peers_csv: &str, start_ts: i64, end_ts: i64) -> String {
    stable_digest(&format!("smurf|{account}|{sorted_peers_csv}|{start_ts}|{end_ts}"))
}

/// Ring id for a layered chain, from its sorted member set.
#[must_use]
pub fn layer_ring_id(identity: &str) -> String {
    stable_digest(&format!("layer|{identity}"))
}
