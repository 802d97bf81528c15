//! Pattern definitions for mule typologies.
//!
//! Detected rings are categorized into patterns representing distinct
//! money-muling behaviors. Patterns are used for:
//! - Ring classification and report labeling
//! - Deduplication priority when rings overlap
//! - Per-account flag derivation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Money-muling pattern detected by the engine.
///
/// Each pattern represents a distinct typology:
/// - Funds returning to their origin through a short chain (circular routing)
/// - Many small transfers converging on or radiating from one account
///   (smurfing / dispersal)
/// - Funds relayed through a chain of otherwise-dormant accounts
///   (layered shells)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// Circular fund routing: a simple directed cycle of 3-5 accounts with
    /// chronologically ordered transfers.
    CircularRouting,

    /// Smurfing (fan-in): many distinct senders funneling into one
    /// aggregator within a short window.
    Smurfing,

    /// Dispersal (fan-out): one sender spraying funds to many distinct
    /// receivers within a short window.
    Dispersal,

    /// Layered shell chain: funds relayed through low-activity
    /// intermediaries with bounded hop gaps.
    LayeredShell,
}

impl Pattern {
    /// All reportable patterns.
    pub const ALL: &'static [Pattern] = &[
        Pattern::CircularRouting,
        Pattern::Smurfing,
        Pattern::Dispersal,
        Pattern::LayeredShell,
    ];

    /// Returns the pattern name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Pattern::CircularRouting => "CircularRouting",
            Pattern::Smurfing => "Smurfing",
            Pattern::Dispersal => "Dispersal",
            Pattern::LayeredShell => "LayeredShell",
        }
    }

    /// Returns the human-readable report label.
    ///
    /// These labels are part of the export contract and must not change.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Pattern::CircularRouting => "Circular Fund Routing",
            Pattern::Smurfing => "Smurfing (Fan-in)",
            Pattern::Dispersal => "Smurfing (Fan-out)",
            Pattern::LayeredShell => "Layered Shell Network",
        }
    }

    /// Parse a pattern from its string name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CircularRouting" => Some(Pattern::CircularRouting),
            "Smurfing" => Some(Pattern::Smurfing),
            "Dispersal" => Some(Pattern::Dispersal),
            "LayeredShell" => Some(Pattern::LayeredShell),
            _ => None,
        }
    }

    /// Deduplication priority when two rings cover the same member set.
    ///
    /// Higher wins: circular routing outranks smurfing variants, which
    /// outrank layered shells.
    #[must_use]
    pub const fn dedup_priority(&self) -> u8 {
        match self {
            Pattern::CircularRouting => 4,
            Pattern::Smurfing | Pattern::Dispersal => 3,
            Pattern::LayeredShell => 2,
        }
    }

    /// Returns true for either smurfing variant.
    #[must_use]
    pub const fn is_smurfing(&self) -> bool {
        matches!(self, Pattern::Smurfing | Pattern::Dispersal)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
