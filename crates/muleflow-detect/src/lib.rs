//! # Muleflow Detect
//!
//! Pattern detectors over a built transaction graph.
//!
//! ## Detectors
//!
//! - `CircularRoutingDetector` - simple directed cycles of 3-5 accounts
//!   with chronologically ordered transfers
//! - `SmurfingDetector` - fan-in and fan-out bursts within a sliding
//!   window, with a small-transfer gate and an outflow-velocity bonus on
//!   the fan-in side
//! - `LayeringDetector` - relay chains through low-activity accounts with
//!   bounded hop gaps
//!
//! Detector outputs are merged and collapsed by `dedup::dedupe_rings`
//! before scoring.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cycles;
pub mod dedup;
pub mod layering;
pub mod smurfing;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cycles::CircularRoutingDetector;
    pub use crate::dedup::dedupe_rings;
    pub use crate::layering::LayeringDetector;
    pub use crate::smurfing::SmurfingDetector;
    pub use crate::types::{Ring, RingEvidence, RingRoles};
}
