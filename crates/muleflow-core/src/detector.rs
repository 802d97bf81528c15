//! Detector metadata and base trait.
//!
//! Every analysis stage is a detector with declarative metadata. The
//! algorithms themselves are exposed as associated functions on the
//! detector structs; the trait gives callers a uniform way to enumerate
//! and describe stages.

use crate::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Detector metadata.
///
/// Identifies a stage and, for ring producers, the pattern it emits.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorMetadata {
    /// Unique detector identifier (e.g., "detect/circular-routing").
    pub id: String,

    /// Pattern emitted by this detector, if it produces rings.
    ///
    /// `None` for scoring stages such as centrality.
    pub pattern: Option<Pattern>,

    /// Human-readable description.
    pub description: String,

    /// Version of the detector implementation.
    pub version: u32,
}

impl DetectorMetadata {
    /// Create metadata for a ring-producing detector.
    #[must_use]
    pub fn ring_producer(id: impl Into<String>, pattern: Pattern) -> Self {
        Self {
            id: id.into(),
            pattern: Some(pattern),
            description: String::new(),
            version: 1,
        }
    }

    /// Create metadata for a scoring stage.
    #[must_use]
    pub fn scoring(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: None,
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// Base trait for all analysis stages.
pub trait Detector: Send + Sync + Debug {
    /// Returns the detector metadata.
    fn metadata(&self) -> &DetectorMetadata;

    /// Returns the detector ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }

    /// Returns the emitted pattern, if any.
    fn pattern(&self) -> Option<Pattern> {
        self.metadata().pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe {
        metadata: DetectorMetadata,
    }

    impl Detector for Probe {
        fn metadata(&self) -> &DetectorMetadata {
            &self.metadata
        }
    }

    #[test]
    fn test_ring_producer_metadata() {
        let probe = Probe {
            metadata: DetectorMetadata::ring_producer("detect/test", Pattern::Smurfing)
                .with_description("test stage")
                .with_version(2),
        };

        assert_eq!(probe.id(), "detect/test");
        assert_eq!(probe.pattern(), Some(Pattern::Smurfing));
        assert_eq!(probe.metadata().version, 2);
    }

    #[test]
    fn test_scoring_metadata_has_no_pattern() {
        let meta = DetectorMetadata::scoring("graph/betweenness-centrality");
        assert!(meta.pattern.is_none());
    }
}
