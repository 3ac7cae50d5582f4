//! Error taxonomy for skeleton matching.
//!
//! Structural and configuration errors fail fast before any computation.
//! Geometric degeneracies (isolated nodes, empty components) are not errors:
//! they are absorbed into per-node attribute markers so the matcher always
//! produces a best-effort result on noisy extractions.

use thiserror::Error;

use crate::graph::NodeId;

/// A malformed input graph. Surfaced at graph construction, never recovered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Two nodes share the same id.
    #[error("duplicate node id {0} in skeleton graph")]
    DuplicateNodeId(NodeId),

    /// An edge references a node that does not exist.
    #[error("edge ({a}, {b}) references missing node {missing}")]
    MissingEndpoint {
        /// First endpoint of the offending edge.
        a: NodeId,
        /// Second endpoint of the offending edge.
        b: NodeId,
        /// The endpoint with no corresponding node.
        missing: NodeId,
    },

    /// An edge connects a node to itself.
    #[error("self-loop on node {0}")]
    SelfLoop(NodeId),
}

/// An invalid matcher configuration. Validated at entry, fails fast.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A pruning threshold is negative.
    #[error("threshold {name} must be non-negative, got {value}")]
    NegativeThreshold {
        /// Name of the offending threshold.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The candidate floor lies outside `[0, 1]`.
    #[error("candidate floor must lie in [0, 1], got {0}")]
    InvalidCandidateFloor(f64),

    /// A vote or attribute weight is negative, or all weights are zero.
    #[error("weights must be non-negative with a positive sum ({context})")]
    InvalidWeights {
        /// Which weight group failed validation.
        context: &'static str,
    },

    /// The one-to-many multiplicity bound is zero.
    #[error("one-to-many multiplicity bound must be at least 1")]
    ZeroMultiplicity,

    /// The voting iteration cap is zero.
    #[error("iteration cap must be at least 1 when set")]
    ZeroIterationCap,
}

impl ConfigError {
    /// Create a negative-threshold error.
    pub fn negative_threshold(name: &'static str, value: f64) -> Self {
        Self::NegativeThreshold { name, value }
    }

    /// Create an invalid-weights error.
    pub fn invalid_weights(context: &'static str) -> Self {
        Self::InvalidWeights { context }
    }
}

/// Umbrella error for a matching run.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The input graph violated a structural invariant.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
