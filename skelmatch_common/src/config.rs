//! Configuration for the skeleton matching run.
//!
//! This module exposes a minimal, stable surface for consumers (for example,
//! a deformation-transfer pipeline) to parameterize how matching behaves.
//!
//! The main concepts are:
//! - similarity: which attribute-distance function seeds candidate scores.
//! - per-filter settings: each of the four pruning tests can run in
//!   hard-reject or down-weight mode, with its own tolerance.
//! - one_to_many: optional relaxation permitting merged/split joints to map
//!   to several counterparts, up to a bound.
//!
//! Quick examples
//!
//! Default behavior (all filters hard-reject, one-to-one):
//! ```ignore
//! use skelmatch_common::MatchConfig;
//! let cfg = MatchConfig::default();
//! ```
//!
//! Down-weight instead of rejecting, keeping every candidate votable:
//! ```ignore
//! use skelmatch_common::MatchConfig;
//! let cfg = MatchConfig::weighted_pruning();
//! ```
//!
//! Allow split joints on the B side to absorb up to two A joints:
//! ```ignore
//! use skelmatch_common::{MatchConfig, OneToMany, RelaxedSide};
//! let mut cfg = MatchConfig::default();
//! cfg.one_to_many = OneToMany::bounded(RelaxedSide::GraphB, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a pruning filter treats a failing candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Drop the candidate and record a rejection (default).
    #[default]
    Reject,
    /// Keep the candidate but scale its weight down by the discrepancy.
    Weight,
}

/// Per-filter toggle: whether the filter runs and in which mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterToggle {
    /// Whether the filter participates in pruning at all.
    pub enabled: bool,
    /// Hard-reject or down-weight.
    pub mode: FilterMode,
}

impl Default for FilterToggle {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: FilterMode::Reject,
        }
    }
}

impl FilterToggle {
    /// A disabled filter.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            mode: FilterMode::Reject,
        }
    }

    /// An enabled filter in down-weight mode.
    pub const fn weighting() -> Self {
        Self {
            enabled: true,
            mode: FilterMode::Weight,
        }
    }
}

/// Relative weights of the normalized node attributes inside the
/// similarity-distance function.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeWeights {
    /// Weight of the normalized degree difference.
    pub degree: f64,
    /// Weight of the centrality difference.
    pub centrality: f64,
    /// Weight of the normalized eccentricity difference.
    pub eccentricity: f64,
    /// Weight of the normalized positional difference.
    pub position: f64,
}

impl Default for AttributeWeights {
    fn default() -> Self {
        Self {
            degree: 1.0,
            centrality: 1.0,
            eccentricity: 0.5,
            position: 0.25,
        }
    }
}

impl AttributeWeights {
    /// Sum of the weights.
    pub fn sum(&self) -> f64 {
        self.degree + self.centrality + self.eccentricity + self.position
    }
}

/// The similarity-distance function seeding candidate scores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimilarityMetric {
    /// Weighted Euclidean distance over normalized attributes (default).
    WeightedEuclidean(AttributeWeights),
    /// Maximum weighted component difference; stricter on outlier attributes.
    Chebyshev(AttributeWeights),
}

impl Default for SimilarityMetric {
    fn default() -> Self {
        Self::WeightedEuclidean(AttributeWeights::default())
    }
}

impl SimilarityMetric {
    /// The attribute weights carried by the metric.
    pub fn weights(&self) -> &AttributeWeights {
        match self {
            Self::WeightedEuclidean(w) | Self::Chebyshev(w) => w,
        }
    }
}

/// Relative weights of the three vote sources in the voting engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteWeights {
    /// Weight of the raw attribute-similarity vote.
    pub attribute: f64,
    /// Weight of the neighbor-consistency vote.
    pub neighbor: f64,
    /// Weight of the path-length-consistency vote.
    pub path_length: f64,
}

impl Default for VoteWeights {
    fn default() -> Self {
        Self {
            attribute: 1.0,
            neighbor: 1.0,
            path_length: 1.0,
        }
    }
}

impl VoteWeights {
    /// Sum of the weights.
    pub fn sum(&self) -> f64 {
        self.attribute + self.neighbor + self.path_length
    }
}

/// Which side of the correspondence may receive multiple partners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelaxedSide {
    /// A single A-node may map to several B-nodes (split joints).
    GraphA,
    /// Several A-nodes may map to a single B-node (merged joints).
    GraphB,
    /// Both directions relaxed.
    Both,
}

/// One-to-many relaxation for merged/split joints from extraction noise.
///
/// Disabled by default; multiplicities are always bounded and recorded
/// explicitly in the outcome, never implicit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToMany {
    /// Whether the relaxation is active.
    pub enabled: bool,
    /// Which side may exceed one partner.
    pub side: RelaxedSide,
    /// Maximum partners per node on the relaxed side.
    pub max_multiplicity: usize,
}

impl Default for OneToMany {
    fn default() -> Self {
        Self {
            enabled: false,
            side: RelaxedSide::Both,
            max_multiplicity: 1,
        }
    }
}

impl OneToMany {
    /// Enable the relaxation on one side with the given bound.
    pub const fn bounded(side: RelaxedSide, max_multiplicity: usize) -> Self {
        Self {
            enabled: true,
            side,
            max_multiplicity,
        }
    }
}

/// Global matching configuration.
///
/// All fields have documented defaults; [`MatchConfig::validate`] is called
/// at matcher entry and fails fast on invalid values. The tie-break policy of
/// the voting engine is fixed and deliberately not configurable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Similarity-distance function for the candidate generator.
    pub similarity: SimilarityMetric,
    /// Minimum raw similarity for a pair to become a candidate. Default 0.0:
    /// keep everything and let topology-aware pruning decide.
    pub candidate_floor: f64,

    /// Centrality filter tolerance tau_c. Default 0.25.
    pub centrality_tolerance: f64,
    /// Path-length filter tolerance tau_p. Default 0.35.
    pub path_length_tolerance: f64,
    /// Topological filter degree tolerance tau_deg. Default 1.
    pub degree_tolerance: u32,
    /// Spatial-configuration filter alignment tolerance tau_s. Default 0.5.
    pub spatial_tolerance: f64,

    /// Centrality filter toggle.
    pub centrality_filter: FilterToggle,
    /// Path-length filter toggle.
    pub path_length_filter: FilterToggle,
    /// Topological-consistency filter toggle.
    pub topology_filter: FilterToggle,
    /// Spatial-configuration filter toggle.
    pub spatial_filter: FilterToggle,

    /// Vote-source weights for the voting engine.
    pub vote_weights: VoteWeights,
    /// One-to-many relaxation for merged/split joints.
    pub one_to_many: OneToMany,
    /// Optional safety cap on voting confirmations. The loop is naturally
    /// bounded by the smaller graph's node count; the cap is a safety valve,
    /// not a tuning knob. Default: none.
    pub iteration_cap: Option<usize>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityMetric::default(),
            candidate_floor: 0.0,
            centrality_tolerance: 0.25,
            path_length_tolerance: 0.35,
            degree_tolerance: 1,
            spatial_tolerance: 0.5,
            centrality_filter: FilterToggle::default(),
            path_length_filter: FilterToggle::default(),
            topology_filter: FilterToggle::default(),
            spatial_filter: FilterToggle::default(),
            vote_weights: VoteWeights::default(),
            one_to_many: OneToMany::default(),
            iteration_cap: None,
        }
    }
}

impl MatchConfig {
    /// Convenience: every filter in down-weight mode, nothing hard-rejected.
    pub fn weighted_pruning() -> Self {
        Self {
            centrality_filter: FilterToggle::weighting(),
            path_length_filter: FilterToggle::weighting(),
            topology_filter: FilterToggle::weighting(),
            spatial_filter: FilterToggle::weighting(),
            ..Self::default()
        }
    }

    /// Validate thresholds, weights, and bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("centrality_tolerance", self.centrality_tolerance),
            ("path_length_tolerance", self.path_length_tolerance),
            ("spatial_tolerance", self.spatial_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::negative_threshold(name, value));
            }
        }

        if !self.candidate_floor.is_finite() || !(0.0..=1.0).contains(&self.candidate_floor) {
            return Err(ConfigError::InvalidCandidateFloor(self.candidate_floor));
        }

        let aw = self.similarity.weights();
        let attr_components = [aw.degree, aw.centrality, aw.eccentricity, aw.position];
        if attr_components.iter().any(|w| !w.is_finite() || *w < 0.0) || aw.sum() <= 0.0 {
            return Err(ConfigError::invalid_weights("attribute weights"));
        }

        let vw = &self.vote_weights;
        let vote_components = [vw.attribute, vw.neighbor, vw.path_length];
        if vote_components.iter().any(|w| !w.is_finite() || *w < 0.0) || vw.sum() <= 0.0 {
            return Err(ConfigError::invalid_weights("vote weights"));
        }

        if self.one_to_many.enabled && self.one_to_many.max_multiplicity == 0 {
            return Err(ConfigError::ZeroMultiplicity);
        }

        if self.iteration_cap == Some(0) {
            return Err(ConfigError::ZeroIterationCap);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        MatchConfig::default().validate().unwrap();
        MatchConfig::weighted_pruning().validate().unwrap();
    }

    #[test]
    fn negative_threshold_rejected() {
        let cfg = MatchConfig {
            centrality_tolerance: -0.1,
            ..MatchConfig::default()
        };
        assert_eq!(
            cfg.validate().unwrap_err(),
            ConfigError::negative_threshold("centrality_tolerance", -0.1)
        );
    }

    #[test]
    fn zero_multiplicity_rejected() {
        let cfg = MatchConfig {
            one_to_many: OneToMany {
                enabled: true,
                side: RelaxedSide::GraphB,
                max_multiplicity: 0,
            },
            ..MatchConfig::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::ZeroMultiplicity);
    }

    #[test]
    fn zero_iteration_cap_rejected() {
        let cfg = MatchConfig {
            iteration_cap: Some(0),
            ..MatchConfig::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), ConfigError::ZeroIterationCap);
    }
}
