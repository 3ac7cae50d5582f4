#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use rstest::rstest;
use skelmatch_common::{
    AttributeWeights, ConfigError, FilterMode, MatchConfig, OneToMany, RelaxedSide,
    SimilarityMetric, VoteWeights,
};

#[test]
fn test_default_thresholds() {
    let cfg = MatchConfig::default();
    assert_eq!(cfg.candidate_floor, 0.0);
    assert_eq!(cfg.centrality_tolerance, 0.25);
    assert_eq!(cfg.path_length_tolerance, 0.35);
    assert_eq!(cfg.degree_tolerance, 1);
    assert_eq!(cfg.spatial_tolerance, 0.5);
    assert!(!cfg.one_to_many.enabled);
    assert!(cfg.iteration_cap.is_none());
}

#[test]
fn test_weighted_pruning_mode() {
    let cfg = MatchConfig::weighted_pruning();
    for toggle in [
        cfg.centrality_filter,
        cfg.path_length_filter,
        cfg.topology_filter,
        cfg.spatial_filter,
    ] {
        assert!(toggle.enabled);
        assert_eq!(toggle.mode, FilterMode::Weight);
    }
}

#[test]
fn test_config_serde_roundtrip() {
    let cfg = MatchConfig {
        similarity: SimilarityMetric::Chebyshev(AttributeWeights {
            degree: 2.0,
            ..AttributeWeights::default()
        }),
        one_to_many: OneToMany::bounded(RelaxedSide::GraphB, 3),
        iteration_cap: Some(64),
        ..MatchConfig::default()
    };

    let json = serde_json::to_string(&cfg).unwrap();
    let back: MatchConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, back);
}

#[rstest]
#[case(-0.1)]
#[case(1.5)]
#[case(f64::NAN)]
fn test_invalid_floor_rejected(#[case] floor: f64) {
    let cfg = MatchConfig {
        candidate_floor: floor,
        ..MatchConfig::default()
    };
    assert!(matches!(
        cfg.validate().unwrap_err(),
        ConfigError::InvalidCandidateFloor(_)
    ));
}

#[test]
fn test_zero_vote_weights_rejected() {
    let cfg = MatchConfig {
        vote_weights: VoteWeights {
            attribute: 0.0,
            neighbor: 0.0,
            path_length: 0.0,
        },
        ..MatchConfig::default()
    };
    assert_eq!(
        cfg.validate().unwrap_err(),
        ConfigError::invalid_weights("vote weights")
    );
}
