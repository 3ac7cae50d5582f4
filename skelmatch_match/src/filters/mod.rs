//! The pruning pipeline.
//!
//! Four independent tests — centrality, path length, topological
//! consistency, spatial configuration — each consume the full candidate set
//! and either reject failing candidates or down-weight them, per the
//! configured [`FilterMode`]. Filters compose by intersection: a candidate
//! must pass every enabled rejecting filter to reach the voting engine.
//! Rejected candidates never vote but are retained in the diagnostics trail.

pub(crate) mod centrality;
pub(crate) mod path_length;
pub(crate) mod spatial;
pub(crate) mod topology;

use std::fmt;

use serde::Serialize;
use skelmatch_common::{FilterMode, MatchConfig, NodeId};
use tracing::trace;

use crate::assignment::Assignment;
use crate::candidates::CandidateSet;
use crate::matcher::MatchContext;

/// Which pruning test produced a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FilterKind {
    /// Normalized-centrality comparison.
    Centrality,
    /// Shortest-path multiset comparison.
    PathLength,
    /// Degree and confirmed-neighbor consistency.
    Topology,
    /// Neighborhood `(distance, angle)` profile alignment.
    Spatial,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Diagnostic record of one pruned candidate.
#[derive(Clone, Debug, Serialize)]
pub struct Rejection {
    /// Node id on the A side.
    pub a: NodeId,
    /// Node id on the B side.
    pub b: NodeId,
    /// The filter that rejected the pair.
    pub filter: FilterKind,
    /// Measured discrepancy; infinite for topological contradictions.
    pub discrepancy: f64,
    /// The threshold it exceeded.
    pub threshold: f64,
}

/// Run the enabled filters over the candidate set, in the fixed order
/// centrality, path length, topology, spatial. Returns the rejection trail.
///
/// Pruning runs before the first vote, so the partial correspondence is
/// empty here; the path-length test therefore compares against all other
/// candidates weighted by their own scores. Both state-dependent filters are
/// re-consulted by the voting engine as confirmations accrue.
pub(crate) fn run_pipeline(
    set: &mut CandidateSet,
    ctx: &MatchContext<'_, '_, '_>,
    config: &MatchConfig,
) -> Vec<Rejection> {
    let mut rejections = Vec::new();
    let empty = Assignment::new();

    if config.centrality_filter.enabled {
        apply(
            set,
            FilterKind::Centrality,
            config.centrality_tolerance,
            config.centrality_filter.mode,
            &mut rejections,
            |c| Some(centrality::discrepancy(ctx, c.a_idx, c.b_idx)),
        );
    }

    if config.path_length_filter.enabled {
        let evidence = path_length::weighted_evidence(set);
        apply(
            set,
            FilterKind::PathLength,
            config.path_length_tolerance,
            config.path_length_filter.mode,
            &mut rejections,
            |c| {
                path_length::discrepancy(
                    ctx,
                    c.a_idx,
                    c.b_idx,
                    &path_length::PathEvidence::Weighted(&evidence),
                )
            },
        );
    }

    if config.topology_filter.enabled {
        apply(
            set,
            FilterKind::Topology,
            f64::from(config.degree_tolerance),
            config.topology_filter.mode,
            &mut rejections,
            |c| Some(topology::discrepancy(ctx, c.a_idx, c.b_idx, &empty)),
        );
    }

    if config.spatial_filter.enabled {
        apply(
            set,
            FilterKind::Spatial,
            config.spatial_tolerance,
            config.spatial_filter.mode,
            &mut rejections,
            |c| {
                spatial::discrepancy(
                    &ctx.a.attrs.node(c.a_idx).spatial,
                    &ctx.b.attrs.node(c.b_idx).spatial,
                )
            },
        );
    }

    rejections
}

/// Apply one filter to every surviving candidate.
///
/// A `None` discrepancy means the test is not applicable to the pair
/// (degenerate attributes, no usable evidence) and the candidate passes
/// untouched.
fn apply(
    set: &mut CandidateSet,
    kind: FilterKind,
    threshold: f64,
    mode: FilterMode,
    rejections: &mut Vec<Rejection>,
    measure: impl Fn(&crate::candidates::Candidate) -> Option<f64>,
) {
    set.items.retain_mut(|cand| {
        let Some(discrepancy) = measure(cand) else {
            return true;
        };
        if discrepancy <= threshold {
            return true;
        }

        trace!(
            "{kind} filter: ({}, {}) discrepancy {discrepancy:.4} > {threshold:.4}",
            cand.a, cand.b
        );

        match mode {
            FilterMode::Reject => {
                rejections.push(Rejection {
                    a: cand.a,
                    b: cand.b,
                    filter: kind,
                    discrepancy,
                    threshold,
                });
                false
            }
            FilterMode::Weight => {
                cand.weight *= if discrepancy.is_finite() {
                    1.0 / (1.0 + discrepancy)
                } else {
                    0.0
                };
                true
            }
        }
    });
}
