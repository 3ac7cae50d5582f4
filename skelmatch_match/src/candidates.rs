//! Candidate correspondence generation.
//!
//! Every `(u in A, v in B)` pair is scored by the configured
//! similarity-distance function over normalized attributes; pairs above the
//! candidate floor enter the working set. The floor defaults to zero so that
//! nothing is eliminated before the topology-aware pruning filters have
//! seen it.

use itertools::iproduct;
use skelmatch_common::{MatchConfig, NodeId, SimilarityMetric};

use crate::matcher::MatchContext;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// A tentative pairing of one A-node with one B-node.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// Node id on the A side.
    pub a: NodeId,
    /// Node id on the B side.
    pub b: NodeId,
    /// Raw attribute similarity in `(0, 1]`.
    pub similarity: f64,
    /// Pruning weight multiplier; 1.0 until a weight-mode filter lowers it.
    pub weight: f64,
    /// Dense index of `a` in its graph.
    pub(crate) a_idx: usize,
    /// Dense index of `b` in its graph.
    pub(crate) b_idx: usize,
    /// Stable position in generation order; last tie-break key.
    pub(crate) ordinal: usize,
}

/// The working set of candidates, mutated by pruning.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    pub(crate) items: Vec<Candidate>,
}

impl CandidateSet {
    /// Surviving candidates in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.items.iter()
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no candidates remain.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Score all pairs and keep those above the floor.
///
/// Pair evaluations are independent; with the `rayon` feature the rows are
/// scored across worker threads. Generation order (row-major over input
/// order) is deterministic either way.
pub(crate) fn generate(ctx: &MatchContext<'_, '_, '_>, config: &MatchConfig) -> CandidateSet {
    let na = ctx.a.index.len();
    let nb = ctx.b.index.len();
    let pairs: Vec<(usize, usize)> = iproduct!(0..na, 0..nb).collect();

    #[cfg(feature = "rayon")]
    let iter = pairs.par_iter();
    #[cfg(not(feature = "rayon"))]
    let iter = pairs.iter();

    let scored: Vec<f64> = iter
        .map(|&(a_idx, b_idx)| similarity_score(ctx, a_idx, b_idx, &config.similarity))
        .collect();

    let mut items = Vec::new();
    for (&(a_idx, b_idx), similarity) in pairs.iter().zip(scored) {
        if similarity <= config.candidate_floor {
            continue;
        }
        items.push(Candidate {
            a: ctx.a.index.id(a_idx),
            b: ctx.b.index.id(b_idx),
            similarity,
            weight: 1.0,
            a_idx,
            b_idx,
            ordinal: items.len(),
        });
    }

    CandidateSet { items }
}

/// Attribute similarity of one pair, mapped from distance into `(0, 1]`.
fn similarity_score(
    ctx: &MatchContext<'_, '_, '_>,
    a_idx: usize,
    b_idx: usize,
    metric: &SimilarityMetric,
) -> f64 {
    let aa = ctx.a.attrs.node(a_idx);
    let ba = ctx.b.attrs.node(b_idx);

    let deltas = [
        (ctx.a.attrs.norm_degree(a_idx) - ctx.b.attrs.norm_degree(b_idx)).abs(),
        (aa.centrality - ba.centrality).abs(),
        (ctx.a.attrs.norm_eccentricity(a_idx) - ctx.b.attrs.norm_eccentricity(b_idx)).abs(),
        (aa.pos_norm - ba.pos_norm).norm(),
    ];

    let weights = metric.weights();
    let ws = [
        weights.degree,
        weights.centrality,
        weights.eccentricity,
        weights.position,
    ];

    let distance = match metric {
        SimilarityMetric::WeightedEuclidean(_) => {
            let sum: f64 = deltas
                .iter()
                .zip(&ws)
                .map(|(d, w)| w * d * d)
                .sum();
            (sum / weights.sum()).sqrt()
        }
        SimilarityMetric::Chebyshev(_) => {
            let max_w = ws.iter().fold(0.0f64, |m, &w| m.max(w));
            deltas
                .iter()
                .zip(&ws)
                .map(|(d, w)| w * d / max_w)
                .fold(0.0f64, f64::max)
        }
    };

    1.0 / (1.0 + distance)
}

#[cfg(test)]
mod tests {
    use skelmatch_common::{MatchConfig, NodeId, Point3, SkeletonEdge, SkeletonGraph, SkeletonNode};

    use super::generate;
    use crate::matcher::{MatchContext, PreparedGraph};

    fn path_graph(n: u32) -> SkeletonGraph {
        let nodes = (0..n)
            .map(|i| SkeletonNode::new(NodeId(i), Point3::new(f64::from(i), 0.0, 0.0)))
            .collect();
        let edges = (1..n)
            .map(|i| SkeletonEdge::new(NodeId(i - 1), NodeId(i)))
            .collect();
        SkeletonGraph::new(nodes, edges).unwrap()
    }

    #[test]
    fn default_floor_keeps_every_pair() {
        let ga = path_graph(4);
        let gb = path_graph(3);
        let pa = PreparedGraph::prepare(&ga);
        let pb = PreparedGraph::prepare(&gb);
        let ctx = MatchContext { a: &pa, b: &pb };

        let set = generate(&ctx, &MatchConfig::default());
        assert_eq!(set.len(), 12);

        // Ordinals follow row-major generation order.
        let ordinals: Vec<usize> = set.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn identical_nodes_score_highest() {
        let ga = path_graph(5);
        let gb = path_graph(5);
        let pa = PreparedGraph::prepare(&ga);
        let pb = PreparedGraph::prepare(&gb);
        let ctx = MatchContext { a: &pa, b: &pb };

        let set = generate(&ctx, &MatchConfig::default());
        for cand in set.iter() {
            if cand.a == cand.b {
                assert!((cand.similarity - 1.0).abs() < 1e-12);
            } else {
                assert!(cand.similarity < 1.0);
            }
        }
    }
}
