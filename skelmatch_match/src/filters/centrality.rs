//! Centrality pruning test.
//!
//! Skeleton hubs should match other hubs: a candidate whose two nodes sit at
//! very different normalized centralities is structurally implausible no
//! matter how similar the rest of their attributes look.

use crate::matcher::MatchContext;

/// Absolute difference of the two normalized centrality scores.
pub(crate) fn discrepancy(ctx: &MatchContext<'_, '_, '_>, a_idx: usize, b_idx: usize) -> f64 {
    (ctx.a.attrs.node(a_idx).centrality - ctx.b.attrs.node(b_idx).centrality).abs()
}

#[cfg(test)]
mod tests {
    use skelmatch_common::{NodeId, Point3, SkeletonEdge, SkeletonGraph, SkeletonNode};

    use super::discrepancy;
    use crate::matcher::{MatchContext, PreparedGraph};

    #[test]
    fn hub_vs_leaf_scores_high() {
        // Star: node 0 is the hub.
        let nodes = (0..4)
            .map(|i| {
                SkeletonNode::new(
                    NodeId(i),
                    Point3::new(f64::from(i % 2), f64::from(i / 2), 0.0),
                )
            })
            .collect();
        let edges = (1..4).map(|i| SkeletonEdge::new(NodeId(0), NodeId(i))).collect();
        let graph = SkeletonGraph::new(nodes, edges).unwrap();

        let pa = PreparedGraph::prepare(&graph);
        let pb = PreparedGraph::prepare(&graph);
        let ctx = MatchContext { a: &pa, b: &pb };

        assert_eq!(discrepancy(&ctx, 0, 0), 0.0);
        assert!(discrepancy(&ctx, 0, 1) > 0.2);
    }
}
