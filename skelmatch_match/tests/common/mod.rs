//! Shared fixtures for the matching integration tests.

use std::sync::OnceLock;

use skelmatch_common::{NodeId, Point3, SkeletonEdge, SkeletonGraph, SkeletonNode};

/// Install a test-writer tracing subscriber once per process.
pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A straight chain `0 - 1 - ... - n-1` along the x axis.
pub fn path_graph(n: u32, spacing: f64) -> SkeletonGraph {
    let nodes = (0..n)
        .map(|i| SkeletonNode::new(NodeId(i), Point3::new(f64::from(i) * spacing, 0.0, 0.0)))
        .collect();
    let edges = (1..n)
        .map(|i| SkeletonEdge::new(NodeId(i - 1), NodeId(i)))
        .collect();
    SkeletonGraph::new(nodes, edges).unwrap()
}

/// A small stick figure with bilaterally symmetric arms.
///
/// Ids: 0 pelvis (hub), 1 head, 2 left shoulder, 3 left hand,
/// 4 right shoulder, 5 right hand.
pub fn humanoid() -> SkeletonGraph {
    let nodes = vec![
        SkeletonNode::new(NodeId(0), Point3::new(0.0, 0.0, 0.0)),
        SkeletonNode::new(NodeId(1), Point3::new(0.0, 2.0, 0.0)),
        SkeletonNode::new(NodeId(2), Point3::new(-2.0, 1.0, 0.0)),
        SkeletonNode::new(NodeId(3), Point3::new(-3.0, 0.5, 0.0)),
        SkeletonNode::new(NodeId(4), Point3::new(2.0, 1.0, 0.0)),
        SkeletonNode::new(NodeId(5), Point3::new(3.0, 0.5, 0.0)),
    ];
    let edges = vec![
        SkeletonEdge::new(NodeId(0), NodeId(1)),
        SkeletonEdge::new(NodeId(0), NodeId(2)),
        SkeletonEdge::new(NodeId(2), NodeId(3)),
        SkeletonEdge::new(NodeId(0), NodeId(4)),
        SkeletonEdge::new(NodeId(4), NodeId(5)),
    ];
    SkeletonGraph::new(nodes, edges).unwrap()
}

/// The same graph reflected through the yz plane (left-right swap).
pub fn mirrored_x(graph: &SkeletonGraph) -> SkeletonGraph {
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| SkeletonNode {
            pos: Point3::new(-n.pos.x, n.pos.y, n.pos.z),
            ..*n
        })
        .collect();
    SkeletonGraph::new(nodes, graph.edges().to_vec()).unwrap()
}

/// The same graph with a deterministic per-node jitter of magnitude `delta`.
pub fn perturbed(graph: &SkeletonGraph, delta: f64) -> SkeletonGraph {
    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let t = (i * 37 % 11) as f64 / 11.0 - 0.5;
            SkeletonNode {
                pos: Point3::new(n.pos.x + t * delta, n.pos.y - t * delta, n.pos.z),
                ..*n
            }
        })
        .collect();
    SkeletonGraph::new(nodes, graph.edges().to_vec()).unwrap()
}

/// Add one edge-less node to a graph.
pub fn with_isolated(graph: &SkeletonGraph, id: u32, pos: Point3) -> SkeletonGraph {
    let mut nodes = graph.nodes().to_vec();
    nodes.push(SkeletonNode::new(NodeId(id), pos));
    SkeletonGraph::new(nodes, graph.edges().to_vec()).unwrap()
}
