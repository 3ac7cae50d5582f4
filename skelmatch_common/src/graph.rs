//! Skeleton graph data model.
//!
//! A skeleton graph is an undirected graph of joints (nodes with 3-D
//! positions) connected by bones (edges weighted by Euclidean length). Graphs
//! are validated at construction and immutable for the duration of a matching
//! run; everything derived from them lives in the matching kernel.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::geom::Point3;

/// Identifier of a node within a single skeleton graph.
///
/// Ids are only required to be unique within their graph; the two sides of a
/// matching run may reuse the same numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Semantic role tag produced by the skeleton extractor, when available.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// An articulation joint.
    Joint,
    /// A limb endpoint (degree-1 tip).
    Endpoint,
    /// A branching point.
    Branch,
    /// No role information from the extractor.
    #[default]
    Unknown,
}

/// A joint of the skeleton.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonNode {
    /// Unique id within the graph.
    pub id: NodeId,
    /// Position in world space.
    pub pos: Point3,
    /// Optional semantic role tag.
    pub role: NodeRole,
}

impl SkeletonNode {
    /// Construct a node with the default (unknown) role.
    pub const fn new(id: NodeId, pos: Point3) -> Self {
        Self {
            id,
            pos,
            role: NodeRole::Unknown,
        }
    }
}

/// A bone of the skeleton. The scalar weight of an edge is the Euclidean
/// distance between its endpoints and is computed, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonEdge {
    /// First endpoint.
    pub a: NodeId,
    /// Second endpoint.
    pub b: NodeId,
    /// Mean curvature of the underlying skeleton curve, when extracted.
    pub curvature: Option<f64>,
    /// Local thickness estimate, when extracted.
    pub thickness: Option<f64>,
}

impl SkeletonEdge {
    /// Construct an edge without extraction metadata.
    pub const fn new(a: NodeId, b: NodeId) -> Self {
        Self {
            a,
            b,
            curvature: None,
            thickness: None,
        }
    }
}

/// A validated, immutable skeleton graph.
///
/// Construction enforces the structural invariants of the data model: node
/// ids are unique and every edge references existing, distinct nodes. The
/// graph need not be connected; disconnected branches from extraction noise
/// are legitimate inputs.
#[derive(Clone, Debug, Default)]
pub struct SkeletonGraph {
    nodes: Vec<SkeletonNode>,
    edges: Vec<SkeletonEdge>,
    index_of: HashMap<NodeId, usize>,
}

impl SkeletonGraph {
    /// Build a graph from nodes and edges, validating structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] on a duplicate node id, an edge endpoint that
    /// references no node, or a self-loop.
    pub fn new(nodes: Vec<SkeletonNode>, edges: Vec<SkeletonEdge>) -> Result<Self, GraphError> {
        let mut index_of = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index_of.insert(node.id, i).is_some() {
                return Err(GraphError::DuplicateNodeId(node.id));
            }
        }

        for edge in &edges {
            if edge.a == edge.b {
                return Err(GraphError::SelfLoop(edge.a));
            }
            for endpoint in [edge.a, edge.b] {
                if !index_of.contains_key(&endpoint) {
                    return Err(GraphError::MissingEndpoint {
                        a: edge.a,
                        b: edge.b,
                        missing: endpoint,
                    });
                }
            }
        }

        tracing::debug!(
            "validated skeleton graph: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );

        Ok(Self {
            nodes,
            edges,
            index_of,
        })
    }

    /// Nodes in input order.
    pub fn nodes(&self) -> &[SkeletonNode] {
        &self.nodes
    }

    /// Edges in input order.
    pub fn edges(&self) -> &[SkeletonEdge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dense position of a node id within [`Self::nodes`], if present.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_of.get(&id).copied()
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&SkeletonNode> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Euclidean length of an edge of this graph.
    ///
    /// # Panics
    ///
    /// Panics if the edge does not belong to this graph; edges obtained from
    /// [`Self::edges`] are always valid.
    pub fn edge_length(&self, edge: &SkeletonEdge) -> f64 {
        let a = self.node(edge.a).expect("edge endpoint validated");
        let b = self.node(edge.b).expect("edge endpoint validated");
        a.pos.distance(b.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32, x: f64) -> SkeletonNode {
        SkeletonNode::new(NodeId(id), Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn valid_graph_builds() {
        let g = SkeletonGraph::new(
            vec![node(0, 0.0), node(1, 1.0), node(2, 2.0)],
            vec![
                SkeletonEdge::new(NodeId(0), NodeId(1)),
                SkeletonEdge::new(NodeId(1), NodeId(2)),
            ],
        )
        .unwrap();

        assert_eq!(g.len(), 3);
        assert_eq!(g.index_of(NodeId(2)), Some(2));
        assert!((g.edge_length(&g.edges()[0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_node_id_rejected() {
        let err = SkeletonGraph::new(vec![node(0, 0.0), node(0, 1.0)], vec![]).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNodeId(NodeId(0)));
    }

    #[test]
    fn missing_endpoint_rejected() {
        let err = SkeletonGraph::new(
            vec![node(0, 0.0)],
            vec![SkeletonEdge::new(NodeId(0), NodeId(7))],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::MissingEndpoint {
                a: NodeId(0),
                b: NodeId(7),
                missing: NodeId(7),
            }
        );
    }

    #[test]
    fn self_loop_rejected() {
        let err = SkeletonGraph::new(
            vec![node(0, 0.0)],
            vec![SkeletonEdge::new(NodeId(0), NodeId(0))],
        )
        .unwrap_err();
        assert_eq!(err, GraphError::SelfLoop(NodeId(0)));
    }

    #[test]
    fn empty_graph_is_valid() {
        let g = SkeletonGraph::new(vec![], vec![]).unwrap();
        assert!(g.is_empty());
    }
}
