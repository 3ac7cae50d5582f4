//! Per-node attribute computation.
//!
//! Derives the descriptors the candidate generator and pruning filters
//! compare: degree, closeness centrality, eccentricity, a normalized
//! position, and the local spatial-configuration profile. Attributes are
//! computed once per run and cached in an [`AttributeTable`]; the graph is
//! never mutated.
//!
//! Isolated nodes are not an error: they get the explicit
//! [`SpatialDescriptor::Degenerate`] marker and keep only positional
//! attributes, and attribute-dependent filters skip them.

use skelmatch_common::{Point3, SkeletonGraph, Vec3};

use crate::graph_index::GraphIndex;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Local spatial configuration of a node's immediate neighborhood.
///
/// The profile is the sorted sequence of `(bone length, angle)` per direct
/// neighbor, where the angle is measured against the mean bone direction.
/// Sorting makes it neighbor-order-invariant; using only lengths and
/// relative angles makes it invariant to rigid transforms of the whole
/// graph.
#[derive(Clone, Debug, PartialEq)]
pub enum SpatialDescriptor {
    /// Sorted `(distance, angle)` pairs, one per neighbor.
    Profile(Vec<(f64, f64)>),
    /// The node has no neighbors; only positional attributes apply.
    Degenerate,
}

impl SpatialDescriptor {
    /// True for the degenerate (isolated-node) marker.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate)
    }
}

/// Derived attributes of one node.
#[derive(Clone, Debug)]
pub struct NodeAttributes {
    /// Number of incident bones.
    pub degree: usize,
    /// Closeness centrality, normalized to `[0, 1]` within the graph.
    pub centrality: f64,
    /// Longest shortest-path distance to any node of the same component.
    pub eccentricity: f64,
    /// Position relative to the graph centroid, scaled by the bounding-box
    /// diagonal so positions are comparable across differently sized graphs.
    pub pos_norm: Vec3,
    /// Local spatial-configuration profile.
    pub spatial: SpatialDescriptor,
}

/// Cached per-node attributes of one graph, plus the graph-level maxima used
/// to normalize cross-graph comparisons.
#[derive(Clone, Debug)]
pub struct AttributeTable {
    items: Vec<NodeAttributes>,
    max_degree: usize,
    max_eccentricity: f64,
}

impl AttributeTable {
    /// Compute attributes for every node of a graph.
    ///
    /// Per-node work is independent; with the `rayon` feature it runs across
    /// worker threads and is joined before anything downstream starts.
    pub fn build(graph: &SkeletonGraph, index: &GraphIndex) -> Self {
        let (centroid, diagonal) = bounding_stats(graph);

        #[cfg(feature = "rayon")]
        let iter = (0..index.len()).into_par_iter();
        #[cfg(not(feature = "rayon"))]
        let iter = 0..index.len();

        let mut items: Vec<NodeAttributes> = iter
            .map(|idx| Self::node_attributes(graph, index, idx, centroid, diagonal))
            .collect();

        // Centrality is normalized to [0, 1] within the graph; the raw
        // closeness values are only comparable after this pass.
        let max_raw = items
            .iter()
            .map(|a| a.centrality)
            .fold(0.0f64, f64::max);
        if max_raw > 0.0 {
            for item in &mut items {
                item.centrality /= max_raw;
            }
        }

        let max_degree = items.iter().map(|a| a.degree).max().unwrap_or(0);
        let max_eccentricity = items
            .iter()
            .map(|a| a.eccentricity)
            .fold(0.0f64, f64::max);

        Self {
            items,
            max_degree,
            max_eccentricity,
        }
    }

    fn node_attributes(
        graph: &SkeletonGraph,
        index: &GraphIndex,
        idx: usize,
        centroid: Point3,
        diagonal: f64,
    ) -> NodeAttributes {
        let degree = index.degree(idx);
        let (centrality, eccentricity) = closeness_and_eccentricity(index, idx);
        let spatial = spatial_profile(graph, index, idx);

        let offset = graph.nodes()[idx].pos - centroid;
        let pos_norm = if diagonal > 0.0 {
            offset * (1.0 / diagonal)
        } else {
            Vec3::default()
        };

        NodeAttributes {
            degree,
            centrality,
            eccentricity,
            pos_norm,
            spatial,
        }
    }

    /// Attributes of the node at a dense index.
    pub fn node(&self, idx: usize) -> &NodeAttributes {
        &self.items[idx]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the table is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Degree scaled by the graph's maximum degree, in `[0, 1]`.
    pub fn norm_degree(&self, idx: usize) -> f64 {
        if self.max_degree == 0 {
            0.0
        } else {
            self.items[idx].degree as f64 / self.max_degree as f64
        }
    }

    /// Eccentricity scaled by the graph's maximum eccentricity, in `[0, 1]`.
    pub fn norm_eccentricity(&self, idx: usize) -> f64 {
        if self.max_eccentricity > 0.0 {
            self.items[idx].eccentricity / self.max_eccentricity
        } else {
            0.0
        }
    }
}

/// Closeness centrality (raw, pre-normalization) and eccentricity from one
/// node's shortest-path row.
///
/// Closeness follows the component-scaled form: `(k - 1) / sum` within the
/// component, scaled by `(k - 1) / (n - 1)` so scores from components of
/// different size remain comparable. Unreachable nodes are excluded, never
/// counted as zero distance.
fn closeness_and_eccentricity(index: &GraphIndex, idx: usize) -> (f64, f64) {
    let n = index.len();
    let k = index.component_size(idx);
    if n <= 1 || k <= 1 {
        return (0.0, 0.0);
    }

    let mut sum = 0.0;
    let mut eccentricity = 0.0f64;
    for (other, &d) in index.distances_from(idx).iter().enumerate() {
        if other == idx || !d.is_finite() {
            continue;
        }
        sum += d;
        eccentricity = eccentricity.max(d);
    }

    if sum <= 0.0 {
        return (0.0, eccentricity);
    }

    let reach = (k - 1) as f64;
    let closeness = (reach / sum) * (reach / (n - 1) as f64);
    (closeness, eccentricity)
}

/// The sorted `(distance, angle)` profile of a node's direct neighborhood.
fn spatial_profile(graph: &SkeletonGraph, index: &GraphIndex, idx: usize) -> SpatialDescriptor {
    let neighbors = index.neighbors(idx);
    if neighbors.is_empty() {
        return SpatialDescriptor::Degenerate;
    }

    let origin = graph.nodes()[idx].pos;
    let directions: Vec<(Vec3, f64)> = neighbors
        .iter()
        .map(|&(n, length)| ((graph.nodes()[n].pos - origin).normalize(), length))
        .collect();

    let reference = reference_direction(&directions);

    let mut profile: Vec<(f64, f64)> = directions
        .iter()
        .map(|&(dir, length)| (length, dir.angle_to(reference)))
        .collect();
    profile.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));

    SpatialDescriptor::Profile(profile)
}

/// Mean bone direction, falling back to the longest bone when the mean
/// cancels out (opposed neighbors).
fn reference_direction(directions: &[(Vec3, f64)]) -> Vec3 {
    let mean = directions
        .iter()
        .fold(Vec3::default(), |acc, &(dir, _)| acc + dir);
    if mean.norm() > 1e-9 {
        return mean.normalize();
    }

    directions
        .iter()
        .cloned()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(dir, _)| dir)
        .unwrap_or_default()
}

/// Centroid and bounding-box diagonal of a graph's node positions.
fn bounding_stats(graph: &SkeletonGraph) -> (Point3, f64) {
    if graph.is_empty() {
        return (Point3::default(), 0.0);
    }

    let mut min = graph.nodes()[0].pos;
    let mut max = min;
    let mut sum = Vec3::default();
    for node in graph.nodes() {
        let p = node.pos;
        min = Point3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
        max = Point3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
        sum = sum + (p - Point3::default());
    }

    let inv = 1.0 / graph.len() as f64;
    let centroid = Point3::default() + sum * inv;
    (centroid, (max - min).norm())
}

#[cfg(test)]
mod tests {
    use skelmatch_common::{NodeId, Point3, SkeletonEdge, SkeletonGraph, SkeletonNode};

    use super::{AttributeTable, SpatialDescriptor};
    use crate::graph_index::GraphIndex;

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
    fn path_centrality_peaks_at_center() {
        let graph = path_graph(5);
        let index = GraphIndex::build(&graph);
        let attrs = AttributeTable::build(&graph, &index);

        // Middle node is closest to everything.
        assert!((attrs.node(2).centrality - 1.0).abs() < 1e-12);
        assert!(attrs.node(0).centrality < attrs.node(1).centrality);
        assert!(attrs.node(1).centrality < attrs.node(2).centrality);

        // Endpoints see the whole path.
        assert!((attrs.node(0).eccentricity - 4.0).abs() < 1e-12);
        assert!((attrs.node(2).eccentricity - 2.0).abs() < 1e-12);
    }

    #[test]
    fn isolated_node_is_degenerate_not_fatal() {
        let mut nodes: Vec<SkeletonNode> = path_graph(3).nodes().to_vec();
        nodes.push(SkeletonNode::new(NodeId(9), Point3::new(10.0, 10.0, 10.0)));
        let edges = path_graph(3).edges().to_vec();
        let graph = SkeletonGraph::new(nodes, edges).unwrap();

        let index = GraphIndex::build(&graph);
        let attrs = AttributeTable::build(&graph, &index);

        let stray = attrs.node(3);
        assert!(stray.spatial.is_degenerate());
        assert_eq!(stray.degree, 0);
        assert_eq!(stray.centrality, 0.0);
        assert_eq!(stray.eccentricity, 0.0);
    }

    #[test]
    fn spatial_profile_is_neighbor_order_invariant() {
        // Same star, edges listed in different orders.
        let nodes = vec![
            SkeletonNode::new(NodeId(0), Point3::new(0.0, 0.0, 0.0)),
            SkeletonNode::new(NodeId(1), Point3::new(1.0, 0.0, 0.0)),
            SkeletonNode::new(NodeId(2), Point3::new(0.0, 2.0, 0.0)),
            SkeletonNode::new(NodeId(3), Point3::new(0.0, 0.0, 3.0)),
        ];
        let forward = SkeletonGraph::new(
            nodes.clone(),
            vec![
                SkeletonEdge::new(NodeId(0), NodeId(1)),
                SkeletonEdge::new(NodeId(0), NodeId(2)),
                SkeletonEdge::new(NodeId(0), NodeId(3)),
            ],
        )
        .unwrap();
        let reversed = SkeletonGraph::new(
            nodes,
            vec![
                SkeletonEdge::new(NodeId(0), NodeId(3)),
                SkeletonEdge::new(NodeId(0), NodeId(2)),
                SkeletonEdge::new(NodeId(0), NodeId(1)),
            ],
        )
        .unwrap();

        let fa = AttributeTable::build(&forward, &GraphIndex::build(&forward));
        let ra = AttributeTable::build(&reversed, &GraphIndex::build(&reversed));

        match (&fa.node(0).spatial, &ra.node(0).spatial) {
            (SpatialDescriptor::Profile(p), SpatialDescriptor::Profile(q)) => assert_eq!(p, q),
            _ => panic!("expected profiles for the hub"),
        }
    }
}
