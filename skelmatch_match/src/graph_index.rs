//! Structural index over a skeleton graph.
//!
//! Built once per graph per matching run: dense adjacency, connected
//! components, and the all-pairs shortest-path table that every path-based
//! attribute and filter reads from. Components are handled independently;
//! unreachable pairs carry [`UNREACHABLE`] and are excluded from comparisons
//! downstream rather than treated as zero.

use std::collections::BinaryHeap;

use skelmatch_common::{NodeId, SkeletonGraph};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Sentinel distance between nodes in different components.
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Dense structural index of one skeleton graph.
#[derive(Clone, Debug)]
pub struct GraphIndex {
    /// Node ids in input order; dense index `i` refers to `ids[i]`.
    ids: Vec<NodeId>,
    /// Adjacency per dense index: `(neighbor index, edge length)`.
    adjacency: Vec<Vec<(usize, f64)>>,
    /// Connected-component label per dense index.
    component: Vec<usize>,
    /// Size of each component, indexed by label.
    component_sizes: Vec<usize>,
    /// All-pairs shortest-path distances; `UNREACHABLE` across components.
    distances: Vec<Vec<f64>>,
}

impl GraphIndex {
    /// Build the index for one graph.
    pub fn build(graph: &SkeletonGraph) -> Self {
        // 0: id table in input order
        let ids: Vec<NodeId> = graph.nodes().iter().map(|n| n.id).collect();

        // 1: adjacency with Euclidean edge lengths
        let adjacency = Self::build_adjacency(graph);

        // 2: connected components
        let (component, component_sizes) = Self::build_components(&adjacency);

        // 3: all-pairs shortest paths, one Dijkstra per source
        let distances = Self::build_distances(&adjacency);

        Self {
            ids,
            adjacency,
            component,
            component_sizes,
            distances,
        }
    }

    fn build_adjacency(graph: &SkeletonGraph) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); graph.len()];
        for edge in graph.edges() {
            let a = graph.index_of(edge.a).expect("endpoint validated");
            let b = graph.index_of(edge.b).expect("endpoint validated");
            let length = graph.edge_length(edge);
            adjacency[a].push((b, length));
            adjacency[b].push((a, length));
        }
        // Deterministic neighbor order regardless of edge input order.
        for neighbors in &mut adjacency {
            neighbors.sort_by(|x, y| x.0.cmp(&y.0));
        }
        adjacency
    }

    fn build_components(adjacency: &[Vec<(usize, f64)>]) -> (Vec<usize>, Vec<usize>) {
        let n = adjacency.len();
        let mut component = vec![usize::MAX; n];
        let mut sizes = Vec::new();

        for start in 0..n {
            if component[start] != usize::MAX {
                continue;
            }
            let label = sizes.len();
            let mut size = 0usize;
            let mut stack = vec![start];
            component[start] = label;
            while let Some(node) = stack.pop() {
                size += 1;
                for &(next, _) in &adjacency[node] {
                    if component[next] == usize::MAX {
                        component[next] = label;
                        stack.push(next);
                    }
                }
            }
            sizes.push(size);
        }

        (component, sizes)
    }

    fn build_distances(adjacency: &[Vec<(usize, f64)>]) -> Vec<Vec<f64>> {
        let n = adjacency.len();

        #[cfg(feature = "rayon")]
        let iter = (0..n).into_par_iter();
        #[cfg(not(feature = "rayon"))]
        let iter = 0..n;

        iter.map(|source| Self::dijkstra(adjacency, source)).collect()
    }

    /// Single-source shortest paths over edge lengths.
    fn dijkstra(adjacency: &[Vec<(usize, f64)>], source: usize) -> Vec<f64> {
        let mut dist = vec![UNREACHABLE; adjacency.len()];
        dist[source] = 0.0;

        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry {
            dist: 0.0,
            node: source,
        });

        while let Some(HeapEntry { dist: d, node }) = heap.pop() {
            if d > dist[node] {
                continue;
            }
            for &(next, length) in &adjacency[node] {
                let candidate = d + length;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    heap.push(HeapEntry {
                        dist: candidate,
                        node: next,
                    });
                }
            }
        }

        dist
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Node id at a dense index.
    pub fn id(&self, idx: usize) -> NodeId {
        self.ids[idx]
    }

    /// Neighbors of a node as `(dense index, edge length)` pairs.
    pub fn neighbors(&self, idx: usize) -> &[(usize, f64)] {
        &self.adjacency[idx]
    }

    /// Degree of a node.
    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    /// True when two nodes share an edge.
    pub fn adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].iter().any(|&(n, _)| n == b)
    }

    /// Component label of a node.
    pub fn component(&self, idx: usize) -> usize {
        self.component[idx]
    }

    /// Size of the component containing a node.
    pub fn component_size(&self, idx: usize) -> usize {
        self.component_sizes[self.component[idx]]
    }

    /// Shortest-path distances from one node to every node of the graph.
    pub fn distances_from(&self, idx: usize) -> &[f64] {
        &self.distances[idx]
    }

    /// Shortest-path distance between two nodes; [`UNREACHABLE`] across
    /// components.
    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.distances[a][b]
    }
}

/// Min-heap entry for Dijkstra; ordered by distance, then node index for
/// determinism. Distances are finite and never NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
struct HeapEntry {
    dist: f64,
    node: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap; invert to pop the smallest distance first.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use skelmatch_common::{Point3, SkeletonEdge, SkeletonGraph, SkeletonNode};

    use super::{GraphIndex, UNREACHABLE};

    fn chain_with_stray() -> SkeletonGraph {
        // 0 - 1 - 2, plus isolated node 3
        let nodes = (0..4)
            .map(|i| {
                SkeletonNode::new(
                    skelmatch_common::NodeId(i),
                    Point3::new(f64::from(i), 0.0, 0.0),
                )
            })
            .collect();
        let edges = vec![
            SkeletonEdge::new(skelmatch_common::NodeId(0), skelmatch_common::NodeId(1)),
            SkeletonEdge::new(skelmatch_common::NodeId(1), skelmatch_common::NodeId(2)),
        ];
        SkeletonGraph::new(nodes, edges).unwrap()
    }

    #[test]
    fn components_and_distances() {
        let index = GraphIndex::build(&chain_with_stray());

        assert_eq!(index.len(), 4);
        assert_eq!(index.degree(1), 2);
        assert_eq!(index.component(0), index.component(2));
        assert_ne!(index.component(0), index.component(3));
        assert_eq!(index.component_size(0), 3);
        assert_eq!(index.component_size(3), 1);

        assert!((index.distance(0, 2) - 2.0).abs() < 1e-12);
        assert_eq!(index.distance(0, 3), UNREACHABLE);
        assert_eq!(index.distance(3, 3), 0.0);
    }

    #[test]
    fn adjacency_is_sorted() {
        let index = GraphIndex::build(&chain_with_stray());
        assert_eq!(
            index.neighbors(1).iter().map(|&(n, _)| n).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(index.adjacent(0, 1));
        assert!(!index.adjacent(0, 2));
    }
}
