//! Partial-correspondence bookkeeping for the voting engine.
//!
//! Tracks confirmed pairs in confirmation order together with per-node
//! partner lists, so the one-to-one invariant (and its bounded one-to-many
//! relaxation) can be enforced at confirmation time.

use indexmap::IndexMap;

/// The set of confirmed `(a index, b index)` pairs of a voting run.
///
/// Indices are the dense per-graph indices of the match context, not node
/// ids. Iteration order of the partner maps follows confirmation order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignment {
    a_to_b: IndexMap<usize, Vec<usize>>,
    b_to_a: IndexMap<usize, Vec<usize>>,
    pairs: Vec<(usize, usize)>,
}

impl Assignment {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Confirmed pairs in confirmation order.
    pub(crate) fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Record a confirmed pair. Multiplicity bounds are the caller's
    /// responsibility; this only keeps the books.
    pub(crate) fn confirm(&mut self, a: usize, b: usize) {
        self.a_to_b.entry(a).or_default().push(b);
        self.b_to_a.entry(b).or_default().push(a);
        self.pairs.push((a, b));
    }

    /// Partners confirmed for an A-side node.
    pub(crate) fn partners_of_a(&self, a: usize) -> &[usize] {
        self.a_to_b.get(&a).map_or(&[], Vec::as_slice)
    }

    /// Partners confirmed for a B-side node.
    pub(crate) fn partners_of_b(&self, b: usize) -> &[usize] {
        self.b_to_a.get(&b).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn count_a(&self, a: usize) -> usize {
        self.partners_of_a(a).len()
    }

    pub(crate) fn count_b(&self, b: usize) -> usize {
        self.partners_of_b(b).len()
    }
}
