//! Topological-consistency pruning test.
//!
//! Two checks: the degrees of the paired nodes must agree within the
//! configured tolerance, and no confirmed correspondence may be contradicted
//! (a confirmed neighbor of `u` must map to a neighbor of `v`, and vice
//! versa). The contradiction check is what keeps symmetric or repeated
//! structures — left versus right limbs — from crossing once the first few
//! confirmations have landed.

use crate::assignment::Assignment;
use crate::matcher::MatchContext;

/// Degree mismatch as a discrepancy, or infinity on a contradicted
/// confirmed correspondence.
pub(crate) fn discrepancy(
    ctx: &MatchContext<'_, '_, '_>,
    a_idx: usize,
    b_idx: usize,
    confirmed: &Assignment,
) -> f64 {
    let (_, contradicted) = neighbor_consistency(ctx, a_idx, b_idx, confirmed);
    if contradicted {
        return f64::INFINITY;
    }

    let da = ctx.a.index.degree(a_idx) as f64;
    let db = ctx.b.index.degree(b_idx) as f64;
    (da - db).abs()
}

/// Count confirmed pairs that are neighbors on both sides, and detect pairs
/// that are neighbors on exactly one side (a contradiction).
///
/// Pairs involving `a_idx` or `b_idx` themselves are skipped; under the
/// one-to-many relaxation the node may legitimately already be confirmed.
pub(crate) fn neighbor_consistency(
    ctx: &MatchContext<'_, '_, '_>,
    a_idx: usize,
    b_idx: usize,
    confirmed: &Assignment,
) -> (usize, bool) {
    let mut consistent = 0;
    let mut contradicted = false;

    for &(x, y) in confirmed.pairs() {
        if x == a_idx || y == b_idx {
            continue;
        }
        let adj_a = ctx.a.index.adjacent(a_idx, x);
        let adj_b = ctx.b.index.adjacent(b_idx, y);
        match (adj_a, adj_b) {
            (true, true) => consistent += 1,
            (true, false) | (false, true) => contradicted = true,
            (false, false) => {}
        }
    }

    (consistent, contradicted)
}
