//! Path-length pruning test.
//!
//! Compares the shortest-path distances from `u` to reference nodes in A
//! against the distances from `v` to the corresponding nodes in B. Before
//! any confirmation exists the reference set is the candidate set itself,
//! weighted by candidate scores; afterwards it is the confirmed partial
//! correspondence. The test is re-runnable as matches confirm and is
//! idempotent for a fixed partial state.

use crate::assignment::Assignment;
use crate::candidates::CandidateSet;
use crate::matcher::MatchContext;

/// Distances shorter than this are treated as coincident and skipped.
const MIN_USABLE_DISTANCE: f64 = 1e-9;

/// Reference evidence for the comparison.
pub(crate) enum PathEvidence<'e> {
    /// Confirmed `(a index, b index)` pairs.
    Confirmed(&'e Assignment),
    /// First-pass surrogate: `(a index, b index, weight)` per candidate.
    Weighted(&'e [(usize, usize, f64)]),
}

/// Build the first-pass evidence snapshot from the current candidate set.
pub(crate) fn weighted_evidence(set: &CandidateSet) -> Vec<(usize, usize, f64)> {
    set.iter()
        .map(|c| (c.a_idx, c.b_idx, c.similarity * c.weight))
        .collect()
}

/// Weighted mean relative difference of corresponding path lengths.
///
/// Returns `None` when no usable evidence exists (nothing confirmed reaches
/// either node, or every reference distance is infinite); the caller treats
/// that as "not applicable", not as agreement.
pub(crate) fn discrepancy(
    ctx: &MatchContext<'_, '_, '_>,
    a_idx: usize,
    b_idx: usize,
    evidence: &PathEvidence<'_>,
) -> Option<f64> {
    let dist_a = ctx.a.index.distances_from(a_idx);
    let dist_b = ctx.b.index.distances_from(b_idx);

    let mut total = 0.0;
    let mut weight_sum = 0.0;

    let mut accumulate = |x: usize, y: usize, w: f64| {
        if x == a_idx || y == b_idx || w <= 0.0 {
            return;
        }
        let da = dist_a[x];
        let db = dist_b[y];
        // Unreachable references carry no evidence either way.
        if !da.is_finite() || !db.is_finite() {
            return;
        }
        let denom = da.max(db);
        if denom < MIN_USABLE_DISTANCE {
            return;
        }
        total += w * (da - db).abs() / denom;
        weight_sum += w;
    };

    match evidence {
        PathEvidence::Confirmed(assignment) => {
            for &(x, y) in assignment.pairs() {
                accumulate(x, y, 1.0);
            }
        }
        PathEvidence::Weighted(items) => {
            for &(x, y, w) in *items {
                accumulate(x, y, w);
            }
        }
    }

    (weight_sum > 0.0).then(|| total / weight_sum)
}
