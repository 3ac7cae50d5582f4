//! Spatial-configuration pruning test.
//!
//! Aligns the two sorted `(distance, angle)` neighborhood profiles with an
//! order-preserving minimum-cost matching rather than an elementwise
//! difference, so a spurious or missing neighbor from extraction noise costs
//! one gap instead of shifting every later comparison. This is the filter
//! that separates mirrored limbs when the purely topological scores tie.

use std::f64::consts::PI;

use crate::attributes::SpatialDescriptor;

/// Cost of leaving one profile element unmatched.
const GAP_COST: f64 = 1.0;

/// Distances below this are treated as coincident.
const MIN_DISTANCE: f64 = 1e-9;

/// Order-preserving alignment cost between two profiles, normalized by the
/// longer profile length. `None` when either side is degenerate: an isolated
/// node has no neighborhood to compare, which is not a failure.
pub(crate) fn discrepancy(a: &SpatialDescriptor, b: &SpatialDescriptor) -> Option<f64> {
    let (pa, pb) = match (a, b) {
        (SpatialDescriptor::Profile(pa), SpatialDescriptor::Profile(pb)) => (pa, pb),
        _ => return None,
    };

    let (m, n) = (pa.len(), pb.len());
    if m == 0 && n == 0 {
        return Some(0.0);
    }

    // Sequence alignment over the sorted profiles: match, or gap either side.
    let mut dp = vec![vec![0.0f64; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i as f64 * GAP_COST;
    }
    for j in 0..=n {
        dp[0][j] = j as f64 * GAP_COST;
    }

    for i in 1..=m {
        for j in 1..=n {
            let matched = dp[i - 1][j - 1] + element_cost(pa[i - 1], pb[j - 1]);
            let gap_a = dp[i - 1][j] + GAP_COST;
            let gap_b = dp[i][j - 1] + GAP_COST;
            dp[i][j] = matched.min(gap_a).min(gap_b);
        }
    }

    Some(dp[m][n] / m.max(n) as f64)
}

/// Mismatch cost of one aligned `(distance, angle)` pair, in `[0, 1]`.
fn element_cost(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (da, ang_a) = a;
    let (db, ang_b) = b;

    let denom = da.max(db);
    let dist_term = if denom < MIN_DISTANCE {
        0.0
    } else {
        (da - db).abs() / denom
    };
    let angle_term = (ang_a - ang_b).abs() / PI;

    0.5 * dist_term + 0.5 * angle_term
}

#[cfg(test)]
mod tests {
    use super::discrepancy;
    use crate::attributes::SpatialDescriptor;

    #[test]
    fn identical_profiles_cost_nothing() {
        let p = SpatialDescriptor::Profile(vec![(1.0, 0.3), (2.0, 1.1)]);
        assert_eq!(discrepancy(&p, &p), Some(0.0));
    }

    #[test]
    fn extra_neighbor_costs_one_gap() {
        let a = SpatialDescriptor::Profile(vec![(1.0, 0.3), (2.0, 1.1)]);
        let b = SpatialDescriptor::Profile(vec![(1.0, 0.3), (1.5, 0.9), (2.0, 1.1)]);
        let d = discrepancy(&a, &b).unwrap();
        // One gap over the longer profile of three elements.
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_side_is_not_applicable() {
        let p = SpatialDescriptor::Profile(vec![(1.0, 0.0)]);
        assert!(discrepancy(&p, &SpatialDescriptor::Degenerate).is_none());
        assert!(discrepancy(&SpatialDescriptor::Degenerate, &p).is_none());
    }

    #[test]
    fn angle_difference_is_measured() {
        let a = SpatialDescriptor::Profile(vec![(1.0, 0.0)]);
        let b = SpatialDescriptor::Profile(vec![(1.0, core::f64::consts::PI)]);
        let d = discrepancy(&a, &b).unwrap();
        assert!((d - 0.5).abs() < 1e-12);
    }
}
