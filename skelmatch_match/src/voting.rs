//! The voting engine.
//!
//! Aggregates three evidence sources per surviving candidate — attribute
//! similarity, neighbor consistency against the confirmed partial
//! correspondence, and path-length consistency — then resolves a global
//! assignment by greedy highest-vote-first selection with conflict
//! exclusion. Every confirmation changes the partial state that the
//! neighbor and path votes read, so remaining candidates are re-scored
//! rather than trusted: the queue is lazy, entries carry the epoch at which
//! they were scored, and a stale entry is re-scored on pop and re-inserted
//! instead of confirmed. Ties break deterministically by lower combined
//! node id, then generation order.

use std::collections::BinaryHeap;

use serde::Serialize;
use skelmatch_common::{MatchConfig, RelaxedSide};
use tracing::debug;

use crate::assignment::Assignment;
use crate::candidates::{Candidate, CandidateSet};
use crate::filters::{path_length, topology};
use crate::matcher::MatchContext;

/// Per-candidate vote tally, one entry per evidence source plus the
/// weighted total.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VoteBreakdown {
    /// Raw attribute-similarity contribution.
    pub attribute: f64,
    /// Fraction of confirmed neighbor pairs that are mutually consistent.
    pub neighbor: f64,
    /// Inverse path-length discrepancy against the current evidence.
    pub path_length: f64,
    /// Weighted total, scaled by the candidate's pruning weight.
    pub total: f64,
}

/// Result of the resolution loop, in terms of candidate indices.
pub(crate) struct VoteOutcome {
    /// Confirmed pairs in dense indices, in confirmation order.
    pub assignment: Assignment,
    /// `(candidate index, votes at confirmation time)` per confirmation.
    pub confirmations: Vec<(usize, VoteBreakdown)>,
    /// Number of confirmation iterations executed.
    pub iterations: usize,
}

/// Greedy highest-vote-first resolution over the surviving candidates.
pub(crate) fn resolve(
    set: &CandidateSet,
    ctx: &MatchContext<'_, '_, '_>,
    config: &MatchConfig,
) -> VoteOutcome {
    let n = set.items.len();
    let initial_evidence = path_length::weighted_evidence(set);

    let mut assignment = Assignment::new();
    let mut confirmations = Vec::new();
    let mut iterations = 0usize;

    let mut retired = vec![false; n];
    let mut parked_flag = vec![false; n];
    let mut parked: Vec<usize> = Vec::new();
    let mut scores: Vec<VoteBreakdown> = Vec::with_capacity(n);
    let mut scored_at = vec![0u64; n];
    let mut epoch = 0u64;

    let mut heap = BinaryHeap::with_capacity(n);
    for (idx, cand) in set.items.iter().enumerate() {
        let votes = score(ctx, config, cand, &assignment, &initial_evidence);
        scores.push(votes);
        if votes.total > 0.0 {
            heap.push(Entry::new(cand, idx, votes.total, epoch));
        } else {
            parked_flag[idx] = true;
            parked.push(idx);
        }
    }

    while let Some(entry) = heap.pop() {
        let idx = entry.idx;
        if retired[idx] {
            continue;
        }
        let cand = &set.items[idx];

        if entry.epoch < epoch {
            // Scored before the last confirmation; re-vote instead of trusting it.
            if scored_at[idx] < epoch {
                scores[idx] = score(ctx, config, cand, &assignment, &initial_evidence);
                scored_at[idx] = epoch;
            }
            if scores[idx].total > 0.0 {
                heap.push(Entry::new(cand, idx, scores[idx].total, epoch));
            } else if !parked_flag[idx] {
                parked_flag[idx] = true;
                parked.push(idx);
            }
            continue;
        }

        // Fresh highest-vote candidate: confirm it.
        let votes = scores[idx];
        assignment.confirm(cand.a_idx, cand.b_idx);
        confirmations.push((idx, votes));
        retired[idx] = true;
        iterations += 1;
        epoch += 1;

        debug!(
            "confirmed ({}, {}) with total {:.4} at iteration {iterations}",
            cand.a, cand.b, votes.total
        );

        exclude_conflicts(set, cand, &assignment, config, &mut retired);

        // Previously hopeless candidates get another chance under the new
        // partial state.
        for p in parked.drain(..) {
            parked_flag[p] = false;
            if !retired[p] {
                heap.push(Entry::new(&set.items[p], p, scores[p].total, scored_at[p]));
            }
        }

        if let Some(cap) = config.iteration_cap {
            if iterations >= cap {
                debug!("iteration cap {cap} reached, stopping resolution");
                break;
            }
        }
    }

    VoteOutcome {
        assignment,
        confirmations,
        iterations,
    }
}

/// Retire every unresolved candidate that conflicts with the latest
/// confirmation, honoring the one-to-many relaxation bounds.
fn exclude_conflicts(
    set: &CandidateSet,
    confirmed: &Candidate,
    assignment: &Assignment,
    config: &MatchConfig,
    retired: &mut [bool],
) {
    let relax = &config.one_to_many;
    let bound_a = if relax.enabled && matches!(relax.side, RelaxedSide::GraphA | RelaxedSide::Both)
    {
        relax.max_multiplicity
    } else {
        1
    };
    let bound_b = if relax.enabled && matches!(relax.side, RelaxedSide::GraphB | RelaxedSide::Both)
    {
        relax.max_multiplicity
    } else {
        1
    };

    let a_full = assignment.count_a(confirmed.a_idx) >= bound_a;
    let b_full = assignment.count_b(confirmed.b_idx) >= bound_b;

    for (idx, cand) in set.items.iter().enumerate() {
        if retired[idx] {
            continue;
        }
        let shares_a = cand.a_idx == confirmed.a_idx;
        let shares_b = cand.b_idx == confirmed.b_idx;
        if (shares_a && a_full) || (shares_b && b_full) || (shares_a && shares_b) {
            retired[idx] = true;
        }
    }
}

/// Compute the vote tally of one candidate against the current partial
/// state. A topological contradiction zeroes the total outright; such a
/// pairing must never be confirmed regardless of its other evidence.
pub(crate) fn score(
    ctx: &MatchContext<'_, '_, '_>,
    config: &MatchConfig,
    cand: &Candidate,
    assignment: &Assignment,
    initial_evidence: &[(usize, usize, f64)],
) -> VoteBreakdown {
    let (consistent, contradicted) =
        topology::neighbor_consistency(ctx, cand.a_idx, cand.b_idx, assignment);

    if contradicted {
        return VoteBreakdown {
            attribute: cand.similarity,
            neighbor: 0.0,
            path_length: 0.0,
            total: 0.0,
        };
    }

    let max_degree = ctx
        .a
        .index
        .degree(cand.a_idx)
        .max(ctx.b.index.degree(cand.b_idx));
    let neighbor = if max_degree == 0 {
        0.0
    } else {
        consistent as f64 / max_degree as f64
    };

    let evidence = if assignment.is_empty() {
        path_length::PathEvidence::Weighted(initial_evidence)
    } else {
        path_length::PathEvidence::Confirmed(assignment)
    };
    let path_vote = path_length::discrepancy(ctx, cand.a_idx, cand.b_idx, &evidence)
        .map_or(0.0, |d| 1.0 / (1.0 + d));

    let w = &config.vote_weights;
    let total = (w.attribute * cand.similarity + w.neighbor * neighbor + w.path_length * path_vote)
        / w.sum()
        * cand.weight;

    VoteBreakdown {
        attribute: cand.similarity,
        neighbor,
        path_length: path_vote,
        total,
    }
}

/// Max-heap entry: highest total first, then lower combined node id, then
/// earlier generation order. Totals are finite and never NaN.
#[derive(Clone, Copy, Debug)]
struct Entry {
    total: f64,
    combined: u64,
    ordinal: usize,
    idx: usize,
    epoch: u64,
}

impl Entry {
    fn new(cand: &Candidate, idx: usize, total: f64, epoch: u64) -> Self {
        Self {
            total,
            combined: u64::from(cand.a.0) + u64::from(cand.b.0),
            ordinal: cand.ordinal,
            idx,
            epoch,
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total
            .total_cmp(&other.total)
            .then_with(|| other.combined.cmp(&self.combined))
            .then_with(|| other.ordinal.cmp(&self.ordinal))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
