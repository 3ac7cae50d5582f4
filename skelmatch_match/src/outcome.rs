//! Result assembly.
//!
//! Packages the final correspondence with per-pair confidences and the full
//! pruning/voting diagnostics for the downstream deformation-transfer
//! consumer. Confidences are the vote totals re-scored against the final
//! correspondence, so they reflect how consistent each pair is with the
//! whole result rather than with the partial state it happened to be
//! confirmed under.

use std::collections::HashMap;

use serde::Serialize;
use skelmatch_common::{MatchConfig, NodeId};

use crate::candidates::CandidateSet;
use crate::filters::Rejection;
use crate::matcher::MatchContext;
use crate::voting::{self, VoteBreakdown, VoteOutcome};

/// One row of the final correspondence: an A-node and its partner, or
/// `None` when the node stayed unmatched. Under the one-to-many relaxation
/// a node appears once per partner, so multiplicities are explicit.
#[derive(Clone, Debug, Serialize)]
pub struct NodeMatch {
    /// Node id on the A side.
    pub a: NodeId,
    /// Matched B-node, or `None` for unmatched.
    pub b: Option<NodeId>,
    /// Vote total against the final correspondence, in `[0, 1]`; 0 for
    /// unmatched rows.
    pub confidence: f64,
    /// Final vote tally; `None` for unmatched rows.
    pub votes: Option<VoteBreakdown>,
}

/// Everything the matcher can report beyond the correspondence itself.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchDiagnostics {
    /// Candidates produced by the generator.
    pub candidates_generated: usize,
    /// Candidates that survived pruning and entered voting.
    pub candidates_surviving: usize,
    /// Full rejection trail from the pruning pipeline.
    pub rejections: Vec<Rejection>,
    /// Confirmation iterations executed by the voting engine.
    pub iterations: usize,
    /// B-side nodes with no partner, in input order.
    pub unmatched_b: Vec<NodeId>,
}

/// The final correspondence plus diagnostics.
///
/// An outcome with every node unmatched is a legitimate terminal state, not
/// an error; it signals the caller should inspect the thresholds against
/// the diagnostics.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchOutcome {
    /// One row per A-node in input order (several per node under the
    /// one-to-many relaxation).
    pub matches: Vec<NodeMatch>,
    /// Pruning and voting diagnostics.
    pub diagnostics: MatchDiagnostics,
}

impl MatchOutcome {
    /// Confirmed `(a, b)` pairs, skipping unmatched rows.
    pub fn mapping(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.matches
            .iter()
            .filter_map(|m| m.b.map(|b| (m.a, b)))
    }

    /// Number of confirmed pairs.
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.b.is_some()).count()
    }

    /// Highest confidence recorded for an A-node, if it was matched.
    pub fn confidence_for(&self, a: NodeId) -> Option<f64> {
        self.matches
            .iter()
            .filter(|m| m.a == a && m.b.is_some())
            .map(|m| m.confidence)
            .max_by(f64::total_cmp)
    }

    pub(crate) fn assemble(
        ctx: &MatchContext<'_, '_, '_>,
        survivors: &CandidateSet,
        vote: &VoteOutcome,
        rejections: Vec<Rejection>,
        candidates_generated: usize,
        config: &MatchConfig,
    ) -> Self {
        // Re-score each confirmation against the final correspondence; the
        // totals at confirmation time reflect a partial state only.
        let mut by_pair: HashMap<(usize, usize), VoteBreakdown> = HashMap::new();
        for &(idx, _) in &vote.confirmations {
            let cand = &survivors.items[idx];
            let final_votes = voting::score(ctx, config, cand, &vote.assignment, &[]);
            by_pair.insert((cand.a_idx, cand.b_idx), final_votes);
        }

        let mut matches = Vec::new();
        for a_idx in 0..ctx.a.index.len() {
            let partners = vote.assignment.partners_of_a(a_idx);
            if partners.is_empty() {
                matches.push(NodeMatch {
                    a: ctx.a.index.id(a_idx),
                    b: None,
                    confidence: 0.0,
                    votes: None,
                });
                continue;
            }
            for &b_idx in partners {
                let votes = by_pair.get(&(a_idx, b_idx)).copied();
                matches.push(NodeMatch {
                    a: ctx.a.index.id(a_idx),
                    b: Some(ctx.b.index.id(b_idx)),
                    confidence: votes.map_or(0.0, |v| v.total.clamp(0.0, 1.0)),
                    votes,
                });
            }
        }

        let unmatched_b = (0..ctx.b.index.len())
            .filter(|&b_idx| vote.assignment.count_b(b_idx) == 0)
            .map(|b_idx| ctx.b.index.id(b_idx))
            .collect();

        Self {
            matches,
            diagnostics: MatchDiagnostics {
                candidates_generated,
                candidates_surviving: survivors.len(),
                rejections,
                iterations: vote.iterations,
                unmatched_b,
            },
        }
    }
}
