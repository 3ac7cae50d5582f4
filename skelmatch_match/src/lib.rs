//! Skeleton matching kernel.
//!
//! Matches two topological skeleton graphs — extracted independently from
//! two poses of the same deforming object — and produces a node
//! correspondence robust to noise, partial occlusion, and extraction
//! errors. The pipeline: per-graph attribute computation, pairwise
//! candidate generation, four pruning tests (centrality, path length,
//! topological consistency, spatial configuration), and a voting engine
//! that re-scores remaining candidates after every confirmation.
//!
//! ```ignore
//! use skelmatch_common::MatchConfig;
//! use skelmatch_match::SkeletonMatcher;
//!
//! let outcome = SkeletonMatcher::match_graphs(&pose_a, &pose_b, &MatchConfig::default())?;
//! for (a, b) in outcome.mapping() {
//!     println!("{a} -> {b}");
//! }
//! ```

mod assignment;
mod attributes;
mod candidates;
mod filters;
mod graph_index;
mod matcher;
mod outcome;
mod voting;

pub use crate::attributes::{AttributeTable, NodeAttributes, SpatialDescriptor};
pub use crate::candidates::{Candidate, CandidateSet};
pub use crate::filters::{FilterKind, Rejection};
pub use crate::graph_index::{GraphIndex, UNREACHABLE};
pub use crate::matcher::{PreparedGraph, SkeletonMatcher};
pub use crate::outcome::{MatchDiagnostics, MatchOutcome, NodeMatch};
pub use crate::voting::VoteBreakdown;
