//! Skeleton correspondence matching.
//!
//! This module provides the entry points that tie the pipeline together:
//! attribute computation per graph, pairwise candidate generation, the
//! pruning pipeline, the voting engine, and result assembly. The whole run
//! is a pure, deterministic function of the two graphs and the
//! configuration.

use skelmatch_common::{MatchConfig, MatchError, SkeletonGraph};
use tracing::info;

use crate::attributes::AttributeTable;
use crate::candidates;
use crate::filters;
use crate::graph_index::GraphIndex;
use crate::outcome::MatchOutcome;
use crate::voting;

/// One graph with its structural index and attribute table, built once and
/// reusable across matching runs against different counterparts.
pub struct PreparedGraph<'g> {
    /// The validated input graph.
    pub(crate) graph: &'g SkeletonGraph,
    /// Structural index (adjacency, components, shortest paths).
    pub(crate) index: GraphIndex,
    /// Cached per-node attributes.
    pub(crate) attrs: AttributeTable,
}

impl<'g> PreparedGraph<'g> {
    /// Build the index and attribute table for a graph.
    pub fn prepare(graph: &'g SkeletonGraph) -> Self {
        let index = GraphIndex::build(graph);
        let attrs = AttributeTable::build(graph, &index);
        Self {
            graph,
            index,
            attrs,
        }
    }

    /// The underlying graph.
    pub fn graph(&self) -> &SkeletonGraph {
        self.graph
    }

    /// The structural index.
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// The attribute table.
    pub fn attributes(&self) -> &AttributeTable {
        &self.attrs
    }
}

/// The two prepared sides of one matching run.
pub(crate) struct MatchContext<'a, 'b, 'run> {
    /// Prepared graph A.
    pub a: &'run PreparedGraph<'a>,
    /// Prepared graph B.
    pub b: &'run PreparedGraph<'b>,
}

/// Entry point for skeleton matching runs.
pub struct SkeletonMatcher<'a, 'b, 'run> {
    ctx: MatchContext<'a, 'b, 'run>,
    config: &'run MatchConfig,
}

impl<'a, 'b, 'run> SkeletonMatcher<'a, 'b, 'run> {
    /// Match two skeleton graphs under a configuration.
    ///
    /// Builds indices and attributes for both sides, then runs the full
    /// pipeline. Empty graphs yield an empty correspondence, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] when the configuration is invalid. Structural
    /// graph errors cannot occur here: a [`SkeletonGraph`] is validated at
    /// construction.
    pub fn match_graphs(
        graph_a: &SkeletonGraph,
        graph_b: &SkeletonGraph,
        config: &MatchConfig,
    ) -> Result<MatchOutcome, MatchError> {
        config.validate()?;
        let a = PreparedGraph::prepare(graph_a);
        let b = PreparedGraph::prepare(graph_b);
        SkeletonMatcher::match_prepared(&a, &b, config)
    }

    /// Match two pre-built [`PreparedGraph`]s.
    ///
    /// More efficient when the same graph participates in several runs,
    /// for example one reference pose matched against a whole sequence.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] when the configuration is invalid.
    pub fn match_prepared(
        a: &'run PreparedGraph<'a>,
        b: &'run PreparedGraph<'b>,
        config: &'run MatchConfig,
    ) -> Result<MatchOutcome, MatchError> {
        config.validate()?;
        let matcher = Self {
            ctx: MatchContext { a, b },
            config,
        };
        Ok(matcher.run())
    }

    /// Execute the pipeline on validated inputs.
    fn run(&self) -> MatchOutcome {
        info!(
            "starting skeleton match: a nodes: {}, b nodes: {}",
            self.ctx.a.index.len(),
            self.ctx.b.index.len()
        );

        let mut candidates = candidates::generate(&self.ctx, self.config);
        let generated = candidates.len();
        info!("generated {generated} candidates");

        let rejections = filters::run_pipeline(&mut candidates, &self.ctx, self.config);
        info!(
            "pruning rejected {} candidates, {} surviving",
            rejections.len(),
            candidates.len()
        );

        let vote = voting::resolve(&candidates, &self.ctx, self.config);
        info!(
            "resolution confirmed {} pairs in {} iterations",
            vote.assignment.len(),
            vote.iterations
        );

        MatchOutcome::assemble(
            &self.ctx,
            &candidates,
            &vote,
            rejections,
            generated,
            self.config,
        )
    }
}
