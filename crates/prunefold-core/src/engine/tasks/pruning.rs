use crate::core::models::ids::NodeId;
use crate::engine::context::SearchContext;
use crate::engine::error::EngineError;
use crate::engine::evaluator::DmeScore;
use crate::engine::tree::{PlacementTree, TreeError};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PruneSummary {
    /// Children that passed, in parent order with the primary child first.
    pub survivors: Vec<NodeId>,
    pub pruned: usize,
}

/// Judges the pending children of `parents` against the restraints.
///
/// All children are scored before any of them is marked, and a child is pruned when its
/// distance matching error exceeds the configured tolerance. Every parent ends the step
/// evaluated.
#[instrument(skip_all, name = "pruning_task")]
pub fn run(
    tree: &mut PlacementTree,
    parents: &[NodeId],
    context: &SearchContext,
) -> Result<PruneSummary, EngineError> {
    let mut children = Vec::with_capacity(2 * parents.len());
    for &parent in parents {
        children.extend(tree.children(parent)?);
    }

    let evaluator = context.evaluator();
    let scoring_tree: &PlacementTree = tree;

    #[cfg(not(feature = "parallel"))]
    let iterator = children.iter();

    #[cfg(feature = "parallel")]
    let iterator = children.par_iter();

    let scores: Vec<Result<(NodeId, DmeScore), TreeError>> = iterator
        .map(|&child| evaluator.score(scoring_tree, child).map(|score| (child, score)))
        .collect();

    let tolerance = context.config.tolerance;
    let mut summary = PruneSummary::default();
    for result in scores {
        let (child, score) = result?;
        let live = score.dme <= tolerance;
        tree.record_judgement(child, score.dme, live)?;
        if live {
            summary.survivors.push(child);
        } else {
            summary.pruned += 1;
            debug!(
                index = tree.get(child)?.index(),
                dme = score.dme,
                matched = score.matched,
                tolerance,
                "Pruned candidate."
            );
        }
    }

    for &parent in parents {
        tree.mark_evaluated(parent)?;
    }

    Ok(summary)
}
