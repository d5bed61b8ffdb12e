use crate::core::models::ids::NodeId;
use crate::engine::error::EngineError;
use crate::engine::placement::{Candidate, LocalGeometry, place_pair};
use crate::engine::tree::PlacementTree;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Creates both mirror children of every frontier node.
///
/// Placements are computed independently per parent, in parallel when enabled; the
/// children are then attached in frontier order, so node ids are deterministic.
///
/// # Return
///
/// The parents, each now holding two pending children.
#[instrument(skip_all, name = "expansion_task", fields(depth = geometry.index))]
pub fn run(
    tree: &mut PlacementTree,
    frontier: &[NodeId],
    geometry: &LocalGeometry,
) -> Result<Vec<NodeId>, EngineError> {
    let parents = frontier
        .iter()
        .map(|&id| tree.get(id).map(|node| (id, node.cumulative)))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let iterator = parents.iter();

    #[cfg(feature = "parallel")]
    let iterator = parents.par_iter();

    let placed: Vec<(NodeId, [Candidate; 2])> = iterator
        .map(|(id, cumulative)| (*id, place_pair(cumulative, geometry)))
        .collect();

    for (parent, candidates) in placed {
        for candidate in candidates {
            tree.attach(parent, candidate)?;
        }
    }

    debug!(
        parents = frontier.len(),
        created = 2 * frontier.len(),
        "Expanded frontier."
    );
    Ok(frontier.to_vec())
}
