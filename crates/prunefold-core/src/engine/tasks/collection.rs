use crate::core::models::ids::NodeId;
use crate::core::utils::geometry::Confidence;
use crate::engine::error::EngineError;
use crate::engine::state::Solution;
use crate::engine::tree::PlacementTree;
use tracing::{info, instrument};

/// Materializes one solution per live leaf, best first.
#[instrument(skip_all, name = "collection_task")]
pub fn run(tree: &PlacementTree, leaves: &[NodeId]) -> Result<Vec<Solution>, EngineError> {
    let mut solutions = Vec::with_capacity(leaves.len());

    for &leaf in leaves {
        let lineage = tree.lineage(leaf)?;
        let mut atoms = Vec::with_capacity(lineage.len());
        let mut low_confidence = false;
        for &id in &lineage {
            let node = tree.get(id)?;
            if !node.is_live() {
                return Err(EngineError::Internal(format!(
                    "leaf {leaf:?} descends from pruned atom {}",
                    node.index()
                )));
            }
            low_confidence |= node.confidence == Confidence::Low;
            atoms.push(node.atom.clone());
        }

        solutions.push(Solution {
            atoms,
            dme: tree.get(leaf)?.dme.unwrap_or(0.0),
            low_confidence,
            leaf,
        });
    }

    solutions.sort_by(|a, b| a.dme.total_cmp(&b.dme));
    info!(count = solutions.len(), "Collected solutions.");
    Ok(solutions)
}
