use super::tree::{PlacementTree, TreeError};
use crate::core::models::ids::NodeId;
use crate::core::models::restraint::{Restraint, RestraintSet};

/// Agreement between a candidate's realized distances and the restraint set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmeScore {
    /// Distance matching error.
    pub dme: f64,
    /// Number of realized distances that had a restraint to compare against.
    pub matched: usize,
}

/// Scores candidates against long-range restraints.
///
/// For a node at sequence index `n`, every ancestor at least `min_separation` positions
/// away contributes the realized distance to the node. Pairs with a restraint enter
///
/// `DME = sqrt(Σ (realized − restraint)²) / (n − 1)`
///
/// and pairs without one are ignored.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyEvaluator<'a> {
    restraints: &'a RestraintSet,
    min_separation: usize,
}

impl<'a> ConsistencyEvaluator<'a> {
    pub fn new(restraints: &'a RestraintSet, min_separation: usize) -> Self {
        Self {
            restraints,
            min_separation,
        }
    }

    /// Distances from `node` to each sufficiently distant ancestor, as placed in the tree.
    pub fn realized_distances(
        &self,
        tree: &PlacementTree,
        node: NodeId,
    ) -> Result<Vec<Restraint>, TreeError> {
        let candidate = tree.get(node)?;
        let index = candidate.index();
        Ok(tree
            .ancestors(node)
            .filter(|(_, ancestor)| index.abs_diff(ancestor.index()) >= self.min_separation)
            .map(|(_, ancestor)| {
                Restraint::new(
                    ancestor.index(),
                    index,
                    ancestor.atom.distance_to(&candidate.atom),
                )
            })
            .collect())
    }

    pub fn score(&self, tree: &PlacementTree, node: NodeId) -> Result<DmeScore, TreeError> {
        let index = tree.get(node)?.index();
        let realized = self.realized_distances(tree, node)?;
        Ok(self.score_realized(&realized, index))
    }

    /// Scores a set of realized distances belonging to the atom at `index`.
    pub fn score_realized(&self, realized: &[Restraint], index: usize) -> DmeScore {
        let (squared_sum, matched) = realized
            .iter()
            .filter_map(|r| {
                self.restraints
                    .get(r.atom1, r.atom2)
                    .map(|target| r.distance - target)
            })
            .fold((0.0, 0), |(sum, count), diff| (sum + diff * diff, count + 1));

        let divisor = index.saturating_sub(1).max(1) as f64;
        DmeScore {
            dme: squared_sum.sqrt() / divisor,
            matched,
        }
    }
}
