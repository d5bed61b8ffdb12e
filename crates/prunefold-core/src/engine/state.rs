use crate::core::models::atom::Atom;
use crate::core::models::ids::NodeId;
use crate::core::utils::geometry::distance_rmsd;
use nalgebra::Point3;
use std::cmp::Ordering;

/// An accepted chain: every atom from the root anchor to a leaf at the target depth.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Atoms in increasing sequence order.
    pub atoms: Vec<Atom>,
    /// Distance matching error of the leaf.
    pub dme: f64,
    /// Whether any dihedral on the path was recovered from an ill-conditioned clique.
    pub low_confidence: bool,
    pub leaf: NodeId,
}

impl Solution {
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| *a.position()).collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Distance-matrix RMSD against the leading atoms of a reference chain.
    ///
    /// Returns `None` when the reference is shorter than the solution.
    pub fn distance_rmsd_to(&self, reference: &[Atom]) -> Option<f64> {
        let reference: Vec<_> = reference
            .get(..self.atoms.len())?
            .iter()
            .map(|a| *a.position())
            .collect();
        distance_rmsd(&self.positions(), &reference)
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.dme == other.dme
    }
}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.dme.partial_cmp(&other.dme)
    }
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The target depth was reached; the frontier there may still be empty.
    Completed { solutions: usize },
    /// Every frontier node was pruned before the target depth.
    Exhausted { depth: usize },
}

/// What happened while growing one tree level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelStats {
    pub depth: usize,
    /// Live parents entering the level.
    pub frontier: usize,
    pub created: usize,
    pub pruned: usize,
    /// Parents abandoned because the level geometry could not be recovered.
    pub geometry_failures: usize,
    pub low_confidence: bool,
    pub survivors: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub levels: Vec<LevelStats>,
    pub nodes_created: usize,
}

impl SearchReport {
    pub fn total_pruned(&self) -> usize {
        self.levels.iter().map(|l| l.pruned).sum()
    }
}
