use super::distance::Distance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Smallest index gap a restraint may span; closer pairs are fixed by the bonds.
pub const MIN_RESTRAINT_GAP: usize = 2;

/// Why a restraint cannot take part in a reconstruction.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum RestraintDefect {
    #[error("atom indices start at 1")]
    ZeroIndex,
    #[error("atoms {separation} position(s) apart are fixed by the covalent bonds")]
    TooClose { separation: usize },
    #[error("distance {0} must be positive and finite")]
    InvalidDistance(f64),
}

/// A target distance between two atoms, identified by their sequence indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Restraint {
    pub atom1: usize,
    pub atom2: usize,
    pub distance: f64,
}

impl Restraint {
    /// Creates a restraint, storing the pair with the lower index first.
    pub fn new(atom1: usize, atom2: usize, distance: f64) -> Self {
        Self {
            atom1: atom1.min(atom2),
            atom2: atom1.max(atom2),
            distance,
        }
    }

    pub fn key(&self) -> (usize, usize) {
        (self.atom1.min(self.atom2), self.atom1.max(self.atom2))
    }

    /// Number of positions between the two atoms along the chain.
    pub fn separation(&self) -> usize {
        self.atom1.abs_diff(self.atom2)
    }

    /// Checks that the restraint joins two real, non-bonded atoms at a positive distance.
    pub fn check(&self) -> Result<(), RestraintDefect> {
        if self.atom1.min(self.atom2) == 0 {
            return Err(RestraintDefect::ZeroIndex);
        }
        let separation = self.separation();
        if separation < MIN_RESTRAINT_GAP {
            return Err(RestraintDefect::TooClose { separation });
        }
        if !(self.distance.is_finite() && self.distance > 0.0) {
            return Err(RestraintDefect::InvalidDistance(self.distance));
        }
        Ok(())
    }
}

impl From<&Distance> for Restraint {
    fn from(d: &Distance) -> Self {
        let (a, b) = d.indices();
        Self::new(a, b, d.length())
    }
}

/// An index-pair keyed collection of restraints.
///
/// Pairs are unordered: `(i, j)` and `(j, i)` address the same entry. When the same pair
/// is inserted twice, the later value wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestraintSet {
    by_pair: BTreeMap<(usize, usize), f64>,
}

impl RestraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, restraint: Restraint) -> Option<f64> {
        self.by_pair.insert(restraint.key(), restraint.distance)
    }

    /// Looks up the target distance between atoms `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.by_pair.get(&(i.min(j), i.max(j))).copied()
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    /// Iterates restraints in ascending index-pair order.
    pub fn iter(&self) -> impl Iterator<Item = Restraint> + '_ {
        self.by_pair
            .iter()
            .map(|(&(atom1, atom2), &distance)| Restraint {
                atom1,
                atom2,
                distance,
            })
    }

    /// Largest atom index referenced by any restraint.
    pub fn max_index(&self) -> Option<usize> {
        self.by_pair.keys().map(|&(_, j)| j).max()
    }
}

impl FromIterator<Restraint> for RestraintSet {
    fn from_iter<I: IntoIterator<Item = Restraint>>(iter: I) -> Self {
        let mut set = Self::new();
        for restraint in iter {
            set.insert(restraint);
        }
        set
    }
}

impl<'a> FromIterator<&'a Distance> for RestraintSet {
    fn from_iter<I: IntoIterator<Item = &'a Distance>>(iter: I) -> Self {
        iter.into_iter().map(Restraint::from).collect()
    }
}
