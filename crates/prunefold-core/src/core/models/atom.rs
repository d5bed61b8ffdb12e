use nalgebra::{Point3, Vector3};

/// Represents a single backbone atom with its label, sequence index and position.
///
/// The label and index are fixed at construction. The position can only be changed
/// through crate-internal displacement, which is how a [`Distance`](super::distance::Distance)
/// snapshot is re-anchored without recomputing its length.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical or residue symbol of the atom (e.g., "N", "CA", "C").
    name: String,
    /// The 1-based position of the atom within its chain.
    index: usize,
    /// The 3D coordinates of the atom in Angstroms.
    position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `name` - The label of the atom.
    /// * `index` - The 1-based sequence index of the atom within its chain.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, index: usize, position: Point3<f64>) -> Self {
        Self {
            name: name.trim().to_string(),
            index,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> &Point3<f64> {
        &self.position
    }

    /// Returns a copy of this atom carrying a different sequence index.
    ///
    /// Used when a filtered subset of a structure is renumbered contiguously.
    pub fn reindexed(&self, index: usize) -> Self {
        Self {
            name: self.name.clone(),
            index,
            position: self.position,
        }
    }

    /// Euclidean distance between this atom and `other`.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        (other.position - self.position).norm()
    }

    pub(crate) fn translate(&mut self, delta: &Vector3<f64>) {
        self.position += delta;
    }
}
