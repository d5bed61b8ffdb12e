use super::atom::Atom;
use nalgebra::Point3;

/// A snapshot of the separation between two atoms.
///
/// The length is computed once, at construction, from the atoms' positions. Moving
/// either atom afterwards does not update it; build a new `Distance` instead. The only
/// sanctioned way to move the endpoints is [`Distance::displaced`], which translates both
/// atoms together and therefore keeps the stored length exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Distance {
    first: Atom,
    second: Atom,
    length: f64,
}

impl Distance {
    /// Creates a distance between two atoms, measuring their Euclidean separation.
    ///
    /// Coincident atoms are legal and yield a length of zero.
    pub fn new(first: Atom, second: Atom) -> Self {
        let length = first.distance_to(&second);
        Self {
            first,
            second,
            length,
        }
    }

    pub fn first(&self) -> &Atom {
        &self.first
    }

    pub fn second(&self) -> &Atom {
        &self.second
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    /// The sequence indices of the two endpoints, in construction order.
    pub fn indices(&self) -> (usize, usize) {
        (self.first.index(), self.second.index())
    }

    /// Re-anchors the distance so that its first atom sits at `target`.
    ///
    /// The second atom is shifted by the same displacement, so the stored length is
    /// carried over unchanged rather than recomputed. The receiver is left untouched;
    /// the displaced snapshot works on copies of both atoms.
    ///
    /// # Arguments
    ///
    /// * `target` - The new position of the first atom.
    ///
    /// # Return
    ///
    /// A new `Distance` with both atoms translated and the same length.
    pub fn displaced(&self, target: &Point3<f64>) -> Self {
        let delta = target - self.first.position();
        let mut first = self.first.clone();
        let mut second = self.second.clone();
        first.translate(&delta);
        second.translate(&delta);
        Self {
            first,
            second,
            length: self.length,
        }
    }
}

/// Measures the distance between two atoms without consuming them.
pub fn distance(a: &Atom, b: &Atom) -> Distance {
    Distance::new(a.clone(), b.clone())
}
