use super::atom::Atom;
use super::distance::Distance;
use crate::core::utils::geometry::{GeometryError, law_of_cosines_angle};

/// Three sequential atoms `(i, i+1, i+2)` joined by two bonds.
///
/// The non-adjacent span `i → i+2` and the bond angle at the middle atom are derived at
/// construction. A clique whose lengths violate the triangle inequality cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub struct Clique {
    first_bond: Distance,
    second_bond: Distance,
    span: Distance,
    bond_angle: f64,
}

impl Clique {
    /// Builds a clique from two bonds sharing their middle atom.
    ///
    /// The second bond is re-anchored onto the first bond's far atom before the span is
    /// measured, so both bonds keep their own lengths even when the snapshots were taken
    /// in different frames.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonSequentialBonds`] if the bonds do not share an atom, and
    /// [`GeometryError::NotATriangle`] if the three lengths cannot close a triangle.
    pub fn new(first_bond: Distance, second_bond: Distance) -> Result<Self, GeometryError> {
        let expected = first_bond.second().index();
        let found = second_bond.first().index();
        if expected != found {
            return Err(GeometryError::NonSequentialBonds { expected, found });
        }

        let second_bond = second_bond.displaced(first_bond.second().position());
        let span = Distance::new(first_bond.first().clone(), second_bond.second().clone());
        let bond_angle =
            law_of_cosines_angle(first_bond.length(), second_bond.length(), span.length())?;

        Ok(Self {
            first_bond,
            second_bond,
            span,
            bond_angle,
        })
    }

    pub fn first_bond(&self) -> &Distance {
        &self.first_bond
    }

    pub fn second_bond(&self) -> &Distance {
        &self.second_bond
    }

    /// The non-adjacent distance between the first and third atoms.
    pub fn span(&self) -> &Distance {
        &self.span
    }

    /// Bond angle at the middle atom, in radians.
    pub fn bond_angle(&self) -> f64 {
        self.bond_angle
    }

    pub fn atoms(&self) -> [&Atom; 3] {
        [
            self.first_bond.first(),
            self.first_bond.second(),
            self.second_bond.second(),
        ]
    }

    /// Angle at the first atom, between the first bond and the span.
    pub fn leading_angle(&self) -> Result<f64, GeometryError> {
        law_of_cosines_angle(
            self.first_bond.length(),
            self.span.length(),
            self.second_bond.length(),
        )
    }
}
