use crate::core::models::atom::Atom;
use crate::core::models::clique::Clique;
use crate::core::models::distance::Distance;
use crate::core::transform::{
    Handedness, HomogeneousTransform, compose, general_transform, position_of, recover_dihedral,
};
use crate::core::utils::geometry::{Confidence, GeometryError};

/// The two overlapping cliques that determine where atom `i` goes.
///
/// `leading` spans atoms `(i-3, i-2, i-1)` and `trailing` spans `(i-2, i-1, i)`. The three
/// bonds are chained end to end, so both cliques see the same copy of the shared atoms.
#[derive(Debug, Clone)]
pub struct Moment {
    leading: Clique,
    trailing: Clique,
}

impl Moment {
    /// Builds the moment from the three consecutive bonds ending at atom `i`.
    pub fn from_bonds(
        first: &Distance,
        second: &Distance,
        third: &Distance,
    ) -> Result<Self, GeometryError> {
        let second = second.displaced(first.second().position());
        let third = third.displaced(second.second().position());
        let leading = Clique::new(first.clone(), second.clone())?;
        let trailing = Clique::new(second, third)?;
        Ok(Self { leading, trailing })
    }

    pub fn leading(&self) -> &Clique {
        &self.leading
    }

    pub fn trailing(&self) -> &Clique {
        &self.trailing
    }

    /// Derives the internal coordinates of the new atom.
    ///
    /// # Errors
    ///
    /// Propagates any [`GeometryError`] from the dihedral recovery.
    pub fn local_geometry(
        &self,
        ill_conditioning_threshold: f64,
    ) -> Result<LocalGeometry, GeometryError> {
        let dihedral = recover_dihedral(&self.leading, &self.trailing, ill_conditioning_threshold)?;
        let [_, _, placed] = self.trailing.atoms();
        Ok(LocalGeometry {
            name: placed.name().to_string(),
            index: placed.index(),
            bond_length: self.trailing.second_bond().length(),
            bond_angle: self.trailing.bond_angle(),
            dihedral: dihedral.angle,
            confidence: dihedral.confidence,
        })
    }
}

/// Internal coordinates of an atom relative to its three predecessors.
///
/// All frontier nodes of one level share the same local geometry; only their cumulative
/// transforms differ.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalGeometry {
    pub name: String,
    pub index: usize,
    pub bond_length: f64,
    pub bond_angle: f64,
    pub dihedral: f64,
    pub confidence: Confidence,
}

impl LocalGeometry {
    pub fn transform(&self, handedness: Handedness) -> HomogeneousTransform {
        general_transform(
            self.bond_length,
            self.bond_angle,
            handedness.sign() * self.dihedral,
        )
    }
}

/// A fully positioned child, ready to be attached under its parent.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub atom: Atom,
    pub cumulative: HomogeneousTransform,
    pub handedness: Handedness,
    pub confidence: Confidence,
}

/// Places one child of a node whose frame is `parent_cumulative`.
pub fn place_candidate(
    parent_cumulative: &HomogeneousTransform,
    geometry: &LocalGeometry,
    handedness: Handedness,
) -> Candidate {
    let cumulative = compose(parent_cumulative, &geometry.transform(handedness));
    Candidate {
        atom: Atom::new(&geometry.name, geometry.index, position_of(&cumulative)),
        cumulative,
        handedness,
        confidence: geometry.confidence,
    }
}

/// Places both mirror children of a node.
pub fn place_pair(
    parent_cumulative: &HomogeneousTransform,
    geometry: &LocalGeometry,
) -> [Candidate; 2] {
    [Handedness::Primary, Handedness::Mirror]
        .map(|handedness| place_candidate(parent_cumulative, geometry, handedness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transform::{anchor_transform, second_anchor_transform, third_anchor_transform};
    use nalgebra::Point3;
    use std::f64::consts::FRAC_PI_2;

    fn perpendicular_bonds() -> [Distance; 3] {
        let a = Atom::new("N", 1, Point3::new(0.0, 0.0, 0.0));
        let b = Atom::new("CA", 2, Point3::new(1.5, 0.0, 0.0));
        let c = Atom::new("C", 3, Point3::new(1.5, 1.5, 0.0));
        let d = Atom::new("N", 4, Point3::new(1.5, 1.5, 1.5));
        [
            Distance::new(a, b.clone()),
            Distance::new(b, c.clone()),
            Distance::new(c, d),
        ]
    }

    fn third_anchor_frame() -> HomogeneousTransform {
        let t2 = compose(&anchor_transform(), &second_anchor_transform(1.5));
        compose(&t2, &third_anchor_transform(1.5, FRAC_PI_2))
    }

    #[test]
    fn moment_yields_internal_coordinates_of_fourth_atom() {
        let [b1, b2, b3] = perpendicular_bonds();
        let geometry = Moment::from_bonds(&b1, &b2, &b3)
            .unwrap()
            .local_geometry(1e-6)
            .unwrap();

        assert_eq!(geometry.name, "N");
        assert_eq!(geometry.index, 4);
        assert!((geometry.bond_length - 1.5).abs() < 1e-12);
        assert!((geometry.bond_angle - FRAC_PI_2).abs() < 1e-12);
        assert!((geometry.dihedral - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn bonds_from_shifted_frames_are_chained() {
        let [b1, b2, b3] = perpendicular_bonds();
        let shifted = b3.displaced(&Point3::new(40.0, -7.0, 3.0));

        let moment = Moment::from_bonds(&b1, &b2, &shifted).unwrap();
        let [_, _, last] = moment.trailing().atoms();

        assert!((last.position() - Point3::new(1.5, 1.5, 1.5)).norm() < 1e-12);
    }

    #[test]
    fn mirror_pair_reflects_across_parent_frame() {
        let [b1, b2, b3] = perpendicular_bonds();
        let geometry = Moment::from_bonds(&b1, &b2, &b3)
            .unwrap()
            .local_geometry(1e-6)
            .unwrap();
        let parent = third_anchor_frame();

        let [primary, mirror] = place_pair(&parent, &geometry);

        assert!((primary.atom.position() - Point3::new(-1.5, 1.5, -1.5)).norm() < 1e-9);
        assert!((mirror.atom.position() - Point3::new(-1.5, 1.5, 1.5)).norm() < 1e-9);
        assert_eq!(primary.handedness, Handedness::Primary);
        assert_eq!(mirror.handedness, Handedness::Mirror);
    }

    #[test]
    fn child_sits_one_bond_length_from_parent() {
        let geometry = LocalGeometry {
            name: "CA".into(),
            index: 5,
            bond_length: 1.458,
            bond_angle: 2.1,
            dihedral: 0.7,
            confidence: Confidence::Nominal,
        };
        let parent = third_anchor_frame();
        let parent_position = position_of(&parent);

        for candidate in place_pair(&parent, &geometry) {
            let bond = (candidate.atom.position() - parent_position).norm();
            assert!((bond - 1.458).abs() < 1e-9);
            assert_eq!(candidate.atom.index(), 5);
        }
    }
}
