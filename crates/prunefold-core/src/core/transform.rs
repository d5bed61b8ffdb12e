//! Internal coordinates to Cartesian positions.
//!
//! Every placed atom carries a 4×4 homogeneous transform expressing its local frame in
//! its parent's frame. The local x axis points along the bond from the parent to the
//! atom, so the parent sits at `(-r, 0, 0)` and the grandparent lies in the local x–y
//! plane on the positive y side. Composing local transforms from the root yields the
//! cumulative transform whose translation column is the atom's global position.

use crate::core::models::clique::Clique;
use crate::core::models::distance::distance;
use crate::core::utils::geometry::{Dihedral, GeometryError, dihedral_from_distances};
use nalgebra::{Matrix4, Point3};

pub type HomogeneousTransform = Matrix4<f64>;

/// Which of the two mirror placements a transform realises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    /// Dihedral taken as recovered, `+ω`.
    Primary,
    /// Out-of-plane component negated, `-ω`.
    Mirror,
}

impl Handedness {
    pub fn sign(self) -> f64 {
        match self {
            Handedness::Primary => 1.0,
            Handedness::Mirror => -1.0,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Handedness::Primary => 0,
            Handedness::Mirror => 1,
        }
    }
}

/// Transform of the first anchor: the origin of the global frame.
pub fn anchor_transform() -> HomogeneousTransform {
    Matrix4::identity()
}

/// Transform of the second anchor, one bond length down the chain axis.
///
/// The x and z axes are flipped so that the first anchor lies on the negative local x
/// axis, matching the convention used by every later frame.
pub fn second_anchor_transform(bond_length: f64) -> HomogeneousTransform {
    #[rustfmt::skip]
    let m = Matrix4::new(
        -1.0, 0.0,  0.0, -bond_length,
         0.0, 1.0,  0.0,  0.0,
         0.0, 0.0, -1.0,  0.0,
         0.0, 0.0,  0.0,  1.0,
    );
    m
}

/// Transform of the third anchor: a planar rotation by the bond angle followed by a
/// translation of one bond length, in the local x–y plane.
pub fn third_anchor_transform(bond_length: f64, bond_angle: f64) -> HomogeneousTransform {
    let (sin_t, cos_t) = bond_angle.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
        -cos_t, -sin_t, 0.0, -bond_length * cos_t,
         sin_t, -cos_t, 0.0,  bond_length * sin_t,
         0.0,    0.0,   1.0,  0.0,
         0.0,    0.0,   0.0,  1.0,
    );
    m
}

/// General transform for atom `i ≥ 4` from its bond length, the bond angle at its
/// parent and the dihedral about the parent bond.
pub fn general_transform(bond_length: f64, bond_angle: f64, dihedral: f64) -> HomogeneousTransform {
    let (sin_t, cos_t) = bond_angle.sin_cos();
    let (sin_w, cos_w) = dihedral.sin_cos();
    let r = bond_length;
    #[rustfmt::skip]
    let m = Matrix4::new(
        -cos_t,          -sin_t,          0.0,    -r * cos_t,
         sin_t * cos_w,  -cos_t * cos_w, -sin_w,   r * sin_t * cos_w,
         sin_t * sin_w,  -cos_t * sin_w,  cos_w,   r * sin_t * sin_w,
         0.0,             0.0,            0.0,     1.0,
    );
    m
}

/// Chains a local transform onto its parent's cumulative transform.
pub fn compose(
    parent_cumulative: &HomogeneousTransform,
    local: &HomogeneousTransform,
) -> HomogeneousTransform {
    parent_cumulative * local
}

/// Global position of a frame's origin.
pub fn position_of(cumulative: &HomogeneousTransform) -> Point3<f64> {
    Point3::new(cumulative[(0, 3)], cumulative[(1, 3)], cumulative[(2, 3)])
}

/// Recovers the dihedral about the bond shared by two overlapping cliques.
///
/// `leading` covers atoms `(i-3, i-2, i-1)` and `trailing` covers `(i-2, i-1, i)`. The
/// angles entering the formula are both taken at atom `i-2`: the bond angle of `leading`
/// and the leading angle of `trailing`.
pub fn recover_dihedral(
    leading: &Clique,
    trailing: &Clique,
    ill_conditioning_threshold: f64,
) -> Result<Dihedral, GeometryError> {
    let [first, _, _] = leading.atoms();
    let [_, _, last] = trailing.atoms();
    let d14 = distance(first, last).length();

    dihedral_from_distances(
        leading.first_bond().length(),
        trailing.span().length(),
        leading.bond_angle(),
        trailing.leading_angle()?,
        d14,
        ill_conditioning_threshold,
    )
}
