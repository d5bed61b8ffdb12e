use nalgebra::{DMatrix, Point3};
use thiserror::Error;

/// Largest excursion of a computed cosine beyond [-1, 1] that is attributed to
/// floating-point rounding rather than to inconsistent input lengths.
pub const COSINE_ROUNDING_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error(
        "Lengths ({a:.4}, {b:.4}) and opposite side {opposite:.4} do not form a triangle (cosine = {cosine:.6})"
    )]
    NotATriangle {
        a: f64,
        b: f64,
        opposite: f64,
        cosine: f64,
    },

    #[error("Dihedral angle is undefined: denominator {denominator:e} vanishes for a near-linear clique")]
    DegenerateDihedral { denominator: f64 },

    #[error("Recovered dihedral cosine {cosine:.6} lies outside [-1, 1]")]
    DihedralOutOfRange { cosine: f64 },

    #[error("Bonds are not sequential: expected shared atom {expected}, found {found}")]
    NonSequentialBonds { expected: usize, found: usize },

    #[error("Non-finite {quantity} encountered")]
    NonFinite { quantity: &'static str },
}

/// How much a recovered internal coordinate can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confidence {
    #[default]
    Nominal,
    /// The value was computed from an ill-conditioned expression (near-linear clique).
    Low,
}

/// A dihedral angle recovered from distances, in radians within [0, π].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dihedral {
    pub angle: f64,
    pub confidence: Confidence,
}

fn checked_acos(cosine: f64) -> Option<f64> {
    if cosine.abs() > 1.0 + COSINE_ROUNDING_TOLERANCE {
        None
    } else {
        Some(cosine.clamp(-1.0, 1.0).acos())
    }
}

/// Computes the angle between sides `a` and `b` of a triangle whose third side is
/// `opposite`, using the law of cosines.
///
/// # Return
///
/// The enclosed angle in radians, within [0, π].
///
/// # Errors
///
/// Returns [`GeometryError::NotATriangle`] if the lengths violate the triangle inequality
/// (or an adjacent side has zero length), and [`GeometryError::NonFinite`] for NaN or
/// infinite inputs. Cosines are only clamped within [`COSINE_ROUNDING_TOLERANCE`].
pub fn law_of_cosines_angle(a: f64, b: f64, opposite: f64) -> Result<f64, GeometryError> {
    if !(a.is_finite() && b.is_finite() && opposite.is_finite()) {
        return Err(GeometryError::NonFinite {
            quantity: "side length",
        });
    }
    let not_a_triangle = |cosine| GeometryError::NotATriangle {
        a,
        b,
        opposite,
        cosine,
    };
    if a <= 0.0 || b <= 0.0 {
        return Err(not_a_triangle(f64::NAN));
    }

    let cosine = (a * a + b * b - opposite * opposite) / (2.0 * a * b);
    checked_acos(cosine).ok_or_else(|| not_a_triangle(cosine))
}

/// Length of the side opposite `angle` in a triangle with adjacent sides `a` and `b`.
pub fn law_of_cosines_side(a: f64, b: f64, angle: f64) -> f64 {
    (a * a + b * b - 2.0 * a * b * angle.cos()).sqrt()
}

/// Recovers the dihedral angle about the bond shared by two overlapping cliques.
///
/// With atoms 1-2-3-4, the dihedral about the 2-3 bond follows from the spherical law
/// of cosines at atom 2:
///
/// `cos ω = (r₁² + d₂₄² − 2·r₁·d₂₄·cosθ₁·cosθ₂ − d₁₄²) / (2·r₁·d₂₄·sinθ₁·sinθ₂)`
///
/// # Arguments
///
/// * `r1` - Bond length between atoms 1 and 2.
/// * `d24` - Distance between atoms 2 and 4.
/// * `theta1` - Angle 1-2-3 at atom 2.
/// * `theta2` - Angle 3-2-4 at atom 2.
/// * `d14` - Distance between atoms 1 and 4.
/// * `ill_conditioning_threshold` - Values of `|sinθ₁·sinθ₂|` below this mark the result
///   as [`Confidence::Low`].
///
/// # Errors
///
/// [`GeometryError::DegenerateDihedral`] when the denominator vanishes,
/// [`GeometryError::NonFinite`] for non-finite intermediate results, and
/// [`GeometryError::DihedralOutOfRange`] when the cosine cannot be realised.
pub fn dihedral_from_distances(
    r1: f64,
    d24: f64,
    theta1: f64,
    theta2: f64,
    d14: f64,
    ill_conditioning_threshold: f64,
) -> Result<Dihedral, GeometryError> {
    let sin_product = theta1.sin() * theta2.sin();
    let denominator = 2.0 * r1 * d24 * sin_product;
    if denominator == 0.0 || sin_product.abs() <= f64::EPSILON {
        return Err(GeometryError::DegenerateDihedral { denominator });
    }

    let numerator =
        r1 * r1 + d24 * d24 - 2.0 * r1 * d24 * theta1.cos() * theta2.cos() - d14 * d14;
    let cosine = numerator / denominator;
    if !cosine.is_finite() {
        return Err(GeometryError::NonFinite {
            quantity: "dihedral cosine",
        });
    }

    let angle = checked_acos(cosine).ok_or(GeometryError::DihedralOutOfRange { cosine })?;
    let confidence = if sin_product.abs() < ill_conditioning_threshold {
        Confidence::Low
    } else {
        Confidence::Nominal
    };
    Ok(Dihedral { angle, confidence })
}

/// Builds the symmetric matrix of pairwise Euclidean distances between `points`.
pub fn distance_matrix(points: &[Point3<f64>]) -> DMatrix<f64> {
    let n = points.len();
    DMatrix::from_fn(n, n, |i, j| (points[i] - points[j]).norm())
}

/// Root-mean-square deviation between the distance matrices of two conformations.
///
/// Unlike coordinate RMSD this needs no superposition and is blind to reflection, which
/// makes it the natural yardstick for structures rebuilt from distances alone.
///
/// # Return
///
/// `None` if the point sets differ in size or hold fewer than two points.
pub fn distance_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.len() < 2 {
        return None;
    }
    let n = coords1.len();
    let mut squared_sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            let diff = (coords1[i] - coords1[j]).norm() - (coords2[i] - coords2[j]).norm();
            squared_sum += diff * diff;
        }
    }
    let pairs = (n * (n - 1) / 2) as f64;
    Some((squared_sum / pairs).sqrt())
}
