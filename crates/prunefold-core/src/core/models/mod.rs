//! # Core Models Module
//!
//! Value types describing a backbone chain and the distance data it is rebuilt from.
//!
//! ## Key Components
//!
//! - [`atom`] - A labelled, indexed point in space
//! - [`distance`] - A snapshot of the separation between two atoms
//! - [`clique`] - Three sequential atoms and the bond angle they define
//! - [`restraint`] - Index-pair distance restraints used to score candidates
//! - [`ids`] - Arena handles for placement tree nodes
//!
//! ```ignore
//! use prunefold::core::models::{atom::Atom, distance::Distance};
//! use nalgebra::Point3;
//!
//! let n = Atom::new("N", 1, Point3::new(0.0, 0.0, 0.0));
//! let ca = Atom::new("CA", 2, Point3::new(1.458, 0.0, 0.0));
//! let bond = Distance::new(n, ca);
//! assert!((bond.length() - 1.458).abs() < 1e-12);
//! ```

pub mod atom;
pub mod clique;
pub mod distance;
pub mod ids;
pub mod restraint;
