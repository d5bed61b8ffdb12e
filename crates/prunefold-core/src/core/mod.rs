//! # Core Module
//!
//! Fundamental building blocks for backbone reconstruction.
//!
//! ## Overview
//!
//! - **Molecular Representation** ([`models`]) - Atoms, distances, cliques and restraint sets
//! - **Internal Coordinates** ([`transform`]) - Bond length / bond angle / dihedral angle to
//!   homogeneous transforms and Cartesian positions
//! - **Geometry** ([`utils`]) - Law of cosines, dihedral recovery and structure comparison
//! - **File I/O** ([`io`]) - Coordinate files, backbone extraction and restraint tables
//!
//! Nothing in this module holds search state; the placement tree and the pruning policy
//! live in [`crate::engine`].

pub mod io;
pub mod models;
pub mod transform;
pub mod utils;
