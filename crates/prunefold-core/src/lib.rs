//! # prunefold Core Library
//!
//! Reconstructs plausible three-dimensional protein backbone conformations from sparse
//! pairwise distance restraints, using a branch-and-prune search over a binary tree of
//! candidate atom placements.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`Atom`, `Distance`, `Clique`,
//!   `RestraintSet`), the internal-coordinate transform builder, geometric utilities and
//!   structure/restraint I/O.
//!
//! - **[`engine`]: The Search Machinery.** The placement tree arena, the consistency
//!   evaluator (distance matching error), search configuration and the individual
//!   expansion, pruning and collection tasks.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into a complete
//!   reconstruction run that yields accepted backbone chains.

pub mod core;
pub mod engine;
pub mod workflows;
