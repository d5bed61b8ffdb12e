//! # Workflows Module
//!
//! High-level entry points that run a complete reconstruction.
//!
//! - **Reconstruction** ([`reconstruct`]) - Validates the input chain and restraints, anchors
//!   the first three atoms, grows the placement tree level by level with pruning, and
//!   collects every surviving chain as a solution.

pub mod reconstruct;
