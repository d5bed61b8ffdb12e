//! # Engine Module
//!
//! The branch-and-prune machinery that grows a chain one atom per level.
//!
//! ## Overview
//!
//! Starting from a fixed anchor triplet, every level appends one atom in two mirror
//! positions under each live frontier node. Each candidate is consistent with the covalent
//! geometry by construction, so it is judged only against the long-range restraints; a
//! candidate whose distance matching error exceeds the tolerance is pruned along with any
//! subtree it would have grown.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tolerance, target length and scoring parameters
//! - **Placement Tree** ([`tree`]) - Arena of candidate nodes and their lifecycle
//! - **Placement** ([`placement`]) - Internal coordinates of each level and child placement
//! - **Consistency** ([`evaluator`]) - Distance matching error against restraints
//! - **State Tracking** ([`state`]) - Solutions, outcomes and per-level statistics
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress reporting
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod evaluator;
pub mod placement;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
pub mod tree;
