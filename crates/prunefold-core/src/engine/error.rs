use thiserror::Error;

use super::config::ConfigError;
use super::tree::TreeError;
use crate::core::models::restraint::RestraintDefect;
use crate::core::utils::geometry::GeometryError;

/// Problems with the chain, bonds or restraints handed to a reconstruction.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum InputError {
    #[error("Atom sequence is empty")]
    EmptyChain,

    #[error("Atom at position {position} has index {found}, expected {expected}")]
    NonContiguousIndex {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("Expected {expected} covalent bonds for the chain, found {found}")]
    CovalentCountMismatch { expected: usize, found: usize },

    #[error("Covalent bond {position} joins atoms {found:?}, expected {expected:?}")]
    CovalentOutOfOrder {
        position: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Long-range restraint set is empty")]
    EmptyRestraints,

    #[error("Restraint ({atom1}, {atom2}) is unusable: {defect}")]
    InvalidRestraint {
        atom1: usize,
        atom2: usize,
        #[source]
        defect: RestraintDefect,
    },

    #[error("Restraints refer to atom {index}, beyond the chain of {chain_length}")]
    RestraintOutOfRange { index: usize, chain_length: usize },

    #[error("Target length {target} exceeds the {available} atoms available")]
    TargetBeyondChain { target: usize, available: usize },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid input: {source}")]
    Input {
        #[from]
        source: InputError,
    },

    #[error("Placement tree error: {source}")]
    Tree {
        #[from]
        source: TreeError,
    },

    #[error("Anchor triplet cannot be placed: {source}")]
    Anchor { source: GeometryError },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
