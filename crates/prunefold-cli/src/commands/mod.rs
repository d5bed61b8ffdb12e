pub mod reconstruct;
pub mod restraints;
