//! Reading and writing the data the search consumes and produces.
//!
//! Structures are read from fixed-column PDB `ATOM` records through the
//! [`StructureFile`](traits::StructureFile) trait, filtered down to the N–CA–C main chain,
//! and turned into covalent distances and long-range restraints. Restraint tables can
//! also be stored as CSV so that measured data can stand in for simulated data.

pub mod backbone;
pub mod pdb;
pub mod restraints;
pub mod traits;
