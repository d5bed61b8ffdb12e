use crate::core::models::atom::Atom;
use crate::core::models::distance::Distance;
use crate::core::utils::identifiers::{BACKBONE_REPEAT, backbone_position};
use itertools::Itertools;
use tracing::debug;

/// Reduces a structure to its N–CA–C main chain.
///
/// Only complete, consecutive `N`, `CA`, `C` triplets are kept; incomplete residues and
/// everything else are dropped. The survivors are renumbered contiguously from 1.
pub fn extract_backbone(atoms: &[Atom]) -> Vec<Atom> {
    let mut backbone = Vec::with_capacity(atoms.len());
    let mut i = 0;
    while i + BACKBONE_REPEAT.len() <= atoms.len() {
        let window = &atoms[i..i + BACKBONE_REPEAT.len()];
        let is_triplet = window
            .iter()
            .enumerate()
            .all(|(slot, atom)| backbone_position(atom.name()) == Some(slot));
        if is_triplet {
            backbone.extend(window.iter().cloned());
            i += BACKBONE_REPEAT.len();
        } else {
            i += 1;
        }
    }

    debug!(
        total = atoms.len(),
        kept = backbone.len(),
        "Filtered structure to main-chain atoms."
    );

    backbone
        .iter()
        .enumerate()
        .map(|(offset, atom)| atom.reindexed(offset + 1))
        .collect()
}

/// One covalent bond per consecutive pair along the chain, in chain order.
pub fn covalent_distances(atoms: &[Atom]) -> Vec<Distance> {
    atoms
        .iter()
        .tuple_windows()
        .map(|(a, b)| Distance::new(a.clone(), b.clone()))
        .collect()
}
