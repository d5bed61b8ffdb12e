use phf::{Map, phf_map};

/// Main-chain atom names, in the order they repeat along a residue.
pub const BACKBONE_REPEAT: [&str; 3] = ["N", "CA", "C"];

static BACKBONE_POSITION: Map<&'static str, usize> = phf_map! {
    "N" => 0,
    "CA" => 1,
    "C" => 2,
};

/// Position (0, 1 or 2) of a main-chain atom within the N–CA–C repeat, or `None` for
/// any other atom.
///
/// Matching is case-insensitive and ignores surrounding whitespace, which is how the
/// names appear in fixed-column coordinate files.
pub fn backbone_position(atom_name: &str) -> Option<usize> {
    BACKBONE_POSITION
        .get(atom_name.trim().to_ascii_uppercase().as_str())
        .copied()
}
