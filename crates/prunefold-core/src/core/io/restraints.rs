use crate::core::models::atom::Atom;
use crate::core::models::restraint::{MIN_RESTRAINT_GAP, Restraint, RestraintSet};
use itertools::Itertools;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RestraintIoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Invalid restraint on record {record} of '{path}': {reason}")]
    Invalid {
        path: String,
        record: usize,
        reason: String,
    },
}

/// Simulates a sparse long-range restraint set from a known structure.
///
/// Every pair of atoms at least [`MIN_RESTRAINT_GAP`] positions apart whose separation
/// does not exceed `proximity_threshold` becomes a restraint, as an NMR experiment would
/// only report nearby pairs.
pub fn derive_restraints(atoms: &[Atom], proximity_threshold: f64) -> RestraintSet {
    let restraints: RestraintSet = atoms
        .iter()
        .tuple_combinations()
        .map(|(a, b)| Restraint::new(a.index(), b.index(), a.distance_to(b)))
        .filter(|r| r.separation() >= MIN_RESTRAINT_GAP && r.distance <= proximity_threshold)
        .collect();

    info!(
        atoms = atoms.len(),
        restraints = restraints.len(),
        threshold = proximity_threshold,
        "Derived long-range restraints from structure."
    );
    restraints
}

/// Loads a restraint table with the header `atom1,atom2,distance`.
///
/// # Errors
///
/// Returns [`RestraintIoError::Csv`] for unreadable or malformed files and
/// [`RestraintIoError::Invalid`] for zero indices, self or bonded pairs and non-positive
/// distances.
pub fn load_restraints(path: &Path) -> Result<RestraintSet, RestraintIoError> {
    let path_str = path.to_string_lossy().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| RestraintIoError::Csv {
            path: path_str.clone(),
            source: e,
        })?;

    let mut set = RestraintSet::new();
    for (record, result) in reader.deserialize::<Restraint>().enumerate() {
        let raw = result.map_err(|e| RestraintIoError::Csv {
            path: path_str.clone(),
            source: e,
        })?;
        let restraint = Restraint::new(raw.atom1, raw.atom2, raw.distance);
        restraint
            .check()
            .map_err(|defect| RestraintIoError::Invalid {
                path: path_str.clone(),
                record: record + 1,
                reason: defect.to_string(),
            })?;
        set.insert(restraint);
    }
    Ok(set)
}

/// Writes a restraint table in ascending index-pair order.
pub fn save_restraints(restraints: &RestraintSet, path: &Path) -> Result<(), RestraintIoError> {
    let path_str = path.to_string_lossy().to_string();
    let csv_error = |e| RestraintIoError::Csv {
        path: path_str.clone(),
        source: e,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for restraint in restraints.iter() {
        writer.serialize(restraint).map_err(csv_error)?;
    }
    writer.flush().map_err(|e| RestraintIoError::Io {
        path: path_str.clone(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn straight_chain(n: usize, spacing: f64) -> Vec<Atom> {
        (1..=n)
            .map(|i| Atom::new("CA", i, Point3::new(i as f64 * spacing, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn derives_only_distant_pairs_within_threshold() {
        let atoms = straight_chain(5, 1.5);

        let set = derive_restraints(&atoms, 3.5);

        let keys: Vec<_> = set.iter().map(|r| r.key()).collect();
        assert_eq!(keys, [(1, 3), (2, 4), (3, 5)]);
        assert!((set.get(1, 3).unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_below_every_gap_yields_empty_set() {
        let atoms = straight_chain(4, 2.0);
        assert!(derive_restraints(&atoms, 3.9).is_empty());
    }

    #[test]
    fn load_reads_trimmed_table_and_orders_pairs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("restraints.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "atom1, atom2, distance").unwrap();
        writeln!(file, "7, 2, 4.25").unwrap();
        writeln!(file, "1, 4, 3.5").unwrap();

        let set = load_restraints(&file_path).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(2, 7), Some(4.25));
        assert_eq!(set.iter().next().unwrap().key(), (1, 4));
    }

    #[test]
    fn load_rejects_non_positive_distance() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.csv");
        fs::write(&file_path, "atom1,atom2,distance\n1,4,3.0\n2,5,-1.0\n").unwrap();

        let err = load_restraints(&file_path).unwrap_err();

        match err {
            RestraintIoError::Invalid { record, .. } => assert_eq!(record, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_rejects_self_pair() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("self.csv");
        fs::write(&file_path, "atom1,atom2,distance\n3,3,1.0\n").unwrap();

        assert!(matches!(
            load_restraints(&file_path),
            Err(RestraintIoError::Invalid { .. })
        ));
    }

    #[test]
    fn load_rejects_zero_index_in_second_column() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("zero.csv");
        fs::write(&file_path, "atom1,atom2,distance\n5,0,3.0\n").unwrap();

        match load_restraints(&file_path).unwrap_err() {
            RestraintIoError::Invalid { record, reason, .. } => {
                assert_eq!(record, 1);
                assert!(reason.contains("start at 1"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn load_rejects_bonded_neighbours() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bonded.csv");
        fs::write(&file_path, "atom1,atom2,distance\n1,4,3.0\n6,5,1.5\n").unwrap();

        assert!(matches!(
            load_restraints(&file_path),
            Err(RestraintIoError::Invalid { record: 2, .. })
        ));
    }

    #[test]
    fn load_reports_malformed_rows_as_csv_errors() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("malformed.csv");
        fs::write(&file_path, "atom1,atom2,distance\n1,four,3.0\n").unwrap();

        assert!(matches!(
            load_restraints(&file_path),
            Err(RestraintIoError::Csv { .. })
        ));
    }

    #[test]
    fn saved_table_loads_back_unchanged() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("saved.csv");
        let set: RestraintSet = [Restraint::new(1, 5, 4.75), Restraint::new(2, 4, 3.125)]
            .into_iter()
            .collect();

        save_restraints(&set, &file_path).unwrap();
        let header = fs::read_to_string(&file_path).unwrap();
        assert!(header.starts_with("atom1,atom2,distance"));

        assert_eq!(load_restraints(&file_path).unwrap(), set);
    }
}
