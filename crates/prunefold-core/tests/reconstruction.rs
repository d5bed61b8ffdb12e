use nalgebra::Point3;
use prunefold::core::io::backbone::covalent_distances;
use prunefold::core::io::restraints::derive_restraints;
use prunefold::core::models::atom::Atom;
use prunefold::core::models::restraint::{Restraint, RestraintDefect, RestraintSet};
use prunefold::core::transform::{
    anchor_transform, compose, general_transform, position_of, second_anchor_transform,
    third_anchor_transform,
};
use prunefold::core::utils::geometry::distance_matrix;
use prunefold::engine::config::{ConfigError, SearchConfig, SearchConfigBuilder};
use prunefold::engine::error::{EngineError, InputError};
use prunefold::engine::progress::{Progress, ProgressReporter};
use prunefold::engine::state::SearchOutcome;
use prunefold::engine::tree::NodeState;
use prunefold::workflows::reconstruct::{self, ReconstructionInput};
use std::sync::Mutex;

const NAMES: [&str; 3] = ["N", "CA", "C"];

/// A regular helix: radius 2.3 Å, 100° turn and 1.5 Å rise per atom.
fn helix(n: usize) -> Vec<Atom> {
    (0..n)
        .map(|k| {
            let phi = (100.0_f64 * k as f64).to_radians();
            Atom::new(
                NAMES[k % 3],
                k + 1,
                Point3::new(2.3 * phi.cos(), 2.3 * phi.sin(), 1.5 * k as f64),
            )
        })
        .collect()
}

fn helix_input(n: usize) -> ReconstructionInput {
    let atoms = helix(n);
    let restraints = derive_restraints(&atoms, f64::INFINITY);
    ReconstructionInput::from_structure(atoms, restraints)
}

fn config(target_length: usize) -> SearchConfig {
    SearchConfigBuilder::new()
        .target_length(target_length)
        .build()
        .unwrap()
}

fn right_angle_quad() -> Vec<Atom> {
    vec![
        Atom::new("N", 1, Point3::new(0.0, 0.0, 0.0)),
        Atom::new("CA", 2, Point3::new(1.5, 0.0, 0.0)),
        Atom::new("C", 3, Point3::new(1.5, 1.5, 0.0)),
        Atom::new("N", 4, Point3::new(1.5, 1.5, 1.5)),
    ]
}

fn assert_same_distances(solution: &[Point3<f64>], reference: &[Atom]) {
    let reference: Vec<_> = reference.iter().map(|a| *a.position()).collect();
    let diff = distance_matrix(solution) - distance_matrix(&reference);
    assert!(
        diff.amax() < 1e-6,
        "distance matrices differ by {}",
        diff.amax()
    );
}

#[test]
fn four_atom_helix_yields_mirror_pair() {
    let input = helix_input(4);

    let result = reconstruct::run(&input, &config(4), &ProgressReporter::new()).unwrap();

    assert_eq!(result.report.outcome, SearchOutcome::Completed { solutions: 2 });
    assert_eq!(result.solutions.len(), 2);
    for solution in &result.solutions {
        assert_eq!(solution.len(), 4);
        assert!(solution.dme < 1e-9);
        assert_same_distances(&solution.positions(), &input.atoms);
    }

    let z: Vec<_> = result.solutions.iter().map(|s| s.atoms[3].position().z).collect();
    assert!((z[0] + z[1]).abs() < 1e-9);
    assert!(z[0].abs() > 0.1);
}

#[test]
fn eight_atom_helix_keeps_one_chain_per_handedness() {
    let input = helix_input(8);

    let result = reconstruct::run(&input, &config(8), &ProgressReporter::new()).unwrap();

    assert_eq!(result.report.outcome, SearchOutcome::Completed { solutions: 2 });
    assert_eq!(result.report.levels.len(), 5);
    assert!(result.report.total_pruned() > 0);
    for solution in &result.solutions {
        let labels: Vec<_> = solution.atoms.iter().map(|a| a.name()).collect();
        assert_eq!(labels, ["N", "CA", "C", "N", "CA", "C", "N", "CA"]);
        let indices: Vec<_> = solution.atoms.iter().map(|a| a.index()).collect();
        assert_eq!(indices, (1..=8).collect::<Vec<_>>());
        assert!(!solution.low_confidence);
        assert_same_distances(&solution.positions(), &input.atoms);
        assert!(solution.distance_rmsd_to(&input.atoms).unwrap() < 1e-6);
    }
}

#[test]
fn target_shorter_than_chain_stops_early() {
    let input = helix_input(9);

    let result = reconstruct::run(&input, &config(6), &ProgressReporter::new()).unwrap();

    assert_eq!(result.solutions.len(), 2);
    for solution in &result.solutions {
        assert_eq!(solution.len(), 6);
        assert_same_distances(&solution.positions(), &input.atoms[..6]);
    }
}

#[test]
fn pruned_nodes_never_appear_in_solutions() {
    let input = helix_input(7);

    let result = reconstruct::run(&input, &config(7), &ProgressReporter::new()).unwrap();

    for solution in &result.solutions {
        let lineage = result.tree.lineage(solution.leaf).unwrap();
        assert_eq!(lineage.len(), 7);
        for id in lineage {
            assert_ne!(result.tree.get(id).unwrap().state, NodeState::Pruned);
        }
    }
}

#[test]
fn nearly_linear_clique_marks_level_and_solutions_low_confidence() {
    // Angle 1-2-3 is 0.02 rad short of straight, so sinθ₁·sinθ₂ at atom 4 is about 0.014.
    let bend = 0.02_f64;
    let p3 = Point3::new(1.5 + 1.5 * bend.cos(), 1.5 * bend.sin(), 0.0);
    let p4 = p3 + 1.5 * nalgebra::Vector3::new(0.0, 0.6, 0.8);
    let p5 = p4 + 1.5 * nalgebra::Vector3::new(0.6, 0.0, -0.8);
    let atoms = vec![
        Atom::new("N", 1, Point3::origin()),
        Atom::new("CA", 2, Point3::new(1.5, 0.0, 0.0)),
        Atom::new("C", 3, p3),
        Atom::new("N", 4, p4),
        Atom::new("CA", 5, p5),
    ];
    let restraints = derive_restraints(&atoms, f64::INFINITY);
    let input = ReconstructionInput::from_structure(atoms, restraints);
    let sensitive = SearchConfigBuilder::new()
        .target_length(5)
        .ill_conditioning_threshold(0.05)
        .build()
        .unwrap();
    let events = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
        events.lock().unwrap().push(event);
    }));

    let result = reconstruct::run(&input, &sensitive, &reporter).unwrap();
    drop(reporter);

    assert!(result.report.levels[0].low_confidence);
    assert!(!result.report.levels[1].low_confidence);
    assert_eq!(result.solutions.len(), 2);
    for solution in &result.solutions {
        assert!(solution.low_confidence);
        assert_same_distances(&solution.positions(), &input.atoms);
    }
    let events = events.into_inner().unwrap();
    assert!(events.iter().any(
        |e| matches!(e, Progress::Message(msg) if msg.starts_with("atom 4: nearly linear"))
    ));

    let nominal = reconstruct::run(&input, &config(5), &ProgressReporter::new()).unwrap();
    assert!(nominal.solutions.iter().all(|s| !s.low_confidence));
}

/// Builds a chain from internal coordinates with dihedrals of both signs.
fn mixed_dihedral_chain() -> Vec<Atom> {
    const BOND_LENGTHS: [f64; 3] = [1.46, 1.52, 1.33];
    const BOND_ANGLES: [f64; 3] = [111.0, 117.0, 121.0];
    const DIHEDRALS: [f64; 11] = [
        60.0, -120.0, 170.0, -60.0, 90.0, -150.0, 45.0, -75.0, 130.0, -100.0, 20.0,
    ];

    let bond = |i: usize| BOND_LENGTHS[i % 3];
    let angle = |i: usize| BOND_ANGLES[i % 3].to_radians();

    let mut frames = vec![anchor_transform()];
    frames.push(compose(&frames[0], &second_anchor_transform(bond(0))));
    frames.push(compose(&frames[1], &third_anchor_transform(bond(1), angle(1))));
    for (k, omega) in DIHEDRALS.iter().enumerate() {
        let parent = k + 2;
        let local = general_transform(bond(parent), angle(parent), omega.to_radians());
        frames.push(compose(&frames[parent], &local));
    }

    frames
        .iter()
        .enumerate()
        .map(|(k, frame)| Atom::new(NAMES[k % 3], k + 1, position_of(frame)))
        .collect()
}

#[test]
fn chain_with_mixed_dihedral_signs_is_recovered_up_to_mirror() {
    let atoms = mixed_dihedral_chain();
    assert_eq!(atoms.len(), 14);
    let restraints = derive_restraints(&atoms, f64::INFINITY);
    let input = ReconstructionInput::from_structure(atoms, restraints);

    let result = reconstruct::run(&input, &config(14), &ProgressReporter::new()).unwrap();

    assert_eq!(result.report.outcome, SearchOutcome::Completed { solutions: 2 });
    assert!(result.report.total_pruned() > 0);
    for solution in &result.solutions {
        assert_eq!(solution.len(), 14);
        assert!(solution.dme < 1e-9);
        assert_same_distances(&solution.positions(), &input.atoms);
    }
}

#[test]
fn restraint_within_tolerance_keeps_candidates() {
    // Realized 1-4 distance is 1.5·√3 ≈ 2.598076, so the error is about 0.00064.
    let atoms = right_angle_quad();
    let restraints: RestraintSet = [Restraint::new(1, 4, 2.6)].into_iter().collect();
    let input = ReconstructionInput::from_structure(atoms, restraints);

    let result = reconstruct::run(&input, &config(4), &ProgressReporter::new()).unwrap();

    assert_eq!(result.solutions.len(), 2);
    for solution in &result.solutions {
        assert!((solution.dme - 0.0006413).abs() < 1e-6);
    }
}

#[test]
fn restraint_beyond_tolerance_prunes_candidates() {
    // Error is about 0.00397, above the default tolerance of 0.001.
    let atoms = right_angle_quad();
    let restraints: RestraintSet = [Restraint::new(1, 4, 2.61)].into_iter().collect();
    let input = ReconstructionInput::from_structure(atoms, restraints);

    let result = reconstruct::run(&input, &config(4), &ProgressReporter::new()).unwrap();

    assert!(result.solutions.is_empty());
    assert_eq!(result.report.outcome, SearchOutcome::Completed { solutions: 0 });
    assert_eq!(result.report.levels[0].pruned, 2);
}

#[test]
fn total_prune_before_target_is_exhaustion() {
    let mut atoms = right_angle_quad();
    atoms.push(Atom::new("CA", 5, Point3::new(3.0, 1.5, 1.5)));
    let restraints: RestraintSet = [Restraint::new(1, 4, 2.61)].into_iter().collect();
    let input = ReconstructionInput::from_structure(atoms, restraints);

    let result = reconstruct::run(&input, &config(5), &ProgressReporter::new()).unwrap();

    assert!(result.solutions.is_empty());
    assert_eq!(result.report.outcome, SearchOutcome::Exhausted { depth: 4 });
}

#[test]
fn linear_chain_abandons_level_without_creating_nodes() {
    let atoms: Vec<_> = (0..5)
        .map(|k| Atom::new(NAMES[k % 3], k + 1, Point3::new(1.5 * k as f64, 0.0, 0.0)))
        .collect();
    let restraints: RestraintSet = [Restraint::new(1, 4, 4.5)].into_iter().collect();
    let input = ReconstructionInput::from_structure(atoms, restraints);

    let result = reconstruct::run(&input, &config(5), &ProgressReporter::new()).unwrap();

    assert_eq!(result.report.outcome, SearchOutcome::Exhausted { depth: 4 });
    assert_eq!(result.report.levels[0].geometry_failures, 1);
    assert_eq!(result.report.levels[0].created, 0);
    assert_eq!(result.tree.len(), 3);
}

#[test]
fn progress_reports_one_step_per_level() {
    let input = helix_input(6);
    let events = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
        events.lock().unwrap().push(event);
    }));

    reconstruct::run(&input, &config(6), &reporter).unwrap();
    drop(reporter);

    let events = events.into_inner().unwrap();
    assert!(events.contains(&Progress::TaskStart { total_steps: 3 }));
    let increments = events
        .iter()
        .filter(|e| matches!(e, Progress::TaskIncrement))
        .count();
    assert_eq!(increments, 3);
    assert!(events.iter().any(|e| matches!(
        e,
        Progress::LevelFinish {
            depth: 6,
            survivors: 2,
            ..
        }
    )));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Progress::SearchExhausted { .. })));
}

#[test]
fn exhaustion_is_reported_once_with_its_depth() {
    let mut atoms = right_angle_quad();
    atoms.push(Atom::new("CA", 5, Point3::new(3.0, 1.5, 1.5)));
    let restraints: RestraintSet = [Restraint::new(1, 4, 2.61)].into_iter().collect();
    let input = ReconstructionInput::from_structure(atoms, restraints);
    let events = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
        events.lock().unwrap().push(event);
    }));

    reconstruct::run(&input, &config(5), &reporter).unwrap();
    drop(reporter);

    let events = events.into_inner().unwrap();
    let level = events
        .iter()
        .position(|e| {
            *e == Progress::LevelFinish {
                depth: 4,
                survivors: 0,
                pruned: 2,
            }
        })
        .unwrap();
    assert_eq!(events[level + 1], Progress::SearchExhausted { depth: 4 });
    let exhaustions = events
        .iter()
        .filter(|e| matches!(e, Progress::SearchExhausted { .. }))
        .count();
    assert_eq!(exhaustions, 1);
}

#[test]
fn invalid_configuration_fails_before_search() {
    let input = helix_input(5);
    let config = SearchConfig {
        tolerance: 0.001,
        target_length: 3,
        min_separation: 3,
        ill_conditioning_threshold: 1e-6,
    };

    let err = reconstruct::run(&input, &config, &ProgressReporter::new()).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Config {
            source: ConfigError::InvalidTargetLength(3)
        }
    ));
}

#[test]
fn empty_restraints_fail_fast() {
    let atoms = helix(5);
    let input = ReconstructionInput::from_structure(atoms, RestraintSet::new());

    let err = reconstruct::run(&input, &config(5), &ProgressReporter::new()).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Input {
            source: InputError::EmptyRestraints
        }
    ));
}

#[test]
fn target_beyond_chain_fails_fast() {
    let input = helix_input(5);

    let err = reconstruct::run(&input, &config(6), &ProgressReporter::new()).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Input {
            source: InputError::TargetBeyondChain {
                target: 6,
                available: 5
            }
        }
    ));
}

#[test]
fn bonds_must_follow_chain_order() {
    let atoms = helix(5);
    let mut covalent = covalent_distances(&atoms);
    covalent.swap(1, 2);
    let restraints = derive_restraints(&atoms, f64::INFINITY);
    let input = ReconstructionInput::new(atoms, covalent, restraints);

    assert_eq!(
        input.validate(5),
        Err(InputError::CovalentOutOfOrder {
            position: 1,
            expected: (2, 3),
            found: (3, 4)
        })
    );
}

#[test]
fn restraint_with_zero_index_is_rejected() {
    let mut restraints = derive_restraints(&helix(5), f64::INFINITY);
    restraints.insert(Restraint {
        atom1: 5,
        atom2: 0,
        distance: 3.0,
    });
    let input = ReconstructionInput::from_structure(helix(5), restraints);

    let err = reconstruct::run(&input, &config(5), &ProgressReporter::new()).unwrap_err();

    assert!(matches!(
        err,
        EngineError::Input {
            source: InputError::InvalidRestraint {
                atom1: 0,
                atom2: 5,
                defect: RestraintDefect::ZeroIndex,
            }
        }
    ));
}

#[test]
fn restraint_between_bonded_atoms_is_rejected() {
    let mut restraints = derive_restraints(&helix(5), f64::INFINITY);
    restraints.insert(Restraint::new(3, 2, 1.5));
    let input = ReconstructionInput::from_structure(helix(5), restraints);

    assert_eq!(
        input.validate(5),
        Err(InputError::InvalidRestraint {
            atom1: 2,
            atom2: 3,
            defect: RestraintDefect::TooClose { separation: 1 },
        })
    );

    let mut self_pair = RestraintSet::new();
    self_pair.insert(Restraint::new(4, 4, 0.0));
    let input = ReconstructionInput::from_structure(helix(5), self_pair);
    assert!(matches!(
        input.validate(5),
        Err(InputError::InvalidRestraint {
            defect: RestraintDefect::TooClose { separation: 0 },
            ..
        })
    ));
}

#[test]
fn restraint_distance_must_be_positive_and_finite() {
    for distance in [f64::NAN, -2.0, 0.0, f64::INFINITY] {
        let restraints: RestraintSet = [Restraint::new(1, 4, distance)].into_iter().collect();
        let input = ReconstructionInput::from_structure(helix(5), restraints);

        assert!(
            matches!(
                input.validate(5),
                Err(InputError::InvalidRestraint {
                    atom1: 1,
                    atom2: 4,
                    defect: RestraintDefect::InvalidDistance(_),
                })
            ),
            "distance {distance} was accepted"
        );
    }
}

#[test]
fn restraint_beyond_chain_is_rejected() {
    let mut restraints = derive_restraints(&helix(5), f64::INFINITY);
    restraints.insert(Restraint::new(2, 9, 6.0));
    let input = ReconstructionInput::from_structure(helix(5), restraints);

    assert_eq!(
        input.validate(5),
        Err(InputError::RestraintOutOfRange {
            index: 9,
            chain_length: 5
        })
    );
}
