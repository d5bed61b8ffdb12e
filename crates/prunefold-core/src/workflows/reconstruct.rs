use crate::core::io::backbone::covalent_distances;
use crate::core::models::atom::Atom;
use crate::core::models::clique::Clique;
use crate::core::models::distance::Distance;
use crate::core::models::ids::NodeId;
use crate::core::models::restraint::RestraintSet;
use crate::core::utils::geometry::Confidence;
use crate::engine::config::SearchConfig;
use crate::engine::context::SearchContext;
use crate::engine::error::{EngineError, InputError};
use crate::engine::placement::Moment;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::{LevelStats, SearchOutcome, SearchReport, Solution};
use crate::engine::tasks;
use crate::engine::tree::PlacementTree;
use tracing::{debug, info, instrument, warn};

/// The chain and distance data a reconstruction starts from.
#[derive(Debug, Clone)]
pub struct ReconstructionInput {
    /// Backbone atoms in chain order, indexed contiguously from 1.
    pub atoms: Vec<Atom>,
    /// One bond per consecutive pair; entry `k` joins atoms `k + 1` and `k + 2`.
    pub covalent: Vec<Distance>,
    /// Sparse long-range restraints used for pruning.
    pub restraints: RestraintSet,
}

impl ReconstructionInput {
    pub fn new(atoms: Vec<Atom>, covalent: Vec<Distance>, restraints: RestraintSet) -> Self {
        Self {
            atoms,
            covalent,
            restraints,
        }
    }

    /// Takes the covalent bonds from the atoms' own positions.
    pub fn from_structure(atoms: Vec<Atom>, restraints: RestraintSet) -> Self {
        let covalent = covalent_distances(&atoms);
        Self::new(atoms, covalent, restraints)
    }

    /// Checks that the chain, bonds and restraints describe the same chain and reach
    /// `target_length`.
    ///
    /// Every restraint must join two non-bonded atoms of the chain at a positive distance.
    pub fn validate(&self, target_length: usize) -> Result<(), InputError> {
        if self.atoms.is_empty() {
            return Err(InputError::EmptyChain);
        }
        for (position, atom) in self.atoms.iter().enumerate() {
            if atom.index() != position + 1 {
                return Err(InputError::NonContiguousIndex {
                    position,
                    expected: position + 1,
                    found: atom.index(),
                });
            }
        }

        let expected = self.atoms.len() - 1;
        if self.covalent.len() != expected {
            return Err(InputError::CovalentCountMismatch {
                expected,
                found: self.covalent.len(),
            });
        }
        for (position, bond) in self.covalent.iter().enumerate() {
            let expected = (position + 1, position + 2);
            if bond.indices() != expected {
                return Err(InputError::CovalentOutOfOrder {
                    position,
                    expected,
                    found: bond.indices(),
                });
            }
        }

        if self.restraints.is_empty() {
            return Err(InputError::EmptyRestraints);
        }
        for r in self.restraints.iter() {
            r.check().map_err(|defect| InputError::InvalidRestraint {
                atom1: r.atom1,
                atom2: r.atom2,
                defect,
            })?;
        }
        if let Some(index) = self
            .restraints
            .max_index()
            .filter(|&index| index > self.atoms.len())
        {
            return Err(InputError::RestraintOutOfRange {
                index,
                chain_length: self.atoms.len(),
            });
        }

        if target_length > self.atoms.len() {
            return Err(InputError::TargetBeyondChain {
                target: target_length,
                available: self.atoms.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ReconstructionResult {
    /// Accepted chains, lowest distance matching error first.
    pub solutions: Vec<Solution>,
    pub report: SearchReport,
    /// The full search tree, pruned nodes included.
    pub tree: PlacementTree,
}

/// Reconstructs backbone conformations consistent with the input distances.
///
/// Configuration and input problems fail before any node is created. After that, nothing
/// is fatal: geometry failures and pruning shrink the frontier, and a frontier that empties
/// early ends the search with [`SearchOutcome::Exhausted`].
#[instrument(skip_all, name = "reconstruction_workflow")]
pub fn run(
    input: &ReconstructionInput,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<ReconstructionResult, EngineError> {
    config.validate()?;
    input.validate(config.target_length)?;
    let context = SearchContext::new(config, &input.covalent, &input.restraints, reporter);

    // === Phase 1: Anchor triplet ===
    reporter.report(Progress::PhaseStart { name: "Anchoring" });
    let mut tree = PlacementTree::new();
    let [first, second] = context.anchor_bonds()?;
    let anchor = Clique::new(first.clone(), second.clone())
        .map_err(|source| EngineError::Anchor { source })?;
    let mut frontier = vec![tree.initialize(&anchor)?];
    info!(
        atoms = input.atoms.len(),
        restraints = input.restraints.len(),
        target = config.target_length,
        tolerance = config.tolerance,
        "Anchored first three atoms; starting branch-and-prune search."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Growth levels ===
    reporter.report(Progress::PhaseStart {
        name: "Branch and prune",
    });
    reporter.report(Progress::TaskStart {
        total_steps: (config.target_length - 3) as u64,
    });

    let mut levels = Vec::new();
    let mut outcome = None;
    for depth in 4..=config.target_length {
        let stats = grow_level(&mut tree, &mut frontier, depth, &context)?;
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::LevelFinish {
            depth,
            survivors: stats.survivors,
            pruned: stats.pruned,
        });
        levels.push(stats);

        if frontier.is_empty() && depth < config.target_length {
            warn!(depth, "Every candidate was pruned before the target length.");
            reporter.report(Progress::SearchExhausted { depth });
            outcome = Some(SearchOutcome::Exhausted { depth });
            break;
        }
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Collection ===
    let solutions = tasks::collection::run(&tree, &frontier)?;
    let outcome = outcome.unwrap_or(SearchOutcome::Completed {
        solutions: solutions.len(),
    });
    let report = SearchReport {
        outcome,
        levels,
        nodes_created: tree.len(),
    };

    info!(
        ?outcome,
        nodes = report.nodes_created,
        pruned = report.total_pruned(),
        "Reconstruction finished."
    );
    Ok(ReconstructionResult {
        solutions,
        report,
        tree,
    })
}

/// Expands and judges one level, replacing `frontier` with the survivors.
fn grow_level(
    tree: &mut PlacementTree,
    frontier: &mut Vec<NodeId>,
    depth: usize,
    context: &SearchContext,
) -> Result<LevelStats, EngineError> {
    let mut stats = LevelStats {
        depth,
        frontier: frontier.len(),
        ..Default::default()
    };

    let [a, b, c] = context.bonds_ending_at(depth)?;
    let geometry = match Moment::from_bonds(a, b, c)
        .and_then(|moment| moment.local_geometry(context.config.ill_conditioning_threshold))
    {
        Ok(geometry) => geometry,
        Err(error) => {
            warn!(
                depth,
                parents = frontier.len(),
                %error,
                "Cannot recover geometry for this level; abandoning frontier."
            );
            context.reporter.report(Progress::Message(format!(
                "atom {depth}: {error}; {} parent(s) abandoned",
                frontier.len()
            )));
            for &parent in frontier.iter() {
                tree.mark_evaluated(parent)?;
            }
            stats.geometry_failures = frontier.len();
            frontier.clear();
            return Ok(stats);
        }
    };

    if geometry.confidence == Confidence::Low {
        stats.low_confidence = true;
        warn!(
            depth,
            dihedral = geometry.dihedral,
            "Dihedral recovered from a nearly linear clique; marking candidates low-confidence."
        );
        context.reporter.report(Progress::Message(format!(
            "atom {depth}: nearly linear clique, candidates marked low-confidence"
        )));
    }

    let pending = tasks::expansion::run(tree, frontier, &geometry)?;
    stats.created = 2 * pending.len();
    let summary = tasks::pruning::run(tree, &pending, context)?;
    stats.pruned = summary.pruned;
    stats.survivors = summary.survivors.len();

    debug!(
        depth,
        created = stats.created,
        pruned = stats.pruned,
        survivors = stats.survivors,
        "Level complete."
    );
    *frontier = summary.survivors;
    Ok(stats)
}
