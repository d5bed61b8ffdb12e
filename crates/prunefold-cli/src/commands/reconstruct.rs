use crate::cli::ReconstructArgs;
use crate::config::build_reconstruct_config;
use crate::error::{CliError, Result};
use crate::utils::output::solution_path;
use crate::utils::progress::CliProgressHandler;
use prunefold::{
    core::io::{
        backbone::extract_backbone,
        pdb::PdbFile,
        restraints::{derive_restraints, load_restraints},
        traits::StructureFile,
    },
    engine::{progress::ProgressReporter, state::SearchOutcome},
    workflows::reconstruct::{self, ReconstructionInput},
};
use tracing::{info, warn};

pub fn run(args: ReconstructArgs) -> Result<()> {
    info!("Loading input structure from {:?}", &args.input);
    let atoms = PdbFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;
    let backbone = extract_backbone(&atoms);
    if backbone.is_empty() {
        return Err(CliError::Argument(format!(
            "No N-CA-C backbone found in {}",
            args.input.display()
        )));
    }

    info!("Merging configuration from file and CLI arguments...");
    let config = build_reconstruct_config(&args, backbone.len())?;

    let restraints = match &args.restraints {
        Some(path) => {
            info!("Loading restraints from {:?}", path);
            load_restraints(path)?
        }
        None => derive_restraints(&backbone, config.proximity_threshold),
    };

    let input = ReconstructionInput::from_structure(backbone, restraints);
    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Reconstructing {} of {} backbone atoms from {} restraints...",
        config.search.target_length,
        input.atoms.len(),
        input.restraints.len()
    );
    let result = reconstruct::run(&input, &config.search, &reporter)?;

    match result.report.outcome {
        SearchOutcome::Exhausted { depth } => {
            warn!(depth, "Search exhausted before reaching the target length.");
            println!(
                "Warning: every candidate was pruned at atom {depth}; no solution was written."
            );
            return Ok(());
        }
        SearchOutcome::Completed { solutions: 0 } => {
            warn!("Search completed but no candidate survived the final level.");
            println!("Warning: the search finished without any accepted solution.");
            return Ok(());
        }
        SearchOutcome::Completed { solutions } => {
            println!(
                "Search complete ({} nodes, {} pruned). Writing {} solution(s)...",
                result.report.nodes_created,
                result.report.total_pruned(),
                solutions
            );
        }
    }

    for (i, solution) in result.solutions.iter().enumerate() {
        let rank = i + 1;
        let output_path = solution_path(&args.output, rank);
        let drmsd = solution.distance_rmsd_to(&input.atoms);
        info!(
            rank,
            dme = solution.dme,
            ?drmsd,
            low_confidence = solution.low_confidence,
            "Writing solution to {:?}",
            &output_path
        );

        PdbFile::write_to_path(&solution.atoms, &output_path).map_err(|e| {
            CliError::FileWriting {
                path: output_path.clone(),
                source: e,
            }
        })?;

        let drmsd = drmsd.map_or_else(|| "n/a".to_string(), |d| format!("{d:.4} Å"));
        let flag = if solution.low_confidence {
            " [low confidence]"
        } else {
            ""
        };
        println!(
            "  Solution {} (DME: {:.6}, dRMSD to input: {}){} written to: {}",
            rank,
            solution.dme,
            drmsd,
            flag,
            output_path.display()
        );
    }

    Ok(())
}
