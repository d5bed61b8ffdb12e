use crate::cli::RestraintsArgs;
use crate::config::build_proximity_threshold;
use crate::error::{CliError, Result};
use prunefold::core::io::{
    backbone::extract_backbone,
    pdb::PdbFile,
    restraints::{derive_restraints, save_restraints},
    traits::StructureFile,
};
use tracing::info;

pub fn run(args: RestraintsArgs) -> Result<()> {
    let proximity = build_proximity_threshold(&args)?;

    info!("Loading input structure from {:?}", &args.input);
    let atoms = PdbFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;
    let backbone = extract_backbone(&atoms);

    let restraints = derive_restraints(&backbone, proximity);
    if restraints.is_empty() {
        return Err(CliError::Argument(format!(
            "No atom pair of {} lies within {proximity} Å",
            args.input.display()
        )));
    }
    save_restraints(&restraints, &args.output)?;

    println!(
        "✓ {} restraints (≤ {proximity} Å) over {} backbone atoms written to: {}",
        restraints.len(),
        backbone.len(),
        args.output.display()
    );
    Ok(())
}
