use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Charles M. Whitehead",
    version,
    about = "prunefold CLI - Reconstruct protein backbone conformations from sparse distance restraints by branch and prune.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the backbone of a structure from its covalent geometry and distance restraints.
    Reconstruct(ReconstructArgs),
    /// Derive a restraint table from a structure and write it as CSV.
    Restraints(RestraintsArgs),
}

/// Arguments for the `reconstruct` subcommand.
#[derive(Args, Debug)]
pub struct ReconstructArgs {
    // --- Core Arguments ---
    /// Path to the input structure in PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output path for the solutions. Each solution is written with its rank
    /// appended to the file stem (e.g., out.pdb -> out_1.pdb, out_2.pdb).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read long-range restraints from a CSV table (atom1,atom2,distance)
    /// instead of deriving them from the input structure.
    #[arg(short, long, value_name = "PATH")]
    pub restraints: Option<PathBuf>,

    // --- Search Overrides ---
    /// Override the distance matching error tolerance.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Number of atoms to place. Defaults to the whole backbone.
    #[arg(short = 'n', long, value_name = "INT")]
    pub target_length: Option<usize>,

    /// Override the minimum sequence separation of restraints used for scoring.
    #[arg(long, value_name = "INT")]
    pub min_separation: Option<usize>,

    /// Override the sin(θ1)·sin(θ2) value below which a dihedral is flagged low-confidence.
    #[arg(long, value_name = "FLOAT")]
    pub ill_conditioning_threshold: Option<f64>,

    // --- Restraint Overrides ---
    /// Override the proximity threshold (Å) used when deriving restraints.
    #[arg(short, long, value_name = "FLOAT")]
    pub proximity: Option<f64>,
}

/// Arguments for the `restraints` subcommand.
#[derive(Args, Debug)]
pub struct RestraintsArgs {
    /// Path to the input structure in PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the CSV restraint table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the proximity threshold (Å) used when deriving restraints.
    #[arg(short, long, value_name = "FLOAT")]
    pub proximity: Option<f64>,
}
