use crate::cli::{ReconstructArgs, RestraintsArgs};
use crate::error::{CliError, Result};
use prunefold::engine::config::{self as core_config, SearchConfig, SearchConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub struct DefaultsConfig {
    pub tolerance: f64,
    pub min_separation: usize,
    pub ill_conditioning_threshold: f64,
    pub proximity_threshold: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tolerance: core_config::DEFAULT_TOLERANCE,
            min_separation: core_config::DEFAULT_MIN_SEPARATION,
            ill_conditioning_threshold: core_config::DEFAULT_ILL_CONDITIONING_THRESHOLD,
            proximity_threshold: 5.0,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct FileSearchConfig {
    tolerance: Option<f64>,
    #[serde(rename = "target-length")]
    target_length: Option<usize>,
    #[serde(rename = "min-separation")]
    min_separation: Option<usize>,
    #[serde(rename = "ill-conditioning-threshold")]
    ill_conditioning_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct FileRestraintsConfig {
    #[serde(rename = "proximity-threshold")]
    proximity_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    search: Option<FileSearchConfig>,
    restraints: Option<FileRestraintsConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Everything the `reconstruct` command needs once flags, file and defaults are merged.
#[derive(Debug, Clone)]
pub struct ReconstructConfig {
    pub search: SearchConfig,
    pub proximity_threshold: f64,
}

/// Merges CLI flags over the configuration file over built-in defaults.
///
/// `chain_length` stands in for the target length when neither the flags nor the file
/// name one.
pub fn build_reconstruct_config(
    args: &ReconstructArgs,
    chain_length: usize,
) -> Result<ReconstructConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = FileConfig::load(args.config.as_deref())?;
    let search_file = file_config.search.unwrap_or_default();

    let target_length = args
        .target_length
        .or(search_file.target_length)
        .unwrap_or(chain_length);

    let search = SearchConfigBuilder::new()
        .tolerance(
            args.tolerance
                .or(search_file.tolerance)
                .unwrap_or(defaults.tolerance),
        )
        .target_length(target_length)
        .min_separation(
            args.min_separation
                .or(search_file.min_separation)
                .unwrap_or(defaults.min_separation),
        )
        .ill_conditioning_threshold(
            args.ill_conditioning_threshold
                .or(search_file.ill_conditioning_threshold)
                .unwrap_or(defaults.ill_conditioning_threshold),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let proximity_threshold = merge_proximity(
        args.proximity,
        file_config.restraints.unwrap_or_default(),
        &defaults,
    )?;

    Ok(ReconstructConfig {
        search,
        proximity_threshold,
    })
}

/// Resolves the proximity threshold for the `restraints` command.
pub fn build_proximity_threshold(args: &RestraintsArgs) -> Result<f64> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    merge_proximity(
        args.proximity,
        file_config.restraints.unwrap_or_default(),
        &DefaultsConfig::default(),
    )
}

fn merge_proximity(
    cli: Option<f64>,
    file: FileRestraintsConfig,
    defaults: &DefaultsConfig,
) -> Result<f64> {
    let threshold = cli
        .or(file.proximity_threshold)
        .unwrap_or(defaults.proximity_threshold);
    if !(threshold.is_finite() && threshold > 0.0) {
        return Err(CliError::Config(format!(
            "Proximity threshold must be finite and positive (got {threshold})"
        )));
    }
    Ok(threshold)
}
