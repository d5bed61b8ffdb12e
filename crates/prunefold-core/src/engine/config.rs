use thiserror::Error;

pub const DEFAULT_TOLERANCE: f64 = 0.001;
pub const DEFAULT_MIN_SEPARATION: usize = 3;
pub const DEFAULT_ILL_CONDITIONING_THRESHOLD: f64 = 1e-6;
/// The first three atoms are fixed anchors, so branching starts at the fourth.
pub const MIN_TARGET_LENGTH: usize = 4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Pruning tolerance must be finite and non-negative (got {0})")]
    InvalidTolerance(f64),
    #[error("Target chain length must be at least 4 (got {0})")]
    InvalidTargetLength(usize),
    #[error("Minimum ancestor separation must be at least 1 (got {0})")]
    InvalidMinSeparation(usize),
    #[error("Ill-conditioning threshold must be finite and non-negative (got {0})")]
    InvalidIllConditioningThreshold(f64),
}

/// Parameters of a branch-and-prune reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Largest distance matching error a candidate may carry and stay live.
    pub tolerance: f64,
    /// Number of atoms `N` the reconstructed chain must reach.
    pub target_length: usize,
    /// Ancestors closer than this many positions are not scored against a candidate.
    pub min_separation: usize,
    /// Below this value of `|sinθ₁·sinθ₂|` a recovered dihedral is flagged low-confidence.
    pub ill_conditioning_threshold: f64,
}

impl SearchConfig {
    /// Checks every parameter against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if self.target_length < MIN_TARGET_LENGTH {
            return Err(ConfigError::InvalidTargetLength(self.target_length));
        }
        if self.min_separation == 0 {
            return Err(ConfigError::InvalidMinSeparation(self.min_separation));
        }
        if !(self.ill_conditioning_threshold.is_finite() && self.ill_conditioning_threshold >= 0.0)
        {
            return Err(ConfigError::InvalidIllConditioningThreshold(
                self.ill_conditioning_threshold,
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct SearchConfigBuilder {
    tolerance: Option<f64>,
    target_length: Option<usize>,
    min_separation: Option<usize>,
    ill_conditioning_threshold: Option<f64>,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn target_length(mut self, length: usize) -> Self {
        self.target_length = Some(length);
        self
    }
    pub fn min_separation(mut self, separation: usize) -> Self {
        self.min_separation = Some(separation);
        self
    }
    pub fn ill_conditioning_threshold(mut self, threshold: f64) -> Self {
        self.ill_conditioning_threshold = Some(threshold);
        self
    }

    /// Assembles and validates the configuration.
    ///
    /// Unset optional parameters fall back to their defaults; `target_length` has none.
    pub fn build(self) -> Result<SearchConfig, ConfigError> {
        let config = SearchConfig {
            tolerance: self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            target_length: self
                .target_length
                .ok_or(ConfigError::MissingParameter("target_length"))?,
            min_separation: self.min_separation.unwrap_or(DEFAULT_MIN_SEPARATION),
            ill_conditioning_threshold: self
                .ill_conditioning_threshold
                .unwrap_or(DEFAULT_ILL_CONDITIONING_THRESHOLD),
        };
        config.validate()?;
        Ok(config)
    }
}
