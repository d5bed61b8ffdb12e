use super::config::SearchConfig;
use super::error::EngineError;
use super::evaluator::ConsistencyEvaluator;
use super::progress::ProgressReporter;
use crate::core::models::distance::Distance;
use crate::core::models::restraint::RestraintSet;

/// Read-only view of everything a search level needs.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub config: &'a SearchConfig,
    /// Covalent bonds in chain order; entry `k` joins atoms `k + 1` and `k + 2`.
    pub covalent: &'a [Distance],
    pub restraints: &'a RestraintSet,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        config: &'a SearchConfig,
        covalent: &'a [Distance],
        restraints: &'a RestraintSet,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            config,
            covalent,
            restraints,
            reporter,
        }
    }

    pub fn evaluator(&self) -> ConsistencyEvaluator<'a> {
        ConsistencyEvaluator::new(self.restraints, self.config.min_separation)
    }

    /// The bonds joining atoms `1-2` and `2-3`.
    pub fn anchor_bonds(&self) -> Result<[&'a Distance; 2], EngineError> {
        match self.covalent {
            [first, second, ..] => Ok([first, second]),
            _ => Err(EngineError::Internal(format!(
                "anchor triplet needs two covalent bonds, found {}",
                self.covalent.len()
            ))),
        }
    }

    /// The three bonds ending at atom `index`: `(i-3, i-2)`, `(i-2, i-1)` and `(i-1, i)`.
    pub fn bonds_ending_at(&self, index: usize) -> Result<[&'a Distance; 3], EngineError> {
        index
            .checked_sub(4)
            .and_then(|start| self.covalent.get(start..start + 3))
            .map(|bonds| [&bonds[0], &bonds[1], &bonds[2]])
            .ok_or_else(|| {
                EngineError::Internal(format!(
                    "no covalent bonds to place atom {index} ({} available)",
                    self.covalent.len()
                ))
            })
    }
}
