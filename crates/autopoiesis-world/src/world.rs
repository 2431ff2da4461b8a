//! The world context: grid, rules, random source and iteration counter.

use crate::census::Census;
use crate::grid::Grid;
use crate::rules::{self, RuleCounts};
use autopoiesis_core::{Error, Result, RuleConfig};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Outcome of one completed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Iteration reached by this step (1 after the first step)
    pub iteration: u64,
    pub events: RuleCounts,
    pub census: Census,
}

/// Exclusive owner of the simulation state.
///
/// Built by [`WorldFactory`](crate::WorldFactory). Each call to
/// [`step`](Self::step) either commits a whole generation or leaves the
/// grid, the iteration counter and the random source as they were.
#[derive(Debug, Clone)]
pub struct WorldContext {
    grid: Grid,
    rules: RuleConfig,
    rng: ChaCha8Rng,
    iteration: u64,
}

impl WorldContext {
    pub(crate) fn new(grid: Grid, rules: RuleConfig, rng: ChaCha8Rng) -> Self {
        Self {
            grid,
            rules,
            rng,
            iteration: 0,
        }
    }

    /// Read-only snapshot of the grid
    pub fn current_grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_iteration(&self) -> u64 {
        self.iteration
    }

    pub fn census(&self) -> Census {
        self.grid.census()
    }

    /// Advance the world by exactly one generation.
    pub fn step(&mut self) -> Result<StepReport> {
        let mut rng = self.rng.clone();
        let before = self.grid.census();

        let (mut next, events) = rules::apply_rules(&self.grid, &self.rules, &mut rng)?;
        next.refresh_bonds();

        let census = match verify_step(&before, &next) {
            Ok(census) => census,
            Err(e) => {
                error!(
                    iteration = self.iteration,
                    error = %e,
                    "Step discarded, keeping previous grid"
                );
                return Err(e);
            }
        };

        self.grid = next;
        self.rng = rng;
        self.iteration += 1;

        debug!(
            iteration = self.iteration,
            bondings = events.bondings,
            decays = events.decays,
            diffusions = events.diffusions,
            substrates = census.substrates,
            links = census.links(),
            "Step complete"
        );

        Ok(StepReport {
            iteration: self.iteration,
            events,
            census,
        })
    }
}

/// Check a candidate grid against the census of the grid it came from.
fn verify_step(before: &Census, next: &Grid) -> Result<Census> {
    next.verify()?;

    let after = next.census();
    if after.chemical_units() != before.chemical_units() {
        return Err(Error::EngineInternal(format!(
            "substrate and link total changed from {} to {}",
            before.chemical_units(),
            after.chemical_units()
        )));
    }
    if after.catalysts != before.catalysts {
        return Err(Error::EngineInternal(format!(
            "catalyst count changed from {} to {}",
            before.catalysts, after.catalysts
        )));
    }
    if after.holes != before.holes {
        return Err(Error::EngineInternal(format!(
            "hole count changed from {} to {}",
            before.holes, after.holes
        )));
    }

    Ok(after)
}
