//! Stepping loop that drives a world and forwards snapshots to a viewer.

use crate::census::Census;
use crate::factory::WorldFactory;
use crate::grid::Grid;
use crate::world::{StepReport, WorldContext};
use autopoiesis_core::{DriverConfig, Result, SimulationConfig};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Receives a grid snapshot after every completed step.
pub trait WorldViewer {
    fn update_view(&mut self, grid: &Grid, iteration: u64) -> Result<()>;
}

impl<V: WorldViewer + ?Sized> WorldViewer for Box<V> {
    fn update_view(&mut self, grid: &Grid, iteration: u64) -> Result<()> {
        (**self).update_view(grid, iteration)
    }
}

/// Viewer that discards every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NullViewer;

impl WorldViewer for NullViewer {
    fn update_view(&mut self, _grid: &Grid, _iteration: u64) -> Result<()> {
        Ok(())
    }
}

/// Totals for a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub iterations: u64,
    pub bondings: u64,
    pub decays: u64,
    pub diffusions: u64,
    pub census: Census,
}

pub struct Simulation<V> {
    world: WorldContext,
    viewer: V,
    driver: DriverConfig,
    bondings: u64,
    decays: u64,
    diffusions: u64,
}

impl<V: WorldViewer> Simulation<V> {
    pub fn new(config: &SimulationConfig, viewer: V) -> Result<Self> {
        let world = WorldFactory::new().create_world(config)?;
        Ok(Self::from_world(world, viewer, config.driver.clone()))
    }

    pub fn from_world(world: WorldContext, viewer: V, driver: DriverConfig) -> Self {
        Self {
            world,
            viewer,
            driver,
            bondings: 0,
            decays: 0,
            diffusions: 0,
        }
    }

    pub fn world(&self) -> &WorldContext {
        &self.world
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn into_viewer(self) -> V {
        self.viewer
    }

    /// Step the world once, then hand the new grid to the viewer.
    pub fn do_single_step(&mut self) -> Result<StepReport> {
        let report = self.world.step()?;
        self.bondings += report.events.bondings as u64;
        self.decays += report.events.decays as u64;
        self.diffusions += report.events.diffusions as u64;

        self.viewer
            .update_view(self.world.current_grid(), report.iteration)?;
        Ok(report)
    }

    /// Show the initial grid, then run `driver.steps` steps (forever when
    /// 0), pausing `driver.step_delay_ms` between them.
    #[instrument(skip(self), fields(steps = self.driver.steps))]
    pub fn run(&mut self) -> Result<SimulationResult> {
        info!(
            event = "run_started",
            steps = self.driver.steps,
            step_delay_ms = self.driver.step_delay_ms,
            "Starting simulation"
        );

        self.viewer
            .update_view(self.world.current_grid(), self.world.current_iteration())?;

        let delay = Duration::from_millis(self.driver.step_delay_ms);
        let mut completed = 0u64;
        while self.driver.steps == 0 || completed < self.driver.steps {
            if completed > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }

            let report = match self.do_single_step() {
                Ok(report) => report,
                Err(e) => {
                    warn!(
                        iteration = self.world.current_iteration(),
                        error = %e,
                        "Simulation stopped on step failure"
                    );
                    return Err(e);
                }
            };
            completed += 1;

            if self.driver.log_every > 0 && report.iteration % self.driver.log_every == 0 {
                self.emit_census(&report);
            }
        }

        let result = self.collect_results();
        info!(
            event = "run_complete",
            iterations = result.iterations,
            bondings = result.bondings,
            decays = result.decays,
            diffusions = result.diffusions,
            substrates = result.census.substrates,
            links = result.census.links(),
            "Simulation complete"
        );
        Ok(result)
    }

    fn emit_census(&self, report: &StepReport) {
        let census = &report.census;
        info!(
            event = "census",
            iteration = report.iteration,
            holes = census.holes,
            substrates = census.substrates,
            catalysts = census.catalysts,
            free_links = census.free_links,
            singly_bonded_links = census.singly_bonded_links,
            doubly_bonded_links = census.doubly_bonded_links,
            "Census snapshot"
        );
    }

    fn collect_results(&self) -> SimulationResult {
        SimulationResult {
            iterations: self.world.current_iteration(),
            bondings: self.bondings,
            decays: self.decays,
            diffusions: self.diffusions,
            census: self.world.census(),
        }
    }
}
