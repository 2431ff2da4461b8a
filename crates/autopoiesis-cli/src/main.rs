//! Command-line driver for the autopoiesis simulator.

mod config;
mod telemetry;
mod viewer;

use anyhow::Result;
use autopoiesis_core::SimulationConfig;
use autopoiesis_world::{NullViewer, Simulation, WorldViewer};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Run an autopoiesis cellular-automaton simulation.
#[derive(Parser, Debug)]
#[command(name = "autopoiesis", version)]
struct Args {
    /// JSON configuration file (default: config.json if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of steps to run, 0 runs until interrupted
    #[arg(long)]
    steps: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between steps in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Do not print the grid after each step
    #[arg(long)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(steps) = self.steps {
            config.driver.steps = steps;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.driver.step_delay_ms = delay_ms;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    telemetry::init_telemetry(args.json_logs)?;

    let mut config = config::resolve_config(args.config.as_deref())?;
    args.apply_overrides(&mut config);

    info!(
        seed = config.seed,
        size = config.world.size,
        steps = config.driver.steps,
        "Starting autopoiesis simulation"
    );

    let viewer: Box<dyn WorldViewer> = if args.quiet {
        Box::new(NullViewer)
    } else {
        Box::new(viewer::TextViewer::new(io::stdout().lock()))
    };

    let mut simulation = Simulation::new(&config, viewer)?;
    let result = simulation.run()?;

    info!(
        iterations = result.iterations,
        substrates = result.census.substrates,
        links = result.census.links(),
        "Finished"
    );
    Ok(())
}
