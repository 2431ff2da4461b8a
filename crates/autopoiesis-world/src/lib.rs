//! World simulation engine.
//!
//! This module implements the bounded 2D grid where substrates, catalysts
//! and links diffuse, bond and decay.

pub mod census;
pub mod factory;
pub mod grid;
pub mod rules;
pub mod simulation;
pub mod world;

pub use census::Census;
pub use factory::WorldFactory;
pub use grid::Grid;
pub use rules::RuleCounts;
pub use simulation::{NullViewer, Simulation, SimulationResult, WorldViewer};
pub use world::{StepReport, WorldContext};
