//! Construction of the initial world from configuration.

use crate::grid::{Grid, MAX_GRID_SIZE};
use crate::world::WorldContext;
use autopoiesis_core::{
    ElementKind, Error, Occupant, Position, Result, RuleConfig, SimulationConfig, WorldConfig,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Builds [`WorldContext`]s from a [`SimulationConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldFactory;

impl WorldFactory {
    pub fn new() -> Self {
        Self
    }

    /// Validate `config`, lay out the grid and seed the world's random
    /// source. The same config always yields the same world.
    #[instrument(skip(self, config), fields(size = config.world.size, seed = config.seed))]
    pub fn create_world(&self, config: &SimulationConfig) -> Result<WorldContext> {
        validate_world(&config.world)?;
        validate_rules(&config.rules)?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = layout(&config.world, &mut rng)?;
        let census = grid.census();

        info!(
            event = "world_created",
            size = grid.size(),
            substrates = census.substrates,
            catalysts = census.catalysts,
            links = census.links(),
            holes = census.holes,
            "World created"
        );

        Ok(WorldContext::new(grid, config.rules.clone(), rng))
    }
}

fn validate_world(world: &WorldConfig) -> Result<()> {
    if world.size <= 0 {
        return Err(Error::InvalidConfiguration(format!(
            "grid size must be positive, got {}",
            world.size
        )));
    }
    if world.size > MAX_GRID_SIZE {
        return Err(Error::InvalidConfiguration(format!(
            "grid size {} exceeds the maximum of {MAX_GRID_SIZE}",
            world.size
        )));
    }

    let capacity = (world.size as u64) * (world.size as u64);
    if world.requested_cells() > capacity {
        return Err(Error::InvalidConfiguration(format!(
            "{} elements requested but a grid of size {} only has {capacity} cells",
            world.requested_cells(),
            world.size
        )));
    }

    let mut seen = HashSet::new();
    for placement in &world.placements {
        let pos = Position::new(placement.x, placement.y);
        if !pos.in_bounds(world.size) {
            return Err(Error::InvalidConfiguration(format!(
                "{} placed at {pos} is outside a grid of size {}",
                placement.kind, world.size
            )));
        }
        if !seen.insert(pos) {
            return Err(Error::InvalidConfiguration(format!(
                "more than one element placed at {pos}"
            )));
        }
    }

    Ok(())
}

fn validate_rules(rules: &RuleConfig) -> Result<()> {
    let probabilities = [
        ("diffusion_probability", rules.diffusion_probability),
        ("catalysis_probability", rules.catalysis_probability),
        ("decay_probability", rules.decay_probability),
    ];
    for (name, value) in probabilities {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::InvalidConfiguration(format!(
                "{name} must be between 0 and 1, got {value}"
            )));
        }
    }

    if !(2..=4).contains(&rules.min_substrates_for_bonding) {
        return Err(Error::InvalidConfiguration(format!(
            "min_substrates_for_bonding must be between 2 and 4, got {}",
            rules.min_substrates_for_bonding
        )));
    }

    Ok(())
}

/// Explicit placements first, then counted elements scattered over the
/// remaining cells. Everything else stays a hole.
fn layout(world: &WorldConfig, rng: &mut ChaCha8Rng) -> Result<Grid> {
    let mut grid = Grid::new(world.size)?;
    let mut pinned = HashSet::new();

    for placement in &world.placements {
        let pos = Position::new(placement.x, placement.y);
        grid.set(pos, Occupant::from_kind(placement.kind))?;
        pinned.insert(pos);
    }

    let mut free: Vec<Position> = grid.positions().filter(|p| !pinned.contains(p)).collect();
    free.shuffle(rng);

    let counts = &world.counts;
    let scattered = [
        (ElementKind::Substrate, counts.substrate),
        (ElementKind::Catalyst, counts.catalyst),
        (ElementKind::Link, counts.link),
    ];
    let mut slots = free.into_iter();
    for (kind, count) in scattered {
        for _ in 0..count {
            let pos = slots.next().ok_or_else(|| {
                Error::InvalidConfiguration(format!("no free cell left for {kind}"))
            })?;
            grid.set(pos, Occupant::from_kind(kind))?;
        }
    }

    grid.refresh_bonds();
    grid.verify()?;
    Ok(grid)
}
