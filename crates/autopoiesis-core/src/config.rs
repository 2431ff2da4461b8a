//! Configuration types for the simulation.

use crate::types::{ElementKind, Occupant};
use serde::{Deserialize, Serialize};

/// Initial layout of the world grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub size: i32,
    /// Elements scattered at random over the cells left after placements
    pub counts: ElementCounts,
    /// Elements pinned to explicit positions, applied before `counts`
    pub placements: Vec<Placement>,
}

/// An empty 10×10 grid. Omitted `counts` and `placements` stay empty, so a
/// partial `world` block never inherits elements sized for another grid.
impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: 10,
            counts: ElementCounts::default(),
            placements: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Number of non-hole cells the layout asks for
    pub fn requested_cells(&self) -> u64 {
        self.counts.total() + self.placements.len() as u64
    }
}

/// Randomly placed element counts. Holes fill whatever remains.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementCounts {
    pub substrate: u32,
    pub catalyst: u32,
    pub link: u32,
}

impl ElementCounts {
    pub fn total(&self) -> u64 {
        self.substrate as u64 + self.catalyst as u64 + self.link as u64
    }
}

/// One element at a fixed position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: ElementKind,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(kind: ElementKind, x: i32, y: i32) -> Self {
        Self { kind, x, y }
    }
}

/// Transition rule parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Chance that a mobile element swaps with an adjacent hole (0.0 to 1.0)
    pub diffusion_probability: f64,
    /// Chance that a catalyst bonds a pair of adjacent substrates (0.0 to 1.0)
    pub catalysis_probability: f64,
    /// Chance that a link reverts to substrate (0.0 to 1.0)
    pub decay_probability: f64,
    /// Substrates a catalyst must touch before it can bond a pair (2 to 4)
    pub min_substrates_for_bonding: u8,
    /// Which elements take part in diffusion
    pub mobility: MobilityConfig,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            diffusion_probability: 0.5,
            catalysis_probability: 0.5,
            decay_probability: 0.01,
            min_substrates_for_bonding: 2,
            mobility: MobilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobilityConfig {
    pub substrate: bool,
    pub catalyst: bool,
    /// Links with no bonds
    pub free_link: bool,
    /// Links bonded to at least one neighbouring link
    pub bonded_link: bool,
}

impl MobilityConfig {
    /// Whether `occupant` may swap places with an adjacent hole
    pub fn allows(&self, occupant: Occupant) -> bool {
        match occupant {
            Occupant::Hole => false,
            Occupant::Substrate => self.substrate,
            Occupant::Catalyst => self.catalyst,
            Occupant::Link(state) if state.is_bonded() => self.bonded_link,
            Occupant::Link(_) => self.free_link,
        }
    }
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            substrate: true,
            catalyst: true,
            free_link: true,
            bonded_link: false,
        }
    }
}

/// Settings for the stepping loop around the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Number of steps to run, 0 runs until interrupted
    pub steps: u64,
    /// Pause between steps (milliseconds)
    pub step_delay_ms: u64,
    /// Emit a census log line every N steps, 0 disables
    pub log_every: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            step_delay_ms: 1000,
            log_every: 10,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub world: WorldConfig,
    pub rules: RuleConfig,
    pub driver: DriverConfig,
}

/// 40 substrates around a single catalyst on a 10×10 grid
impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldConfig {
                counts: ElementCounts {
                    substrate: 40,
                    ..ElementCounts::default()
                },
                placements: vec![Placement::new(ElementKind::Catalyst, 5, 5)],
                ..WorldConfig::default()
            },
            rules: RuleConfig::default(),
            driver: DriverConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.seed, 0);
        assert_eq!(config.world.size, 10);
        assert_eq!(config.world.requested_cells(), 41);
        assert_eq!(config.rules.min_substrates_for_bonding, 2);
        assert!(!config.rules.mobility.bonded_link);
        assert_eq!(config.driver.step_delay_ms, 1000);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "seed": 7,
            "world": {
                "size": 3,
                "placements": [
                    { "kind": "catalyst", "x": 1, "y": 1 },
                    { "kind": "substrate", "x": 0, "y": 1 }
                ]
            },
            "rules": { "catalysis_probability": 1.0 }
        }"#;

        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world.size, 3);
        assert_eq!(config.world.counts, ElementCounts::default());
        assert_eq!(config.world.placements.len(), 2);
        assert_eq!(config.world.placements[1].kind, ElementKind::Substrate);
        assert_eq!(config.rules.catalysis_probability, 1.0);
        assert_eq!(config.rules.decay_probability, RuleConfig::default().decay_probability);
        assert_eq!(config.driver, DriverConfig::default());
    }

    #[test]
    fn test_partial_world_block_starts_empty() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{ "world": { "size": 4 } }"#).unwrap();
        assert_eq!(config.world.size, 4);
        assert_eq!(config.world.requested_cells(), 0);

        let config: SimulationConfig = serde_json::from_str(r#"{ "seed": 1 }"#).unwrap();
        assert_eq!(config.world, SimulationConfig::default().world);
    }

    #[test]
    fn test_mobility_policy() {
        use crate::types::BondState;

        let mobility = MobilityConfig::default();
        assert!(!mobility.allows(Occupant::Hole));
        assert!(mobility.allows(Occupant::Substrate));
        assert!(mobility.allows(Occupant::Catalyst));
        assert!(mobility.allows(Occupant::Link(BondState::Free)));
        assert!(!mobility.allows(Occupant::Link(BondState::SinglyBonded)));
        assert!(!mobility.allows(Occupant::Link(BondState::DoublyBonded)));

        let frozen = MobilityConfig {
            catalyst: false,
            ..MobilityConfig::default()
        };
        assert!(!frozen.allows(Occupant::Catalyst));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let json = r#"{ "world": { "placements": [ { "kind": "enzyme", "x": 0, "y": 0 } ] } }"#;
        assert!(serde_json::from_str::<SimulationConfig>(json).is_err());
    }
}
