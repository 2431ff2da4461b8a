//! Local transition rules: catalyzed bonding, decay and diffusion.
//!
//! All eligibility checks read the pre-step snapshot. The only state that
//! carries between cells within a step is the claim set, which stops a
//! cell from taking part in more than one event.

use crate::grid::Grid;
use autopoiesis_core::{BondState, Error, Occupant, Result, RuleConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Number of events of each rule family applied during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCounts {
    pub bondings: usize,
    pub decays: usize,
    pub diffusions: usize,
}

/// Cells already touched by an event this step
struct Claims {
    taken: Vec<bool>,
}

impl Claims {
    fn new(len: usize) -> Self {
        Self {
            taken: vec![false; len],
        }
    }

    fn is_free(&self, index: usize) -> bool {
        !self.taken[index]
    }

    fn claim(&mut self, index: usize) -> Result<()> {
        if self.taken[index] {
            return Err(Error::EngineInternal(format!(
                "cell {index} allocated twice in one step"
            )));
        }
        self.taken[index] = true;
        Ok(())
    }
}

/// Compute the next grid from `snapshot`.
///
/// `snapshot` is never modified. The returned grid still carries the bond
/// states of the snapshot; callers run [`Grid::refresh_bonds`] on it.
pub fn apply_rules(
    snapshot: &Grid,
    rules: &RuleConfig,
    rng: &mut ChaCha8Rng,
) -> Result<(Grid, RuleCounts)> {
    let mut next = snapshot.clone();
    let mut claims = Claims::new(snapshot.len());
    let mut counts = RuleCounts::default();

    let mut order: Vec<usize> = (0..snapshot.len()).collect();
    order.shuffle(rng);

    for &index in &order {
        if bond(snapshot, &mut next, &mut claims, rules, rng, index)? {
            counts.bondings += 1;
        }
    }

    for &index in &order {
        if decay(snapshot, &mut next, &mut claims, rules, rng, index)? {
            counts.decays += 1;
        }
    }

    for &index in &order {
        if diffuse(snapshot, &mut next, &mut claims, rules, rng, index)? {
            counts.diffusions += 1;
        }
    }

    Ok((next, counts))
}

fn bond(
    snapshot: &Grid,
    next: &mut Grid,
    claims: &mut Claims,
    rules: &RuleConfig,
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<bool> {
    if snapshot.occupant_at(index) != Occupant::Catalyst || !claims.is_free(index) {
        return Ok(false);
    }

    let substrates: Vec<usize> = snapshot
        .neighbor_indices(index)
        .into_iter()
        .filter(|&n| snapshot.occupant_at(n) == Occupant::Substrate && claims.is_free(n))
        .collect();

    if substrates.len() < usize::from(rules.min_substrates_for_bonding.max(2)) {
        return Ok(false);
    }
    if !rng.gen_bool(rules.catalysis_probability) {
        return Ok(false);
    }

    let pair: Vec<usize> = substrates.choose_multiple(rng, 2).copied().collect();
    claims.claim(index)?;
    for &n in &pair {
        claims.claim(n)?;
        next.set_at(n, Occupant::Link(BondState::Free));
    }

    trace!(
        catalyst = %snapshot.index_to_pos(index),
        first = %snapshot.index_to_pos(pair[0]),
        second = %snapshot.index_to_pos(pair[1]),
        "Substrate pair bonded"
    );
    Ok(true)
}

fn decay(
    snapshot: &Grid,
    next: &mut Grid,
    claims: &mut Claims,
    rules: &RuleConfig,
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<bool> {
    if !matches!(snapshot.occupant_at(index), Occupant::Link(_)) || !claims.is_free(index) {
        return Ok(false);
    }
    if !rng.gen_bool(rules.decay_probability) {
        return Ok(false);
    }

    claims.claim(index)?;
    next.set_at(index, Occupant::Substrate);

    trace!(position = %snapshot.index_to_pos(index), "Link decayed");
    Ok(true)
}

fn diffuse(
    snapshot: &Grid,
    next: &mut Grid,
    claims: &mut Claims,
    rules: &RuleConfig,
    rng: &mut ChaCha8Rng,
    index: usize,
) -> Result<bool> {
    let occupant = snapshot.occupant_at(index);
    if !rules.mobility.allows(occupant) || !claims.is_free(index) {
        return Ok(false);
    }

    let holes: Vec<usize> = snapshot
        .neighbor_indices(index)
        .into_iter()
        .filter(|&n| snapshot.occupant_at(n) == Occupant::Hole && claims.is_free(n))
        .collect();

    if holes.is_empty() || !rng.gen_bool(rules.diffusion_probability) {
        return Ok(false);
    }
    let Some(&target) = holes.choose(rng) else {
        return Ok(false);
    };

    claims.claim(index)?;
    claims.claim(target)?;
    next.set_at(target, occupant);
    next.set_at(index, Occupant::Hole);

    trace!(
        kind = %occupant.kind(),
        from = %snapshot.index_to_pos(index),
        to = %snapshot.index_to_pos(target),
        "Element diffused"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopoiesis_core::{MobilityConfig, Position};
    use rand::SeedableRng;

    fn rules(diffusion: f64, catalysis: f64, decay: f64) -> RuleConfig {
        RuleConfig {
            diffusion_probability: diffusion,
            catalysis_probability: catalysis,
            decay_probability: decay,
            ..RuleConfig::default()
        }
    }

    fn grid_with(size: i32, cells: &[(i32, i32, Occupant)]) -> Grid {
        let mut grid = Grid::new(size).unwrap();
        for &(x, y, occupant) in cells {
            grid.set(Position::new(x, y), occupant).unwrap();
        }
        grid.refresh_bonds();
        grid
    }

    #[test]
    fn test_claim_twice_is_internal_error() {
        let mut claims = Claims::new(4);
        claims.claim(2).unwrap();
        assert!(!claims.is_free(2));
        assert!(matches!(claims.claim(2), Err(Error::EngineInternal(_))));
    }

    #[test]
    fn test_snapshot_is_untouched() {
        let snapshot = grid_with(
            3,
            &[
                (1, 1, Occupant::Catalyst),
                (0, 1, Occupant::Substrate),
                (2, 1, Occupant::Substrate),
            ],
        );
        let before = snapshot.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let (next, counts) = apply_rules(&snapshot, &rules(1.0, 1.0, 0.0), &mut rng).unwrap();
        assert_eq!(snapshot, before);
        assert_eq!(counts.bondings, 1);
        assert_ne!(next, snapshot);
    }

    #[test]
    fn test_bonding_requires_threshold() {
        let snapshot = grid_with(
            3,
            &[
                (1, 1, Occupant::Catalyst),
                (0, 1, Occupant::Substrate),
                (2, 1, Occupant::Substrate),
            ],
        );
        let strict = RuleConfig {
            min_substrates_for_bonding: 3,
            ..rules(0.0, 1.0, 0.0)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let (next, counts) = apply_rules(&snapshot, &strict, &mut rng).unwrap();
        assert_eq!(counts.bondings, 0);
        assert_eq!(next, snapshot);
    }

    #[test]
    fn test_substrate_bonds_only_once() {
        // Both catalysts touch the centre substrate and one other. Whichever
        // fires first consumes the centre, leaving the other one short.
        let snapshot = grid_with(
            3,
            &[
                (0, 1, Occupant::Catalyst),
                (2, 1, Occupant::Catalyst),
                (1, 0, Occupant::Substrate),
                (1, 1, Occupant::Substrate),
                (1, 2, Occupant::Substrate),
                (0, 0, Occupant::Substrate),
                (2, 2, Occupant::Substrate),
            ],
        );

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (next, counts) =
                apply_rules(&snapshot, &rules(0.0, 1.0, 0.0), &mut rng).unwrap();
            let census = next.census();
            assert_eq!(census.links(), counts.bondings * 2);
            assert_eq!(census.chemical_units(), 5);
            assert_eq!(counts.bondings, 1);
        }
    }

    #[test]
    fn test_decay_with_certainty() {
        let snapshot = grid_with(
            3,
            &[
                (0, 0, Occupant::Link(BondState::Free)),
                (1, 0, Occupant::Link(BondState::Free)),
            ],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let (next, counts) = apply_rules(&snapshot, &rules(0.0, 0.0, 1.0), &mut rng).unwrap();
        assert_eq!(counts.decays, 2);
        assert_eq!(next.census().substrates, 2);
        assert_eq!(next.census().links(), 0);
    }

    #[test]
    fn test_decayed_link_does_not_diffuse() {
        let snapshot = grid_with(2, &[(0, 0, Occupant::Link(BondState::Free))]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let (next, counts) = apply_rules(&snapshot, &rules(1.0, 0.0, 1.0), &mut rng).unwrap();
        assert_eq!(counts.decays, 1);
        assert_eq!(counts.diffusions, 0);
        assert_eq!(next.occupant(Position::new(0, 0)), Some(Occupant::Substrate));
    }

    #[test]
    fn test_hole_consumed_once() {
        // Two substrates compete for the only hole between them
        let mut grid = Grid::new(3).unwrap();
        for i in 0..9 {
            grid.set_at(i, Occupant::Catalyst);
        }
        grid.set(Position::new(1, 0), Occupant::Hole).unwrap();
        grid.set(Position::new(0, 0), Occupant::Substrate).unwrap();
        grid.set(Position::new(2, 0), Occupant::Substrate).unwrap();

        let frozen_catalysts = RuleConfig {
            mobility: MobilityConfig {
                catalyst: false,
                ..MobilityConfig::default()
            },
            ..rules(1.0, 0.0, 0.0)
        };

        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (next, counts) = apply_rules(&grid, &frozen_catalysts, &mut rng).unwrap();
            assert_eq!(counts.diffusions, 1);
            assert_eq!(next.census().holes, 1);
            assert_eq!(next.occupant(Position::new(1, 0)), Some(Occupant::Substrate));
        }
    }

    #[test]
    fn test_bonded_links_hold_still() {
        let snapshot = grid_with(
            3,
            &[
                (0, 0, Occupant::from_kind(autopoiesis_core::ElementKind::Link)),
                (1, 0, Occupant::from_kind(autopoiesis_core::ElementKind::Link)),
            ],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let (next, counts) = apply_rules(&snapshot, &rules(1.0, 0.0, 0.0), &mut rng).unwrap();
        assert_eq!(counts.diffusions, 0);
        assert_eq!(next, snapshot);
    }
}
