//! Per-kind element counts.

use autopoiesis_core::{BondState, ElementKind, Occupant};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub holes: usize,
    pub substrates: usize,
    pub catalysts: usize,
    pub free_links: usize,
    pub singly_bonded_links: usize,
    pub doubly_bonded_links: usize,
}

impl Census {
    pub fn from_occupants<I>(occupants: I) -> Self
    where
        I: IntoIterator<Item = Occupant>,
    {
        let mut census = Census::default();
        for occupant in occupants {
            census.record(occupant);
        }
        census
    }

    fn record(&mut self, occupant: Occupant) {
        match occupant {
            Occupant::Hole => self.holes += 1,
            Occupant::Substrate => self.substrates += 1,
            Occupant::Catalyst => self.catalysts += 1,
            Occupant::Link(BondState::Free) => self.free_links += 1,
            Occupant::Link(BondState::SinglyBonded) => self.singly_bonded_links += 1,
            Occupant::Link(BondState::DoublyBonded) => self.doubly_bonded_links += 1,
        }
    }

    pub fn links(&self) -> usize {
        self.free_links + self.singly_bonded_links + self.doubly_bonded_links
    }

    /// Substrates plus links; bonding and decay only convert between the two
    pub fn chemical_units(&self) -> usize {
        self.substrates + self.links()
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Hole => self.holes,
            ElementKind::Substrate => self.substrates,
            ElementKind::Catalyst => self.catalysts,
            ElementKind::Link => self.links(),
        }
    }

    pub fn total(&self) -> usize {
        self.holes + self.catalysts + self.chemical_units()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_counts() {
        let census = Census::from_occupants([
            Occupant::Hole,
            Occupant::Hole,
            Occupant::Substrate,
            Occupant::Catalyst,
            Occupant::Link(BondState::Free),
            Occupant::Link(BondState::DoublyBonded),
        ]);

        assert_eq!(census.holes, 2);
        assert_eq!(census.count(ElementKind::Substrate), 1);
        assert_eq!(census.count(ElementKind::Link), 2);
        assert_eq!(census.chemical_units(), 3);
        assert_eq!(census.total(), 6);
    }
}
