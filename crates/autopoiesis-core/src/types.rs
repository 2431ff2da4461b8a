//! Core type definitions for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether the position lies inside a `size`×`size` grid
    pub fn in_bounds(&self, size: i32) -> bool {
        (0..size).contains(&self.x) && (0..size).contains(&self.y)
    }

    /// Von-Neumann neighbours clipped at the grid boundary (never wrapped).
    pub fn neighbors(&self, size: i32) -> Vec<Position> {
        Direction::all()
            .iter()
            .map(|dir| {
                let (dx, dy) = dir.to_delta();
                self.add(dx, dy)
            })
            .filter(|p| p.in_bounds(size))
            .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The 4-connected neighbourhood of `p` inside a `size`×`size` grid.
///
/// Interior cells have 4 neighbours, edge cells 3, corners 2 and the
/// single cell of a 1×1 grid none. The order is fixed (west, east,
/// north, south) but callers should treat the result as a set.
pub fn neighbors(p: Position, size: i32) -> Vec<Position> {
    p.neighbors(size)
}

/// Direction for movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }

    pub fn all() -> [Direction; 4] {
        [
            Direction::West,
            Direction::East,
            Direction::North,
            Direction::South,
        ]
    }
}

/// Discriminator for the chemical species held by a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Hole,
    Substrate,
    Catalyst,
    Link,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Hole => "hole",
            ElementKind::Substrate => "substrate",
            ElementKind::Catalyst => "catalyst",
            ElementKind::Link => "link",
        };
        f.write_str(name)
    }
}

/// How many neighbouring Links a Link is bonded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondState {
    Free,
    SinglyBonded,
    DoublyBonded,
}

impl BondState {
    /// A Link carries at most two bonds, so three or four adjacent Links
    /// still count as doubly bonded.
    pub fn from_link_neighbors(count: usize) -> Self {
        match count {
            0 => BondState::Free,
            1 => BondState::SinglyBonded,
            _ => BondState::DoublyBonded,
        }
    }

    pub fn is_bonded(&self) -> bool {
        !matches!(self, BondState::Free)
    }
}

/// What occupies a cell. Links carry their derived bond state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Hole,
    Substrate,
    Catalyst,
    Link(BondState),
}

impl Occupant {
    /// Occupant for a freshly placed element of `kind`; Links start free
    /// until the grid derives their bonds.
    pub fn from_kind(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Hole => Occupant::Hole,
            ElementKind::Substrate => Occupant::Substrate,
            ElementKind::Catalyst => Occupant::Catalyst,
            ElementKind::Link => Occupant::Link(BondState::Free),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Occupant::Hole => ElementKind::Hole,
            Occupant::Substrate => ElementKind::Substrate,
            Occupant::Catalyst => ElementKind::Catalyst,
            Occupant::Link(_) => ElementKind::Link,
        }
    }

    pub fn bond_state(&self) -> Option<BondState> {
        match self {
            Occupant::Link(state) => Some(*state),
            _ => None,
        }
    }
}

/// A cell of the world: its position, the grid extent and its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Element {
    position: Position,
    size: i32,
    occupant: Occupant,
}

impl Element {
    /// Fails with [`Error::InvalidPosition`] unless `0 <= x, y < size`.
    pub fn new(position: Position, size: i32, occupant: Occupant) -> Result<Self> {
        if !position.in_bounds(size) {
            return Err(Error::InvalidPosition {
                x: position.x,
                y: position.y,
                size,
            });
        }
        Ok(Self {
            position,
            size,
            occupant,
        })
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn occupant(&self) -> Occupant {
        self.occupant
    }

    pub fn kind(&self) -> ElementKind {
        self.occupant.kind()
    }

    /// `Some` for Links only
    pub fn bond_state(&self) -> Option<BondState> {
        self.occupant.bond_state()
    }

    pub fn neighbor_positions(&self) -> Vec<Position> {
        self.position.neighbors(self.size)
    }

    /// Replace what sits in this cell. The position never changes.
    pub fn set_occupant(&mut self, occupant: Occupant) {
        self.occupant = occupant;
    }
}
