//! 2D bounded grid for the world.

use crate::census::Census;
use autopoiesis_core::{BondState, Element, Error, Occupant, Position, Result};
use serde::Serialize;

/// Largest side length a grid may have
pub const MAX_GRID_SIZE: i32 = 4096;

/// A square, non-wrapping grid with exactly one element per cell.
///
/// Cells are stored row-major, so the element at `(x, y)` lives at index
/// `y * size + x` and always reports that position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    size: i32,
    cells: Vec<Element>,
}

impl Grid {
    /// A grid of holes. Fails unless `1 <= size <= MAX_GRID_SIZE`.
    pub fn new(size: i32) -> Result<Self> {
        if size <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid size must be positive, got {size}"
            )));
        }
        if size > MAX_GRID_SIZE {
            return Err(Error::InvalidConfiguration(format!(
                "grid size {size} exceeds the maximum of {MAX_GRID_SIZE}"
            )));
        }

        let cells = (0..size)
            .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
            .map(|pos| Element::new(pos, size, Occupant::Hole))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Element at position, `None` outside the grid
    pub fn get(&self, pos: Position) -> Option<&Element> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    pub fn occupant(&self, pos: Position) -> Option<Occupant> {
        self.get(pos).map(Element::occupant)
    }

    pub fn occupant_at(&self, index: usize) -> Occupant {
        self.cells[index].occupant()
    }

    /// Replace the occupant at `pos`
    pub(crate) fn set(&mut self, pos: Position, occupant: Occupant) -> Result<()> {
        let index = self.index_of(pos).ok_or(Error::InvalidPosition {
            x: pos.x,
            y: pos.y,
            size: self.size,
        })?;
        self.set_at(index, occupant);
        Ok(())
    }

    pub(crate) fn set_at(&mut self, index: usize, occupant: Occupant) {
        self.cells[index].set_occupant(occupant);
    }

    /// Exchange two whole cells, leaving each element at the other's index
    #[cfg(test)]
    pub(crate) fn swap_cells(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        pos.in_bounds(self.size)
            .then(|| (pos.y * self.size + pos.x) as usize)
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.size;
        let y = (index as i32) / self.size;
        Position::new(x, y)
    }

    /// Indices of the von-Neumann neighbours of the cell at `index`
    pub fn neighbor_indices(&self, index: usize) -> Vec<usize> {
        self.index_to_pos(index)
            .neighbors(self.size)
            .into_iter()
            .filter_map(|pos| self.index_of(pos))
            .collect()
    }

    /// Iterator over all positions
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().map(Element::position)
    }

    /// Iterator over all elements with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Element)> + '_ {
        self.cells.iter().map(|element| (element.position(), element))
    }

    pub fn elements(&self) -> &[Element] {
        &self.cells
    }

    pub fn census(&self) -> Census {
        Census::from_occupants(self.cells.iter().map(Element::occupant))
    }

    /// Re-derive every Link's bond state from its current neighbours.
    pub fn refresh_bonds(&mut self) {
        let states: Vec<Option<BondState>> = (0..self.cells.len())
            .map(|index| match self.occupant_at(index) {
                Occupant::Link(_) => {
                    let linked = self
                        .neighbor_indices(index)
                        .into_iter()
                        .filter(|&n| matches!(self.occupant_at(n), Occupant::Link(_)))
                        .count();
                    Some(BondState::from_link_neighbors(linked))
                }
                _ => None,
            })
            .collect();

        for (index, state) in states.into_iter().enumerate() {
            if let Some(state) = state {
                self.set_at(index, Occupant::Link(state));
            }
        }
    }

    /// Check that the grid covers every position of the `size`×`size`
    /// square exactly once and that Link bond states are current.
    pub fn verify(&self) -> Result<()> {
        let expected = (self.size as usize) * (self.size as usize);
        if self.cells.len() != expected {
            return Err(Error::EngineInternal(format!(
                "grid holds {} cells, expected {expected}",
                self.cells.len()
            )));
        }

        for (index, element) in self.cells.iter().enumerate() {
            let pos = self.index_to_pos(index);
            if element.position() != pos || element.size() != self.size {
                return Err(Error::EngineInternal(format!(
                    "cell {index} holds element for {} in a grid of size {}, expected {pos}",
                    element.position(),
                    element.size()
                )));
            }
        }

        let mut refreshed = self.clone();
        refreshed.refresh_bonds();
        if let Some(index) = (0..self.cells.len())
            .find(|&i| refreshed.occupant_at(i) != self.occupant_at(i))
        {
            return Err(Error::EngineInternal(format!(
                "stale bond state at {}",
                self.index_to_pos(index)
            )));
        }

        Ok(())
    }
}
