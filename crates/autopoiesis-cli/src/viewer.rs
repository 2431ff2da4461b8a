//! Plain-text rendering of the grid.

use autopoiesis_core::{BondState, Occupant, Result};
use autopoiesis_world::{Grid, WorldViewer};
use std::io::Write;

pub fn glyph(occupant: Occupant) -> char {
    match occupant {
        Occupant::Hole => 'H',
        Occupant::Substrate => 'S',
        Occupant::Catalyst => 'K',
        Occupant::Link(BondState::Free) => 'L',
        Occupant::Link(BondState::SinglyBonded) => 'b',
        Occupant::Link(BondState::DoublyBonded) => 'B',
    }
}

/// One line per row, one glyph per cell
pub fn render(grid: &Grid) -> String {
    let size = grid.size() as usize;
    let mut out = String::with_capacity(size * (size + 1));
    for row in grid.elements().chunks(size) {
        out.extend(row.iter().map(|element| glyph(element.occupant())));
        out.push('\n');
    }
    out
}

/// Writes every generation to `out` under an iteration header
pub struct TextViewer<W> {
    out: W,
}

impl<W: Write> TextViewer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> WorldViewer for TextViewer<W> {
    fn update_view(&mut self, grid: &Grid, iteration: u64) -> Result<()> {
        writeln!(self.out, "iteration {iteration}")?;
        self.out.write_all(render(grid).as_bytes())?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
