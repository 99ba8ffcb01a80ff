use core::fmt;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cells, indexed by `(row, col)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
    size: Coord2,
    mine_count: CellCount,
}

impl Board {
    /// All cells hidden and mine free.
    pub fn new(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
            size,
            mine_count: 0,
        }
    }

    pub fn size(&self) -> Coord2 {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn valid_coords(&self, (row, col): Coord2) -> bool {
        row < self.size.0 && col < self.size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.valid_coords(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size)
    }

    /// Every coordinate, row by row.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.size;
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    /// What the player sees in every cell; all mines show once `exploded` is set.
    pub fn view(&self, exploded: bool) -> Array2<CellView> {
        self.cells.map(|cell| CellView::project(cell, exploded))
    }

    /// Mines around `coords`, counted live from the mine mask.
    pub fn neighbor_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, so the count always fits
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count() as u8
    }

    /// Marks the given cells as mines, skipping out of range and repeated entries.
    ///
    /// Returns the number of mines on the board afterwards.
    pub(crate) fn lay_mines(&mut self, mines: &[Coord2]) -> CellCount {
        for &coords in mines {
            if !self.valid_coords(coords) {
                log::warn!("Ignoring mine outside the board at {:?}", coords);
                continue;
            }
            let cell = &mut self[coords];
            if !cell.is_mine {
                cell.is_mine = true;
                self.mine_count += 1;
            }
        }
        self.mine_count
    }

    pub(crate) fn recompute_counts(&mut self) {
        for coords in self.iter_coords() {
            let count = self.neighbor_mine_count(coords);
            self[coords].adjacent_mines = count;
        }
    }

    /// Turns every flag back into a hidden cell, returning how many were cleared.
    pub(crate) fn clear_flags(&mut self) -> CellCount {
        let mut cleared = 0;
        for cell in self.cells.iter_mut() {
            if cell.visibility == Visibility::Flagged {
                cell.visibility = Visibility::Hidden;
                cleared += 1;
            }
        }
        cleared
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

/// Mine mask (`B` or `.`) next to the adjacent counts, one line per row.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.rows() {
            for cell in row.iter() {
                f.write_str(if cell.is_mine { "B" } else { "." })?;
            }
            f.write_str("  |  ")?;
            for cell in row.iter() {
                write!(f, "{}", cell.adjacent_mines)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
