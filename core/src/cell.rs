use core::fmt;
use serde::{Deserialize, Serialize};

/// What the player has done to a cell.
///
/// Only `Hidden -> Revealed`, `Hidden <-> Flagged` are legal; `Revealed` is terminal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

/// One board position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) visibility: Visibility,
    pub(crate) adjacent_mines: u8,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Mines among the surrounding cells, meaningful once mines are placed.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }

    pub const fn is_hidden(&self) -> bool {
        matches!(self.visibility, Visibility::Hidden)
    }
}

/// Player-facing projection of a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Mine,
    Count(u8),
}

impl CellView {
    pub fn project(cell: &Cell, exploded: bool) -> Self {
        match cell.visibility {
            _ if exploded && cell.is_mine => Self::Mine,
            Visibility::Hidden => Self::Hidden,
            Visibility::Flagged => Self::Flagged,
            Visibility::Revealed if cell.is_mine => Self::Mine,
            Visibility::Revealed => Self::Count(cell.adjacent_mines),
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Hidden => 'H',
            Self::Flagged => 'F',
            Self::Mine => 'M',
            Self::Count(n) => match char::from_digit(n as u32, 10) {
                Some(digit) => digit,
                None => '?',
            },
        }
    }
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
