use clap::ValueEnum;
use sweeper_core::{CellCount, Coord, GameConfig};

/// Board presets offered by the front-end; the engine itself has no notion of difficulty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// 8x10 with 10 mines
    #[default]
    Easy,
    /// 14x18 with 40 mines
    Medium,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked(8, 10, 10),
            Self::Medium => GameConfig::new_unchecked(14, 18, 40),
        }
    }
}

/// Starts from the preset and replaces whatever was given explicitly.
pub fn resolve(
    difficulty: Difficulty,
    rows: Option<Coord>,
    cols: Option<Coord>,
    mines: Option<CellCount>,
) -> GameConfig {
    let base = difficulty.config();
    GameConfig::new(
        rows.unwrap_or(base.rows),
        cols.unwrap_or(base.cols),
        mines.unwrap_or(base.mines),
    )
}
