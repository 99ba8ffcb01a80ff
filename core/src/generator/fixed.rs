use super::*;

/// Places the same predetermined mines on every game, whatever the first move.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinePlacer {
    mines: Vec<Coord2>,
}

impl FixedMinePlacer {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinePlacer for FixedMinePlacer {
    fn place(&mut self, config: GameConfig, _start: Coord2) -> Vec<Coord2> {
        let (rows, cols) = config.size();
        self.mines
            .iter()
            .copied()
            .filter(|&(row, col)| row < rows && col < cols)
            .collect()
    }
}
