use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won (first reveal opens every safe cell)
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No reveal yet, so no mines on the board
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Snapshot of the counters a front-end needs after every move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub done: bool,
    pub exploded: bool,
    pub rows: Coord,
    pub cols: Coord,
    pub flagged_count: CellCount,
    pub revealed_count: CellCount,
    /// Mines actually on the board once placed, the requested count before that
    pub mine_count: CellCount,
}

impl GameStatus {
    /// Same answer as [`PlayEngine::phase`]: every accepted first reveal opens at least one
    /// cell, so no revealed cells means the mines are not placed yet.
    pub const fn phase(&self) -> GamePhase {
        match (self.done, self.exploded) {
            (_, true) => GamePhase::Lost,
            (true, false) => GamePhase::Won,
            (false, false) if self.revealed_count == 0 => GamePhase::NotStarted,
            (false, false) => GamePhase::InProgress,
        }
    }

    /// Mines not yet accounted for by a flag, negative when over-flagged.
    pub const fn mines_left(&self) -> i32 {
        self.mine_count as i32 - self.flagged_count as i32
    }
}
