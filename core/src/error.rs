use thiserror::Error;

/// Why a move was refused. The engine never fails on these, it only declines the move.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Cell is already revealed")]
    AlreadyRevealed,
    #[error("Cell is flagged, unflag it before revealing")]
    Flagged,
}

pub type Result<T> = core::result::Result<T, GameError>;
