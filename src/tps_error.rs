// Error taxonomy for board construction and setup
// Gameplay itself is total; these only surface programmer or configuration mistakes

use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least one tile wide and tall")]
    InvalidBoardShape,
    #[error("Too many mines: {mines} requested for {cells} tiles")]
    TooManyMines { mines: usize, cells: usize },
    #[error("Mine layout lists the same tile twice")]
    DuplicateMine,
    #[error("Cannot arm a tile that is already open")]
    ArmOpenedTile,
}

pub type Result<T> = core::result::Result<T, GameError>;
