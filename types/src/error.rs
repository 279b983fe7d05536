use thiserror::Error;

use crate::Player;

/// Rejected game configurations and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("invalid heap index {index} (game has {heaps} heaps)")]
    InvalidHeap { index: usize, heaps: usize },

    #[error("cannot remove {count} objects from heap {heap} holding {available}")]
    InvalidCount {
        heap: usize,
        count: u32,
        available: u32,
    },

    #[error("a game needs at least one heap")]
    EmptyConfiguration,

    #[error("heap {index} must start with at least one object")]
    EmptyHeap { index: usize },

    #[error("player {got} moved out of turn (player {expected} to move)")]
    OutOfTurn { expected: Player, got: Player },

    #[error("square ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("game already over")]
    GameOver,

    #[error("parse error: {0}")]
    Parse(String),
}
