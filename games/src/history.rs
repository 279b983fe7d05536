use game_types::GameError;
use mcts::{Game, GameState};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nim::{NimGame, NimMove, NimState};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("malformed history: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize history: {0}")]
    Serialize(#[from] ron::Error),
}

/// A finished or ongoing Nim game: enough to rebuild every position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub seed: u64,
    pub heaps: Vec<u32>,
    pub moves: Vec<NimMove>,
}

impl History {
    #[must_use]
    pub fn new(game: &NimGame) -> Self {
        Self {
            seed: game.seed(),
            heaps: game.heaps().to_vec(),
            moves: Vec::new(),
        }
    }

    pub fn push(&mut self, mv: NimMove) {
        self.moves.push(mv);
    }

    pub fn game(&self) -> Result<NimGame, GameError> {
        Ok(NimGame::new(self.heaps.clone())?.with_seed(self.seed))
    }

    /// The position after every recorded move.
    pub fn replay(&self) -> Result<NimState, GameError> {
        self.moves
            .iter()
            .try_fold(self.game()?.start(), |state, mv| state.next(mv))
    }

    pub fn to_ron(&self) -> Result<String, HistoryError> {
        Ok(ron::to_string(self)?)
    }

    pub fn from_ron(text: &str) -> Result<Self, HistoryError> {
        Ok(ron::from_str(text)?)
    }
}
