#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::fmt::Debug;

pub use game_types::{GameError, Player, RandomStream};

pub mod config;
pub mod manager;
pub mod node;
pub mod policies;
pub mod search;
#[cfg(test)]
pub(crate) mod testing;

pub use config::{SearchConfig, SearchMode};
pub use manager::{run_search, Manager};
pub use node::{Node, NodeId, NodeStats};
pub use policies::{Policy, RandomPolicy, RolloutPolicy, UCTPolicy, UniformRollout};
pub use search::{SearchError, Tree};

/// Immutable game configuration that knows how to open a game.
pub trait Game {
    type State: GameState;

    fn start(&self) -> Self::State;
    fn opener(&self) -> Player;
}

pub trait GameMove: Clone + Debug + PartialEq {
    /// The player making this move.
    fn player(&self) -> Player;
}

/// One ply of a game. Transitions never mutate the receiver.
pub trait GameState: Clone + Debug {
    type Move: GameMove;
    type MoveList: IntoIterator<Item = Self::Move>;

    /// Player to move. Only meaningful while the game is in progress.
    fn player(&self) -> Player;
    /// Player who opened the game this state belongs to.
    fn opener(&self) -> Player;
    fn is_terminal(&self) -> bool;
    /// Set only once the state is terminal. `None` at a terminal state is a draw.
    fn winner(&self) -> Option<Player>;
    fn moves(&self, player: Player) -> Result<Self::MoveList, GameError>;
    fn next(&self, mv: &Self::Move) -> Result<Self, GameError>;
    fn random(&self) -> &RandomStream;

    fn legal_moves(&self) -> Result<Self::MoveList, GameError> {
        self.moves(self.player())
    }

    /// 1 if `target` has won, 0 for losses, draws and unfinished games.
    fn reward(&self, target: Player) -> u64 {
        u64::from(self.winner() == Some(target))
    }
}

pub type Move<S> = <S as GameState>::Move;
pub type MoveList<S> = <S as GameState>::MoveList;
