#![warn(clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod history;
pub mod nim;
pub mod rollout;
pub mod tictactoe;

pub use history::{History, HistoryError};
pub use nim::{NimGame, NimMove, NimState};
pub use rollout::{balancing_move, XorRollout};
pub use tictactoe::{Axis, Position, TicTacToe, TicTacToeMove, TicTacToeState};
