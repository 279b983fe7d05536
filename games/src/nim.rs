//! Nim under the normal-play convention: whoever empties the last heap wins.

use std::fmt::Display;

use game_types::{GameError, Player, RandomStream};
use itertools::Itertools;
use mcts::{Game, GameMove, GameState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NimGame {
    heaps: Vec<u32>,
    seed: u64,
}

impl NimGame {
    pub const DEFAULT_SEED: u64 = 100;

    /// Rejects an empty heap list and heaps without objects, since such a
    /// game would start out already finished.
    pub fn new(heaps: impl Into<Vec<u32>>) -> Result<Self, GameError> {
        let heaps = heaps.into();
        if heaps.is_empty() {
            return Err(GameError::EmptyConfiguration);
        }
        if let Some(index) = heaps.iter().position(|h| *h == 0) {
            return Err(GameError::EmptyHeap { index });
        }
        Ok(Self {
            heaps,
            seed: Self::DEFAULT_SEED,
        })
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn heaps(&self) -> &[u32] {
        &self.heaps
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Game for NimGame {
    type State = NimState;

    fn start(&self) -> NimState {
        NimState {
            heaps: self.heaps.clone(),
            to_move: self.opener(),
            opener: self.opener(),
            winner: None,
            random: RandomStream::new(self.seed),
        }
    }

    fn opener(&self) -> Player {
        Player::First
    }
}

impl Display for NimGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nim {:?}", self.heaps)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NimMove {
    pub player: Player,
    pub heap: usize,
    pub count: u32,
}

impl NimMove {
    #[must_use]
    pub fn new(player: Player, heap: usize, count: u32) -> Self {
        Self {
            player,
            heap,
            count,
        }
    }
}

impl GameMove for NimMove {
    fn player(&self) -> Player {
        self.player
    }
}

impl Display for NimMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Player {} removes {} from heap {}",
            self.player, self.count, self.heap
        )
    }
}

#[derive(Debug, Clone)]
pub struct NimState {
    heaps: Vec<u32>,
    to_move: Player,
    opener: Player,
    winner: Option<Player>,
    random: RandomStream,
}

impl NimState {
    /// An arbitrary position, e.g. one typed in by a front end. Heaps may be
    /// empty here; if all of them are, the previous mover has won.
    #[must_use]
    pub fn at(heaps: impl Into<Vec<u32>>, to_move: Player, seed: u64) -> Self {
        let heaps = heaps.into();
        let winner = heaps.iter().all(|h| *h == 0).then_some(to_move.opponent());
        Self {
            heaps,
            to_move,
            opener: Player::First,
            winner,
            random: RandomStream::new(seed),
        }
    }

    #[must_use]
    pub fn heaps(&self) -> &[u32] {
        &self.heaps
    }

    /// XOR of all heap sizes; zero means the player to move is losing.
    #[must_use]
    pub fn nim_sum(&self) -> u32 {
        self.heaps.iter().fold(0, |acc, h| acc ^ h)
    }

    /// The move that turns `self` into `other`, if a single legal move does.
    #[must_use]
    pub fn move_to(&self, other: &NimState) -> Option<NimMove> {
        if self.heaps.len() != other.heaps.len() {
            return None;
        }
        let (heap, count) = self
            .heaps
            .iter()
            .zip(&other.heaps)
            .enumerate()
            .filter(|(_, (before, after))| before != after)
            .map(|(idx, (before, after))| (idx, before.checked_sub(*after)))
            .exactly_one()
            .ok()?;
        Some(NimMove::new(self.to_move, heap, count?))
    }
}

impl GameState for NimState {
    type Move = NimMove;
    type MoveList = Vec<NimMove>;

    fn player(&self) -> Player {
        self.to_move
    }

    fn opener(&self) -> Player {
        self.opener
    }

    fn is_terminal(&self) -> bool {
        self.heaps.iter().all(|h| *h == 0)
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }

    fn moves(&self, player: Player) -> Result<Vec<NimMove>, GameError> {
        Ok(self
            .heaps
            .iter()
            .enumerate()
            .flat_map(|(heap, size)| (1..=*size).map(move |count| NimMove::new(player, heap, count)))
            .collect_vec())
    }

    fn next(&self, mv: &NimMove) -> Result<Self, GameError> {
        let Some(available) = self.heaps.get(mv.heap).copied() else {
            return Err(GameError::InvalidHeap {
                index: mv.heap,
                heaps: self.heaps.len(),
            });
        };
        if mv.count < 1 || mv.count > available {
            return Err(GameError::InvalidCount {
                heap: mv.heap,
                count: mv.count,
                available,
            });
        }
        let mut heaps = self.heaps.clone();
        heaps[mv.heap] -= mv.count;
        let winner = heaps.iter().all(|h| *h == 0).then_some(self.to_move);
        Ok(Self {
            heaps,
            to_move: self.to_move.opponent(),
            opener: self.opener,
            winner,
            random: self.random.next(),
        })
    }

    fn random(&self) -> &RandomStream {
        &self.random
    }
}

impl Display for NimState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Heaps: {:?} | Player: {}", self.heaps, self.to_move)?;
        match self.winner {
            Some(winner) => write!(f, " | Winner: {winner}"),
            None => write!(f, " | Winner: -"),
        }
    }
}
