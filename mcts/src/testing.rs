//! A single-pile take-away game (take one or two, last taker wins) used to
//! exercise the search core without depending on a real game crate.

use std::fmt::Display;

use crate::{Game, GameError, GameMove, GameState, Player, RandomStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Take {
    pub player: Player,
    pub count: u32,
}

impl GameMove for Take {
    fn player(&self) -> Player {
        self.player
    }
}

#[derive(Debug, Clone)]
pub struct TakeAway {
    pub pile: u32,
    pub to_move: Player,
    pub winner: Option<Player>,
    pub random: RandomStream,
}

impl TakeAway {
    pub fn new(pile: u32, seed: u64) -> Self {
        Self {
            pile,
            to_move: Player::First,
            winner: None,
            random: RandomStream::new(seed),
        }
    }

    pub fn take(&self, count: u32) -> Take {
        Take {
            player: self.to_move,
            count,
        }
    }

    pub fn next_state(&self, mv: &Take) -> Self {
        self.next(mv).expect("legal test move")
    }
}

impl Display for TakeAway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pile {}", self.pile)
    }
}

impl GameState for TakeAway {
    type Move = Take;
    type MoveList = Vec<Take>;

    fn player(&self) -> Player {
        self.to_move
    }

    fn opener(&self) -> Player {
        Player::First
    }

    fn is_terminal(&self) -> bool {
        self.pile == 0
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }

    fn moves(&self, player: Player) -> Result<Vec<Take>, GameError> {
        Ok((1..=self.pile.min(2))
            .map(|count| Take { player, count })
            .collect())
    }

    fn next(&self, mv: &Take) -> Result<Self, GameError> {
        if mv.count == 0 || mv.count > self.pile.min(2) {
            return Err(GameError::InvalidCount {
                heap: 0,
                count: mv.count,
                available: self.pile,
            });
        }
        let pile = self.pile - mv.count;
        Ok(Self {
            pile,
            to_move: self.to_move.opponent(),
            winner: (pile == 0).then_some(self.to_move),
            random: self.random.next(),
        })
    }

    fn random(&self) -> &RandomStream {
        &self.random
    }
}

pub struct TakeAwayGame {
    pub pile: u32,
    pub seed: u64,
}

impl Game for TakeAwayGame {
    type State = TakeAway;

    fn start(&self) -> TakeAway {
        TakeAway::new(self.pile, self.seed)
    }

    fn opener(&self) -> Player {
        Player::First
    }
}
