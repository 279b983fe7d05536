//! Rollout heuristic for Nim based on the Sprague-Grundy theorem.

use mcts::{GameState, RolloutPolicy, SearchError, UniformRollout};

use crate::nim::{NimMove, NimState};

/// The move that brings the nim-sum back to zero, if there is one.
#[must_use]
pub fn balancing_move(state: &NimState) -> Option<NimMove> {
    let sum = state.nim_sum();
    if sum == 0 {
        return None;
    }
    state.heaps().iter().enumerate().find_map(|(heap, size)| {
        let target = size ^ sum;
        (target < *size).then(|| NimMove::new(state.player(), heap, size - target))
    })
}

/// Plays the balancing move when one exists and a uniformly random legal
/// move otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct XorRollout;

impl RolloutPolicy<NimState> for XorRollout {
    fn choose(&self, state: &NimState) -> Result<NimMove, SearchError> {
        match balancing_move(state) {
            Some(mv) => Ok(mv),
            None => UniformRollout.choose(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_types::Player;
    use itertools::Itertools;

    #[test]
    fn balancing_move_zeroes_nim_sum() {
        for heaps in (0..3).map(|_| 0..=6u32).multi_cartesian_product() {
            let state = NimState::at(heaps.clone(), Player::First, 0);
            match balancing_move(&state) {
                Some(mv) => {
                    assert_ne!(state.nim_sum(), 0, "{heaps:?}");
                    let next = state.next(&mv).unwrap();
                    assert_eq!(next.nim_sum(), 0, "{heaps:?}");
                }
                None => assert_eq!(state.nim_sum(), 0, "{heaps:?}"),
            }
        }
    }

    #[test]
    fn zero_sum_falls_back_to_legal_move() {
        let state = NimState::at([2, 2], Player::Second, 4);
        let mv = XorRollout.choose(&state).unwrap();
        assert_eq!(mv.player, Player::Second);
        assert!(state.next(&mv).is_ok());
    }

    #[test]
    fn winning_side_keeps_winning() {
        // the player facing a non-zero nim-sum wins whatever the reply
        for seed in 0..20 {
            let end = XorRollout.rollout(NimState::at([3, 4, 5], Player::First, seed)).unwrap();
            assert_eq!(end.winner(), Some(Player::First));
        }
    }

    #[test]
    fn terminal_position_has_no_move() {
        let state = NimState::at([0, 0], Player::First, 0);
        assert_eq!(state.winner(), Some(Player::Second));
        assert!(matches!(XorRollout.choose(&state), Err(SearchError::NoMoves)));
    }
}
