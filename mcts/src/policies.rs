use game_types::RandomStream;

use crate::{
    node::{NodeId, NodeStats},
    search::{SearchError, Tree},
    GameState,
};

/// Scores closer than this are treated as equal.
pub const TIE_TOLERANCE: f64 = 1e-6;

/// Picks which child of an expanded node to descend into.
pub trait Policy<S: GameState> {
    fn choose(&self, tree: &Tree<S>, node: NodeId) -> Option<NodeId>;
}

/// Uniformly random descent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl<S: GameState> Policy<S> for RandomPolicy {
    fn choose(&self, tree: &Tree<S>, node: NodeId) -> Option<NodeId> {
        let node = tree.get(node);
        node.state().random().choose(node.children()).copied()
    }
}

/// Upper confidence bound applied to trees, with exploration constant `C`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UCTPolicy(pub f64);

impl Default for UCTPolicy {
    fn default() -> Self {
        Self(std::f64::consts::SQRT_2)
    }
}

#[allow(clippy::cast_precision_loss)]
impl UCTPolicy {
    /// `w/n + C * sqrt(ln(max(1, N)) / n)`; unvisited children score `+inf`.
    #[must_use]
    pub fn score(&self, child: NodeStats, parent_playouts: u64) -> f64 {
        if child.playouts == 0 {
            return f64::INFINITY;
        }
        let ln_total = (parent_playouts.max(1) as f64).ln();
        let visits = child.playouts as f64;
        let exploitation = child.wins as f64 / visits;
        let exploration = self.0 * (ln_total / visits).sqrt();
        exploitation + exploration
    }
}

impl<S: GameState> Policy<S> for UCTPolicy {
    fn choose(&self, tree: &Tree<S>, node: NodeId) -> Option<NodeId> {
        let parent = tree.get(node);
        let total = parent.playouts();
        select_by_key(
            parent.state().random(),
            parent.children().iter().copied(),
            |child| self.score(tree.get(*child).stats(), total),
        )
    }
}

/// Picks the element with the highest key, breaking ties uniformly at random.
#[allow(clippy::float_cmp)]
pub fn select_by_key<T, Iter, KeyFn>(
    rng: &RandomStream,
    elts: Iter,
    mut key_fn: KeyFn,
) -> Option<T>
where
    Iter: IntoIterator<Item = T>,
    KeyFn: FnMut(&T) -> f64,
{
    let mut choice = None;
    let mut num_optimal: u32 = 0;
    let mut best_so_far: f64 = f64::NEG_INFINITY;
    for elt in elts {
        let score = key_fn(&elt);
        if score == best_so_far || (score - best_so_far).abs() < TIE_TOLERANCE {
            num_optimal += 1;
            if rng.gen_bool(1.0 / f64::from(num_optimal)) {
                choice = Some(elt);
            }
        } else if score > best_so_far {
            choice = Some(elt);
            num_optimal = 1;
            best_so_far = score;
        }
    }
    choice
}

/// Plays a state out to the end of the game.
pub trait RolloutPolicy<S: GameState> {
    fn choose(&self, state: &S) -> Result<S::Move, SearchError>;

    fn rollout(&self, mut state: S) -> Result<S, SearchError> {
        while !state.is_terminal() {
            let mv = self.choose(&state)?;
            state = state.next(&mv)?;
        }
        Ok(state)
    }
}

/// Uniformly random legal moves, drawn from the state's own stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl<S: GameState> RolloutPolicy<S> for UniformRollout {
    fn choose(&self, state: &S) -> Result<S::Move, SearchError> {
        state
            .random()
            .choose_iter(state.legal_moves()?)
            .ok_or(SearchError::NoMoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TakeAway;

    #[test]
    fn unvisited_scores_infinite() {
        let policy = UCTPolicy::default();
        assert!(policy.score(NodeStats::default(), 10).is_infinite());
    }

    #[test]
    fn uct_formula() {
        let policy = UCTPolicy::default();
        let score = policy.score(NodeStats::new(3, 4), 10);
        let expected = 0.75 + std::f64::consts::SQRT_2 * (10f64.ln() / 4.0).sqrt();
        assert!((score - expected).abs() < 1e-12);

        // ln(max(1, 0)) = 0 leaves only the exploitation term
        assert!((policy.score(NodeStats::new(1, 2), 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn select_by_key_prefers_maximum() {
        let rng = RandomStream::new(1);
        let picked = select_by_key(&rng, [1.0, 5.0, 3.0, 4.999], |x| *x);
        assert_eq!(picked, Some(5.0));
        assert_eq!(select_by_key(&rng, Vec::<f64>::new(), |x| *x), None);
    }

    #[test]
    fn select_by_key_breaks_ties_randomly() {
        let rng = RandomStream::new(5);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let idx = select_by_key(&rng, [0usize, 1, 2], |_| f64::INFINITY).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn uniform_rollout_reaches_terminal() {
        let end = UniformRollout.rollout(TakeAway::new(9, 4)).unwrap();
        assert!(end.is_terminal());
        assert!(end.winner().is_some());
    }

    #[test]
    fn rollout_of_terminal_state_is_identity() {
        let end = UniformRollout.rollout(TakeAway::new(0, 4)).unwrap();
        assert_eq!(end.pile, 0);
        assert!(matches!(
            RolloutPolicy::<TakeAway>::choose(&UniformRollout, &end),
            Err(SearchError::NoMoves)
        ));
    }
}
