use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    config::{SearchConfig, SearchMode},
    node::{NodeId, NodeStats},
    policies::{RolloutPolicy, UCTPolicy, TIE_TOLERANCE},
    search::{SearchError, Simulation, Tree},
    GameState, Player,
};

/// Owns one search tree for a single decision.
pub struct Manager<S: GameState, R: RolloutPolicy<S>> {
    tree: Tree<S>,
    config: SearchConfig,
    policy: UCTPolicy,
    rollout: R,
    target: Player,
}

impl<S: GameState, R: RolloutPolicy<S>> Manager<S, R> {
    /// Searches on behalf of the player to move in `state`.
    pub fn new(state: S, config: SearchConfig, rollout: R) -> Self {
        let target = state.player();
        let policy = UCTPolicy(config.exploration);
        Self {
            tree: Tree::new(state),
            config,
            policy,
            rollout,
            target,
        }
    }

    pub fn playout(&mut self) -> Result<(), SearchError> {
        match self.config.mode {
            SearchMode::Incremental => {
                let sim = Simulation {
                    policy: &self.policy,
                    rollout: &self.rollout,
                    target: self.target,
                    max_depth: self.config.max_depth,
                };
                let reward = self.tree.simulate(self.tree.root(), 0, &sim)?;
                trace!(reward, nodes = self.tree.len(), "iteration");
            }
            SearchMode::Recompute => {
                let path = self.tree.sample_path(self.config.max_depth)?;
                let root = self.tree.back_propagate(self.tree.root(), self.target);
                trace!(path = path.len(), playouts = root.playouts, "iteration");
            }
        }
        Ok(())
    }

    pub fn playout_n(&mut self, n: u32) -> Result<(), SearchError> {
        (0..n).try_for_each(|_| self.playout())
    }

    /// Runs the configured number of iterations.
    pub fn search(&mut self) -> Result<(), SearchError> {
        self.playout_n(self.config.iterations)
    }

    pub fn tree(&self) -> &Tree<S> {
        &self.tree
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn target(&self) -> Player {
        self.target
    }

    /// Statistics of every root child, in move order.
    pub fn stats(&self) -> Vec<NodeStats> {
        self.tree
            .get(self.tree.root())
            .children()
            .iter()
            .map(|child| self.tree.get(*child).stats())
            .collect_vec()
    }

    /// The root child with the best win rate among those with playouts,
    /// ties broken uniformly at random. `None` if no child was simulated.
    pub fn best_child(&self) -> Option<NodeId> {
        let root = self.tree.get(self.tree.root());
        let rated = root
            .children()
            .iter()
            .filter_map(|child| {
                self.tree
                    .get(*child)
                    .stats()
                    .win_rate()
                    .map(|rate| (*child, rate))
            })
            .collect_vec();
        let best_rate = rated
            .iter()
            .map(|(_, rate)| *rate)
            .fold(f64::NEG_INFINITY, f64::max);
        let top = rated
            .into_iter()
            .filter(|(_, rate)| (best_rate - rate).abs() < TIE_TOLERANCE)
            .map(|(child, _)| child)
            .collect_vec();
        let choice = root.state().random().choose(&top).copied();
        if let Some(child) = choice {
            let stats = self.tree.get(child).stats();
            debug!(
                node = child.0,
                win_rate = best_rate,
                wins = stats.wins,
                playouts = stats.playouts,
                ties = top.len(),
                "decision"
            );
        }
        choice
    }

    /// The state to move to; the root state itself if nothing was simulated.
    pub fn best_state(&self) -> S {
        self.best_child().map_or_else(
            || self.tree.root_state().clone(),
            |child| self.tree.get(child).state().clone(),
        )
    }
}

/// Runs `iterations` incremental UCT iterations from `state` and returns the
/// state reached by the chosen move.
pub fn run_search<S, R>(
    state: &S,
    iterations: u32,
    max_depth: usize,
    rollout: R,
) -> Result<S, SearchError>
where
    S: GameState,
    R: RolloutPolicy<S>,
{
    let config = SearchConfig::default()
        .with_iterations(iterations)
        .with_max_depth(max_depth);
    let mut manager = Manager::new(state.clone(), config, rollout);
    manager.search()?;
    Ok(manager.best_state())
}
