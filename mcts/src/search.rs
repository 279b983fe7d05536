//! Arena-backed search tree and the two simulation drivers that grow it.
//!
//! * [`Tree::simulate`] is one iteration of incremental UCT search: descend,
//!   expand, roll out, then record the reward once on every node from the
//!   rolled-out child up to the root.
//! * [`Tree::sample_path`] + [`Tree::back_propagate`] is the single-shot
//!   driver: materialise one random root-to-leaf path, then recompute every
//!   statistic bottom-up from the terminal leaves.
//!
//! A run uses one driver or the other, never both.

use std::fmt::{Display, Write};

use game_types::{GameError, Player};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{
    node::{Node, NodeId, NodeStats},
    policies::{Policy, RandomPolicy, RolloutPolicy, UCTPolicy},
    GameState,
};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("node {0:?} has no children to select from")]
    NoChildren(NodeId),

    #[error("no legal moves available")]
    NoMoves,

    #[error("invalid search configuration: {0}")]
    Config(#[from] ron::error::SpannedError),
}

pub type Path = SmallVec<NodeId, 64>;

/// Everything one incremental iteration needs besides the tree.
pub struct Simulation<'a, R> {
    pub policy: &'a UCTPolicy,
    pub rollout: &'a R,
    /// Rewards are 1 when this player wins.
    pub target: Player,
    pub max_depth: usize,
}

pub struct Tree<S: GameState> {
    nodes: Vec<Node<S>>,
}

impl<S: GameState> Tree<S> {
    pub fn new(state: S) -> Self {
        Self {
            nodes: vec![Node::new(state, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root_state(&self) -> &S {
        self.get(NodeId::ROOT).state()
    }

    pub fn get(&self, id: NodeId) -> &Node<S> {
        debug_assert!(id.index() < self.nodes.len(), "{id:?} outside the arena");
        &self.nodes[id.index()]
    }

    fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn allocate(&mut self, node: Node<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Creates one child per legal move. Returns how many children were
    /// created; expanded and terminal nodes are left untouched.
    pub fn explore(&mut self, id: NodeId) -> Result<usize, SearchError> {
        let node = self.get(id);
        if node.is_leaf() || node.is_expanded() {
            warn!(node = id.0, "explore called on a terminal or expanded node");
            return Ok(0);
        }
        let state = node.state();
        let children = state
            .legal_moves()?
            .into_iter()
            .map(|mv| state.next(&mv))
            .collect::<Result<Vec<_>, _>>()?;
        let count = children.len();
        for child in children {
            let child_id = self.allocate(Node::new(child, Some(id)));
            self.get_mut(id).children.push(child_id);
        }
        trace!(node = id.0, children = count, "explored");
        Ok(count)
    }

    /// Records one playout with `reward` wins here and on every ancestor.
    pub fn add_playout(&mut self, id: NodeId, reward: u64) {
        let mut current = Some(id);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.stats.record(reward);
            current = node.parent();
        }
    }

    /// Recomputes the statistics of the subtree below `id` from its leaves.
    ///
    /// A terminal node counts as one playout worth 1 if `target` won it.
    /// Any other node sums its children, so an unexpanded non-terminal node
    /// ends up with no playouts at all.
    pub fn back_propagate(&mut self, id: NodeId, target: Player) -> NodeStats {
        let node = self.get(id);
        let stats = if node.is_leaf() {
            NodeStats::new(node.state().reward(target), 1)
        } else {
            let children = node.children().to_vec();
            children
                .into_iter()
                .fold(NodeStats::default(), |acc, child| {
                    acc + self.back_propagate(child, target)
                })
        };
        self.get_mut(id).stats = stats;
        stats
    }

    /// One incremental UCT iteration starting at `id`, `depth` plies below
    /// the root. Returns the reward that was recorded.
    pub fn simulate<R: RolloutPolicy<S>>(
        &mut self,
        id: NodeId,
        depth: usize,
        sim: &Simulation<'_, R>,
    ) -> Result<u64, SearchError> {
        let node = self.get(id);
        if node.is_leaf() || depth >= sim.max_depth {
            let reward = node.state().reward(sim.target);
            self.add_playout(id, reward);
            return Ok(reward);
        }

        if !node.is_expanded() {
            self.explore(id)?;
            let node = self.get(id);
            let child = node
                .state()
                .random()
                .choose(node.children())
                .copied()
                .ok_or(SearchError::NoChildren(id))?;
            let end = sim.rollout.rollout(self.get(child).state().clone())?;
            let reward = end.reward(sim.target);
            trace!(node = child.0, depth = depth + 1, reward, "rollout");
            self.add_playout(child, reward);
            return Ok(reward);
        }

        let next = sim
            .policy
            .choose(self, id)
            .ok_or(SearchError::NoChildren(id))?;
        self.simulate(next, depth + 1, sim)
    }

    /// Walks from the root to a terminal node (or `max_depth`), choosing
    /// children uniformly and expanding nodes on the way.
    pub fn sample_path(&mut self, max_depth: usize) -> Result<Path, SearchError> {
        let mut path = Path::new();
        let mut current = self.root();
        loop {
            path.push(current);
            let node = self.get(current);
            if node.is_leaf() || path.len() > max_depth {
                break;
            }
            if !node.is_expanded() {
                self.explore(current)?;
            }
            current = RandomPolicy
                .choose(self, current)
                .ok_or(SearchError::NoChildren(current))?;
        }
        Ok(path)
    }

    /// Indented outline of the tree down to `max_depth`, for debugging.
    pub fn render(&self, max_depth: usize) -> String
    where
        S: Display,
    {
        let mut out = String::new();
        self.render_node(self.root(), 0, max_depth, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, max_depth: usize, out: &mut String)
    where
        S: Display,
    {
        let node = self.get(id);
        let colour = if node.white() { 'W' } else { 'B' };
        let _ = writeln!(
            out,
            "{:indent$}{colour} {} [{}/{}]",
            "",
            node.state(),
            node.wins(),
            node.playouts(),
            indent = depth * 2
        );
        if depth < max_depth {
            for child in node.children() {
                self.render_node(*child, depth + 1, max_depth, out);
            }
        }
    }
}
