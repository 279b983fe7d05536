use std::ops::{Add, AddAssign};

use crate::GameState;

/// Index into the node arena of a [`crate::Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    pub wins: u64,
    pub playouts: u64,
}

impl NodeStats {
    #[must_use]
    pub fn new(wins: u64, playouts: u64) -> Self {
        Self { wins, playouts }
    }

    pub fn record(&mut self, reward: u64) {
        self.wins += reward;
        self.playouts += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn win_rate(&self) -> Option<f64> {
        (self.playouts > 0).then(|| self.wins as f64 / self.playouts as f64)
    }
}

impl Add for NodeStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            wins: self.wins + rhs.wins,
            playouts: self.playouts + rhs.playouts,
        }
    }
}

impl AddAssign for NodeStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A tree node owning one state. Parent links are plain arena indices.
#[derive(Debug, Clone)]
pub struct Node<S: GameState> {
    state: S,
    parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) stats: NodeStats,
    white: bool,
}

impl<S: GameState> Node<S> {
    pub(crate) fn new(state: S, parent: Option<NodeId>) -> Self {
        let white = state.player() == state.opener();
        Self {
            state,
            parent,
            children: Vec::new(),
            stats: NodeStats::default(),
            white,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    pub fn wins(&self) -> u64 {
        self.stats.wins
    }

    pub fn playouts(&self) -> u64 {
        self.stats.playouts
    }

    /// Terminal states are the leaves of the game tree.
    pub fn is_leaf(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the opener is the player to move here.
    pub fn white(&self) -> bool {
        self.white
    }
}
