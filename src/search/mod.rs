// Simultaneous-move Monte Carlo tree search
//
// The tree models every snake moving at once: each child holds the board after
// one joint move set and a score per snake, so every snake picks its own
// preferred branch during selection.

mod ensemble;
mod expand;
mod heuristics;
mod mcts;
mod moves;
mod rollout;
mod select;
mod territory;
mod tree;

use thiserror::Error;

use crate::rules::RulesError;

pub use ensemble::{merge_outcomes, search_ensemble};
pub use expand::{expand_node, joint_moves, ExpandReport};
pub use heuristics::{sibling_elimination_penalty, Heuristics};
pub use mcts::{fallback_direction, Mcts, RootChild, SearchObserver, SearchOutcome, SearchStats};
pub use moves::{
    adjust_for_wrapped, fallback_move, get_moves, get_neighbors, is_snake, moves_or_fallback, Move,
    GENERATION_ORDER,
};
pub use rollout::{rollout, rollout_node, RolloutResult};
pub use select::SelectionPolicy;
pub use territory::{flood_fill, Territory};
pub use tree::{Node, NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("controlled snake '{0}' is not on the board")]
    SnakeNotFound(String),
    #[error(transparent)]
    Rules(#[from] RulesError),
}
