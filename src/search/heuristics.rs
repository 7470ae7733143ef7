// Optional selection bias from static evaluators
//
// Both evaluators are off unless a weight in `[heuristics]` is non-zero.

use super::territory::flood_fill;
use super::tree::{NodeId, Tree};
use crate::config::HeuristicsConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heuristics {
    territory_weight: f64,
    sibling_penalty_weight: f64,
    wrapped: bool,
}

impl Heuristics {
    /// Returns None when every weight is zero
    pub fn from_config(config: &HeuristicsConfig, wrapped: bool) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        Some(Heuristics {
            territory_weight: config.territory_weight,
            sibling_penalty_weight: config.sibling_penalty_weight,
            wrapped,
        })
    }

    /// Weighted evaluator sum added to the selection value of `node` for `slot`
    pub fn bias(&self, tree: &Tree, node: NodeId, slot: usize) -> f64 {
        let mut bias = 0.0;
        if self.sibling_penalty_weight != 0.0 {
            bias += self.sibling_penalty_weight * f64::from(sibling_elimination_penalty(tree, node, slot));
        }
        if self.territory_weight != 0.0 {
            let territory = flood_fill(&tree.node(node).board, self.wrapped);
            bias += self.territory_weight * f64::from(territory.score(slot));
        }
        bias
    }
}

/// -1 for every sibling in which the snake at `slot` moved its head to the same
/// cell and was eliminated there
pub fn sibling_elimination_penalty(tree: &Tree, node: NodeId, slot: usize) -> i32 {
    let Some(parent) = tree.node(node).parent else {
        return 0;
    };
    let Some(head) = tree.node(node).board.snakes.get(slot).map(|s| s.head()) else {
        return 0;
    };

    let deaths = tree
        .children(parent)
        .iter()
        .filter(|&&sibling| sibling != node)
        .filter_map(|&sibling| tree.node(sibling).board.snakes.get(slot))
        .filter(|snake| snake.head() == head && !snake.is_alive())
        .count();
    -(deaths as i32)
}
