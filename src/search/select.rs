// Joint-move selection
//
// Each live snake independently ranks the children by its own UCT value and
// names the head cell of its favourite. Descent continues into the child
// whose live heads match all of those preferences, when exactly one child
// does; otherwise it takes the first child.

use super::heuristics::Heuristics;
use super::tree::{NodeId, Tree};
use crate::rules::BoardState;
use crate::types::Coord;

#[derive(Debug, Clone)]
pub struct SelectionPolicy {
    exploration: f64,
    heuristics: Option<Heuristics>,
}

impl SelectionPolicy {
    pub fn new(exploration: f64, heuristics: Option<Heuristics>) -> Self {
        SelectionPolicy {
            exploration,
            heuristics,
        }
    }

    /// UCT value of `node` from the point of view of `slot`.
    /// Unvisited nodes are always preferred.
    pub fn value(&self, tree: &Tree, node: NodeId, slot: usize) -> f64 {
        let n = tree.node(node);
        if n.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(n.visits);
        let parent_visits = f64::from(tree.parent_visits(node).max(1));

        let exploitation = f64::from(n.score(slot)) / visits;
        let exploration = self.exploration * (parent_visits.ln() / visits).sqrt();
        let bias = self
            .heuristics
            .as_ref()
            .map_or(0.0, |h| h.bias(tree, node, slot));

        exploitation + exploration + bias
    }

    /// Head cell `slot` reaches in its highest valued child. Ties keep the
    /// earliest child.
    pub fn preferred_head(&self, tree: &Tree, node: NodeId, slot: usize) -> Option<Coord> {
        let mut best: Option<(f64, NodeId)> = None;
        for &child in tree.children(node) {
            let value = self.value(tree, child, slot);
            match best {
                Some((top, _)) if value <= top => {}
                _ => best = Some((value, child)),
            }
        }
        best.and_then(|(_, child)| tree.node(child).board.snakes.get(slot).map(|s| s.head()))
    }

    /// Walks from `from` down to a node with no children
    pub fn select(&self, tree: &Tree, from: NodeId) -> NodeId {
        let mut current = from;
        loop {
            let children = tree.children(current);
            let Some(&first) = children.first() else {
                return current;
            };

            let preferred: Vec<(usize, Coord)> = tree
                .node(current)
                .board
                .live_snakes()
                .filter_map(|(slot, _)| self.preferred_head(tree, current, slot).map(|head| (slot, head)))
                .collect();

            let mut matching = children
                .iter()
                .filter(|&&child| heads_match(&tree.node(child).board, &preferred));
            current = match (matching.next(), matching.next()) {
                (Some(&only), None) => only,
                _ => first,
            };
        }
    }
}

/// Whether the live heads on `board` are exactly the `(slot, head)` pairs given
fn heads_match(board: &BoardState, preferred: &[(usize, Coord)]) -> bool {
    let mut live = board.live_snakes().map(|(slot, snake)| (slot, snake.head()));
    let mut wanted = preferred.iter().copied();
    loop {
        match (live.next(), wanted.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => continue,
            _ => return false,
        }
    }
}
