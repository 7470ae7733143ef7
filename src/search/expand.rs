// Leaf expansion with index-paired opponent moves
//
// Every one of our legal moves is paired with k opponent joint moves, where k
// is the longest opponent move list and opponent j plays move i mod len_j in
// pairing i. Each opponent move shows up in at least one sibling while the
// branching factor stays at (our moves) x k instead of the full cross product.

use log::warn;
use rand::RngCore;

use super::moves::{get_moves, moves_or_fallback, Move};
use super::tree::{NodeId, Tree};
use crate::rules::{BoardState, Ruleset, SnakeMove};

/// What a single expansion produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExpandReport {
    pub children: usize,
    pub failed_transitions: usize,
}

/// Builds the joint move sets for `board` with `you` as the controlled slot
pub fn joint_moves(board: &BoardState, you: usize, wrapped: bool) -> Vec<(Move, Vec<SnakeMove>)> {
    let me = &board.snakes[you];
    if !me.is_alive() {
        return Vec::new();
    }

    let opponents: Vec<(&str, Vec<Move>)> = board
        .live_snakes()
        .filter(|(slot, _)| *slot != you)
        .map(|(_, snake)| (snake.id.as_str(), moves_or_fallback(board, snake, wrapped)))
        .collect();
    let pairings = opponents.iter().map(|(_, moves)| moves.len()).max().unwrap_or(1);

    let mut joint = Vec::new();
    for my_move in get_moves(board, me, wrapped) {
        for i in 0..pairings {
            let mut set = Vec::with_capacity(opponents.len() + 1);
            set.push(SnakeMove::new(me.id.clone(), my_move.dir));
            for (id, moves) in &opponents {
                set.push(SnakeMove::new(*id, moves[i % moves.len()].dir));
            }
            joint.push((my_move, set));
        }
    }
    joint
}

/// Populates the children of `id` once. Joint moves the rules engine rejects
/// are logged and skipped; the remaining children are still added.
pub fn expand_node<R: Ruleset + ?Sized>(
    tree: &mut Tree,
    id: NodeId,
    you: usize,
    ruleset: &R,
    rng: &mut dyn RngCore,
) -> ExpandReport {
    let node = tree.node(id);
    if node.expanded || node.played {
        return ExpandReport::default();
    }

    let board = &node.board;
    let mut report = ExpandReport::default();
    let mut outcomes = Vec::new();
    for (my_move, set) in joint_moves(board, you, ruleset.is_wrapped()) {
        match ruleset.create_next_board_state(board, &set, rng) {
            Ok(next) => outcomes.push((next, my_move)),
            Err(e) => {
                warn!("Skipping joint move {:?}: {}", set, e);
                report.failed_transitions += 1;
            }
        }
    }

    tree.node_mut(id).expanded = true;
    for (next, my_move) in outcomes {
        tree.add_child(id, next, my_move);
        report.children += 1;
    }
    report
}
