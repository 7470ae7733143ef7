// Random playouts
//
// Every live snake plays a uniformly random legal move until the ruleset
// declares the game over or the turn cap is hit. Snakes score +1 if they are
// still alive at the end and -1 otherwise.

use rand::{Rng, RngCore};

use super::moves::moves_or_fallback;
use super::tree::{NodeId, Tree};
use crate::rules::{BoardState, RulesError, Ruleset, SnakeMove};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutResult {
    /// Score change per snake slot
    pub deltas: Vec<i32>,
    pub turns: u32,
    /// True when the turn cap stopped the playout before the game ended
    pub capped: bool,
}

/// Plays `board` out. `turn_limit` of 0 means no cap.
pub fn rollout<R: Ruleset + ?Sized>(
    board: &BoardState,
    ruleset: &R,
    rng: &mut dyn RngCore,
    turn_limit: u32,
) -> Result<RolloutResult, RulesError> {
    let wrapped = ruleset.is_wrapped();
    let mut state = board.clone();
    let mut turns = 0;
    let mut capped = false;

    while !ruleset.is_game_over(&state) {
        if turn_limit > 0 && turns >= turn_limit {
            capped = true;
            break;
        }
        let joint: Vec<SnakeMove> = state
            .live_snakes()
            .map(|(_, snake)| {
                let moves = moves_or_fallback(&state, snake, wrapped);
                let pick = moves[rng.random_range(0..moves.len())];
                SnakeMove::new(snake.id.clone(), pick.dir)
            })
            .collect();
        state = ruleset.create_next_board_state(&state, &joint, rng)?;
        turns += 1;
    }

    let deltas = state
        .snakes
        .iter()
        .map(|s| if s.is_alive() { 1 } else { -1 })
        .collect();
    Ok(RolloutResult {
        deltas,
        turns,
        capped,
    })
}

/// Rolls out the board stored at `id` and marks the node as played
pub fn rollout_node<R: Ruleset + ?Sized>(
    tree: &mut Tree,
    id: NodeId,
    ruleset: &R,
    rng: &mut dyn RngCore,
    turn_limit: u32,
) -> Result<RolloutResult, RulesError> {
    let result = rollout(&tree.node(id).board, ruleset, rng, turn_limit)?;
    tree.node_mut(id).played = true;
    Ok(result)
}
