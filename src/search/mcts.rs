// Anytime decision loop
//
// Each cycle selects a leaf, expands it if it has not been played out yet,
// rolls out one random child (or the leaf itself) and backpropagates the
// per-snake result. When time or the iteration limit runs out, the root
// children are ranked by the controlled snake's raw cumulative score.

use std::time::Instant;

use log::{debug, warn};
use rand::{Rng, RngCore};
use serde::Serialize;

use super::expand::expand_node;
use super::heuristics::Heuristics;
use super::moves::{fallback_move, get_moves, GENERATION_ORDER};
use super::rollout::rollout_node;
use super::select::SelectionPolicy;
use super::tree::{NodeId, Tree};
use super::SearchError;
use crate::config::SearchConfig;
use crate::rules::{BoardState, Ruleset};
use crate::types::Direction;

/// Counters collected over one search
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub iterations: u32,
    pub expansions: u32,
    pub children_created: u32,
    pub rollouts: u32,
    pub rollout_turns: u64,
    pub transition_failures: u32,
    pub discarded_nodes: u32,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.iterations += other.iterations;
        self.expansions += other.expansions;
        self.children_created += other.children_created;
        self.rollouts += other.rollouts;
        self.rollout_turns += other.rollout_turns;
        self.transition_failures += other.transition_failures;
        self.discarded_nodes += other.discarded_nodes;
    }
}

/// Summary of one root child, in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RootChild {
    pub dir: Direction,
    pub score: i32,
    pub visits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub best_move: Direction,
    pub root_visits: u32,
    pub root_children: Vec<RootChild>,
    pub stats: SearchStats,
}

/// Receives the current best move while a search is running
pub trait SearchObserver: Sync {
    fn publish(&self, best_move: Direction, iterations: u32);
}

impl SearchObserver for () {
    fn publish(&self, _best_move: Direction, _iterations: u32) {}
}

pub struct Mcts<'a, R: Ruleset + ?Sized> {
    ruleset: &'a R,
    policy: SelectionPolicy,
    iteration_limit: u32,
    rollout_turn_limit: u32,
    publish_interval: u32,
}

impl<'a, R: Ruleset + ?Sized> Mcts<'a, R> {
    pub fn new(ruleset: &'a R, config: &SearchConfig, heuristics: Option<Heuristics>) -> Self {
        Mcts {
            ruleset,
            policy: SelectionPolicy::new(config.exploration_constant, heuristics),
            iteration_limit: config.iteration_limit,
            rollout_turn_limit: config.rollout_turn_limit,
            publish_interval: config.publish_interval,
        }
    }

    /// Caps the number of cycles; 0 leaves only the deadline
    pub fn with_iteration_limit(mut self, limit: u32) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// Searches from `board` for the snake with id `you` until `deadline`
    pub fn search(
        &self,
        board: &BoardState,
        you: &str,
        deadline: Instant,
        rng: &mut dyn RngCore,
        observer: &dyn SearchObserver,
    ) -> Result<SearchOutcome, SearchError> {
        let you_slot = board
            .snake_index(you)
            .map_err(|_| SearchError::SnakeNotFound(you.to_string()))?;
        let mut tree = Tree::new(board.clone(), fallback_move(&board.snakes[you_slot]));
        let mut stats = SearchStats::default();

        while self.iteration_limit == 0 || stats.iterations < self.iteration_limit {
            if Instant::now() >= deadline {
                break;
            }
            stats.iterations += 1;

            let leaf = self.policy.select(&tree, Tree::ROOT);
            let node = tree.node(leaf);
            if !node.played && !node.expanded {
                let report = expand_node(&mut tree, leaf, you_slot, self.ruleset, rng);
                stats.expansions += 1;
                stats.children_created += report.children as u32;
                stats.transition_failures += report.failed_transitions as u32;
            }

            let children = tree.children(leaf);
            let target = if children.is_empty() {
                leaf
            } else {
                children[rng.random_range(0..children.len())]
            };

            match rollout_node(&mut tree, target, self.ruleset, rng, self.rollout_turn_limit) {
                Ok(result) => {
                    stats.rollouts += 1;
                    stats.rollout_turns += u64::from(result.turns);
                    tree.backpropagate(target, &result.deltas);
                }
                Err(e) if target == Tree::ROOT => {
                    warn!("Rollout from the root failed, stopping search: {}", e);
                    stats.transition_failures += 1;
                    break;
                }
                Err(e) => {
                    debug!("Discarding node {} after failed rollout: {}", target, e);
                    stats.transition_failures += 1;
                    stats.discarded_nodes += 1;
                    tree.detach(target);
                }
            }

            if self.publish_interval > 0 && stats.iterations % self.publish_interval == 0 {
                if let Some(best) = best_root_child(&tree, you_slot) {
                    observer.publish(tree.node(best).mv.dir, stats.iterations);
                }
            }
        }

        let root_children = root_summary(&tree, you_slot);
        let best_move = match best_root_child(&tree, you_slot) {
            Some(best) => tree.node(best).mv.dir,
            None => {
                let fallback = fallback_direction(board, you_slot, self.ruleset.is_wrapped());
                warn!("Root has no children, falling back to {}", fallback);
                fallback
            }
        };
        observer.publish(best_move, stats.iterations);

        debug!(
            "Search finished: {} iterations, {} nodes, best {}",
            stats.iterations,
            tree.len(),
            best_move
        );

        Ok(SearchOutcome {
            best_move,
            root_visits: tree.root().visits,
            root_children,
            stats,
        })
    }
}

/// Root child with the highest raw score for `slot`; ties go to the earliest child
fn best_root_child(tree: &Tree, slot: usize) -> Option<NodeId> {
    let mut ranked: Vec<NodeId> = tree.children(Tree::ROOT).to_vec();
    ranked.sort_by_key(|&child| std::cmp::Reverse(tree.node(child).score(slot)));
    ranked.first().copied()
}

fn root_summary(tree: &Tree, slot: usize) -> Vec<RootChild> {
    tree.children(Tree::ROOT)
        .iter()
        .map(|&child| {
            let node = tree.node(child);
            RootChild {
                dir: node.mv.dir,
                score: node.score(slot),
                visits: node.visits,
            }
        })
        .collect()
}

/// Direction used when the root could not be expanded: the first legal move,
/// else the first on-board step that is not the neck, else any on-board step,
/// else left.
pub fn fallback_direction(board: &BoardState, slot: usize, wrapped: bool) -> Direction {
    let Some(snake) = board.snakes.get(slot).filter(|s| !s.body.is_empty()) else {
        return Direction::Left;
    };
    if let Some(mv) = get_moves(board, snake, wrapped).first() {
        return mv.dir;
    }

    let head = snake.head();
    let neck = snake.neck();
    let on_board = |dir: &Direction| {
        let target = dir.apply(&head);
        let target = if wrapped { board.wrap(target) } else { target };
        board.in_bounds(&target).then_some((*dir, target))
    };

    GENERATION_ORDER
        .iter()
        .filter_map(on_board)
        .find(|(_, target)| Some(*target) != neck)
        .or_else(|| GENERATION_ORDER.iter().filter_map(on_board).next())
        .map_or(Direction::Left, |(dir, _)| dir)
}
