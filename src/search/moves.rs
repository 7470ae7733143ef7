// Legal move generation
//
// Moves are produced in the fixed order left, right, down, up. Under the
// wrapped ruleset an off-board target re-enters on the opposite edge and keeps
// its direction label.

use crate::rules::{BoardState, Snake};
use crate::types::{Coord, Direction};

/// Order in which candidate moves are generated
pub const GENERATION_ORDER: [Direction; 4] =
    [Direction::Left, Direction::Right, Direction::Down, Direction::Up];

/// A single step: the target cell and the direction that reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub point: Coord,
    pub dir: Direction,
}

impl Move {
    pub fn new(point: Coord, dir: Direction) -> Self {
        Move { point, dir }
    }
}

/// Legal moves for `snake`: on the board, off every non-vacating body cell
/// and never back into its own neck.
pub fn get_moves(board: &BoardState, snake: &Snake, wrapped: bool) -> Vec<Move> {
    if snake.body.is_empty() {
        return Vec::new();
    }
    let neck = snake.neck();
    candidates(board, snake.head(), wrapped)
        .filter(|m| Some(m.point) != neck)
        .collect()
}

/// Neighbor variant used by flood fills: same as [`get_moves`] without the
/// neck filter, starting from an arbitrary cell.
pub fn get_neighbors(board: &BoardState, point: Coord, wrapped: bool) -> Vec<Move> {
    candidates(board, point, wrapped).collect()
}

/// The deterministic move used when a snake has nothing legal: one step left.
/// It usually walks the snake into a lethal cell on the next transition.
pub fn fallback_move(snake: &Snake) -> Move {
    let head = snake.head();
    Move::new(Direction::Left.apply(&head), Direction::Left)
}

/// Legal moves, or the single fallback move when there are none
pub fn moves_or_fallback(board: &BoardState, snake: &Snake, wrapped: bool) -> Vec<Move> {
    let moves = get_moves(board, snake, wrapped);
    if moves.is_empty() {
        vec![fallback_move(snake)]
    } else {
        moves
    }
}

/// Maps a single off-board step back onto the board.
/// x = -1 becomes width - 1 and x = width becomes 0; likewise for y.
pub fn adjust_for_wrapped(mv: Move, width: i32, height: i32) -> Move {
    let mut point = mv.point;
    if point.x < 0 {
        point.x = width - 1;
    } else if point.x >= width {
        point.x = 0;
    }
    if point.y < 0 {
        point.y = height - 1;
    } else if point.y >= height {
        point.y = 0;
    }
    Move::new(point, mv.dir)
}

/// Whether `point` is covered by a body segment that will still be there next
/// turn. A tail moves away unless its snake just ate.
pub fn is_snake(board: &BoardState, point: &Coord) -> bool {
    // Eliminated snakes are off the board for the rules engine, so they never block
    board.live_snakes().any(|(_, snake)| {
        let tail_idx = snake.body.len() - 1;
        let tail = snake.body[tail_idx];
        let blocks_body = snake.body[..tail_idx]
            .iter()
            .any(|segment| segment == point && *segment != tail);
        blocks_body || (tail == *point && snake.just_ate())
    })
}

fn candidates(board: &BoardState, from: Coord, wrapped: bool) -> impl Iterator<Item = Move> + '_ {
    GENERATION_ORDER.iter().filter_map(move |dir| {
        let mut mv = Move::new(dir.apply(&from), *dir);
        if wrapped {
            mv = adjust_for_wrapped(mv, board.width, board.height);
        }
        if board.in_bounds(&mv.point) && !is_snake(board, &mv.point) {
            Some(mv)
        } else {
            None
        }
    })
}
