// Board state owned by the rules engine
//
// Eliminated snakes are kept in `snakes` with their cause recorded, so a
// snake's index in the list is stable for the lifetime of a game. The search
// uses that index as the key of its per-snake score tables.

use serde::Serialize;

use super::RulesError;
use crate::types::{Board, Coord, Direction};

/// Health a freshly placed snake starts with
pub const SNAKE_MAX_HEALTH: i32 = 100;

/// Why a snake was removed from active play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EliminationCause {
    OutOfHealth,
    SelfCollision,
    Collision,
    HeadToHeadCollision,
    OutOfBounds,
}

/// A snake as tracked by the rules engine.
/// `body` is never empty once the snake has been placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub id: String,
    pub body: Vec<Coord>,
    pub health: i32,
    pub eliminated_cause: Option<EliminationCause>,
    pub eliminated_by: Option<String>,
}

impl Snake {
    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn tail(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    /// Neck segment, present once the snake is at least two cells long
    pub fn neck(&self) -> Option<Coord> {
        self.body.get(1).copied()
    }

    pub fn is_alive(&self) -> bool {
        self.eliminated_cause.is_none()
    }

    /// A snake that just ate carries a duplicated tail segment, so its tail
    /// stays put on the next step.
    pub fn just_ate(&self) -> bool {
        let len = self.body.len();
        len >= 2 && self.body[len - 1] == self.body[len - 2]
    }
}

/// One entry of a joint move set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeMove {
    pub id: String,
    pub dir: Direction,
}

impl SnakeMove {
    pub fn new(id: impl Into<String>, dir: Direction) -> Self {
        SnakeMove { id: id.into(), dir }
    }
}

/// Complete simulated board. Cloning is a deep copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub turn: i32,
    pub width: i32,
    pub height: i32,
    pub food: Vec<Coord>,
    pub hazards: Vec<Coord>,
    pub snakes: Vec<Snake>,
}

impl BoardState {
    /// Creates an empty board
    pub fn new(width: i32, height: i32) -> Self {
        BoardState {
            turn: 0,
            width,
            height,
            food: Vec::new(),
            hazards: Vec::new(),
            snakes: Vec::new(),
        }
    }

    /// Places a snake with full health. The body is ordered head first.
    pub fn place_snake(&mut self, id: impl Into<String>, body: Vec<Coord>) -> Result<(), RulesError> {
        let id = id.into();
        if body.is_empty() {
            return Err(RulesError::ZeroLengthSnake(id));
        }
        self.snakes.push(Snake {
            id,
            body,
            health: SNAKE_MAX_HEALTH,
            eliminated_cause: None,
            eliminated_by: None,
        });
        Ok(())
    }

    pub fn set_food(&mut self, food: Vec<Coord>) {
        self.food = food;
    }

    pub fn set_hazards(&mut self, hazards: Vec<Coord>) {
        self.hazards = hazards;
    }

    /// Builds the simulated board from an API snapshot.
    /// Health values are taken from the snapshot rather than reset.
    pub fn from_api(board: &Board, turn: i32) -> Result<Self, RulesError> {
        if board.width <= 0 || board.height <= 0 {
            return Err(RulesError::InvalidDimensions {
                width: board.width,
                height: board.height,
            });
        }

        let mut state = BoardState::new(board.width, board.height);
        state.turn = turn;
        for snake in &board.snakes {
            state.place_snake(snake.id.clone(), snake.body.clone())?;
            if let Some(placed) = state.snakes.last_mut() {
                placed.health = snake.health;
            }
        }
        state.set_food(board.food.clone());
        state.set_hazards(board.hazards.clone());
        Ok(state)
    }

    /// Position of a snake in `snakes`
    pub fn snake_index(&self, id: &str) -> Result<usize, RulesError> {
        self.snakes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RulesError::SnakeNotFound(id.to_string()))
    }

    pub fn snake(&self, id: &str) -> Result<&Snake, RulesError> {
        self.snake_index(id).map(|idx| &self.snakes[idx])
    }

    /// Snakes still in play, with their stable index
    pub fn live_snakes(&self) -> impl Iterator<Item = (usize, &Snake)> {
        self.snakes.iter().enumerate().filter(|(_, s)| s.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|s| s.is_alive()).count()
    }

    pub fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Wraps a coordinate around the board edges
    pub fn wrap(&self, coord: Coord) -> Coord {
        Coord {
            x: coord.x.rem_euclid(self.width),
            y: coord.y.rem_euclid(self.height),
        }
    }

    /// Cells covered by neither a live snake nor food
    pub fn unoccupied_points(&self) -> Vec<Coord> {
        let cells = (self.width * self.height) as usize;
        let mut occupied = vec![false; cells];
        let mut mark = |c: &Coord| {
            if self.in_bounds(c) {
                occupied[(c.y * self.width + c.x) as usize] = true;
            }
        };
        for (_, snake) in self.live_snakes() {
            snake.body.iter().for_each(&mut mark);
        }
        self.food.iter().for_each(&mut mark);

        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Coord { x, y }))
            .filter(|c| !occupied[(c.y * self.width + c.x) as usize])
            .collect()
    }
}
