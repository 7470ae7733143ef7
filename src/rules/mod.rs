// Rules engine used by the search to simulate turns
//
// Mirrors the official Battlesnake rules closely enough for playouts:
// standard, solo and wrapped variants share one transition pipeline.

mod board;
mod food;
mod solo;
mod standard;
mod wrapped;

use rand::RngCore;
use thiserror::Error;

pub use board::{BoardState, EliminationCause, Snake, SnakeMove, SNAKE_MAX_HEALTH};
pub use food::{maybe_spawn_food, place_food_randomly};
pub use solo::SoloRuleset;
pub use standard::StandardRuleset;
pub use wrapped::WrappedRuleset;

use crate::config::GameRulesConfig;
use crate::types::{RulesetInfo, RulesetSettings};

pub const STANDARD: &str = "standard";
pub const SOLO: &str = "solo";
pub const WRAPPED: &str = "wrapped";

/// Failures reported by the rules engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("snake '{0}' has a zero-length body")]
    ZeroLengthSnake(String),
    #[error("no move submitted for live snake '{0}'")]
    NoMoveFound(String),
    #[error("snake '{0}' not found on the board")]
    SnakeNotFound(String),
    #[error("invalid board dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
}

/// A ruleset variant: turn transition, game-over test and parameters.
///
/// The RNG is only consumed by food spawning.
pub trait Ruleset {
    fn name(&self) -> &str;

    fn settings(&self) -> &RulesetSettings;

    /// Whether moves off one edge re-enter on the opposite edge
    fn is_wrapped(&self) -> bool {
        self.name() == WRAPPED
    }

    /// Applies one joint move set and returns the resulting board.
    /// `state` is left untouched.
    fn create_next_board_state(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        rng: &mut dyn RngCore,
    ) -> Result<BoardState, RulesError>;

    fn is_game_over(&self, state: &BoardState) -> bool;
}

/// Selects the ruleset variant for a game. Unknown names play by the standard rules.
pub fn ruleset_for(info: &RulesetInfo, rules: &GameRulesConfig) -> Box<dyn Ruleset + Send + Sync> {
    let standard = StandardRuleset::new(info.settings, rules);
    match info.name.as_str() {
        SOLO => Box::new(SoloRuleset::new(standard)),
        WRAPPED => Box::new(WrappedRuleset::new(standard)),
        _ => Box::new(standard),
    }
}
