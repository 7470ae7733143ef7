// Wrapped ruleset: toroidal board, otherwise standard

use rand::RngCore;

use super::{BoardState, RulesError, Ruleset, SnakeMove, StandardRuleset, WRAPPED};
use crate::types::RulesetSettings;

#[derive(Debug, Clone)]
pub struct WrappedRuleset {
    standard: StandardRuleset,
}

impl WrappedRuleset {
    pub fn new(standard: StandardRuleset) -> Self {
        WrappedRuleset { standard }
    }
}

impl Ruleset for WrappedRuleset {
    fn name(&self) -> &str {
        WRAPPED
    }

    fn settings(&self) -> &RulesetSettings {
        self.standard.settings()
    }

    fn create_next_board_state(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        rng: &mut dyn RngCore,
    ) -> Result<BoardState, RulesError> {
        self.standard.advance(state, moves, rng, true)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        StandardRuleset::last_snake_standing(state)
    }
}
