// Solo ruleset: a single snake plays until it is eliminated

use rand::RngCore;

use super::{BoardState, RulesError, Ruleset, SnakeMove, StandardRuleset, SOLO};
use crate::types::RulesetSettings;

#[derive(Debug, Clone)]
pub struct SoloRuleset {
    standard: StandardRuleset,
}

impl SoloRuleset {
    pub fn new(standard: StandardRuleset) -> Self {
        SoloRuleset { standard }
    }
}

impl Ruleset for SoloRuleset {
    fn name(&self) -> &str {
        SOLO
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
        self.standard.create_next_board_state(state, moves, rng)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        state.alive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::rules::EliminationCause;
    use crate::types::Coord;

    #[test]
    fn test_game_continues_with_one_snake() {
        let ruleset = SoloRuleset::new(StandardRuleset::new(
            RulesetSettings::default(),
            &Config::default_hardcoded().game_rules,
        ));
        let mut state = BoardState::new(7, 7);
        state
            .place_snake("a", vec![Coord::new(3, 3), Coord::new(3, 2)])
            .unwrap();

        assert!(!ruleset.is_game_over(&state));

        state.snakes[0].eliminated_cause = Some(EliminationCause::OutOfHealth);
        assert!(ruleset.is_game_over(&state));
    }
}
