// Standard ruleset: bounded board, last snake standing

use rand::RngCore;

use super::food::maybe_spawn_food;
use super::{BoardState, EliminationCause, RulesError, Ruleset, SnakeMove, STANDARD};
use crate::config::GameRulesConfig;
use crate::types::RulesetSettings;

#[derive(Debug, Clone)]
pub struct StandardRuleset {
    settings: RulesetSettings,
    health_on_food: i32,
    health_loss_per_turn: i32,
}

impl StandardRuleset {
    pub fn new(settings: RulesetSettings, rules: &GameRulesConfig) -> Self {
        StandardRuleset {
            settings,
            health_on_food: rules.health_on_food,
            health_loss_per_turn: rules.health_loss_per_turn,
        }
    }

    /// The full turn pipeline. `wrapped` switches edge handling for the
    /// wrapped variant, which otherwise plays by these rules.
    pub(super) fn advance(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        rng: &mut dyn RngCore,
        wrapped: bool,
    ) -> Result<BoardState, RulesError> {
        let mut next = state.clone();
        next.turn += 1;

        Self::move_snakes(&mut next, moves, wrapped)?;
        self.reduce_health(&mut next);
        self.damage_hazards(&mut next);
        self.feed_snakes(&mut next);
        maybe_spawn_food(&mut next, &self.settings, rng);
        Self::eliminate_snakes(&mut next, wrapped);

        Ok(next)
    }

    fn move_snakes(state: &mut BoardState, moves: &[SnakeMove], wrapped: bool) -> Result<(), RulesError> {
        for mv in moves {
            state.snake_index(&mv.id)?;
        }

        for idx in 0..state.snakes.len() {
            let snake = &state.snakes[idx];
            if !snake.is_alive() {
                continue;
            }
            if snake.body.is_empty() {
                return Err(RulesError::ZeroLengthSnake(snake.id.clone()));
            }

            let dir = moves
                .iter()
                .find(|m| m.id == snake.id)
                .map(|m| m.dir)
                .ok_or_else(|| RulesError::NoMoveFound(snake.id.clone()))?;

            let mut new_head = dir.apply(&snake.head());
            if wrapped {
                new_head = state.wrap(new_head);
            }

            let body = &mut state.snakes[idx].body;
            body.insert(0, new_head);
            body.pop();
        }
        Ok(())
    }

    fn reduce_health(&self, state: &mut BoardState) {
        for snake in state.snakes.iter_mut().filter(|s| s.is_alive()) {
            snake.health -= self.health_loss_per_turn;
        }
    }

    fn damage_hazards(&self, state: &mut BoardState) {
        if self.settings.hazard_damage_per_turn <= 0 || state.hazards.is_empty() {
            return;
        }
        let hazards = &state.hazards;
        let food = &state.food;
        for snake in state.snakes.iter_mut().filter(|s| s.is_alive()) {
            let head = snake.head();
            if hazards.contains(&head) && !food.contains(&head) {
                snake.health = (snake.health - self.settings.hazard_damage_per_turn).max(0);
            }
        }
    }

    fn feed_snakes(&self, state: &mut BoardState) {
        let mut eaten = Vec::new();
        for snake in state.snakes.iter_mut().filter(|s| s.is_alive()) {
            let head = snake.head();
            if state.food.contains(&head) {
                snake.health = self.health_on_food;
                let tail = snake.tail();
                snake.body.push(tail);
                eaten.push(head);
            }
        }
        state.food.retain(|f| !eaten.contains(f));
    }

    fn eliminate_snakes(state: &mut BoardState, wrapped: bool) {
        let (width, height) = (state.width, state.height);
        for snake in state.snakes.iter_mut().filter(|s| s.is_alive()) {
            let head = snake.head();
            if snake.health <= 0 {
                snake.eliminated_cause = Some(EliminationCause::OutOfHealth);
            } else if !wrapped && (head.x < 0 || head.x >= width || head.y < 0 || head.y >= height) {
                snake.eliminated_cause = Some(EliminationCause::OutOfBounds);
            }
        }

        // Collisions are judged against the bodies as they stand after movement,
        // then applied together so mutual collisions eliminate both snakes.
        let mut collisions = Vec::new();
        let alive: Vec<usize> = state.live_snakes().map(|(idx, _)| idx).collect();
        for &idx in &alive {
            let snake = &state.snakes[idx];
            let head = snake.head();

            if snake.body[1..].contains(&head) {
                collisions.push((idx, EliminationCause::SelfCollision, snake.id.clone()));
                continue;
            }

            let body_hit = alive
                .iter()
                .map(|&o| &state.snakes[o])
                .find(|other| other.id != snake.id && other.body[1..].contains(&head));
            if let Some(other) = body_hit {
                collisions.push((idx, EliminationCause::Collision, other.id.clone()));
                continue;
            }

            let head_loss = alive.iter().map(|&o| &state.snakes[o]).find(|other| {
                other.id != snake.id && other.head() == head && snake.body.len() <= other.body.len()
            });
            if let Some(other) = head_loss {
                collisions.push((idx, EliminationCause::HeadToHeadCollision, other.id.clone()));
            }
        }

        for (idx, cause, by) in collisions {
            let snake = &mut state.snakes[idx];
            snake.eliminated_cause = Some(cause);
            snake.eliminated_by = Some(by);
        }
    }

    /// Game over once at most one snake is left
    pub(super) fn last_snake_standing(state: &BoardState) -> bool {
        state.alive_count() <= 1
    }
}

impl Ruleset for StandardRuleset {
    fn name(&self) -> &str {
        STANDARD
    }

    fn settings(&self) -> &RulesetSettings {
        &self.settings
    }

    fn create_next_board_state(
        &self,
        state: &BoardState,
        moves: &[SnakeMove],
        rng: &mut dyn RngCore,
    ) -> Result<BoardState, RulesError> {
        self.advance(state, moves, rng, false)
    }

    fn is_game_over(&self, state: &BoardState) -> bool {
        Self::last_snake_standing(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::{Coord, Direction};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_settings() -> RulesetSettings {
        RulesetSettings {
            food_spawn_chance: 0,
            minimum_food: 0,
            hazard_damage_per_turn: 14,
        }
    }

    fn ruleset() -> StandardRuleset {
        StandardRuleset::new(quiet_settings(), &Config::default_hardcoded().game_rules)
    }

    fn body(cells: &[(i32, i32)]) -> Vec<Coord> {
        cells.iter().map(|&(x, y)| Coord::new(x, y)).collect()
    }

    fn step(state: &BoardState, moves: &[(&str, Direction)]) -> BoardState {
        let moves: Vec<SnakeMove> = moves.iter().map(|&(id, d)| SnakeMove::new(id, d)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        ruleset()
            .create_next_board_state(state, &moves, &mut rng)
            .expect("transition should succeed")
    }

    #[test]
    fn test_move_shifts_body_and_costs_health() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4), (5, 3)])).unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2), (1, 3)])).unwrap();

        let next = step(&state, &[("a", Direction::Up), ("b", Direction::Down)]);

        assert_eq!(next.turn, 1);
        assert_eq!(next.snakes[0].body, body(&[(5, 6), (5, 5), (5, 4)]));
        assert_eq!(next.snakes[0].health, 99);
        assert_eq!(next.snakes[1].body, body(&[(1, 0), (1, 1), (1, 2)]));
        // The source state is never mutated
        assert_eq!(state.snakes[0].body, body(&[(5, 5), (5, 4), (5, 3)]));
    }

    #[test]
    fn test_eating_grows_and_restores_health() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4), (5, 3)])).unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2), (1, 3)])).unwrap();
        state.snakes[0].health = 30;
        state.set_food(vec![Coord::new(5, 6)]);

        let next = step(&state, &[("a", Direction::Up), ("b", Direction::Down)]);

        assert_eq!(next.snakes[0].health, 100);
        assert_eq!(next.snakes[0].body, body(&[(5, 6), (5, 5), (5, 4), (5, 4)]));
        assert!(next.snakes[0].just_ate());
        assert!(next.food.is_empty());
    }

    #[test]
    fn test_wall_collision_eliminates() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(0, 5), (1, 5), (2, 5)])).unwrap();
        state.place_snake("b", body(&[(8, 8), (8, 7), (8, 6)])).unwrap();

        let next = step(&state, &[("a", Direction::Left), ("b", Direction::Up)]);

        assert_eq!(next.snakes[0].eliminated_cause, Some(EliminationCause::OutOfBounds));
        assert!(next.snakes[1].is_alive());
        assert!(ruleset().is_game_over(&next));
    }

    #[test]
    fn test_body_collision_credits_the_other_snake() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(4, 5), (3, 5), (2, 5)])).unwrap();
        state.place_snake("b", body(&[(5, 6), (5, 5), (5, 4), (5, 3)])).unwrap();

        let next = step(&state, &[("a", Direction::Right), ("b", Direction::Up)]);

        assert_eq!(next.snakes[0].eliminated_cause, Some(EliminationCause::Collision));
        assert_eq!(next.snakes[0].eliminated_by.as_deref(), Some("b"));
        assert!(next.snakes[1].is_alive());
    }

    #[test]
    fn test_self_collision_eliminates() {
        let mut state = BoardState::new(11, 11);
        state
            .place_snake("a", body(&[(5, 5), (6, 5), (6, 4), (5, 4), (4, 4)]))
            .unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2), (1, 3)])).unwrap();

        let next = step(&state, &[("a", Direction::Down), ("b", Direction::Down)]);

        assert_eq!(next.snakes[0].eliminated_cause, Some(EliminationCause::SelfCollision));
    }

    #[test]
    fn test_head_to_head_shorter_snake_loses() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(4, 5), (3, 5), (2, 5)])).unwrap();
        state
            .place_snake("b", body(&[(6, 5), (7, 5), (8, 5), (9, 5)]))
            .unwrap();

        let next = step(&state, &[("a", Direction::Right), ("b", Direction::Left)]);

        assert_eq!(
            next.snakes[0].eliminated_cause,
            Some(EliminationCause::HeadToHeadCollision)
        );
        assert!(next.snakes[1].is_alive());
    }

    #[test]
    fn test_head_to_head_equal_length_both_lose() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(4, 5), (3, 5), (2, 5)])).unwrap();
        state.place_snake("b", body(&[(6, 5), (7, 5), (8, 5)])).unwrap();

        let next = step(&state, &[("a", Direction::Right), ("b", Direction::Left)]);

        assert!(!next.snakes[0].is_alive());
        assert!(!next.snakes[1].is_alive());
        assert!(ruleset().is_game_over(&next));
    }

    #[test]
    fn test_starvation_eliminates() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4), (5, 3)])).unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2), (1, 3)])).unwrap();
        state.snakes[0].health = 1;

        let next = step(&state, &[("a", Direction::Up), ("b", Direction::Down)]);

        assert_eq!(next.snakes[0].eliminated_cause, Some(EliminationCause::OutOfHealth));
    }

    #[test]
    fn test_hazard_damage_applies_off_food() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4), (5, 3)])).unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2), (1, 3)])).unwrap();
        state.set_hazards(vec![Coord::new(5, 6)]);

        let next = step(&state, &[("a", Direction::Up), ("b", Direction::Down)]);

        assert_eq!(next.snakes[0].health, 100 - 1 - 14);
        assert_eq!(next.snakes[1].health, 99);
    }

    #[test]
    fn test_eliminated_snakes_need_no_move() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4), (5, 3)])).unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2), (1, 3)])).unwrap();
        state.place_snake("c", body(&[(9, 9), (9, 8), (9, 7)])).unwrap();
        state.snakes[1].eliminated_cause = Some(EliminationCause::OutOfHealth);

        let next = step(&state, &[("a", Direction::Up), ("c", Direction::Up)]);

        assert_eq!(next.snakes[1].body, state.snakes[1].body);
        assert_eq!(next.alive_count(), 2);
    }

    #[test]
    fn test_missing_move_is_an_error() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4)])).unwrap();
        state.place_snake("b", body(&[(1, 1), (1, 2)])).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let result =
            ruleset().create_next_board_state(&state, &[SnakeMove::new("a", Direction::Up)], &mut rng);

        assert_eq!(result, Err(RulesError::NoMoveFound("b".to_string())));
    }

    #[test]
    fn test_move_for_unknown_snake_is_an_error() {
        let mut state = BoardState::new(11, 11);
        state.place_snake("a", body(&[(5, 5), (5, 4)])).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let moves = [
            SnakeMove::new("a", Direction::Up),
            SnakeMove::new("ghost", Direction::Up),
        ];

        let result = ruleset().create_next_board_state(&state, &moves, &mut rng);

        assert_eq!(result, Err(RulesError::SnakeNotFound("ghost".to_string())));
    }
}
