// Food spawning between turns

use rand::{Rng, RngCore};

use super::BoardState;
use crate::types::RulesetSettings;

/// Tops the board up to `minimum_food`; when already there, spawns one food
/// with `food_spawn_chance` percent probability.
pub fn maybe_spawn_food(state: &mut BoardState, settings: &RulesetSettings, rng: &mut dyn RngCore) {
    let current = state.food.len() as i32;
    if current < settings.minimum_food {
        place_food_randomly(state, (settings.minimum_food - current) as usize, rng);
    } else if settings.food_spawn_chance > 0 && rng.random_range(0..100) < settings.food_spawn_chance {
        place_food_randomly(state, 1, rng);
    }
}

/// Places up to `n` food on random unoccupied cells
pub fn place_food_randomly(state: &mut BoardState, n: usize, rng: &mut dyn RngCore) {
    for _ in 0..n {
        let free = state.unoccupied_points();
        if free.is_empty() {
            return;
        }
        let spot = free[rng.random_range(0..free.len())];
        state.food.push(spot);
    }
}
