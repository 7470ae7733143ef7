// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    pub ruleset: RulesetInfo,
    pub timeout: u32,
    #[serde(default)]
    pub source: String,
}

/// Ruleset name, version and settings as sent by the game engine
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RulesetInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub settings: RulesetSettings,
}

/// Ruleset parameters consumed by the rules engine.
/// Missing fields fall back to the engine's published defaults.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RulesetSettings {
    #[serde(default = "default_food_spawn_chance")]
    pub food_spawn_chance: i32,
    #[serde(default = "default_minimum_food")]
    pub minimum_food: i32,
    #[serde(default = "default_hazard_damage_per_turn")]
    pub hazard_damage_per_turn: i32,
}

fn default_food_spawn_chance() -> i32 {
    15
}

fn default_minimum_food() -> i32 {
    1
}

fn default_hazard_damage_per_turn() -> i32 {
    14
}

impl Default for RulesetSettings {
    fn default() -> Self {
        RulesetSettings {
            food_spawn_chance: default_food_spawn_chance(),
            minimum_food: default_minimum_food(),
            hazard_damage_per_turn: default_hazard_damage_per_turn(),
        }
    }
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }

    /// Compact encoding used for lock-free publication of the best move
    pub fn index(&self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Inverse of [`Direction::index`]; unknown values decode to `Left`
    pub fn from_index(idx: u8) -> Direction {
        match idx {
            0 => Direction::Up,
            1 => Direction::Down,
            3 => Direction::Right,
            _ => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("Down".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!("LEFT".parse::<Direction>().unwrap(), Direction::Left);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_index_round_trip() {
        for dir in Direction::all() {
            assert_eq!(Direction::from_index(dir.index()), dir);
        }
    }

    #[test]
    fn test_game_state_deserializes_with_missing_settings() {
        let raw = r#"{
            "game": {"id": "g1", "ruleset": {"name": "wrapped"}, "timeout": 500},
            "turn": 3,
            "board": {
                "height": 11, "width": 11, "food": [{"x": 1, "y": 1}],
                "snakes": [{
                    "id": "s1", "name": "one", "health": 90,
                    "body": [{"x": 5, "y": 5}, {"x": 5, "y": 4}],
                    "head": {"x": 5, "y": 5}, "length": 2
                }]
            },
            "you": {
                "id": "s1", "name": "one", "health": 90,
                "body": [{"x": 5, "y": 5}, {"x": 5, "y": 4}],
                "head": {"x": 5, "y": 5}, "length": 2
            }
        }"#;

        let state: GameState = serde_json::from_str(raw).expect("valid game state");
        assert_eq!(state.game.ruleset.name, "wrapped");
        assert_eq!(state.game.ruleset.settings, RulesetSettings::default());
        assert!(state.board.hazards.is_empty());
        assert_eq!(state.you.shout, None);
    }

    #[test]
    fn test_ruleset_settings_use_camel_case() {
        let settings: RulesetSettings = serde_json::from_str(
            r#"{"foodSpawnChance": 25, "minimumFood": 2, "hazardDamagePerTurn": 100}"#,
        )
        .unwrap();
        assert_eq!(settings.food_spawn_chance, 25);
        assert_eq!(settings.minimum_food, 2);
        assert_eq!(settings.hazard_damage_per_turn, 100);
    }
}
