// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub heuristics: HeuristicsConfig,
    pub game_rules: GameRulesConfig,
    pub debug: DebugConfig,
}

/// Timing and performance constants
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub response_time_budget_ms: u64,
    pub network_overhead_ms: u64,
    pub polling_interval_ms: u64,
}

impl TimingConfig {
    /// Computes the effective computation budget
    pub fn effective_budget_ms(&self) -> u64 {
        self.response_time_budget_ms.saturating_sub(self.network_overhead_ms)
    }

    /// Computation budget for a game whose engine timeout is `timeout_ms`.
    /// The tighter of the configured budget and the engine timeout wins.
    pub fn budget_for_timeout_ms(&self, timeout_ms: u32) -> u64 {
        let budget = if timeout_ms == 0 {
            self.response_time_budget_ms
        } else {
            self.response_time_budget_ms.min(timeout_ms as u64)
        };
        budget.saturating_sub(self.network_overhead_ms)
    }
}

/// Monte Carlo tree search parameters
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// UCB exploration constant
    pub exploration_constant: f64,
    /// Stop after this many select/expand/rollout/backpropagate cycles (0 = deadline only)
    pub iteration_limit: u32,
    /// Hard cap on simulated turns per rollout (0 = until game over)
    pub rollout_turn_limit: u32,
    /// Independent trees searched in parallel on the rayon pool
    pub parallel_trees: usize,
    /// Publish the current best move every N iterations
    pub publish_interval: u32,
    /// Fixed RNG seed; seeded from the OS when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Optional evaluators blended into the selection value.
/// A weight of zero disables the evaluator.
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicsConfig {
    pub territory_weight: f64,
    pub sibling_penalty_weight: f64,
}

impl HeuristicsConfig {
    pub fn is_enabled(&self) -> bool {
        self.territory_weight != 0.0 || self.sibling_penalty_weight != 0.0
    }
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                response_time_budget_ms: 400,
                network_overhead_ms: 100,
                polling_interval_ms: 10,
            },
            search: SearchConfig {
                exploration_constant: 2.4,
                iteration_limit: 0,
                rollout_turn_limit: 1000,
                parallel_trees: 1,
                publish_interval: 64,
                seed: None,
            },
            heuristics: HeuristicsConfig {
                territory_weight: 0.0,
                sibling_penalty_weight: 0.0,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}
