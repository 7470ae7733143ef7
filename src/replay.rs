// Replay module for analyzing historical game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs written by the bot
// 2. Re-run the tree search on the logged positions
// 3. Compare the logged moves against the replayed ones

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::search::RootChild;
use crate::types::{Direction, Game};

/// Upper bound on a replayed search that runs to a fixed iteration count
const ITERATION_MODE_TIMEOUT_SECS: u64 = 600;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game_id: String,
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub original_iterations: u32,
    pub replayed_iterations: u32,
    pub root_children: Vec<RootChild>,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Game ids in the order they first appear
    pub fn game_ids(entries: &[LogEntry]) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for entry in entries {
            if !ids.contains(&entry.game_id) {
                ids.push(entry.game_id.clone());
            }
        }
        ids
    }

    pub fn entries_for_game(entries: &[LogEntry], game_id: &str) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|e| e.game_id == game_id)
            .cloned()
            .collect()
    }

    /// Re-runs the search on one logged position
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying {} turn {}...", entry.game_id, entry.turn);
        }

        let game = Game {
            id: entry.game_id.clone(),
            ruleset: entry.ruleset.clone(),
            timeout: entry.timeout,
            source: String::new(),
        };
        let start_time = Instant::now();
        // A fixed iteration count replaces the time budget
        let budget = if self.config.search.iteration_limit > 0 {
            Duration::from_secs(ITERATION_MODE_TIMEOUT_SECS)
        } else {
            Duration::from_millis(self.config.timing.budget_for_timeout_ms(entry.timeout))
        };
        let deadline = start_time + budget;

        let outcome = Bot::compute_move(
            &self.config,
            &game,
            entry.turn,
            &entry.board,
            &entry.you_id,
            deadline,
            &(),
        )
        .map_err(|e| format!("Search failed on turn {}: {}", entry.turn, e))?;

        let computation_time = start_time.elapsed().as_millis();
        let matches = entry.chosen_move == outcome.best_move;

        let result = ReplayResult {
            game_id: entry.game_id.clone(),
            turn: entry.turn,
            original_move: entry.chosen_move,
            replayed_move: outcome.best_move,
            matches,
            original_iterations: entry.iterations,
            replayed_iterations: outcome.stats.iterations,
            root_children: outcome.root_children,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} ({} iterations, time: {}ms)",
                    entry.turn,
                    result.replayed_move.as_str(),
                    result.replayed_iterations,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} ({} iterations, time: {}ms)",
                    entry.turn,
                    result.original_move.as_str(),
                    result.replayed_move.as_str(),
                    result.replayed_iterations,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays every entry, skipping the ones that fail
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries
            .iter()
            .filter_map(|entry| match self.replay_entry(entry) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns. Each turn must be present in `entries`.
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => warn!("Failed to replay turn {}: {}", turn_num, e),
            }
        }

        Ok(results)
    }

    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let n = results.len() as f64;
            let avg_time: f64 = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>() / n;
            let avg_iterations: f64 =
                results.iter().map(|r| f64::from(r.replayed_iterations)).sum::<f64>() / n;

            println!("Average Iterations:         {:.1}", avg_iterations);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                let children: Vec<String> = result
                    .root_children
                    .iter()
                    .map(|c| format!("{}:{}/{}", c.dir, c.score, c.visits))
                    .collect();
                println!(
                    "{} turn {}: {} → {} ({} vs {} iterations) [{}]",
                    result.game_id,
                    result.turn,
                    result.original_move.as_str(),
                    result.replayed_move.as_str(),
                    result.original_iterations,
                    result.replayed_iterations,
                    children.join(" ")
                );
            }
            println!();
        }
    }

    /// Checks that the logged move of each listed turn is one of the acceptable moves
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)],
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    entry.chosen_move.as_str()
                ));
            }
        }

        Ok(())
    }
}
