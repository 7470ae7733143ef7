// Debug logging module for asynchronous game state logging
//
// Each decision is appended to a JSONL file by a fire-and-forget tokio task so
// the /move response never waits on disk I/O. The replay tool reads the same
// entries back.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::DebugConfig;
use crate::types::{Board, Direction, Game, RulesetInfo};

/// One decision as written to the debug log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub game_id: String,
    pub turn: i32,
    pub you_id: String,
    pub ruleset: RulesetInfo,
    #[serde(default)]
    pub timeout: u32,
    pub chosen_move: Direction,
    pub iterations: u32,
    pub board: Board,
    pub timestamp: String,
}

impl LogEntry {
    pub fn new(
        game: &Game,
        turn: i32,
        you_id: &str,
        board: &Board,
        chosen_move: Direction,
        iterations: u32,
    ) -> Self {
        LogEntry {
            game_id: game.id.clone(),
            turn,
            you_id: you_id.to_string(),
            ruleset: game.ruleset.clone(),
            timeout: game.timeout,
            chosen_move,
            iterations,
            board: board.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Appends decisions to a JSONL file; a no-op when disabled
#[derive(Clone)]
pub struct DebugLogger {
    file: Option<Arc<Mutex<File>>>,
}

impl DebugLogger {
    /// Opens (and truncates) the configured log file when debug logging is enabled.
    /// A file that cannot be created leaves the logger disabled.
    pub fn new(config: &DebugConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        match std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.log_file_path)
        {
            Ok(file) => {
                info!("Debug logging enabled: {}", config.log_file_path);
                DebugLogger {
                    file: Some(Arc::new(Mutex::new(File::from_std(file)))),
                }
            }
            Err(e) => {
                error!(
                    "Failed to create debug log file '{}': {}",
                    config.log_file_path, e
                );
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        DebugLogger { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Spawns a task that writes `entry`. Must be called from within a tokio runtime.
    pub fn log_move(&self, entry: LogEntry) {
        if !self.is_enabled() {
            return;
        }
        let logger = self.clone();
        tokio::spawn(async move {
            logger.write(&entry).await;
        });
    }

    /// Writes one line and flushes it
    pub async fn write(&self, entry: &LogEntry) {
        let Some(file) = &self.file else {
            return;
        };

        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{}\n", json),
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
                return;
            }
        };

        let mut file = file.lock().await;
        if let Err(e) = file.write_all(line.as_bytes()).await {
            error!("Failed to write debug log entry: {}", e);
            return;
        }
        if let Err(e) = file.flush().await {
            error!("Failed to flush debug log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Battlesnake, Coord, RulesetSettings};

    fn game() -> Game {
        Game {
            id: "game-1".to_string(),
            ruleset: RulesetInfo {
                name: "standard".to_string(),
                version: "v1.0.0".to_string(),
                settings: RulesetSettings::default(),
            },
            timeout: 500,
            source: String::new(),
        }
    }

    fn board() -> Board {
        let body = vec![Coord::new(1, 1), Coord::new(1, 0)];
        Board {
            height: 5,
            width: 5,
            food: vec![Coord::new(3, 3)],
            snakes: vec![Battlesnake {
                id: "me".to_string(),
                name: "me".to_string(),
                health: 90,
                head: body[0],
                length: body.len() as i32,
                body,
                latency: "0".to_string(),
                shout: None,
            }],
            hazards: Vec::new(),
        }
    }

    #[test]
    fn test_disabled_logger_has_no_file() {
        let config = DebugConfig {
            enabled: false,
            log_file_path: "unused.jsonl".to_string(),
        };
        assert!(!DebugLogger::new(&config).is_enabled());
    }

    #[tokio::test]
    async fn test_entries_are_written_as_json_lines() {
        let path = std::env::temp_dir().join(format!("mcts_snake_debug_{}.jsonl", std::process::id()));
        let config = DebugConfig {
            enabled: true,
            log_file_path: path.to_string_lossy().into_owned(),
        };
        let logger = DebugLogger::new(&config);
        assert!(logger.is_enabled());

        logger
            .write(&LogEntry::new(&game(), 3, "me", &board(), Direction::Up, 120))
            .await;
        logger
            .write(&LogEntry::new(&game(), 4, "me", &board(), Direction::Right, 95))
            .await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let entries: Vec<LogEntry> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        std::fs::remove_file(&path).ok();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].turn, 3);
        assert_eq!(entries[0].chosen_move, Direction::Up);
        assert_eq!(entries[1].iterations, 95);
        assert_eq!(entries[1].ruleset.name, "standard");
        assert!(contents.contains("\"chosen_move\":\"right\""));
    }
}
