// Battlesnake bot: endpoint logic behind the HTTP handlers
//
// /move runs the tree search on a blocking thread while the async handler
// polls a lock-free shared state and answers with the best move published so
// far once the time budget is spent.

use log::{error, info, warn};
use parking_lot::Mutex;
use rand::Rng;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::{DebugLogger, LogEntry};
use crate::rules::{ruleset_for, BoardState, WRAPPED};
use crate::search::{
    fallback_direction, search_ensemble, Heuristics, Mcts, SearchError, SearchObserver, SearchOutcome,
};
use crate::types::{Battlesnake, Board, Direction, Game};

/// Lock-free shared state between the async poller and the search thread
#[derive(Debug)]
pub struct SharedSearchState {
    /// Best move found so far, encoded with `Direction::index`
    best_move: AtomicU8,
    iterations: AtomicU32,
    search_complete: AtomicBool,
}

impl SharedSearchState {
    pub fn new(initial: Direction) -> Self {
        SharedSearchState {
            best_move: AtomicU8::new(initial.index()),
            iterations: AtomicU32::new(0),
            search_complete: AtomicBool::new(false),
        }
    }

    pub fn best_move(&self) -> Direction {
        Direction::from_index(self.best_move.load(Ordering::Acquire))
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.load(Ordering::Acquire)
    }

    pub fn is_complete(&self) -> bool {
        self.search_complete.load(Ordering::Acquire)
    }

    pub fn mark_complete(&self) {
        self.search_complete.store(true, Ordering::Release);
    }
}

impl SearchObserver for SharedSearchState {
    fn publish(&self, best_move: Direction, iterations: u32) {
        self.best_move.store(best_move.index(), Ordering::Release);
        self.iterations.store(iterations, Ordering::Release);
    }
}

/// Running totals for one game, reported on /end
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameRecord {
    pub turns: u32,
    pub iterations: u64,
}

/// Battlesnake Bot with OOP-style API
/// Holds static configuration and exposes one method per API endpoint
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
    games: Mutex<HashMap<String, GameRecord>>,
}

impl Bot {
    pub fn new(config: Config) -> Self {
        let debug_logger = DebugLogger::new(&config.debug);
        Bot {
            config,
            debug_logger,
            games: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "mcts-snake",
            "color": "#C2B280",
            "head": "sand-worm",
            "tail": "round-bum",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: i32, _board: &Board, you: &Battlesnake) {
        info!(
            "GAME START {} ({} ruleset, timeout {}ms) as {}",
            game.id, game.ruleset.name, game.timeout, you.id
        );
        self.games.lock().insert(game.id.clone(), GameRecord::default());
    }

    /// Called when a game ends. Returns the record collected for the game, if any.
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: i32, _board: &Board, you: &Battlesnake) -> Option<GameRecord> {
        let record = self.games.lock().remove(&game.id);
        match record {
            Some(r) => {
                let average = if r.turns > 0 { r.iterations / u64::from(r.turns) } else { 0 };
                info!(
                    "GAME OVER {} at turn {}: {} moves, {} iterations ({} per move), final health {}",
                    game.id, turn, r.turns, r.iterations, average, you.health
                );
            }
            None => info!("GAME OVER {} at turn {}", game.id, turn),
        }
        record
    }

    /// Computes the next move
    /// Corresponds to POST /move endpoint
    ///
    /// The search runs on tokio's blocking pool. This method polls the shared
    /// state every `polling_interval_ms` and returns as soon as the search
    /// completes or the time budget runs out (anytime property).
    pub async fn get_move(&self, game: &Game, turn: i32, board: &Board, you: &Battlesnake) -> Value {
        let start_time = Instant::now();
        let budget = self.config.timing.budget_for_timeout_ms(game.timeout);
        let deadline = start_time + Duration::from_millis(budget);

        let shared = Arc::new(SharedSearchState::new(Self::initial_move(game, turn, board, you)));
        let shared_clone = shared.clone();
        let config = self.config.clone();
        let (game_c, board_c, you_id) = (game.clone(), board.clone(), you.id.clone());

        let handle = tokio::task::spawn_blocking(move || {
            let result = Bot::compute_move(
                &config,
                &game_c,
                turn,
                &board_c,
                &you_id,
                deadline,
                shared_clone.as_ref(),
            );
            shared_clone.mark_complete();
            result
        });

        let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms.max(1));
        loop {
            tokio::time::sleep(polling_interval).await;
            let elapsed = start_time.elapsed().as_millis() as u64;
            if elapsed >= budget || shared.is_complete() {
                break;
            }
        }

        if shared.is_complete() {
            match handle.await {
                Ok(Ok(outcome)) => info!(
                    "Turn {}: search done, {} root visits, {} rollout turns, {} transition failures",
                    turn, outcome.root_visits, outcome.stats.rollout_turns, outcome.stats.transition_failures
                ),
                Ok(Err(e)) => error!("Turn {}: search failed: {}", turn, e),
                Err(e) => error!("Turn {}: search task panicked: {}", turn, e),
            }
        } else {
            warn!("Turn {}: budget of {}ms spent before the search finished", turn, budget);
        }

        let chosen_move = shared.best_move();
        let iterations = shared.iterations();
        info!(
            "Turn {}: Chose {} ({} iterations, time: {}ms)",
            turn,
            chosen_move.as_str(),
            iterations,
            start_time.elapsed().as_millis()
        );

        if let Some(record) = self.games.lock().get_mut(&game.id) {
            record.turns += 1;
            record.iterations += u64::from(iterations);
        }
        self.debug_logger
            .log_move(LogEntry::new(game, turn, &you.id, board, chosen_move, iterations));

        json!({ "move": chosen_move.as_str() })
    }

    /// Runs the search synchronously and returns its outcome.
    /// Shared by the /move handler and the replay tool.
    pub fn compute_move(
        config: &Config,
        game: &Game,
        turn: i32,
        board: &Board,
        you_id: &str,
        deadline: Instant,
        observer: &dyn SearchObserver,
    ) -> Result<SearchOutcome, SearchError> {
        let ruleset = ruleset_for(&game.ruleset, &config.game_rules);
        let state = BoardState::from_api(board, turn)?;
        let heuristics = Heuristics::from_config(&config.heuristics, ruleset.is_wrapped());
        let mcts = Mcts::new(ruleset.as_ref(), &config.search, heuristics);
        let seed = config.search.seed.unwrap_or_else(|| rand::rng().random());

        search_ensemble(
            &mcts,
            &state,
            you_id,
            deadline,
            config.search.parallel_trees,
            seed,
            observer,
        )
    }

    /// Move published before the search reports anything
    fn initial_move(game: &Game, turn: i32, board: &Board, you: &Battlesnake) -> Direction {
        let wrapped = game.ruleset.name == WRAPPED;
        BoardState::from_api(board, turn)
            .ok()
            .and_then(|state| {
                let slot = state.snake_index(&you.id).ok()?;
                Some(fallback_direction(&state, slot, wrapped))
            })
            .unwrap_or(Direction::Left)
    }
}
