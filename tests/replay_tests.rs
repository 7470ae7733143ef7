// Integration tests for the replay engine
//
// The fixture holds two games written in the bot's debug log format. Turns
// with a single legal move must always replay to the logged move.

use mcts_snake::config::Config;
use mcts_snake::replay::ReplayEngine;
use mcts_snake::types::Direction;
use std::path::PathBuf;

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn engine() -> ReplayEngine {
    let mut config = Config::default_hardcoded();
    config.search.iteration_limit = 150;
    config.search.seed = Some(3);
    ReplayEngine::new(config, false)
}

#[test]
fn test_load_log_file() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("sample_games.jsonl"))
        .expect("Failed to load sample_games.jsonl");

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].turn, 0);
    assert_eq!(entries[0].chosen_move, Direction::Up);
    assert_eq!(entries[0].iterations, 812);
    assert_eq!(entries[0].board.snakes.len(), 2);
    assert_eq!(entries[3].ruleset.name, "wrapped");
    assert_eq!(entries[3].ruleset.settings.hazard_damage_per_turn, 14);
}

#[test]
fn test_games_are_separated() {
    let entries = engine()
        .load_log_file(fixture_path("sample_games.jsonl"))
        .unwrap();

    assert_eq!(ReplayEngine::game_ids(&entries), vec!["game-a", "game-b"]);
    let game_a = ReplayEngine::entries_for_game(&entries, "game-a");
    assert_eq!(game_a.len(), 3);
    assert!(ReplayEngine::entries_for_game(&entries, "missing").is_empty());
}

#[test]
fn test_forced_moves_replay_identically() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("sample_games.jsonl"))
        .unwrap();

    // Turn 0 of game-a: cornered, only up is legal
    let result = engine.replay_entry(&entries[0]).unwrap();
    assert!(result.matches, "replayed {}", result.replayed_move);
    assert_eq!(result.replayed_iterations, 150);
    assert!(result.root_children.iter().all(|c| c.dir == Direction::Up));

    // game-b is wrapped: only the move across the left edge is open
    let result = engine.replay_entry(&entries[3]).unwrap();
    assert!(result.matches, "replayed {}", result.replayed_move);
    assert_eq!(result.replayed_move, Direction::Left);
}

#[test]
fn test_replay_all_and_stats() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("sample_games.jsonl"))
        .unwrap();

    let results = engine.replay_all(&entries);
    let stats = engine.generate_stats(&results);

    assert_eq!(results.len(), 4);
    assert_eq!(stats.total_turns, 4);
    assert!(stats.matches >= 2);
    assert_eq!(stats.matches + stats.mismatches, 4);
}

#[test]
fn test_replay_specific_turns() {
    let engine = engine();
    let entries = ReplayEngine::entries_for_game(
        &engine
            .load_log_file(fixture_path("sample_games.jsonl"))
            .unwrap(),
        "game-a",
    );

    let results = engine.replay_turns(&entries, &[0, 2]).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].turn, 2);
    // At (0,5) facing left the legal moves are up and down
    assert!(matches!(results[1].replayed_move, Direction::Up | Direction::Down));

    let missing = engine.replay_turns(&entries, &[0, 99]);
    assert!(missing.unwrap_err().contains("Turn 99"));
}

#[test]
fn test_validate_expected_moves() {
    let engine = engine();
    let entries = engine
        .load_log_file(fixture_path("sample_games.jsonl"))
        .unwrap();
    let game_a = ReplayEngine::entries_for_game(&entries, "game-a");

    let ok = engine.validate_expected_moves(
        &game_a,
        &[
            (0, vec![Direction::Up]),
            (1, vec![Direction::Left, Direction::Right]),
        ],
    );
    assert!(ok.is_ok());

    let err = engine
        .validate_expected_moves(&game_a, &[(1, vec![Direction::Down])])
        .unwrap_err();
    assert!(err.contains("Turn 1"));
    assert!(err.contains("left"));
}

#[test]
fn test_load_errors_name_the_problem() {
    let engine = engine();
    assert!(engine
        .load_log_file(fixture_path("does_not_exist.jsonl"))
        .unwrap_err()
        .contains("Failed to open"));

    let path = std::env::temp_dir().join(format!("mcts_snake_bad_log_{}.jsonl", std::process::id()));
    std::fs::write(&path, "\n{\"turn\": 1}\n").unwrap();
    let err = engine.load_log_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(err.contains("line 2"), "{}", err);
}
