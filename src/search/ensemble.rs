// Root-parallel search
//
// Independent trees run on the rayon pool, each with its own RNG derived from
// one base seed. Nothing is shared between trees while they run; afterwards
// the root statistics are merged per direction.

use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use super::mcts::{Mcts, RootChild, SearchObserver, SearchOutcome, SearchStats};
use super::SearchError;
use crate::rules::{BoardState, Ruleset};

/// Runs `trees` independent searches and merges them. Only the first tree
/// reports progress to `observer`; the merged result is published last.
/// With a single tree the outcome is returned as is.
pub fn search_ensemble<R: Ruleset + Sync + ?Sized>(
    mcts: &Mcts<'_, R>,
    board: &BoardState,
    you: &str,
    deadline: Instant,
    trees: usize,
    seed: u64,
    observer: &dyn SearchObserver,
) -> Result<SearchOutcome, SearchError> {
    if trees <= 1 {
        let mut rng = StdRng::seed_from_u64(seed);
        return mcts.search(board, you, deadline, &mut rng, observer);
    }

    let outcomes = (0..trees)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let observer: &dyn SearchObserver = if i == 0 { observer } else { &() };
            mcts.search(board, you, deadline, &mut rng, observer)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Merging {} search trees", outcomes.len());
    let merged = merge_outcomes(outcomes);
    observer.publish(merged.best_move, merged.stats.iterations);
    Ok(merged)
}

/// Sums scores and visits per root direction. Directions keep the order in
/// which they are first seen; the best is the highest summed score, earliest
/// first on ties.
pub fn merge_outcomes(outcomes: Vec<SearchOutcome>) -> SearchOutcome {
    let mut merged: Vec<RootChild> = Vec::new();
    let mut stats = SearchStats::default();
    let mut root_visits = 0;

    for outcome in &outcomes {
        stats.merge(&outcome.stats);
        root_visits += outcome.root_visits;
        for child in &outcome.root_children {
            match merged.iter_mut().find(|m| m.dir == child.dir) {
                Some(existing) => {
                    existing.score += child.score;
                    existing.visits += child.visits;
                }
                None => merged.push(*child),
            }
        }
    }

    let mut best: Option<&RootChild> = None;
    for child in &merged {
        if best.map_or(true, |b| child.score > b.score) {
            best = Some(child);
        }
    }
    let best_move = match best {
        Some(child) => child.dir,
        None => outcomes
            .first()
            .map_or(crate::types::Direction::Left, |o| o.best_move),
    };

    SearchOutcome {
        best_move,
        root_visits,
        root_children: merged,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, SearchConfig};
    use crate::rules::StandardRuleset;
    use crate::types::{Coord, Direction, RulesetSettings};
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct LastPublished(Mutex<Option<(Direction, u32)>>);

    impl SearchObserver for LastPublished {
        fn publish(&self, best_move: Direction, iterations: u32) {
            *self.0.lock() = Some((best_move, iterations));
        }
    }

    fn child(dir: Direction, score: i32, visits: u32) -> RootChild {
        RootChild { dir, score, visits }
    }

    fn outcome(children: Vec<RootChild>) -> SearchOutcome {
        let visits = children.iter().map(|c| c.visits).sum();
        SearchOutcome {
            best_move: Direction::Left,
            root_visits: visits,
            root_children: children,
            stats: SearchStats {
                iterations: visits,
                ..SearchStats::default()
            },
        }
    }

    #[test]
    fn test_merge_sums_per_direction() {
        let merged = merge_outcomes(vec![
            outcome(vec![child(Direction::Left, 2, 4), child(Direction::Up, 3, 4)]),
            outcome(vec![
                child(Direction::Up, -4, 5),
                child(Direction::Left, 1, 2),
                child(Direction::Right, 1, 1),
            ]),
        ]);

        assert_eq!(
            merged.root_children,
            vec![
                child(Direction::Left, 3, 6),
                child(Direction::Up, -1, 9),
                child(Direction::Right, 1, 1),
            ]
        );
        assert_eq!(merged.best_move, Direction::Left);
        assert_eq!(merged.root_visits, 16);
        assert_eq!(merged.stats.iterations, 16);
    }

    #[test]
    fn test_merge_ties_keep_first_seen() {
        let merged = merge_outcomes(vec![
            outcome(vec![child(Direction::Down, 2, 2)]),
            outcome(vec![child(Direction::Right, 2, 2)]),
        ]);
        assert_eq!(merged.best_move, Direction::Down);
    }

    #[test]
    fn test_merge_without_children_keeps_fallback() {
        let mut empty = outcome(Vec::new());
        empty.best_move = Direction::Up;
        let merged = merge_outcomes(vec![empty.clone(), empty]);
        assert_eq!(merged.best_move, Direction::Up);
    }

    #[test]
    fn test_parallel_trees_each_run_their_iterations() {
        let settings = RulesetSettings::default();
        let rules = StandardRuleset::new(settings, &Config::default_hardcoded().game_rules);
        let config = SearchConfig {
            iteration_limit: 40,
            ..Config::default_hardcoded().search
        };
        let mcts = Mcts::new(&rules, &config, None);

        let mut board = BoardState::new(11, 11);
        board
            .place_snake("me", vec![Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)])
            .unwrap();
        board
            .place_snake("them", vec![Coord::new(2, 8), Coord::new(2, 9), Coord::new(2, 10)])
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(60);

        let outcome = search_ensemble(&mcts, &board, "me", deadline, 4, 11, &()).unwrap();

        assert_eq!(outcome.root_visits, 160);
        assert_eq!(outcome.stats.iterations, 160);
        assert!(outcome.root_children.len() <= 3);
    }

    #[test]
    fn test_single_tree_is_reproducible_with_a_seed() {
        let settings = RulesetSettings::default();
        let rules = StandardRuleset::new(settings, &Config::default_hardcoded().game_rules);
        let config = SearchConfig {
            iteration_limit: 50,
            ..Config::default_hardcoded().search
        };
        let mcts = Mcts::new(&rules, &config, None);
        let mut board = BoardState::new(7, 7);
        board
            .place_snake("me", vec![Coord::new(3, 3), Coord::new(3, 2), Coord::new(3, 1)])
            .unwrap();
        board
            .place_snake("them", vec![Coord::new(1, 5), Coord::new(1, 6), Coord::new(1, 6)])
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(60);

        let first = search_ensemble(&mcts, &board, "me", deadline, 1, 7, &()).unwrap();
        let second = search_ensemble(&mcts, &board, "me", deadline, 1, 7, &()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_merged_move_is_published_last() {
        let settings = RulesetSettings::default();
        let rules = StandardRuleset::new(settings, &Config::default_hardcoded().game_rules);
        let config = SearchConfig {
            iteration_limit: 30,
            publish_interval: 8,
            ..Config::default_hardcoded().search
        };
        let mcts = Mcts::new(&rules, &config, None);
        let mut board = BoardState::new(11, 11);
        board
            .place_snake("me", vec![Coord::new(5, 5), Coord::new(5, 4), Coord::new(5, 3)])
            .unwrap();
        board
            .place_snake("them", vec![Coord::new(2, 8), Coord::new(2, 9), Coord::new(2, 10)])
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(60);

        for seed in 0..20 {
            let observer = LastPublished::default();
            let outcome = search_ensemble(&mcts, &board, "me", deadline, 4, seed, &observer).unwrap();

            assert_eq!(
                *observer.0.lock(),
                Some((outcome.best_move, 120)),
                "seed {} published a move other than the merged best",
                seed
            );
        }
    }
}
