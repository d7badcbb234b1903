use super::*;
use std::collections::HashMap;
use std::thread;

use tempfile::TempDir;

use crate::catalog::JokePool;
use crate::config::LockMode;
use crate::store::INITIAL_RATING;

fn pool(entries: &[(&str, &[(&str, &[&str])])]) -> JokePool {
    entries
        .iter()
        .map(|(model, cats)| {
            let by_category: HashMap<String, Vec<String>> = cats
                .iter()
                .map(|(cat, jokes)| {
                    (
                        cat.to_string(),
                        jokes.iter().map(|j| j.to_string()).collect(),
                    )
                })
                .collect();
            (model.to_string(), by_category)
        })
        .collect()
}

fn test_arena(dir: &TempDir) -> Arena {
    let models = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let jokes = pool(&[
        ("a", &[("puns", &["a-pun-1", "a-pun-2"]), ("dad", &["a-dad"])]),
        ("b", &[("puns", &["b-pun-1"]), ("dad", &["b-dad"])]),
        ("c", &[("puns", &["c-pun-1"])]),
    ]);
    let catalog = Arc::new(Catalog::from_parts(models.clone(), jokes));
    let store = Arc::new(RatingStore::new(
        dir.path().join("elo_state.json"),
        models,
        LockMode::Process,
    ));
    Arena::new(catalog, store)
}

fn empty_arena(dir: &TempDir) -> Arena {
    let catalog = Arc::new(Catalog::from_parts(vec!["a".to_string()], pool(&[])));
    let store = Arc::new(RatingStore::new(
        dir.path().join("elo_state.json"),
        vec!["a".to_string()],
        LockMode::Process,
    ));
    Arena::new(catalog, store)
}

#[test]
fn test_select_battle_contestants_are_distinct_and_in_category() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    for _ in 0..50 {
        let battle = arena.select_battle().expect("battle");
        let [first, second] = &battle.contestants;

        assert_ne!(first.id, second.id);
        for contestant in &battle.contestants {
            let jokes = arena
                .catalog
                .jokes_for(&contestant.id, &battle.category)
                .expect("contestant has jokes in the battle category");
            assert!(jokes.contains(&contestant.joke));
        }
    }
}

#[test]
fn test_select_battle_assigns_ranks_from_snapshot() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    let battle = arena.select_battle().expect("battle");
    for contestant in &battle.contestants {
        // Backfill ran, so every roster model is ranked.
        assert!(matches!(contestant.rank, Rank::Ranked(r) if (1..=3).contains(&r)));
    }
}

#[test]
fn test_select_battle_registers_pending_entry() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    assert_eq!(arena.pending_battles(), 0);
    let battle = arena.select_battle().expect("battle");
    assert_eq!(arena.pending_battles(), 1);

    arena
        .submit_result(battle.battle_id, &battle.contestants[0].id)
        .expect("submit");
    assert_eq!(arena.pending_battles(), 0);
}

#[test]
fn test_empty_index_fails_matchmaking() {
    let dir = TempDir::new().expect("tempdir");
    let arena = empty_arena(&dir);

    assert!(matches!(
        arena.select_battle(),
        Err(ArenaError::NoEligibleCategory)
    ));
}

#[test]
fn test_submit_result_updates_ratings_and_votes() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    let battle = arena.select_battle().expect("battle");
    let winner = battle.contestants[0].id.clone();
    let loser = battle.contestants[1].id.clone();

    let scoreboard = arena.submit_result(battle.battle_id, &winner).expect("submit");

    assert_eq!(scoreboard.total_votes, 1);

    let state = arena.store.read().expect("read");
    assert_eq!(state.ratings[&winner], 1516.0);
    assert_eq!(state.ratings[&loser], 1484.0);
    assert_eq!(state.votes[&winner], 1);
    assert_eq!(state.votes[&loser], 0);

    let top = &scoreboard.leaderboard[0];
    assert_eq!(top.model, winner);
    assert_eq!(top.elo, 1516.0);
}

#[test]
fn test_submit_result_unknown_token() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    assert!(matches!(
        arena.submit_result(Uuid::new_v4(), "a"),
        Err(ArenaError::UnknownToken)
    ));
}

#[test]
fn test_submit_result_token_consumed_exactly_once() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    let battle = arena.select_battle().expect("battle");
    let winner = battle.contestants[0].id.clone();

    arena.submit_result(battle.battle_id, &winner).expect("first");
    assert!(matches!(
        arena.submit_result(battle.battle_id, &winner),
        Err(ArenaError::UnknownToken)
    ));

    let state = arena.store.read().expect("read");
    assert_eq!(state.total_votes, 1);
}

#[test]
fn test_invalid_winner_consumes_token_but_leaves_state_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    let battle = arena.select_battle().expect("battle");

    assert!(matches!(
        arena.submit_result(battle.battle_id, "not-a-contestant"),
        Err(ArenaError::InvalidWinner)
    ));

    // Pop-then-validate: the token is spent even though the vote failed.
    assert_eq!(arena.pending_battles(), 0);
    assert!(matches!(
        arena.submit_result(battle.battle_id, &battle.contestants[0].id),
        Err(ArenaError::UnknownToken)
    ));

    let state = arena.store.read().expect("read");
    assert_eq!(state.total_votes, 0);
    for model in ["a", "b", "c"] {
        assert_eq!(state.ratings[model], INITIAL_RATING);
        assert_eq!(state.votes[model], 0);
    }
}

#[test]
fn test_concurrent_same_token_one_success_one_unknown() {
    let dir = TempDir::new().expect("tempdir");
    let arena = Arc::new(test_arena(&dir));

    for _ in 0..20 {
        let battle = arena.select_battle().expect("battle");
        let winner = battle.contestants[0].id.clone();
        let token = battle.battle_id;

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let arena = Arc::clone(&arena);
                let winner = winner.clone();
                thread::spawn(move || arena.submit_result(token, &winner).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().expect("thread"))
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 1);
    }

    let state = arena.store.read().expect("read");
    assert_eq!(state.total_votes, 20);
}

#[test]
fn test_vote_total_matches_successful_submissions_under_contention() {
    const THREADS: usize = 8;
    const BATTLES_PER_THREAD: usize = 10;

    let dir = TempDir::new().expect("tempdir");
    let arena = Arc::new(test_arena(&dir));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                for _ in 0..BATTLES_PER_THREAD {
                    let battle = arena.select_battle().expect("battle");
                    arena
                        .submit_result(battle.battle_id, &battle.contestants[0].id)
                        .expect("submit");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread");
    }

    let scoreboard = arena.scoreboard().expect("scoreboard");
    assert_eq!(
        scoreboard.total_votes,
        (THREADS * BATTLES_PER_THREAD) as u64
    );

    let per_model_votes: u64 = scoreboard.leaderboard.iter().map(|e| e.votes).sum();
    assert_eq!(per_model_votes, scoreboard.total_votes);
}

#[test]
fn test_scoreboard_has_no_side_effects() {
    let dir = TempDir::new().expect("tempdir");
    let arena = test_arena(&dir);

    let before = arena.scoreboard().expect("scoreboard");
    let after = arena.scoreboard().expect("scoreboard");

    assert_eq!(before.total_votes, 0);
    assert_eq!(after.total_votes, 0);
    assert_eq!(before.leaderboard.len(), 3);
    assert_eq!(arena.pending_battles(), 0);
}
