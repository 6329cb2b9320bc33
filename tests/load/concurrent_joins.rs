//! Concurrent join and move load tests
//!
//! Many clients join and play at once; every game must still end up with
//! exactly one X and one O, and games must not block each other.

use crate::fixtures::*;
use futures::future::join_all;
use parlor_tictactoe::{JoinOutcome, Matchmaker, Piece};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_joins_pair_everyone() {
    let matchmaker = Arc::new(Matchmaker::new(1000));
    let client_count = 100;

    let start_time = Instant::now();
    let handles: Vec<_> = (0..client_count)
        .map(|_| {
            let matchmaker = matchmaker.clone();
            tokio::spawn(async move { matchmaker.join() })
        })
        .collect();

    let results = join_all(handles).await;
    let elapsed = start_time.elapsed();

    let mut games: HashMap<String, Vec<JoinOutcome>> = HashMap::new();
    for result in results {
        let outcome = result.expect("join task panicked").expect("join failed");
        games.entry(outcome.game_id.clone()).or_default().push(outcome);
    }

    assert_eq!(games.len(), client_count / 2, "expected one game per pair");
    for (game_id, players) in &games {
        assert_eq!(players.len(), 2, "game {} has {} players", game_id, players.len());
        let mut pieces: Vec<_> = players.iter().map(|p| p.piece).collect();
        pieces.sort_by_key(|p| p.value());
        assert_eq!(pieces, vec![Piece::O, Piece::X], "game {}", game_id);
        assert_ne!(players[0].player_id, players[1].player_id);
    }

    let stats = matchmaker.get_stats().unwrap();
    assert_eq!(stats.games_created, (client_count / 2) as u64);
    assert_eq!(stats.players_joined, client_count as u64);
    assert!(elapsed < Duration::from_secs(5), "joins took {:?}", elapsed);

    println!(
        "✅ {} concurrent joins produced {} games in {:?}",
        client_count,
        games.len(),
        elapsed
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_games_play_to_completion() {
    let matchmaker = Arc::new(Matchmaker::new(1000));
    let game_count = 50;

    let pairs: Vec<_> = (0..game_count).map(|_| seat_pair(&matchmaker)).collect();

    let start_time = Instant::now();
    let handles: Vec<_> = pairs
        .into_iter()
        .enumerate()
        .map(|(i, seats)| {
            let matchmaker = matchmaker.clone();
            tokio::spawn(async move {
                let moves: &[Move] = if i % 2 == 0 { &X_WINS_DIAGONAL } else { &DRAW };
                let states = play(&matchmaker, &seats, moves);
                (i, seats, states.last().cloned())
            })
        })
        .collect();

    let results = join_all(handles).await;
    let elapsed = start_time.elapsed();

    for result in results {
        let (i, seats, last) = result.expect("game task panicked");
        let last = last.expect("no moves played");
        assert!(last.over, "game {} not finished", i);
        if i % 2 == 0 {
            assert_eq!(last.winner.as_deref(), Some(seats[0].player_id.as_str()));
        } else {
            assert!(last.is_draw(), "game {} should be a draw", i);
        }
    }

    let stats = matchmaker.get_stats().unwrap();
    assert_eq!(stats.games_finished, game_count as u64);
    assert_eq!(
        stats.moves_placed,
        (game_count / 2 * (X_WINS_DIAGONAL.len() + DRAW.len())) as u64
    );
    assert!(elapsed < Duration::from_secs(5), "games took {:?}", elapsed);

    println!("✅ {} concurrent games completed in {:?}", game_count, elapsed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_moves_in_one_game() {
    let matchmaker = Arc::new(Matchmaker::new(10));
    let [x, _o] = seat_pair(&matchmaker);

    // X fires at every cell at once; exactly one placement may win the race
    let handles: Vec<_> = (0..9)
        .map(|cell| {
            let matchmaker = matchmaker.clone();
            let game_id = x.game_id.clone();
            let player_id = x.player_id.clone();
            tokio::spawn(async move { matchmaker.place(&game_id, &player_id, cell / 3, cell % 3) })
        })
        .collect();

    let results = join_all(handles).await;
    let successes = results
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();

    assert_eq!(successes, 1);
    let state = matchmaker.get_game(&x.game_id).unwrap();
    assert_eq!(state.board.occupied(), 1);

    println!("✅ Racing moves test passed");
}
