//! Integration tests for the tic-tac-toe matchmaking service
//!
//! Exercise complete games through the matchmaker and through the HTTP
//! JSON-RPC surface.

mod fixtures;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fixtures::*;
use parlor_tictactoe::rpc::{create_router, RPC_PATH};
use parlor_tictactoe::{Matchmaker, MatchmakingError, Piece};
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use tower::ServiceExt;

#[test]
fn test_full_game_x_wins() {
    let matchmaker = Matchmaker::new(10);
    let seats = seat_pair(&matchmaker);

    let states = play(&matchmaker, &seats, &X_WINS_DIAGONAL);
    let last = states.last().unwrap();

    assert!(last.over);
    assert_eq!(last.winner.as_deref(), Some(seats[0].player_id.as_str()));
    assert!(states[..states.len() - 1].iter().all(|s| !s.over));

    let stored = assert_ok!(matchmaker.get_game(&seats[0].game_id));
    assert_eq!(&stored, last);

    println!("✅ Full game (X wins) test passed");
}

#[test]
fn test_full_game_o_wins() {
    let matchmaker = Matchmaker::new(10);
    let seats = seat_pair(&matchmaker);

    let states = play(&matchmaker, &seats, &O_WINS_ROW);
    let last = states.last().unwrap();

    assert!(last.over);
    assert_eq!(last.winner.as_deref(), Some(seats[1].player_id.as_str()));
    assert_eq!(last.board.get(1, 0), Some(Piece::O));
    assert_eq!(last.board.get(1, 2), Some(Piece::O));
}

#[test]
fn test_full_game_draw() {
    let matchmaker = Matchmaker::new(10);
    let seats = seat_pair(&matchmaker);

    let states = play(&matchmaker, &seats, &DRAW);
    let last = states.last().unwrap();

    assert!(last.over);
    assert!(last.is_draw());
    assert!(last.board.is_complete());
    assert!(!last.board.has_winner());
    assert!(states[..8].iter().all(|s| !s.over));
}

#[test]
fn test_finished_game_rejects_further_moves() {
    let matchmaker = Matchmaker::new(10);
    let seats = seat_pair(&matchmaker);
    play(&matchmaker, &seats, &X_WINS_DIAGONAL);

    let before = matchmaker.get_game(&seats[0].game_id).unwrap();
    let err = assert_err!(matchmaker.place(&seats[1].game_id, &seats[1].player_id, 2, 0));
    assert_eq!(err, MatchmakingError::GameOver);

    // Game over is reported ahead of any other problem with the move
    let err = assert_err!(matchmaker.place(&seats[1].game_id, "nobody", 7, 7));
    assert_eq!(err, MatchmakingError::GameOver);

    assert_eq!(matchmaker.get_game(&seats[0].game_id).unwrap(), before);
}

#[test]
fn test_rejected_moves_leave_game_untouched() {
    let matchmaker = Matchmaker::new(10);
    let [x, o] = seat_pair(&matchmaker);
    matchmaker.place(&x.game_id, &x.player_id, 1, 1).unwrap();
    let before = matchmaker.get_game(&x.game_id).unwrap();

    let cases = [
        (x.player_id.as_str(), 0, 0, MatchmakingError::OutOfTurn),
        (o.player_id.as_str(), 1, 1, MatchmakingError::PositionOccupied),
        (o.player_id.as_str(), 3, 0, MatchmakingError::OutOfBounds),
        (o.player_id.as_str(), 0, -1, MatchmakingError::OutOfBounds),
        ("stranger", 0, 0, MatchmakingError::PlayerNotFound),
    ];

    for (player, row, col, expected) in cases {
        let err = assert_err!(matchmaker.place(&x.game_id, player, row, col));
        assert_eq!(err, expected, "move ({}, {}) by {}", row, col, player);
        assert_eq!(matchmaker.get_game(&x.game_id).unwrap(), before);
    }

    // O may still move normally afterwards
    assert_ok!(matchmaker.place(&o.game_id, &o.player_id, 0, 0));
}

#[test]
fn test_unknown_game() {
    let matchmaker = Matchmaker::new(10);

    assert_eq!(
        matchmaker.get_game("missing").unwrap_err(),
        MatchmakingError::GameNotFound
    );
    assert_eq!(
        matchmaker.place("missing", "player", 0, 0).unwrap_err(),
        MatchmakingError::GameNotFound
    );
}

#[test]
fn test_players_can_move_before_opponent_arrives() {
    let matchmaker = Matchmaker::new(10);
    let x = matchmaker.join().unwrap();

    let state = assert_ok!(matchmaker.place(&x.game_id, &x.player_id, 0, 0));
    assert_eq!(state.board.get(0, 0), Some(Piece::X));

    // The second seat sees the move already made
    let o = matchmaker.join().unwrap();
    assert_eq!(o.game_id, x.game_id);
    assert_eq!(o.state.board.get(0, 0), Some(Piece::X));
    assert_ok!(matchmaker.place(&o.game_id, &o.player_id, 2, 2));
}

#[test]
fn test_joins_pair_up_in_order() {
    let matchmaker = Matchmaker::new(10);

    let outcomes: Vec<_> = (0..6).map(|_| matchmaker.join().unwrap()).collect();
    for pair in outcomes.chunks(2) {
        assert_eq!(pair[0].game_id, pair[1].game_id);
        assert_eq!(pair[0].piece, Piece::X);
        assert_eq!(pair[1].piece, Piece::O);
        assert_ne!(pair[0].player_id, pair[1].player_id);
    }
    assert_ne!(outcomes[0].game_id, outcomes[2].game_id);
    assert_ne!(outcomes[2].game_id, outcomes[4].game_id);

    let stats = matchmaker.get_stats().unwrap();
    assert_eq!(stats.games_created, 3);
    assert_eq!(stats.players_joined, 6);
}

#[test]
fn test_evicted_game_is_forgotten() {
    let matchmaker = Matchmaker::new(2);
    let first = seat_pair(&matchmaker);
    seat_pair(&matchmaker);
    seat_pair(&matchmaker);

    assert_eq!(
        matchmaker.get_game(&first[0].game_id).unwrap_err(),
        MatchmakingError::GameNotFound
    );

    let stats = matchmaker.get_stats().unwrap();
    assert_eq!(stats.active_games, 2);
    assert_eq!(stats.games_evicted, 1);
}

#[test]
fn test_recently_used_game_survives_eviction() {
    let matchmaker = Matchmaker::new(2);
    let first = seat_pair(&matchmaker);
    let second = seat_pair(&matchmaker);

    // Touching the first game makes the second the eviction candidate
    matchmaker.get_game(&first[0].game_id).unwrap();
    seat_pair(&matchmaker);

    assert_ok!(matchmaker.get_game(&first[0].game_id));
    assert_err!(matchmaker.get_game(&second[0].game_id));
}

async fn call(app: axum::Router, method: &str, params: Value) -> (StatusCode, Value) {
    let request = json!({"jsonrpc": "2.0", "id": 7, "method": method, "params": [params]});
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(RPC_PATH)
                .header("content-type", "application/json")
                .body(Body::from(request.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_rpc_game_flow() {
    let app = create_router(create_test_app());

    let (status, x) = call(app.clone(), "tictactoe.Join", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, o) = call(app.clone(), "tictactoe.Join", json!({})).await;

    let game_id = x["result"]["GameID"].as_str().unwrap().to_string();
    assert_eq!(o["result"]["GameID"], game_id);
    assert_eq!(x["result"]["Piece"], 1);
    assert_eq!(o["result"]["Piece"], -1);
    assert_eq!(x["result"]["PlayerID"].as_str().unwrap().len(), 10);
    assert_eq!(x["result"]["Board"], json!([[0, 0, 0], [0, 0, 0], [0, 0, 0]]));

    let x_id = x["result"]["PlayerID"].clone();
    let o_id = o["result"]["PlayerID"].clone();
    let moves = [
        (&x_id, [0, 0]),
        (&o_id, [1, 0]),
        (&x_id, [0, 1]),
        (&o_id, [1, 1]),
    ];
    for (player, position) in moves {
        let (status, reply) = call(
            app.clone(),
            "tictactoe.Place",
            json!({"GameID": game_id, "PlayerID": player, "Position": position}),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", reply);
        assert_eq!(reply["result"]["Over"], false);
        assert_eq!(reply["result"]["Winner"], "");
    }

    let (status, reply) = call(
        app.clone(),
        "tictactoe.Place",
        json!({"GameID": game_id, "PlayerID": x_id, "Position": [0, 2]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["id"], 7);
    assert_eq!(reply["error"], Value::Null);
    assert_eq!(reply["result"]["Over"], true);
    assert_eq!(reply["result"]["Winner"], x_id);
    assert_eq!(
        reply["result"]["Board"],
        json!([[1, 1, 1], [-1, -1, 0], [0, 0, 0]])
    );

    let (status, game) = call(app, "tictactoe.GetGame", json!({"GameID": game_id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(game["result"], reply["result"]);

    println!("✅ RPC game flow test passed");
}

#[tokio::test]
async fn test_rpc_errors_carry_bare_messages() {
    let app = create_router(create_test_app());
    let (_, x) = call(app.clone(), "tictactoe.Join", json!({})).await;
    let game_id = x["result"]["GameID"].clone();
    let x_id = x["result"]["PlayerID"].clone();

    let cases = [
        (
            "tictactoe.GetGame",
            json!({"GameID": "nope"}),
            "game does not exist",
        ),
        (
            "tictactoe.Place",
            json!({"GameID": game_id, "PlayerID": x_id, "Position": [3, 3]}),
            "position is outside game board",
        ),
        (
            "tictactoe.Place",
            json!({"GameID": game_id, "PlayerID": "ghost", "Position": [0, 0]}),
            "player does not exist",
        ),
        ("tictactoe.Resign", json!({}), "rpc: can't find service tictactoe.Resign"),
    ];

    for (method, params, message) in cases {
        let (status, reply) = call(app.clone(), method, params).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", method);
        assert_eq!(reply["result"], Value::Null);
        assert_eq!(reply["error"], message);
        assert_eq!(reply["id"], 7);
    }

    // Second X move without O in between
    call(
        app.clone(),
        "tictactoe.Place",
        json!({"GameID": game_id, "PlayerID": x_id, "Position": [0, 0]}),
    )
    .await;
    let (_, reply) = call(
        app.clone(),
        "tictactoe.Place",
        json!({"GameID": game_id, "PlayerID": x_id, "Position": [0, 1]}),
    )
    .await;
    assert_eq!(reply["error"], "you cannot place twice in a row");
}

#[tokio::test]
async fn test_rpc_join_third_player_opens_new_game() {
    let state = create_test_app();
    let app = create_router(state.clone());

    let mut game_ids = Vec::new();
    for _ in 0..3 {
        let (status, reply) = call(app.clone(), "tictactoe.Join", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        game_ids.push(reply["result"]["GameID"].as_str().unwrap().to_string());
    }

    assert_eq!(game_ids[0], game_ids[1]);
    assert_ne!(game_ids[1], game_ids[2]);
    assert_eq!(state.matchmaker().get_stats().unwrap().active_games, 2);
}
