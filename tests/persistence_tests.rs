//! Snapshot, restore, and blob handling as seen by a persistence host.

use serde_json::{json, Value};

use tabletop_engine::core::{EngineError, GameConfig, GameStatus, GameType, Move, Player, PlayerId};
use tabletop_engine::games::chess::{ChessRules, Position, MOVE_KIND};
use tabletop_engine::games::yahtzee::{Category, YahtzeeRules, HOLD, ROLL, SCORE};
use tabletop_engine::games::AnyEngine;
use tabletop_engine::rules::Engine;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn chess_move(player: &str, from: &str, to: &str) -> Move {
    let from = Position::from_algebraic(from).unwrap();
    let to = Position::from_algebraic(to).unwrap();
    Move::new(player, MOVE_KIND, json!({ "from": from, "to": to }))
}

fn started_chess() -> Engine<ChessRules> {
    let mut engine = Engine::with_id("persist-chess", ChessRules::default(), GameConfig::chess());
    engine.add_player(Player::new("w", "White"));
    engine.add_player(Player::new("b", "Black"));
    engine.start();
    engine
}

// =============================================================================
// Snapshot idempotence
// =============================================================================

#[test]
fn test_chess_restore_behaves_like_original() {
    init_logging();
    let mut original = started_chess();
    for (p, from, to) in [("w", "e2", "e4"), ("b", "c7", "c5"), ("w", "g1", "f3"), ("b", "d7", "d5")] {
        assert!(original.submit_move(&chess_move(p, from, to)));
    }

    let blob = original.snapshot_json().unwrap();
    let mut restored = Engine::with_id("other", ChessRules::default(), GameConfig::chess());
    restored.restore_json(&blob).unwrap();
    assert_eq!(restored.snapshot(), original.snapshot());

    let candidates = [
        chess_move("w", "e4", "d5"),
        chess_move("w", "e4", "e5"),
        chess_move("b", "c5", "c4"),
        chess_move("w", "f1", "b5"),
        chess_move("w", "e1", "g1"),
        chess_move("w", "a2", "a5"),
    ];
    for candidate in &candidates {
        let mut a = Engine::with_id("a", ChessRules::default(), GameConfig::chess());
        a.restore(original.snapshot());
        let mut b = Engine::with_id("b", ChessRules::default(), GameConfig::chess());
        b.restore(restored.snapshot());
        assert_eq!(a.submit_move(candidate), b.submit_move(candidate), "{candidate:?}");
    }
}

#[test]
fn test_yahtzee_restore_keeps_turn_in_progress() {
    init_logging();
    let mut engine = Engine::with_id("persist-y", YahtzeeRules::seeded(77), GameConfig::yahtzee());
    engine.add_player(Player::new("a", "A"));
    engine.add_player(Player::new("b", "B"));
    engine.start();

    engine.submit_move(&Move::new("a", ROLL, json!({})));
    engine.submit_move(&Move::new("a", HOLD, json!({ "index": 1 })));
    let blob = engine.snapshot_json().unwrap();

    let mut restored = Engine::with_id("x", YahtzeeRules::seeded(1), GameConfig::yahtzee());
    restored.restore_json(&blob).unwrap();

    assert_eq!(restored.dice(), engine.dice());
    assert_eq!(restored.held(), &[false, true, false, false, false]);
    assert_eq!(restored.rolls_left(), 2);
    assert!(!restored.submit_move(&Move::new("b", ROLL, json!({}))));
    assert!(restored.submit_move(&Move::new("a", SCORE, json!({ "category": Category::Chance }))));
    assert_eq!(restored.state().current_player_index, 1);
}

// =============================================================================
// Corrupted blobs
// =============================================================================

#[test]
fn test_players_not_a_list_become_empty() {
    init_logging();
    for players in [json!("oops"), json!(42), json!({ "a": 1 }), Value::Null] {
        let blob = json!({
            "id": "g",
            "gameType": "yahtzee",
            "players": players,
            "status": "waiting",
            "data": {}
        })
        .to_string();

        let mut engine = Engine::with_id("g", YahtzeeRules::seeded(4), GameConfig::yahtzee());
        engine.restore_json(&blob).unwrap();
        assert!(engine.state().players.is_empty());
        assert_eq!(engine.dice().len(), 5);
        assert!(engine.add_player(Player::new("late", "Late")));
    }
}

#[test]
fn test_missing_yahtzee_arrays_are_regenerated() {
    init_logging();
    let blob = json!({
        "id": "g",
        "gameType": "yahtzee",
        "players": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
        "currentPlayerIndex": 1,
        "status": "playing",
        "data": { "dice": [1, 2], "held": [true], "rollsLeft": 9 }
    })
    .to_string();

    let mut engine = Engine::with_id("g", YahtzeeRules::seeded(8), GameConfig::yahtzee());
    engine.restore_json(&blob).unwrap();

    assert_eq!(engine.dice().len(), 5);
    assert!(engine.dice().iter().all(|d| (1..=6).contains(d)));
    assert_eq!(engine.held(), &[false; 5]);
    assert_eq!(engine.rolls_left(), 3);
    assert!(engine.data().scores.is_empty());

    assert!(engine.submit_move(&Move::new("b", SCORE, json!({ "category": "chance" }))));
    assert_eq!(engine.data().scores.len(), 2);
    assert!(engine.scorecard(&PlayerId::new("a")).open_categories().count() == 13);
}

#[test]
fn test_null_or_mistyped_yahtzee_arrays_are_regenerated() {
    init_logging();
    for (dice, held, scores) in [
        (Value::Null, Value::Null, Value::Null),
        (json!("six"), json!(7), json!({ "a": {} })),
        (json!([1, "x", 3, 4, 5]), json!([true, "no"]), json!(false)),
    ] {
        let blob = json!({
            "id": "g",
            "gameType": "yahtzee",
            "players": [{ "id": "a", "name": "A" }],
            "status": "playing",
            "data": { "dice": dice, "held": held, "rollsLeft": 2, "scores": scores }
        })
        .to_string();

        let mut engine = Engine::with_id("g", YahtzeeRules::seeded(13), GameConfig::yahtzee());
        engine.restore_json(&blob).unwrap();
        assert_eq!(engine.dice().len(), 5);
        assert!(engine.dice().iter().all(|d| (1..=6).contains(d)));
        assert_eq!(engine.held(), &[false; 5]);
        assert_eq!(engine.rolls_left(), 2);
        assert!(engine.data().scores.is_empty());
        assert!(engine.submit_move(&Move::new("a", SCORE, json!({ "category": "chance" }))));

        let any = AnyEngine::from_json(&blob).unwrap();
        assert_eq!(any.game_type(), GameType::Yahtzee);
    }
}

#[test]
fn test_malformed_scorecard_keeps_seat_alignment() {
    init_logging();
    let blob = json!({
        "id": "g",
        "gameType": "yahtzee",
        "players": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
        "status": "playing",
        "data": { "scores": ["junk", { "sixes": 24 }] }
    })
    .to_string();

    let mut engine = Engine::with_id("g", YahtzeeRules::seeded(13), GameConfig::yahtzee());
    engine.restore_json(&blob).unwrap();
    assert_eq!(engine.data().scores.len(), 2);
    assert_eq!(engine.scorecard(&PlayerId::new("a")).open_categories().count(), 13);
    assert_eq!(engine.scorecard(&PlayerId::new("b")).get(Category::Sixes), Some(24));
}

#[test]
fn test_out_of_range_turn_index_resets() {
    init_logging();
    let blob = json!({
        "id": "g",
        "gameType": "yahtzee",
        "players": [{ "id": "a", "name": "A" }],
        "currentPlayerIndex": 5,
        "status": "playing"
    })
    .to_string();

    let mut engine = Engine::with_id("g", YahtzeeRules::seeded(8), GameConfig::yahtzee());
    engine.restore_json(&blob).unwrap();
    assert_eq!(engine.state().current_player_index, 0);
    assert!(engine.submit_move(&Move::new("a", ROLL, json!({}))));
}

#[test]
fn test_unparseable_blob_is_an_error() {
    let mut engine = started_chess();
    let before = engine.snapshot();

    assert!(matches!(engine.restore_json("{"), Err(EngineError::Json(_))));
    assert!(matches!(
        engine.restore_json(&json!({ "id": "g", "gameType": "yahtzee" }).to_string()),
        Err(EngineError::GameTypeMismatch { .. })
    ));
    assert_eq!(engine.snapshot(), before);
}

// =============================================================================
// AnyEngine
// =============================================================================

#[test]
fn test_any_engine_round_trip_both_games() {
    init_logging();
    let mut chess = started_chess();
    chess.submit_move(&chess_move("w", "d2", "d4"));
    let chess_blob = chess.snapshot_json().unwrap();

    let mut any = AnyEngine::from_json(&chess_blob).unwrap();
    assert_eq!(any.game_type(), GameType::Chess);
    assert_eq!(any.current_player_id(), Some(&PlayerId::new("b")));
    assert!(!any.submit_move(&chess_move("w", "e2", "e4")));
    assert!(any.submit_move(&chess_move("b", "d7", "d5")));
    assert_eq!(any.status(), GameStatus::Playing);

    let blob = json!({
        "id": "y",
        "gameType": "yahtzee",
        "players": [{ "id": "solo", "name": "Solo", "score": 0 }],
        "status": "playing"
    })
    .to_string();
    let mut any = AnyEngine::from_json(&blob).unwrap();
    assert_eq!(any.game_type(), GameType::Yahtzee);
    assert!(any.submit_move(&Move::new("solo", ROLL, json!({}))));

    let saved: Value = serde_json::from_str(&any.to_json().unwrap()).unwrap();
    assert_eq!(saved["gameType"], "yahtzee");
    assert_eq!(saved["data"]["rollsLeft"], 2);
    assert_eq!(saved["players"][0]["id"], "solo");
}
