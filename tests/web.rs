// wasm-pack test --headless --firefox

#![cfg(target_arch = "wasm32")]

use tictactoe_wasm::{GameEngine, GameState, Statistics};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn engine(config: &str) -> GameEngine {
    let mut engine = GameEngine::new(Some(config.to_owned())).expect("engine should start");
    engine.reset_stats();
    engine
}

#[wasm_bindgen_test]
fn click_then_computer_reply() {
    let mut engine = engine(r#"{"difficulty":"minimax","aiDelayMs":0}"#);
    assert_eq!(engine.status_text(), "Your turn (X)");
    assert!(engine.select_cell(0));
    assert!(engine.computer_to_move());
    assert!(!engine.select_cell(1), "human cannot move on the computer's turn");

    let response = engine.apply_ai_move().expect("computer should move");
    assert!(response.contains("\"applied\""));
    assert_eq!(engine.current_player(), "X");

    let state: GameState =
        serde_json::from_str(&engine.state_json().expect("state should serialize"))
            .expect("state json should parse");
    assert_eq!(state.board.available_moves().len(), 7);
}

#[wasm_bindgen_test]
fn two_player_win_is_recorded() {
    let mut engine = engine(r#"{"mode":"twoPlayer"}"#);
    for index in [0, 3, 1, 4, 2] {
        assert!(engine.select_cell(index));
    }
    assert!(!engine.is_active());
    assert_eq!(engine.winning_line(), vec![0, 1, 2]);
    assert_eq!(engine.status_text(), "Player X wins!");

    let stats: Statistics =
        serde_json::from_str(&engine.stats_json().expect("stats should serialize"))
            .expect("stats json should parse");
    assert_eq!(stats.score_x, 1);
    assert_eq!(stats.total_games, 1);

    let reloaded = GameEngine::new(None).expect("engine should start");
    assert!(reloaded.stats_json().expect("stats").contains("\"scoreX\":1"));
}

#[wasm_bindgen_test]
fn rejects_unknown_settings() {
    let mut engine = engine("{}");
    assert!(engine.set_difficulty("impossible").is_ok());
    assert!(engine.set_difficulty("godlike").is_err());
    assert!(engine.set_mode("pvp").is_ok());
    assert!(GameEngine::new(Some("{oops".to_owned())).is_err());
}

#[wasm_bindgen_test]
async fn think_ai_resolves_to_a_decision() {
    let mut engine = engine(r#"{"aiDelayMs":5}"#);
    assert!(engine.select_cell(4));
    let value = wasm_bindgen_futures::JsFuture::from(engine.think_ai(None))
        .await
        .expect("promise should resolve");
    let json = value.as_string().expect("decision is a json string");
    assert!(json.contains("\"index\""));
    assert_eq!(engine.current_player(), "O", "thinking does not move");
}

#[wasm_bindgen_test]
async fn think_ai_is_null_off_the_computer_turn() {
    let mut single = engine(r#"{"aiDelayMs":0}"#);
    let value = wasm_bindgen_futures::JsFuture::from(single.think_ai(None))
        .await
        .expect("promise should resolve");
    assert!(value.is_null(), "human x is on turn");

    let mut pair = engine(r#"{"mode":"twoPlayer"}"#);
    assert!(pair.select_cell(0));
    let response = pair.apply_ai_move().expect("response serializes");
    assert!(!response.contains("\"decision\""));
    assert_eq!(pair.current_player(), "O");
}
