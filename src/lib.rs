pub mod ai;
pub mod game;
pub mod session;
pub mod storage;
pub mod utils;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{AiAgent, AiConfig, AiDecision, AiDifficulty, DecisionReason};
pub use game::{
    Board, Cell, ConfigError, GameConfig, GameEvent, GameMode, GameOutcome, GameState,
    IntegrityError, MoveAction, Player, RuleEngine, RuleError, RuleResolution, Scoreboard,
    Statistics,
};
pub use session::GameSession;
pub use storage::{BrowserStore, MemoryStore, StatsStore, StorageError};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error<E: Serialize + std::fmt::Debug>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|_| JsValue::from_str(&format!("{error:?}")))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(serde_to_js_error)
}

fn parse_difficulty(value: Option<&str>, fallback: AiDifficulty) -> AiDifficulty {
    value
        .and_then(|value| AiDifficulty::from_str(value).ok())
        .unwrap_or(fallback)
}

fn parse_player(value: Option<&str>, fallback: Player) -> Player {
    value
        .and_then(|value| Player::from_str(value).ok())
        .unwrap_or(fallback)
}

#[derive(Serialize)]
struct AiMoveResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<AiDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<RuleResolution>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardReport {
    available_moves: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    winning_line: Option<[usize; 3]>,
    draw: bool,
    finished: bool,
}

impl BoardReport {
    fn new(board: &Board) -> Self {
        let winner = board.winner();
        let draw = board.is_draw();
        Self {
            available_moves: board.available_moves(),
            winner,
            winning_line: winner.and_then(|player| board.winning_line(player)),
            draw,
            finished: winner.is_some() || draw,
        }
    }
}

/// 浏览器中的一局游戏，战绩保存在 `localStorage`。
#[wasm_bindgen]
pub struct GameEngine {
    session: GameSession<BrowserStore>,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<GameEngine, JsValue> {
        let config = GameConfig::from_json(config_json.as_deref()).map_err(to_js_error)?;
        let store = BrowserStore::open();
        if !store.is_available() {
            crate::console_warn!("localStorage unavailable, stats will not persist");
        }
        Ok(GameEngine {
            session: GameSession::new(config, store),
        })
    }

    pub fn reset(&mut self) -> Result<String, JsValue> {
        to_json(&self.session.reset())
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.session.state())
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.session.set_state(state).map_err(to_js_error)
    }

    pub fn cells_json(&self) -> Result<String, JsValue> {
        to_json(&self.session.state().board)
    }

    pub fn config_json(&self) -> Result<String, JsValue> {
        to_json(self.session.config())
    }

    pub fn set_config_json(&mut self, json: &str) -> Result<(), JsValue> {
        let config = GameConfig::from_json(Some(json)).map_err(to_js_error)?;
        self.session.set_config(config);
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty = AiDifficulty::from_str(difficulty)
            .map_err(|_| JsValue::from_str(&format!("unknown difficulty: {difficulty}")))?;
        self.session.set_difficulty(difficulty);
        Ok(())
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = GameMode::from_str(mode)
            .map_err(|_| JsValue::from_str(&format!("unknown mode: {mode}")))?;
        self.session.set_mode(mode);
        Ok(())
    }

    pub fn current_player(&self) -> String {
        self.session.current_player().to_string()
    }

    pub fn is_active(&self) -> bool {
        self.session.state().is_active()
    }

    pub fn computer_to_move(&self) -> bool {
        self.session.computer_to_move()
    }

    pub fn status_text(&self) -> String {
        self.session.status_text()
    }

    /// 获胜连线的格子下标，未分胜负时为空。
    pub fn winning_line(&self) -> Vec<u32> {
        self.session
            .winning_line()
            .map(|line| line.iter().map(|&index| index as u32).collect())
            .unwrap_or_default()
    }

    /// 点击处理：点击被忽略时返回 false。
    pub fn select_cell(&mut self, index: usize) -> bool {
        self.session.select_cell(index).is_some()
    }

    pub fn play_move_json(&mut self, index: usize) -> Result<String, JsValue> {
        let resolution = self.session.play_move(index).map_err(to_js_error)?;
        to_json(&resolution)
    }

    pub fn apply_ai_move(&mut self) -> Result<String, JsValue> {
        let response = match self.session.play_computer_move() {
            Some((decision, applied)) => AiMoveResponse {
                decision: Some(decision),
                applied: Some(applied),
            },
            None => AiMoveResponse {
                decision: self.session.decide_computer_move(),
                applied: None,
            },
        };
        to_json(&response)
    }

    /// 延迟 `delay_ms`（默认取配置中的思考时间）后给出电脑的决策 JSON，不落子。
    /// 不轮到电脑时解析为 `null`。
    pub fn think_ai(&mut self, delay_ms: Option<u32>) -> Promise {
        let decision = self.session.decide_computer_move();
        let delay = delay_ms.unwrap_or(self.session.config().ai_delay_ms);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            match decision {
                Some(decision) => {
                    let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
                    Ok(JsValue::from_str(&json))
                }
                None => Ok(JsValue::NULL),
            }
        })
    }

    pub fn stats_json(&self) -> Result<String, JsValue> {
        to_json(self.session.stats())
    }

    pub fn reset_stats(&mut self) {
        self.session.reset_stats();
    }
}

/// 对给定棋盘计算电脑落子，不修改棋盘。
#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    board: JsValue,
    difficulty: Option<String>,
    player: Option<String>,
) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let difficulty = parse_difficulty(difficulty.as_deref(), AiDifficulty::Minimax);
    let player = parse_player(player.as_deref(), Player::O);
    let mut agent = AiAgent::new(AiConfig::from_difficulty(difficulty).with_player(player));
    let decision = agent.decide_move(&board);
    to_value(&decision).map_err(JsValue::from)
}

/// 返回胜负、平局与可落子位置。
#[wasm_bindgen(js_name = "checkResult")]
pub fn check_result(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    to_value(&BoardReport::new(&board)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "availableMoves")]
pub fn available_moves(board: JsValue) -> Result<Vec<u32>, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    Ok(board
        .available_moves()
        .into_iter()
        .map(|index| index as u32)
        .collect())
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: GameState = from_value(state).map_err(JsValue::from)?;
    RuleEngine::ensure_integrity(&state).map_err(to_js_error)
}
