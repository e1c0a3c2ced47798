//! 井字棋核心逻辑（棋盘、规则、配置、战绩）。

pub mod config;
pub mod rules;
pub mod state;
pub mod stats;

pub use config::{ConfigError, GameConfig, GameMode, DEFAULT_AI_DELAY_MS};
pub use rules::{MoveAction, RuleEngine, RuleError, RuleResolution};
pub use state::{
    Board,
    Cell,
    GameEvent,
    GameOutcome,
    GameState,
    IntegrityError,
    Player,
    BOARD_SIZE,
    CENTER,
    CORNERS,
    WINNING_LINES,
};
pub use stats::{Scoreboard, Statistics, STATS_KEY};
