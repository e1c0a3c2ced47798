//! 电脑对手：随机、启发式与穷举 minimax 四档难度。

pub mod agent;
pub mod heuristics;
pub mod minimax;

pub use agent::{AiAgent, AiConfig, AiDecision, AiDifficulty, DecisionReason};
pub use minimax::{best_move, minimax, terminal_score, SearchResult, SearchStats};
