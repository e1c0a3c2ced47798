use std::fmt;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::heuristics::{center_move, find_completing_move, random_corner, random_move};
use super::minimax::{best_move, terminal_score};
use crate::game::{Board, Player};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Random,
    Medium,
    Hard,
    #[default]
    Minimax,
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" | "easy" => Ok(AiDifficulty::Random),
            "medium" | "normal" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            "minimax" | "impossible" | "expert" => Ok(AiDifficulty::Minimax),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AiDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AiDifficulty::Random => "random",
            AiDifficulty::Medium => "medium",
            AiDifficulty::Hard => "hard",
            AiDifficulty::Minimax => "minimax",
        };
        f.write_str(name)
    }
}

/// 选择该落子的理由。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecisionReason {
    Win,
    Block,
    Center,
    Corner,
    Random,
    Search,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiConfig {
    pub difficulty: AiDifficulty,
    pub player: Player,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: AiDifficulty) -> Self {
        Self {
            difficulty,
            player: Player::O,
        }
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.player = player;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(AiDifficulty::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DecisionReason>,
    pub nodes: u64,
    pub difficulty: AiDifficulty,
    pub player: Player,
}

impl AiDecision {
    fn pass(config: &AiConfig) -> Self {
        Self {
            index: None,
            evaluation: None,
            reason: None,
            nodes: 0,
            difficulty: config.difficulty,
            player: config.player,
        }
    }

    fn heuristic(config: &AiConfig, index: usize, reason: DecisionReason) -> Self {
        Self {
            index: Some(index),
            reason: Some(reason),
            ..Self::pass(config)
        }
    }
}

/// 电脑对手。自带随机数生成器，随机档位可用固定种子复现。
pub struct AiAgent {
    config: AiConfig,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.config.difficulty = difficulty;
    }

    pub fn set_player(&mut self, player: Player) {
        self.config.player = player;
    }

    /// 为配置的一方选择落子。仅在对局进行中调用；已分胜负或下满的棋盘返回不带下标的决策。
    pub fn decide_move(&mut self, board: &Board) -> AiDecision {
        if terminal_score(board).is_some() {
            return AiDecision::pass(&self.config);
        }

        match self.config.difficulty {
            AiDifficulty::Random => self.random_decision(board),
            AiDifficulty::Medium => self
                .tactical_decision(board)
                .unwrap_or_else(|| self.random_decision(board)),
            AiDifficulty::Hard => self
                .tactical_decision(board)
                .or_else(|| self.positional_decision(board))
                .unwrap_or_else(|| self.random_decision(board)),
            AiDifficulty::Minimax => self.search_decision(board),
        }
    }

    fn random_decision(&mut self, board: &Board) -> AiDecision {
        match random_move(board, &mut self.rng) {
            Some(index) => AiDecision::heuristic(&self.config, index, DecisionReason::Random),
            None => AiDecision::pass(&self.config),
        }
    }

    fn tactical_decision(&self, board: &Board) -> Option<AiDecision> {
        let me = self.config.player;
        if let Some(index) = find_completing_move(board, me) {
            return Some(AiDecision::heuristic(&self.config, index, DecisionReason::Win));
        }
        find_completing_move(board, me.opponent())
            .map(|index| AiDecision::heuristic(&self.config, index, DecisionReason::Block))
    }

    fn positional_decision(&mut self, board: &Board) -> Option<AiDecision> {
        if let Some(index) = center_move(board) {
            return Some(AiDecision::heuristic(&self.config, index, DecisionReason::Center));
        }
        random_corner(board, &mut self.rng)
            .map(|index| AiDecision::heuristic(&self.config, index, DecisionReason::Corner))
    }

    fn search_decision(&self, board: &Board) -> AiDecision {
        match best_move(board, self.config.player) {
            Some(result) => AiDecision {
                index: Some(result.index),
                evaluation: Some(result.score),
                reason: Some(DecisionReason::Search),
                nodes: result.nodes,
                difficulty: self.config.difficulty,
                player: self.config.player,
            },
            None => AiDecision::pass(&self.config),
        }
    }
}
