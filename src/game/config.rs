use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::state::Player;
use crate::ai::AiDifficulty;

/// 电脑落子前的默认停顿（毫秒），仅用于观感。
pub const DEFAULT_AI_DELAY_MS: u32 = 500;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    SinglePlayer,
    TwoPlayer,
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "singleplayer" | "single" | "pve" | "computer" => Ok(GameMode::SinglePlayer),
            "twoplayer" | "two" | "pvp" | "local" => Ok(GameMode::TwoPlayer),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ConfigError {
    Malformed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub difficulty: AiDifficulty,
    pub mode: GameMode,
    pub computer_player: Player,
    pub ai_delay_ms: u32,
}

impl GameConfig {
    pub fn from_json(json: Option<&str>) -> Result<Self, ConfigError> {
        match json {
            Some(json) if !json.trim().is_empty() => {
                serde_json::from_str(json).map_err(|error| ConfigError::Malformed {
                    message: error.to_string(),
                })
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn with_difficulty(mut self, difficulty: AiDifficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_single_player(&self) -> bool {
        self.mode == GameMode::SinglePlayer
    }

    pub fn human_player(&self) -> Player {
        self.computer_player.opponent()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: AiDifficulty::Minimax,
            mode: GameMode::SinglePlayer,
            computer_player: Player::O,
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = GameConfig::from_json(Some(r#"{"difficulty":"medium"}"#))
            .expect("partial config should parse");
        assert_eq!(config.difficulty, AiDifficulty::Medium);
        assert_eq!(config.mode, GameMode::SinglePlayer);
        assert_eq!(config.computer_player, Player::O);
        assert_eq!(config.ai_delay_ms, DEFAULT_AI_DELAY_MS);

        assert_eq!(GameConfig::from_json(None), Ok(GameConfig::default()));
        assert_eq!(GameConfig::from_json(Some("  ")), Ok(GameConfig::default()));
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let config = GameConfig::from_json(Some(
            r#"{"mode":"twoPlayer","computerPlayer":"X","aiDelayMs":0}"#,
        ))
        .expect("config should parse");
        assert_eq!(config.mode, GameMode::TwoPlayer);
        assert_eq!(config.human_player(), Player::O);
        assert_eq!(config.ai_delay_ms, 0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(
            GameConfig::from_json(Some("{difficulty")),
            Err(ConfigError::Malformed { .. })
        ));
    }

    #[test]
    fn mode_aliases_parse() {
        assert_eq!("pvp".parse(), Ok(GameMode::TwoPlayer));
        assert_eq!("singlePlayer".parse(), Ok(GameMode::SinglePlayer));
        assert!("chess".parse::<GameMode>().is_err());
    }
}
