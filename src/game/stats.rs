use serde::{Deserialize, Serialize};

use super::state::{GameOutcome, Player};
use crate::storage::{StatsStore, StorageError};
use crate::{console_log, console_warn};

/// 统计记录在存储中的键名。
pub const STATS_KEY: &str = "ticTacToeStats";

/// 跨会话保存的战绩。连胜计数只在当前会话内有效，不写入存储。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub score_x: u32,
    pub score_o: u32,
    pub score_draw: u32,
    pub total_games: u32,
    pub best_streak: u32,
    #[serde(skip)]
    pub current_streak: u32,
}

impl Statistics {
    pub fn record(&mut self, outcome: &GameOutcome) {
        self.total_games += 1;
        match outcome.winner() {
            Some(Player::X) => {
                self.score_x += 1;
                self.current_streak += 1;
                self.best_streak = self.best_streak.max(self.current_streak);
            }
            Some(Player::O) => {
                self.score_o += 1;
                self.current_streak = 0;
            }
            None => {
                self.score_draw += 1;
                self.current_streak = 0;
            }
        }
    }

    /// 解析存储内容；内容损坏时返回默认值。
    pub fn from_json_or_default(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|error| {
            console_warn!("stats record is malformed, using defaults: {error}");
            Self::default()
        })
    }
}

/// 战绩与其存储后端。读写失败均不致命。
pub struct Scoreboard<S: StatsStore> {
    stats: Statistics,
    store: S,
}

impl<S: StatsStore> Scoreboard<S> {
    pub fn load(store: S) -> Self {
        let stats = match store.read(STATS_KEY) {
            Ok(Some(json)) => Statistics::from_json_or_default(&json),
            Ok(None) => Statistics::default(),
            Err(error) => {
                console_warn!("stats unavailable, using defaults: {error:?}");
                Statistics::default()
            }
        };
        Self { stats, store }
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn record(&mut self, outcome: &GameOutcome) {
        self.stats.record(outcome);
        console_log!(
            "game recorded: X {} / O {} / draw {} ({} total)",
            self.stats.score_x,
            self.stats.score_o,
            self.stats.score_draw,
            self.stats.total_games
        );
        self.persist();
    }

    pub fn reset(&mut self) {
        self.stats = Statistics::default();
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(error) = self.save() {
            console_warn!("stats not saved: {error:?}");
        }
    }

    fn save(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.stats).map_err(|_| StorageError::WriteFailed {
            key: STATS_KEY.to_owned(),
        })?;
        self.store.write(STATS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn win(winner: Player) -> GameOutcome {
        GameOutcome::Win {
            winner,
            line: [0, 1, 2],
        }
    }

    struct BrokenStore;

    impl StatsStore for BrokenStore {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::ReadFailed {
                key: key.to_owned(),
            })
        }

        fn write(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::WriteFailed {
                key: key.to_owned(),
            })
        }
    }

    #[test]
    fn one_of_each_outcome() {
        let mut stats = Statistics::default();
        stats.record(&win(Player::X));
        stats.record(&win(Player::O));
        stats.record(&GameOutcome::Draw);

        assert_eq!(stats.score_x, 1);
        assert_eq!(stats.score_o, 1);
        assert_eq!(stats.score_draw, 1);
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.best_streak, 1);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn streak_resets_on_loss_or_draw() {
        let mut stats = Statistics::default();
        for _ in 0..3 {
            stats.record(&win(Player::X));
        }
        stats.record(&GameOutcome::Draw);
        stats.record(&win(Player::X));
        assert_eq!(stats.best_streak, 3);
        assert_eq!(stats.current_streak, 1);

        stats.record(&win(Player::O));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 3);
    }

    #[test]
    fn scoreboard_persists_after_each_game() {
        let mut board = Scoreboard::load(MemoryStore::new());
        assert_eq!(board.stats(), &Statistics::default());

        board.record(&win(Player::X));
        let saved = board.store().get(STATS_KEY).expect("stats should be saved");
        assert_eq!(
            saved,
            r#"{"scoreX":1,"scoreO":0,"scoreDraw":0,"totalGames":1,"bestStreak":1}"#
        );

        let reloaded = Scoreboard::load(board.store().clone());
        assert_eq!(reloaded.stats().score_x, 1);
        assert_eq!(reloaded.stats().best_streak, 1);
        assert_eq!(reloaded.stats().current_streak, 0);
    }

    #[test]
    fn corrupt_or_missing_records_use_defaults() {
        let board = Scoreboard::load(MemoryStore::with_entry(STATS_KEY, "not json"));
        assert_eq!(board.stats(), &Statistics::default());

        let board = Scoreboard::load(BrokenStore);
        assert_eq!(board.stats(), &Statistics::default());
    }

    #[test]
    fn failed_writes_keep_in_memory_stats() {
        let mut board = Scoreboard::load(BrokenStore);
        board.record(&GameOutcome::Draw);
        assert_eq!(board.stats().score_draw, 1);
        board.reset();
        assert_eq!(board.stats(), &Statistics::default());
    }
}
