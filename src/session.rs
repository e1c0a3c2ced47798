use crate::ai::{AiAgent, AiConfig, AiDecision, AiDifficulty};
use crate::game::{
    GameConfig, GameEvent, GameMode, GameOutcome, GameState, MoveAction, Player, RuleEngine,
    RuleError, RuleResolution, Scoreboard, Statistics,
};
use crate::storage::StatsStore;
use crate::{console_log, console_warn};

/// 一局游戏的上下文：状态、配置、电脑对手与战绩。各会话互不影响。
pub struct GameSession<S: StatsStore> {
    state: GameState,
    config: GameConfig,
    engine: RuleEngine,
    agent: AiAgent,
    scoreboard: Scoreboard<S>,
}

impl<S: StatsStore> GameSession<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        let agent = AiAgent::new(ai_config(&config));
        Self::with_agent(config, store, agent)
    }

    pub fn with_agent(config: GameConfig, store: S, mut agent: AiAgent) -> Self {
        agent.set_difficulty(config.difficulty);
        agent.set_player(config.computer_player);
        Self {
            state: GameState::new(),
            config,
            engine: RuleEngine::new(),
            agent,
            scoreboard: Scoreboard::load(store),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// 校验后替换为外部导入的状态。
    pub fn set_state(&mut self, state: GameState) -> Result<(), RuleError> {
        RuleEngine::ensure_integrity(&state)?;
        self.state = state;
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.agent.set_difficulty(config.difficulty);
        self.agent.set_player(config.computer_player);
        self.config = config;
    }

    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.set_config(self.config.clone().with_difficulty(difficulty));
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.set_config(self.config.clone().with_mode(mode));
    }

    pub fn ai_config(&self) -> AiConfig {
        *self.agent.config()
    }

    pub fn stats(&self) -> &Statistics {
        self.scoreboard.stats()
    }

    pub fn scoreboard(&self) -> &Scoreboard<S> {
        &self.scoreboard
    }

    pub fn reset_stats(&mut self) {
        self.scoreboard.reset();
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.state.outcome.as_ref()
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.state.winning_line()
    }

    pub fn reset(&mut self) -> RuleResolution {
        let events = self.engine.reset(&mut self.state);
        RuleResolution::new(self.state.clone(), events)
    }

    pub fn computer_to_move(&self) -> bool {
        self.config.is_single_player()
            && self.state.is_active()
            && self.state.current_player == self.config.computer_player
    }

    /// 玩家点击。对人类一方不合法的操作一律忽略，状态不变。
    pub fn select_cell(&mut self, index: usize) -> Option<RuleResolution> {
        if self.computer_to_move() {
            return None;
        }
        self.play_move(index).ok()
    }

    /// 由当前行棋方在 `index` 落子。
    pub fn play_move(&mut self, index: usize) -> Result<RuleResolution, RuleError> {
        let action = MoveAction::new(self.state.current_player, index);
        let events = self.engine.play_move(&mut self.state, action)?;
        self.record_if_finished(&events);
        Ok(RuleResolution::new(self.state.clone(), events))
    }

    /// 询问电脑的落子但不执行。双人模式或轮到人类时返回 `None`，不会调用 AI。
    pub fn decide_computer_move(&mut self) -> Option<AiDecision> {
        if !self.computer_to_move() {
            return None;
        }
        Some(self.agent.decide_move(&self.state.board))
    }

    pub fn play_computer_move(&mut self) -> Option<(AiDecision, RuleResolution)> {
        let decision = self.decide_computer_move()?;
        let index = decision.index?;
        match self.play_move(index) {
            Ok(resolution) => {
                console_log!(
                    "computer ({}) played {index} [{}]",
                    decision.player,
                    decision.difficulty
                );
                Some((decision, resolution))
            }
            Err(error) => {
                console_warn!("computer move {index} rejected: {error:?}");
                None
            }
        }
    }

    pub fn status_text(&self) -> String {
        let single = self.config.is_single_player();
        let human = self.config.human_player();
        match &self.state.outcome {
            Some(GameOutcome::Win { winner, .. }) if single => {
                if *winner == human {
                    "You win!".to_owned()
                } else {
                    "Computer wins!".to_owned()
                }
            }
            Some(GameOutcome::Win { winner, .. }) => format!("Player {winner} wins!"),
            Some(GameOutcome::Draw) => "Game ended in a draw!".to_owned(),
            None if single => {
                if self.state.current_player == human {
                    format!("Your turn ({human})")
                } else {
                    "Computer thinking...".to_owned()
                }
            }
            None => format!("Player {}'s turn", self.state.current_player),
        }
    }

    fn record_if_finished(&mut self, events: &[GameEvent]) {
        let finished = events
            .iter()
            .any(|event| matches!(event, GameEvent::GameWon { .. } | GameEvent::GameDrawn));
        if !finished {
            return;
        }
        if let Some(outcome) = self.state.outcome.clone() {
            self.scoreboard.record(&outcome);
        }
    }
}

fn ai_config(config: &GameConfig) -> AiConfig {
    AiConfig::from_difficulty(config.difficulty).with_player(config.computer_player)
}
