use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameOutcome, GameState, IntegrityError, Player, BOARD_SIZE};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveAction {
    pub player: Player,
    pub index: usize,
}

impl MoveAction {
    pub fn new(player: Player, index: usize) -> Self {
        Self { player, index }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    NotPlayerTurn { expected: Player, actual: Player },
    OutOfRange { index: usize },
    CellOccupied { index: usize },
    IntegrityViolation { error: IntegrityError },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOutcome>,
}

impl RuleResolution {
    pub fn new(state: GameState, events: Vec<GameEvent>) -> Self {
        let outcome = state.outcome.clone();
        Self {
            state,
            events,
            outcome,
        }
    }
}

#[derive(Debug, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }

    fn ensure_active(state: &GameState) -> Result<(), RuleError> {
        if state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_turn_owner(state: &GameState, player: Player) -> Result<(), RuleError> {
        if state.current_player != player {
            return Err(RuleError::NotPlayerTurn {
                expected: state.current_player,
                actual: player,
            });
        }
        Ok(())
    }

    fn ensure_playable(state: &GameState, index: usize) -> Result<(), RuleError> {
        if index >= BOARD_SIZE {
            return Err(RuleError::OutOfRange { index });
        }
        if !state.board.is_empty_at(index) {
            return Err(RuleError::CellOccupied { index });
        }
        Ok(())
    }

    pub fn ensure_integrity(state: &GameState) -> Result<(), RuleError> {
        state
            .integrity_check()
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    /// 落子并推进回合：终局时记录结果，否则切换到对手。
    pub fn play_move(
        &mut self,
        state: &mut GameState,
        action: MoveAction,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_active(state)?;
        Self::ensure_turn_owner(state, action.player)?;
        Self::ensure_playable(state, action.index)?;

        if !state.apply_move(action.index, action.player) {
            return Err(RuleError::CellOccupied {
                index: action.index,
            });
        }
        state.turn += 1;

        let mut events = vec![GameEvent::MovePlayed {
            player: action.player,
            index: action.index,
        }];
        state.record_event(events[0].clone());

        match state.evaluate_outcome() {
            Some(GameOutcome::Win { winner, line }) => {
                events.push(GameEvent::GameWon { winner, line });
            }
            Some(GameOutcome::Draw) => events.push(GameEvent::GameDrawn),
            None => {
                state.current_player = action.player.opponent();
                let event = GameEvent::TurnPassed {
                    player: state.current_player,
                };
                state.record_event(event.clone());
                events.push(event);
            }
        }

        Ok(events)
    }

    pub fn reset(&mut self, state: &mut GameState) -> Vec<GameEvent> {
        state.reset();
        vec![GameEvent::GameReset]
    }

    pub fn check_result(state: &mut GameState) -> Option<GameOutcome> {
        state.evaluate_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_all(engine: &mut RuleEngine, state: &mut GameState, moves: &[usize]) {
        for &index in moves {
            let player = state.current_player;
            engine
                .play_move(state, MoveAction::new(player, index))
                .expect("scripted move should be legal");
        }
    }

    #[test]
    fn move_switches_turn() {
        let mut engine = RuleEngine::new();
        let mut state = GameState::new();

        let events = engine
            .play_move(&mut state, MoveAction::new(Player::X, 4))
            .expect("opening move should succeed");

        assert_eq!(state.current_player, Player::O);
        assert_eq!(state.turn, 1);
        assert_eq!(
            events,
            vec![
                GameEvent::MovePlayed {
                    player: Player::X,
                    index: 4
                },
                GameEvent::TurnPassed { player: Player::O },
            ]
        );
    }

    #[test]
    fn invalid_moves_leave_state_untouched() {
        let mut engine = RuleEngine::new();
        let mut state = GameState::new();
        play_all(&mut engine, &mut state, &[0]);
        let before = state.clone();

        assert_eq!(
            engine.play_move(&mut state, MoveAction::new(Player::O, 0)),
            Err(RuleError::CellOccupied { index: 0 })
        );
        assert_eq!(
            engine.play_move(&mut state, MoveAction::new(Player::O, 12)),
            Err(RuleError::OutOfRange { index: 12 })
        );
        assert_eq!(
            engine.play_move(&mut state, MoveAction::new(Player::X, 1)),
            Err(RuleError::NotPlayerTurn {
                expected: Player::O,
                actual: Player::X
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn completed_line_ends_the_game() {
        let mut engine = RuleEngine::new();
        let mut state = GameState::new();
        play_all(&mut engine, &mut state, &[0, 3, 1, 4]);

        let events = engine
            .play_move(&mut state, MoveAction::new(Player::X, 2))
            .expect("winning move should succeed");

        assert!(events.contains(&GameEvent::GameWon {
            winner: Player::X,
            line: [0, 1, 2]
        }));
        assert_eq!(state.current_player, Player::X, "winner stays current");
        assert_eq!(
            engine.play_move(&mut state, MoveAction::new(Player::X, 8)),
            Err(RuleError::GameFinished)
        );
    }

    #[test]
    fn full_board_ends_in_draw() {
        let mut engine = RuleEngine::new();
        let mut state = GameState::new();
        play_all(&mut engine, &mut state, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert_eq!(state.outcome, Some(GameOutcome::Draw));
        assert_eq!(state.turn, 9);
        assert!(RuleEngine::ensure_integrity(&state).is_ok());
    }

    #[test]
    fn replaying_after_reset_is_deterministic() {
        let moves = [4, 0, 8, 2, 1, 7, 6, 3, 5];
        let mut engine = RuleEngine::new();

        let mut first = GameState::new();
        play_all(&mut engine, &mut first, &moves);

        let mut second = first.clone();
        assert_eq!(engine.reset(&mut second), vec![GameEvent::GameReset]);
        play_all(&mut engine, &mut second, &moves);

        assert!(first.is_finished());
        assert_eq!(first, second);
    }
}
