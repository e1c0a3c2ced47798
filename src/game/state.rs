use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 棋盘格子数量（3x3，行优先）。
pub const BOARD_SIZE: usize = 9;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// 八条获胜线：三行、三列、两条对角线，顺序固定。
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 落子方标记。X 永远先手。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl FromStr for Player {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Player::X),
            "O" => Ok(Player::O),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// 单个格子的内容。空格序列化为 `""`，与前端渲染值保持一致。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    InvalidCellCount { count: usize },
    InvalidCell { symbol: char },
    MarkerCountMismatch { x_count: usize, o_count: usize },
    MultipleWinners,
    CurrentPlayerMismatch { expected: Player, actual: Player },
    OutcomeMismatch,
}

/// 3x3 棋盘。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// 在空格上落子；越界或已占用时返回 false 且不修改棋盘。
    pub fn place(&mut self, index: usize, player: Player) -> bool {
        if !self.is_empty_at(index) {
            return false;
        }
        self.cells[index] = player.to_cell();
        true
    }

    /// 撤销试探性落子，仅供搜索使用。
    pub(crate) fn clear(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::Empty;
        }
    }

    /// 按升序返回所有空格下标。
    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn count(&self, player: Player) -> usize {
        let target = player.to_cell();
        self.cells.iter().filter(|cell| **cell == target).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn is_win_for(&self, player: Player) -> bool {
        self.winning_line(player).is_some()
    }

    /// 按固定顺序返回 `player` 第一条连成的线。
    pub fn winning_line(&self, player: Player) -> Option<[usize; 3]> {
        let target = player.to_cell();
        WINNING_LINES
            .iter()
            .find(|line| line.iter().all(|&index| self.cells[index] == target))
            .copied()
    }

    pub fn winner(&self) -> Option<Player> {
        if self.is_win_for(Player::X) {
            Some(Player::X)
        } else if self.is_win_for(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    pub fn is_draw(&self) -> bool {
        self.is_full() && !self.is_win_for(Player::X) && !self.is_win_for(Player::O)
    }
}

/// 从紧凑文本解析棋盘：`X`/`O` 为棋子，`.`、`_`、`-` 为空格，空白被忽略。
impl FromStr for Board {
    type Err = IntegrityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(BOARD_SIZE);
        for symbol in s.chars().filter(|c| !c.is_whitespace()) {
            let cell = match symbol {
                'X' | 'x' => Cell::X,
                'O' | 'o' => Cell::O,
                '.' | '_' | '-' => Cell::Empty,
                other => return Err(IntegrityError::InvalidCell { symbol: other }),
            };
            cells.push(cell);
        }
        let count = cells.len();
        let cells: [Cell; BOARD_SIZE] = cells
            .try_into()
            .map_err(|_| IntegrityError::InvalidCellCount { count })?;
        Ok(Board::from_cells(cells))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::X => 'X',
                    Cell::O => 'O',
                };
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameOutcome {
    Win { winner: Player, line: [usize; 3] },
    Draw,
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Win { winner, .. } => Some(*winner),
            GameOutcome::Draw => None,
        }
    }

    pub fn line(&self) -> Option<[usize; 3]> {
        match self {
            GameOutcome::Win { line, .. } => Some(*line),
            GameOutcome::Draw => None,
        }
    }
}

/// 游戏事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MovePlayed { player: Player, index: usize },
    TurnPassed { player: Player },
    GameWon { winner: Player, line: [usize; 3] },
    GameDrawn,
    GameReset,
}

/// 一局游戏的完整状态。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    #[serde(default)]
    pub turn: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            turn: 0,
            event_log: Vec::new(),
            outcome: None,
        }
    }

    pub fn with_board(board: Board, current_player: Player) -> Self {
        let mut state = Self::new();
        state.turn = (board.count(Player::X) + board.count(Player::O)) as u32;
        state.board = board;
        state.current_player = current_player;
        state
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.event_log.push(event);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn is_active(&self) -> bool {
        !self.is_finished()
    }

    pub fn available_moves(&self) -> Vec<usize> {
        if self.is_finished() {
            return Vec::new();
        }
        self.board.available_moves()
    }

    /// 写入一步棋。越界、已占用或对局已结束时拒绝且不改变状态。
    pub fn apply_move(&mut self, index: usize, player: Player) -> bool {
        if self.is_finished() {
            return false;
        }
        self.board.place(index, player)
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.outcome.as_ref().and_then(GameOutcome::line)
    }

    /// 检查棋盘是否已到终局；若是则记录结果与事件。
    pub fn evaluate_outcome(&mut self) -> Option<GameOutcome> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }

        for player in [Player::X, Player::O] {
            if let Some(line) = self.board.winning_line(player) {
                return Some(self.declare_outcome(GameOutcome::Win {
                    winner: player,
                    line,
                }));
            }
        }

        if self.board.is_full() {
            return Some(self.declare_outcome(GameOutcome::Draw));
        }

        None
    }

    pub fn declare_outcome(&mut self, outcome: GameOutcome) -> GameOutcome {
        if self.outcome.is_none() {
            let event = match &outcome {
                GameOutcome::Win { winner, line } => GameEvent::GameWon {
                    winner: *winner,
                    line: *line,
                },
                GameOutcome::Draw => GameEvent::GameDrawn,
            };
            self.record_event(event);
            self.outcome = Some(outcome.clone());
        }
        outcome
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let x_count = self.board.count(Player::X);
        let o_count = self.board.count(Player::O);
        if x_count != o_count && x_count != o_count + 1 {
            return Err(IntegrityError::MarkerCountMismatch { x_count, o_count });
        }

        let x_wins = self.board.is_win_for(Player::X);
        let o_wins = self.board.is_win_for(Player::O);
        if x_wins && o_wins {
            return Err(IntegrityError::MultipleWinners);
        }

        match &self.outcome {
            None => {
                if x_wins || o_wins || self.board.is_full() {
                    return Err(IntegrityError::OutcomeMismatch);
                }
                let expected = if x_count == o_count {
                    Player::X
                } else {
                    Player::O
                };
                if self.current_player != expected {
                    return Err(IntegrityError::CurrentPlayerMismatch {
                        expected,
                        actual: self.current_player,
                    });
                }
            }
            Some(GameOutcome::Win { winner, line }) => {
                let target = winner.to_cell();
                let on_board = WINNING_LINES.contains(line)
                    && line.iter().all(|&index| self.board.get(index) == Some(target));
                // 胜方刚落完最后一子
                let counts_match = match winner {
                    Player::X => x_count == o_count + 1,
                    Player::O => x_count == o_count,
                };
                if !on_board || !counts_match {
                    return Err(IntegrityError::OutcomeMismatch);
                }
            }
            Some(GameOutcome::Draw) => {
                if !self.board.is_draw() {
                    return Err(IntegrityError::OutcomeMismatch);
                }
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
