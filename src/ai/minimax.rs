use serde::{Deserialize, Serialize};

use crate::game::{Board, Player};

pub const WIN_SCORE: i32 = 10;
pub const LOSS_SCORE: i32 = -10;
pub const DRAW_SCORE: i32 = 0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub index: usize,
    pub score: i32,
    pub nodes: u64,
}

pub fn terminal_score(board: &Board) -> Option<i32> {
    if board.is_win_for(Player::X) {
        Some(LOSS_SCORE)
    } else if board.is_win_for(Player::O) {
        Some(WIN_SCORE)
    } else if board.is_full() {
        Some(DRAW_SCORE)
    } else {
        None
    }
}

fn improves(maximizing: bool, candidate: i32, best: i32) -> bool {
    if maximizing {
        candidate > best
    } else {
        candidate < best
    }
}

/// 以 O 方视角求 `board` 的分值（X 连线 -10，O 连线 +10，平局 0，不按深度折算）。
/// 每步试探落子都会在尝试下一步前撤销，返回时棋盘不变。
pub fn minimax(board: &mut Board, to_move: Player, stats: &mut SearchStats) -> i32 {
    stats.nodes += 1;
    if let Some(score) = terminal_score(board) {
        return score;
    }

    let maximizing = to_move == Player::O;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for index in board.available_moves() {
        board.place(index, to_move);
        let score = minimax(board, to_move.opponent(), stats);
        board.clear(index);
        if improves(maximizing, score, best) {
            best = score;
        }
    }
    best
}

/// `to_move` 的最佳落子，分值相同时取最小下标；已终局时返回 `None`。
pub fn best_move(board: &Board, to_move: Player) -> Option<SearchResult> {
    if terminal_score(board).is_some() {
        return None;
    }

    let maximizing = to_move == Player::O;
    let mut scratch = board.clone();
    let mut stats = SearchStats::default();
    let mut best: Option<(usize, i32)> = None;

    for index in board.available_moves() {
        scratch.place(index, to_move);
        let score = minimax(&mut scratch, to_move.opponent(), &mut stats);
        scratch.clear(index);

        let better = match best {
            None => true,
            Some((_, best_score)) => improves(maximizing, score, best_score),
        };
        if better {
            best = Some((index, score));
        }
    }

    best.map(|(index, score)| SearchResult {
        index,
        score,
        nodes: stats.nodes,
    })
}
