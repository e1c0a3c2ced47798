use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{Board, Player, CENTER, CORNERS, WINNING_LINES};

/// 能让 `player` 连成一线的空格。按获胜线顺序扫描，每条线依次检查 `(a,b)→c`、`(a,c)→b`、`(b,c)→a`。
pub fn find_completing_move(board: &Board, player: Player) -> Option<usize> {
    let target = player.to_cell();
    let cells = board.cells();
    for [a, b, c] in WINNING_LINES {
        if cells[a] == target && cells[b] == target && cells[c].is_empty() {
            return Some(c);
        }
        if cells[a] == target && cells[c] == target && cells[b].is_empty() {
            return Some(b);
        }
        if cells[b] == target && cells[c] == target && cells[a].is_empty() {
            return Some(a);
        }
    }
    None
}

pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.available_moves().choose(rng).copied()
}

pub fn center_move(board: &Board) -> Option<usize> {
    board.is_empty_at(CENTER).then_some(CENTER)
}

pub fn random_corner<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    let open: Vec<usize> = CORNERS
        .iter()
        .copied()
        .filter(|&index| board.is_empty_at(index))
        .collect();
    open.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn board(layout: &str) -> Board {
        layout.parse().expect("layout should parse")
    }

    #[test]
    fn finds_the_gap_in_any_position_of_a_line() {
        assert_eq!(find_completing_move(&board("XX. ... ..."), Player::X), Some(2));
        assert_eq!(find_completing_move(&board("X.X ... ..."), Player::X), Some(1));
        assert_eq!(find_completing_move(&board(".XX ... ..."), Player::X), Some(0));
        assert_eq!(find_completing_move(&board("O.. .O. ..."), Player::O), Some(8));
        assert_eq!(find_completing_move(&board("XX. ... ..."), Player::O), None);
        assert_eq!(find_completing_move(&board("XXO ... ..."), Player::X), None);
    }

    #[test]
    fn earliest_line_wins_ties() {
        // 行先于列：(3,4,5) 与 (1,4,7) 都能让 O 成线。
        let position = board(".O. OO. ...");
        assert_eq!(find_completing_move(&position, Player::O), Some(5));
    }

    #[test]
    fn random_choices_stay_on_empty_cells() {
        let mut rng = SmallRng::seed_from_u64(7);
        let position = board("XOX .O. X..");
        for _ in 0..50 {
            let index = random_move(&position, &mut rng).expect("moves available");
            assert!(position.is_empty_at(index));
            let corner = random_corner(&position, &mut rng).expect("corner 8 is open");
            assert_eq!(corner, 8);
        }
        assert_eq!(random_move(&board("XOX XOO OXX"), &mut rng), None);
    }

    #[test]
    fn center_only_when_open() {
        assert_eq!(center_move(&Board::new()), Some(CENTER));
        assert_eq!(center_move(&board("... .X. ...")), None);
    }
}
