//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator
//! and the make/unmake machinery together.

use super::generate_moves;
use crate::Board;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(board);
    let mut nodes = 0u64;

    for m in &moves {
        let outcome = board.make_move(*m);
        if outcome.is_legal() {
            nodes += perft(board, depth - 1);
        }
        board.unmake_move(*m);
    }

    nodes
}

/// Perft with divide - shows node count for each root move.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(board);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let outcome = board.make_move(*m);
        if outcome.is_legal() {
            let nodes = if depth > 1 {
                perft(board, depth - 1)
            } else {
                1
            };
            results.push((m.to_uci(), nodes));
        }
        board.unmake_move(*m);
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    // Starting position perft values (well-known and verified)
    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&mut Board::startpos(), 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&mut Board::startpos(), 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&mut Board::startpos(), 3), 8902);
    }

    #[test]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&mut Board::startpos(), 4), 197281);
    }

    // Depth 5 is slower, only run on demand
    #[test]
    #[ignore]
    fn perft_startpos_depth_5() {
        assert_eq!(perft(&mut Board::startpos(), 5), 4865609);
    }

    // Kiwipete - a position with lots of special moves
    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    #[test]
    fn perft_kiwipete_depth_1() {
        assert_eq!(perft(&mut board(KIWIPETE), 1), 48);
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        assert_eq!(perft(&mut board(KIWIPETE), 2), 2039);
    }

    #[test]
    fn perft_kiwipete_depth_3() {
        assert_eq!(perft(&mut board(KIWIPETE), 3), 97862);
    }

    // Position 3: check evasion, en passant, promotion
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";

    #[test]
    fn perft_position3_depth_1() {
        assert_eq!(perft(&mut board(POSITION_3), 1), 14);
    }

    #[test]
    fn perft_position3_depth_2() {
        assert_eq!(perft(&mut board(POSITION_3), 2), 191);
    }

    #[test]
    fn perft_position3_depth_3() {
        assert_eq!(perft(&mut board(POSITION_3), 3), 2812);
    }

    // Position 4: lots of promotions and captures
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";

    #[test]
    fn perft_position4_depth_1() {
        assert_eq!(perft(&mut board(POSITION_4), 1), 6);
    }

    #[test]
    fn perft_position4_depth_2() {
        assert_eq!(perft(&mut board(POSITION_4), 2), 264);
    }

    #[test]
    fn perft_position4_depth_3() {
        assert_eq!(perft(&mut board(POSITION_4), 3), 9467);
    }

    // Position 5: complex middlegame position
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    #[test]
    fn perft_position5_depth_1() {
        assert_eq!(perft(&mut board(POSITION_5), 1), 44);
    }

    #[test]
    fn perft_position5_depth_2() {
        assert_eq!(perft(&mut board(POSITION_5), 2), 1486);
    }

    #[test]
    fn perft_position5_depth_3() {
        assert_eq!(perft(&mut board(POSITION_5), 3), 62379);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let mut board = Board::startpos();
        let results = perft_divide(&mut board, 2);
        assert_eq!(results.len(), 20);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 400);
    }

    #[test]
    fn perft_leaves_board_unchanged() {
        let mut board = board(KIWIPETE);
        let before = board.clone();
        let _ = perft(&mut board, 3);
        assert_eq!(board, before);
    }
}
