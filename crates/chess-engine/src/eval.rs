//! Static position evaluation.
//!
//! Material plus piece-square tables, with a small bonus for passed pawns.
//! The score is returned from the side to move's perspective, which is what
//! negamax expects. Pure and deterministic: the same position always
//! evaluates to the same score.

use chess_core::{Color, Piece, Square};

use crate::movegen::passed_pawn_mask;
use crate::Board;

/// Piece values in centipawns.
const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

/// Bonus for a passed pawn, indexed by the rank it stands on (from its
/// owner's point of view).
const PASSED_PAWN_BONUS: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];

// Piece-square tables, written as seen on a diagram: the first row is
// rank 8, the last row is rank 1. White indexes them with the rank
// flipped, black as-is, so the same table serves both sides.

const PAWN_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, 50, 50, 50, 50, 50, 50, 50, 50, 10, 10, 20, 30, 30, 20, 10, 10, 5, 5,
    10, 25, 25, 10, 5, 5, 0, 0, 0, 20, 20, 0, 0, 0, 5, -5, -10, 0, 0, -10, -5, 5, 5, 10, 10, -20,
    -20, 10, 10, 5, 0, 0, 0, 0, 0, 0, 0, 0,
];

const KNIGHT_PST: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50, -40, -20, 0, 0, 0, 0, -20, -40, -30, 0, 10, 15, 15, 10,
    0, -30, -30, 5, 15, 20, 20, 15, 5, -30, -30, 0, 15, 20, 20, 15, 0, -30, -30, 5, 10, 15, 15, 10,
    5, -30, -40, -20, 0, 5, 5, 0, -20, -40, -50, -40, -30, -30, -30, -30, -40, -50,
];

const BISHOP_PST: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20, -10, 0, 0, 0, 0, 0, 0, -10, -10, 0, 5, 10, 10, 5, 0,
    -10, -10, 5, 5, 10, 10, 5, 5, -10, -10, 0, 10, 10, 10, 10, 0, -10, -10, 10, 10, 10, 10, 10, 10,
    -10, -10, 5, 0, 0, 0, 0, 5, -10, -20, -10, -10, -10, -10, -10, -10, -20,
];

const ROOK_PST: [i32; 64] = [
    0, 0, 0, 0, 0, 0, 0, 0, 5, 10, 10, 10, 10, 10, 10, 5, -5, 0, 0, 0, 0, 0, 0, -5, -5, 0, 0, 0, 0,
    0, 0, -5, -5, 0, 0, 0, 0, 0, 0, -5, -5, 0, 0, 0, 0, 0, 0, -5, -5, 0, 0, 0, 0, 0, 0, -5, 0, 0,
    0, 5, 5, 0, 0, 0,
];

const QUEEN_PST: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20, -10, 0, 0, 0, 0, 0, 0, -10, -10, 0, 5, 5, 5, 5, 0, -10,
    -5, 0, 5, 5, 5, 5, 0, -5, 0, 0, 5, 5, 5, 5, 0, -5, -10, 5, 5, 5, 5, 5, 0, -10, -10, 0, 5, 0, 0,
    0, 0, -10, -20, -10, -10, -5, -5, -10, -10, -20,
];

const KING_PST: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30, -30, -40, -40, -50, -50, -40, -40, -30, -30, -40, -40,
    -50, -50, -40, -40, -30, -30, -40, -40, -50, -50, -40, -40, -30, -20, -30, -30, -40, -40, -30,
    -30, -20, -10, -20, -20, -20, -20, -20, -20, -10, 20, 20, 0, 0, 0, 0, 20, 20, 20, 30, 10, 0, 0,
    10, 30, 20,
];

const PIECE_PSTS: [&[i32; 64]; 6] = [
    &PAWN_PST,
    &KNIGHT_PST,
    &BISHOP_PST,
    &ROOK_PST,
    &QUEEN_PST,
    &KING_PST,
];

#[inline]
fn pst_index(sq: Square, color: Color) -> usize {
    match color {
        Color::White => (sq.index() ^ 56) as usize,
        Color::Black => sq.index() as usize,
    }
}

/// Evaluates the position from the side to move's perspective.
pub fn evaluate(board: &Board) -> i32 {
    let mut score = 0i32;

    for color in [Color::White, Color::Black] {
        let sign = if color == Color::White { 1 } else { -1 };
        let enemy_pawns = board.pieces_of(Piece::Pawn, color.opposite());

        for piece in Piece::ALL {
            let pst = PIECE_PSTS[piece.index()];
            for sq in board.pieces_of(piece, color) {
                score += sign * (PIECE_VALUES[piece.index()] + pst[pst_index(sq, color)]);
            }
        }

        for sq in board.pieces_of(Piece::Pawn, color) {
            if (passed_pawn_mask(sq, color) & enemy_pawns).is_empty() {
                let relative_rank = match color {
                    Color::White => sq.rank().index() as usize,
                    Color::Black => 7 - sq.rank().index() as usize,
                };
                score += sign * PASSED_PAWN_BONUS[relative_rank];
            }
        }
    }

    match board.side_to_move() {
        Color::White => score,
        Color::Black => -score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_is_balanced() {
        let board = Board::startpos();
        assert_eq!(evaluate(&board), 0);
    }

    #[test]
    fn evaluation_is_symmetric_in_side_to_move() {
        // The same balanced position scores zero for either side
        let white = Board::from_fen("4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 w - - 0 1").unwrap();
        let black = Board::from_fen("4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&white), -evaluate(&black));
        assert_eq!(evaluate(&white), 0);
    }

    #[test]
    fn extra_material_scores_positive() {
        // White has an extra queen
        let board = Board::from_fen("4k3/8/8/8/8/8/3Q4/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&board) > 800);
        // Same position seen by black scores the mirror image
        let board = Board::from_fen("4k3/8/8/8/8/8/3Q4/4K3 b - - 0 1").unwrap();
        assert!(evaluate(&board) < -800);
    }

    #[test]
    fn central_knight_beats_corner_knight() {
        let central = Board::from_fen("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        let corner = Board::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
        assert!(evaluate(&central) > evaluate(&corner));
    }

    #[test]
    fn passed_pawn_earns_bonus() {
        // White d5 pawn is passed; with a black e7 pawn in the mask it is not
        let passed = Board::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1").unwrap();
        let blocked = Board::from_fen("4k3/4p3/8/3P4/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(evaluate(&passed) > evaluate(&blocked));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let board =
            Board::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
                .unwrap();
        assert_eq!(evaluate(&board), evaluate(&board));
    }
}
