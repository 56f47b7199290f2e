//! Move generation.
//!
//! Generation is pseudo-legal: every move respects piece movement and
//! occupancy but may leave the mover's own king in check. Legality is
//! decided by making the move and testing the king, either here in
//! [`generate_legal_moves`] or by the caller through
//! [`Board::make_move`](crate::Board::make_move).

mod attacks;
mod magics;
pub mod perft;

use crate::{Bitboard, Board};
use chess_core::{Color, Move, Piece, Rank, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, passed_pawn_mask, pawn_attacks, queen_attacks,
    rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Returns a mutable slice of the moves (for in-place ordering).
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Returns true if `sq` is attacked by any piece of `by`.
pub fn is_square_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let occupied = board.occupied();

    // A pawn of `by` attacks `sq` exactly when a pawn of the other color
    // standing on `sq` would attack the pawn's square
    if (pawn_attacks(sq, by.opposite()) & board.pieces_of(Piece::Pawn, by)).is_not_empty() {
        return true;
    }
    if (knight_attacks(sq) & board.pieces_of(Piece::Knight, by)).is_not_empty() {
        return true;
    }
    if (king_attacks(sq) & board.pieces_of(Piece::King, by)).is_not_empty() {
        return true;
    }

    let bishops_queens = board.pieces_of(Piece::Bishop, by) | board.pieces_of(Piece::Queen, by);
    if (bishop_attacks(sq, occupied) & bishops_queens).is_not_empty() {
        return true;
    }

    let rooks_queens = board.pieces_of(Piece::Rook, by) | board.pieces_of(Piece::Queen, by);
    (rook_attacks(sq, occupied) & rooks_queens).is_not_empty()
}

/// Returns true if the king of `color` is attacked.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    match board.king_square(color) {
        Some(sq) => is_square_attacked(board, sq, color.opposite()),
        None => false,
    }
}

/// Generates all pseudo-legal moves for the side to move.
pub fn generate_moves(board: &Board) -> MoveList {
    let mut moves = MoveList::new();

    generate_pawn_moves(board, &mut moves);
    generate_castling_moves(board, &mut moves);
    for piece in [
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        generate_piece_moves(board, piece, &mut moves);
    }

    moves
}

/// Generates all legal moves by filtering pseudo-legal moves through
/// make/unmake.
pub fn generate_legal_moves(board: &mut Board) -> MoveList {
    let pseudo = generate_moves(board);
    let mut legal = MoveList::new();

    for m in &pseudo {
        let outcome = board.make_move(*m);
        board.unmake_move(*m);
        if outcome.is_legal() {
            legal.push(*m);
        }
    }

    legal
}

/// Returns the attack set of a non-pawn piece standing on `from`.
#[inline]
fn piece_attacks(piece: Piece, from: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(from),
        Piece::Bishop => bishop_attacks(from, occupied),
        Piece::Rook => rook_attacks(from, occupied),
        Piece::Queen => queen_attacks(from, occupied),
        Piece::King => king_attacks(from),
        Piece::Pawn => Bitboard::EMPTY,
    }
}

/// Generates moves for one non-pawn piece kind: attack set minus own
/// occupancy, split into captures and quiet moves.
fn generate_piece_moves(board: &Board, piece: Piece, moves: &mut MoveList) {
    let us = board.side_to_move();
    let own = board.occupancy(us);
    let enemy = board.occupancy(us.opposite());
    let occupied = board.occupied();

    for from in board.pieces_of(piece, us) {
        let targets = piece_attacks(piece, from, occupied) & !own;
        for to in targets {
            if enemy.contains(to) {
                moves.push(Move::capture(from, to, piece));
            } else {
                moves.push(Move::quiet(from, to, piece));
            }
        }
    }
}

fn push_promotions(moves: &mut MoveList, from: Square, to: Square, is_capture: bool) {
    for promo in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
        moves.push(Move::new_promotion(from, to, promo, is_capture));
    }
}

fn generate_pawn_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let enemy = board.occupancy(us.opposite());
    let occupied = board.occupied();

    let (push_delta, start_rank, promo_rank) = match us {
        Color::White => (8i8, Rank::R2, Rank::R8),
        Color::Black => (-8i8, Rank::R7, Rank::R1),
    };

    for from in board.pieces_of(Piece::Pawn, us) {
        // Single and double pushes
        let push_index = (from.index() as i8 + push_delta) as u8;
        // A pawn is never on its own back rank, the push target is on the board
        let push_to = unsafe { Square::from_index_unchecked(push_index) };
        if !occupied.contains(push_to) {
            if push_to.rank() == promo_rank {
                push_promotions(moves, from, push_to, false);
            } else {
                moves.push(Move::quiet(from, push_to, Piece::Pawn));
                if from.rank() == start_rank {
                    let double_index = (push_index as i8 + push_delta) as u8;
                    let double_to = unsafe { Square::from_index_unchecked(double_index) };
                    if !occupied.contains(double_to) {
                        moves.push(Move::double_push(from, double_to));
                    }
                }
            }
        }

        // Captures
        let attacks = pawn_attacks(from, us);
        for to in attacks & enemy {
            if to.rank() == promo_rank {
                push_promotions(moves, from, to, true);
            } else {
                moves.push(Move::capture(from, to, Piece::Pawn));
            }
        }

        // En passant
        if let Some(ep) = board.en_passant() {
            if attacks.contains(ep) {
                moves.push(Move::en_passant(from, ep));
            }
        }
    }
}

fn generate_castling_moves(board: &Board, moves: &mut MoveList) {
    let us = board.side_to_move();
    let them = us.opposite();
    let occupied = board.occupied();
    let rights = board.castling();

    match us {
        Color::White => {
            if rights.can_castle_kingside(Color::White)
                && !occupied.contains(Square::F1)
                && !occupied.contains(Square::G1)
                && !is_square_attacked(board, Square::E1, them)
                && !is_square_attacked(board, Square::F1, them)
            {
                moves.push(Move::castle(Square::E1, Square::G1));
            }
            if rights.can_castle_queenside(Color::White)
                && !occupied.contains(Square::B1)
                && !occupied.contains(Square::C1)
                && !occupied.contains(Square::D1)
                && !is_square_attacked(board, Square::E1, them)
                && !is_square_attacked(board, Square::D1, them)
            {
                moves.push(Move::castle(Square::E1, Square::C1));
            }
        }
        Color::Black => {
            if rights.can_castle_kingside(Color::Black)
                && !occupied.contains(Square::F8)
                && !occupied.contains(Square::G8)
                && !is_square_attacked(board, Square::E8, them)
                && !is_square_attacked(board, Square::F8, them)
            {
                moves.push(Move::castle(Square::E8, Square::G8));
            }
            if rights.can_castle_queenside(Color::Black)
                && !occupied.contains(Square::B8)
                && !occupied.contains(Square::C8)
                && !occupied.contains(Square::D8)
                && !is_square_attacked(board, Square::E8, them)
                && !is_square_attacked(board, Square::D8, them)
            {
                moves.push(Move::castle(Square::E8, Square::C8));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn contains_uci(moves: &MoveList, uci: &str) -> bool {
        moves.as_slice().iter().any(|m| m.to_uci() == uci)
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let mut board = Board::startpos();
        let moves = generate_legal_moves(&mut board);
        assert_eq!(moves.len(), 20);
        assert!(contains_uci(&moves, "e2e4"));
        assert!(contains_uci(&moves, "g1f3"));
        assert!(!contains_uci(&moves, "e1e2"));
    }

    #[test]
    fn pawn_double_push_blocked() {
        // Knight on e3 blocks the e2 pawn entirely
        let mut board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/4N3/PPPPPPPP/RNBQKB1R w KQkq - 0 1")
                .unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(!contains_uci(&moves, "e2e3"));
        assert!(!contains_uci(&moves, "e2e4"));
    }

    #[test]
    fn pawn_promotions_generated() {
        let mut board = Board::from_fen("3n4/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        // Four push promotions plus four capture promotions on d8
        assert!(contains_uci(&moves, "e7e8q"));
        assert!(contains_uci(&moves, "e7e8n"));
        assert!(contains_uci(&moves, "e7d8q"));
        assert!(contains_uci(&moves, "e7d8r"));
        let promo_count = moves
            .as_slice()
            .iter()
            .filter(|m| m.is_promotion())
            .count();
        assert_eq!(promo_count, 8);
    }

    #[test]
    fn en_passant_generated() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
                .unwrap();
        let moves = generate_legal_moves(&mut board);
        let ep: Vec<&Move> = moves
            .as_slice()
            .iter()
            .filter(|m| m.is_en_passant())
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_uci(), "e5f6");
    }

    #[test]
    fn castling_requires_empty_and_safe_squares() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(contains_uci(&moves, "e1g1"));
        assert!(contains_uci(&moves, "e1c1"));

        // A rook eyeing f1 forbids kingside castling but not queenside
        let mut board =
            Board::from_fen("r4k2/8/8/8/8/5r2/8/R3K2R w KQ - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(!contains_uci(&moves, "e1g1"));
        assert!(contains_uci(&moves, "e1c1"));
    }

    #[test]
    fn castling_blocked_by_piece() {
        let mut board =
            Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3KB1R w KQkq - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(!contains_uci(&moves, "e1g1"));
        assert!(contains_uci(&moves, "e1c1"));
    }

    #[test]
    fn no_castling_while_in_check() {
        let mut board =
            Board::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1").unwrap();
        let moves = generate_legal_moves(&mut board);
        assert!(!contains_uci(&moves, "e1g1"));
        assert!(!contains_uci(&moves, "e1c1"));
    }

    #[test]
    fn check_evasion_only() {
        // Scholar's mate threat: only legal replies deal with the check
        let mut board = Board::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/5PPq/8/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .unwrap();
        let moves = generate_legal_moves(&mut board);
        // The queen on h4 checks along the h4-e1 diagonal; g2-g3 is gone
        // (the g-pawn is on g4), so blocking is impossible and the king
        // cannot move. Capturing is impossible too: mate
        assert!(moves.is_empty());
    }

    #[test]
    fn attacked_square_detection() {
        let board = Board::startpos();
        // e3 is covered by white pawns on d2 and f2
        assert!(is_square_attacked(&board, sq("e3"), Color::White));
        // e4 is not attacked by anyone at the start
        assert!(!is_square_attacked(&board, sq("e4"), Color::White));
        assert!(is_square_attacked(&board, sq("f6"), Color::Black));
    }

    #[test]
    fn sliding_attack_through_blocker() {
        let board = Board::from_fen("4k3/8/8/8/1b6/8/3P4/4K3 w - - 0 1").unwrap();
        // The bishop on b4 reaches d2 but the pawn blocks e1
        assert!(is_square_attacked(&board, sq("d2"), Color::Black));
        assert!(!is_square_attacked(&board, Square::E1, Color::Black));
    }

    #[test]
    fn kiwipete_move_count() {
        let mut board = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let moves = generate_legal_moves(&mut board);
        assert_eq!(moves.len(), 48);
    }

    #[test]
    fn move_list_basics() {
        let mut list = MoveList::new();
        assert!(list.is_empty());
        list.push(Move::quiet(sq("e2"), sq("e4"), Piece::Pawn));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].to_uci(), "e2e4");
        list.clear();
        assert!(list.is_empty());
    }
}
