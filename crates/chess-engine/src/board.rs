//! Board state with reversible move application.
//!
//! The board keeps one bitboard per piece type and color, derived occupancy
//! bitboards, and an incrementally maintained Zobrist hash. Moves are applied
//! in place with [`Board::make_move`] and reverted exactly with
//! [`Board::unmake_move`]; the irreversible parts of the state (castling
//! rights, en passant square, halfmove clock, hash, captured piece) are saved
//! in a bounded undo array indexed by the number of applied plies.

use chess_core::{Color, FenError, FenParser, Move, Piece, Square};
use thiserror::Error;

use crate::movegen::{self, generate_moves};
use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Maximum number of applied plies the undo array can hold.
pub const MAX_HISTORY: usize = 1024;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Per-square masks ANDed into the castling rights when a move touches the
/// square. Moving or capturing a rook clears that rook's right; moving or
/// capturing a king clears both rights for that side.
const CASTLING_RIGHTS_MASKS: [u8; 64] = castling_rights_masks();

const fn castling_rights_masks() -> [u8; 64] {
    let mut masks = [0b1111u8; 64];
    masks[Square::A1.index() as usize] = 0b1101; // white queenside rook
    masks[Square::E1.index() as usize] = 0b1100; // white king
    masks[Square::H1.index() as usize] = 0b1110; // white kingside rook
    masks[Square::A8.index() as usize] = 0b0111; // black queenside rook
    masks[Square::E8.index() as usize] = 0b0011; // black king
    masks[Square::H8.index() as usize] = 0b1011; // black kingside rook
    masks
}

/// The result of applying a move.
///
/// A pseudo-legal move may leave the mover's own king in check; such a move
/// is reported as `Illegal` and the caller must unmake it before continuing.
#[must_use = "an illegal move must be unmade before the board is used again"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Legal,
    Illegal,
}

impl MoveOutcome {
    #[inline]
    pub const fn is_legal(self) -> bool {
        matches!(self, MoveOutcome::Legal)
    }
}

/// Game-state classification of the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    InPlay,
    Draw,
    Checkmate,
}

/// Errors that can occur when loading a board from FEN.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("position has no {0:?} king")]
    MissingKing(Color),
}

/// Irreversible state saved before a move is applied.
#[derive(Debug, Clone, Copy)]
struct Undo {
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    hash: u64,
    captured: Option<Piece>,
}

impl Undo {
    const EMPTY: Undo = Undo {
        castling: CastlingRights::NONE,
        en_passant: None,
        halfmove_clock: 0,
        hash: 0,
        captured: None,
    };
}

/// Complete board state.
#[derive(Debug, Clone)]
pub struct Board {
    /// Piece bitboards indexed by [color][piece].
    pieces: [[Bitboard; 6]; 2],
    /// Occupancy per color, kept in sync with `pieces`.
    occupancy: [Bitboard; 2],
    /// Union of both occupancies.
    occupied: Bitboard,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    hash: u64,
    history: Box<[Undo; MAX_HISTORY]>,
    history_len: usize,
}

impl Board {
    /// Creates an empty board with white to move.
    fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            history: Box::new([Undo::EMPTY; MAX_HISTORY]),
            history_len: 0,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        match Self::from_fen(FenParser::STARTPOS) {
            Ok(board) => board,
            Err(_) => unreachable!("the starting position is valid"),
        }
    }

    /// Creates a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let parsed = FenParser::parse(fen)?;
        let mut board = Board::empty();

        let ranks: Vec<&str> = parsed.piece_placement.split('/').collect();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx; // FEN starts from rank 8
            let mut file = 0usize;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as usize;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    // Validated by the FEN parser, rank * 8 + file < 64
                    let sq = unsafe { Square::from_index_unchecked((rank * 8 + file) as u8) };
                    board.pieces[color.index()][piece.index()].set(sq);
                    file += 1;
                }
            }
        }

        board.side_to_move = match parsed.active_color {
            'b' => Color::Black,
            _ => Color::White,
        };

        let mut castling = 0u8;
        for c in parsed.castling.chars() {
            match c {
                'K' => castling |= CastlingRights::WHITE_KINGSIDE,
                'Q' => castling |= CastlingRights::WHITE_QUEENSIDE,
                'k' => castling |= CastlingRights::BLACK_KINGSIDE,
                'q' => castling |= CastlingRights::BLACK_QUEENSIDE,
                _ => {}
            }
        }
        board.castling = CastlingRights::new(castling);

        board.en_passant = if parsed.en_passant == "-" {
            None
        } else {
            Square::from_algebraic(&parsed.en_passant)
        };

        board.halfmove_clock = parsed.halfmove_clock;
        board.fullmove_number = parsed.fullmove_number;

        for color in [Color::White, Color::Black] {
            if board.pieces[color.index()][Piece::King.index()].is_empty() {
                return Err(BoardError::MissingKing(color));
            }
        }

        board.refresh_occupancies();
        board.hash = board.compute_hash();

        Ok(board)
    }

    /// Converts the board to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                // rank * 8 + file < 64 by construction
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                if let Some((piece, color)) = self.piece_at(sq) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char(color));
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling.raw() == 0 {
            fen.push('-');
        } else {
            if self.castling.can_castle_kingside(Color::White) {
                fen.push('K');
            }
            if self.castling.can_castle_queenside(Color::White) {
                fen.push('Q');
            }
            if self.castling.can_castle_kingside(Color::Black) {
                fen.push('k');
            }
            if self.castling.can_castle_queenside(Color::Black) {
                fen.push('q');
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the en passant target square, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the halfmove clock.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the fullmove number.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the incrementally maintained Zobrist hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Returns the bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Returns the occupancy for one color.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    /// Returns the union of both occupancies.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Returns the piece and color on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        for color in [Color::White, Color::Black] {
            if !self.occupancy[color.index()].contains(sq) {
                continue;
            }
            for piece in Piece::ALL {
                if self.pieces[color.index()][piece.index()].contains(sq) {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    /// Returns the king square for the given color.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let idx = self.pieces[color.index()][Piece::King.index()].lsb()?;
        // lsb is always a valid square index
        Some(unsafe { Square::from_index_unchecked(idx) })
    }

    /// Returns true if the given color has any piece besides pawns and king.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let minors_and_majors = self.occupancy[color.index()]
            ^ self.pieces_of(Piece::Pawn, color)
            ^ self.pieces_of(Piece::King, color);
        minors_and_majors.is_not_empty()
    }

    /// Computes the Zobrist hash from scratch.
    ///
    /// Used when loading a position and, in debug builds, to validate the
    /// incremental hash.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for color in [Color::White, Color::Black] {
            for piece in Piece::ALL {
                for sq in self.pieces_of(piece, color) {
                    hash ^= ZOBRIST.piece_key(piece, color, sq);
                }
            }
        }
        hash ^= ZOBRIST.castling_key(self.castling.raw());
        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.en_passant_key(ep.file());
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move;
        }
        hash
    }

    fn refresh_occupancies(&mut self) {
        for color in [Color::White, Color::Black] {
            let mut occ = Bitboard::EMPTY;
            for piece in Piece::ALL {
                occ |= self.pieces[color.index()][piece.index()];
            }
            self.occupancy[color.index()] = occ;
        }
        self.occupied = self.occupancy[0] | self.occupancy[1];
    }

    #[inline]
    fn move_piece(&mut self, piece: Piece, color: Color, from: Square, to: Square) {
        self.pieces[color.index()][piece.index()].clear(from);
        self.pieces[color.index()][piece.index()].set(to);
        self.hash ^= ZOBRIST.piece_key(piece, color, from);
        self.hash ^= ZOBRIST.piece_key(piece, color, to);
    }

    /// Applies a pseudo-legal move.
    ///
    /// Returns [`MoveOutcome::Illegal`] if the move leaves the mover's king
    /// attacked; the board is then in the post-move state and the caller must
    /// call [`Board::unmake_move`] before doing anything else with it.
    pub fn make_move(&mut self, m: Move) -> MoveOutcome {
        debug_assert!(self.history_len < MAX_HISTORY);

        let us = self.side_to_move;
        let them = us.opposite();
        let from = m.from();
        let to = m.to();
        let piece = m.piece();

        let undo_index = self.history_len;
        self.history[undo_index] = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            captured: None,
        };
        self.history_len += 1;

        // Remove the moved piece from its source square
        self.pieces[us.index()][piece.index()].clear(from);
        self.hash ^= ZOBRIST.piece_key(piece, us, from);

        // Plain captures: find and remove the victim
        let mut captured = None;
        if m.is_capture() && !m.is_en_passant() {
            for victim in Piece::ALL {
                if self.pieces[them.index()][victim.index()].contains(to) {
                    self.pieces[them.index()][victim.index()].clear(to);
                    self.hash ^= ZOBRIST.piece_key(victim, them, to);
                    captured = Some(victim);
                    break;
                }
            }
        }

        // Place the piece (or the promoted piece) on the destination
        let placed = match m.promotion() {
            Some(promo) => promo,
            None => piece,
        };
        self.pieces[us.index()][placed.index()].set(to);
        self.hash ^= ZOBRIST.piece_key(placed, us, to);

        // En passant removes the pawn behind the destination square
        if m.is_en_passant() {
            let capture_index = match us {
                Color::White => to.index() - 8,
                Color::Black => to.index() + 8,
            };
            // One rank behind an en passant target is always on the board
            let capture_sq = unsafe { Square::from_index_unchecked(capture_index) };
            self.pieces[them.index()][Piece::Pawn.index()].clear(capture_sq);
            self.hash ^= ZOBRIST.piece_key(Piece::Pawn, them, capture_sq);
            captured = Some(Piece::Pawn);
        }
        self.history[undo_index].captured = captured;

        // The en passant square never survives a move
        if let Some(ep) = self.en_passant {
            self.hash ^= ZOBRIST.en_passant_key(ep.file());
        }
        self.en_passant = None;

        if m.is_double_push() {
            let ep_index = (from.index() + to.index()) / 2;
            // Midpoint of a double push is on the board
            let ep_sq = unsafe { Square::from_index_unchecked(ep_index) };
            self.en_passant = Some(ep_sq);
            self.hash ^= ZOBRIST.en_passant_key(ep_sq.file());
        }

        // Castling also moves the rook
        if m.is_castling() {
            let (rook_from, rook_to) = match to {
                Square::G1 => (Square::H1, Square::F1),
                Square::C1 => (Square::A1, Square::D1),
                Square::G8 => (Square::H8, Square::F8),
                _ => (Square::A8, Square::D8),
            };
            self.move_piece(Piece::Rook, us, rook_from, rook_to);
        }

        // Update castling rights for both touched squares
        self.hash ^= ZOBRIST.castling_key(self.castling.raw());
        self.castling = CastlingRights::new(
            self.castling.raw()
                & CASTLING_RIGHTS_MASKS[from.index() as usize]
                & CASTLING_RIGHTS_MASKS[to.index() as usize],
        );
        self.hash ^= ZOBRIST.castling_key(self.castling.raw());

        self.refresh_occupancies();

        if piece == Piece::Pawn || m.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= ZOBRIST.black_to_move;

        if movegen::is_king_attacked(self, us) {
            MoveOutcome::Illegal
        } else {
            MoveOutcome::Legal
        }
    }

    /// Reverts the most recently applied move.
    pub fn unmake_move(&mut self, m: Move) {
        debug_assert!(self.history_len > 0);

        self.history_len -= 1;
        let undo = self.history[self.history_len];

        let us = self.side_to_move.opposite();
        let them = us.opposite();
        self.side_to_move = us;

        let from = m.from();
        let to = m.to();

        // Take the placed piece off the destination and put the mover back
        let placed = match m.promotion() {
            Some(promo) => promo,
            None => m.piece(),
        };
        self.pieces[us.index()][placed.index()].clear(to);
        self.pieces[us.index()][m.piece().index()].set(from);

        // Restore the captured piece
        if m.is_en_passant() {
            let capture_index = match us {
                Color::White => to.index() - 8,
                Color::Black => to.index() + 8,
            };
            // One rank behind an en passant target is always on the board
            let capture_sq = unsafe { Square::from_index_unchecked(capture_index) };
            self.pieces[them.index()][Piece::Pawn.index()].set(capture_sq);
        } else if let Some(victim) = undo.captured {
            self.pieces[them.index()][victim.index()].set(to);
        }

        // Move the castling rook back
        if m.is_castling() {
            let (rook_from, rook_to) = match to {
                Square::G1 => (Square::H1, Square::F1),
                Square::C1 => (Square::A1, Square::D1),
                Square::G8 => (Square::H8, Square::F8),
                _ => (Square::A8, Square::D8),
            };
            self.pieces[us.index()][Piece::Rook.index()].clear(rook_to);
            self.pieces[us.index()][Piece::Rook.index()].set(rook_from);
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;

        if us == Color::Black {
            self.fullmove_number -= 1;
        }

        self.refresh_occupancies();
    }

    /// Passes the turn without moving (null move, for search pruning).
    pub fn make_null_move(&mut self) {
        debug_assert!(self.history_len < MAX_HISTORY);

        self.history[self.history_len] = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            captured: None,
        };
        self.history_len += 1;

        if let Some(ep) = self.en_passant {
            self.hash ^= ZOBRIST.en_passant_key(ep.file());
        }
        self.en_passant = None;

        self.side_to_move = self.side_to_move.opposite();
        self.hash ^= ZOBRIST.black_to_move;
    }

    /// Reverts a null move.
    pub fn unmake_null_move(&mut self) {
        debug_assert!(self.history_len > 0);

        self.history_len -= 1;
        let undo = self.history[self.history_len];

        self.side_to_move = self.side_to_move.opposite();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    /// Returns true if the side to move is in check.
    pub fn in_check(&self) -> bool {
        movegen::is_king_attacked(self, self.side_to_move)
    }

    /// Classifies the current position as in play, drawn, or checkmate.
    ///
    /// A position with no legal move is checkmate if the side to move is in
    /// check and stalemate (a draw) otherwise. A halfmove clock of 100 or
    /// more is a draw by the fifty-move rule.
    pub fn game_state(&mut self) -> GameState {
        let moves = generate_moves(self);
        let mut any_legal = false;
        for m in &moves {
            let outcome = self.make_move(*m);
            self.unmake_move(*m);
            if outcome.is_legal() {
                any_legal = true;
                break;
            }
        }

        if any_legal {
            if self.halfmove_clock >= 100 {
                GameState::Draw
            } else {
                GameState::InPlay
            }
        } else if self.in_check() {
            GameState::Checkmate
        } else {
            GameState::Draw
        }
    }
}

impl PartialEq for Board {
    /// Position equality; the undo history is not part of the position.
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.hash == other.hash
    }
}

impl Eq for Board {}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}
