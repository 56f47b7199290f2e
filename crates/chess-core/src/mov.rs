//! Move representation.

use crate::{Piece, Square};
use std::fmt;

/// A chess move.
///
/// Encoded compactly in 24 bits: 6 bits source square, 6 bits destination
/// square, 4 bits moved piece, 4 bits promotion piece (0 if none), and one
/// bit each for the capture, double-push, en-passant and castling flags.
/// A move carries no color; it is only meaningful relative to the position
/// it was generated from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const PROMOTION_SHIFT: u32 = 16;
const CAPTURE_FLAG: u32 = 1 << 20;
const DOUBLE_PUSH_FLAG: u32 = 1 << 21;
const EN_PASSANT_FLAG: u32 = 1 << 22;
const CASTLING_FLAG: u32 = 1 << 23;

impl Move {
    const fn encode(from: Square, to: Square, piece: Piece, flags: u32) -> Self {
        Move(
            from.index() as u32
                | (to.index() as u32) << TO_SHIFT
                | (piece.index() as u32) << PIECE_SHIFT
                | flags,
        )
    }

    /// Creates a quiet (non-capturing) move.
    #[inline]
    pub const fn quiet(from: Square, to: Square, piece: Piece) -> Self {
        Self::encode(from, to, piece, 0)
    }

    /// Creates a capturing move.
    #[inline]
    pub const fn capture(from: Square, to: Square, piece: Piece) -> Self {
        Self::encode(from, to, piece, CAPTURE_FLAG)
    }

    /// Creates a pawn double push.
    #[inline]
    pub const fn double_push(from: Square, to: Square) -> Self {
        Self::encode(from, to, Piece::Pawn, DOUBLE_PUSH_FLAG)
    }

    /// Creates an en-passant capture.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self::encode(from, to, Piece::Pawn, CAPTURE_FLAG | EN_PASSANT_FLAG)
    }

    /// Creates a castling move (king from/to squares).
    #[inline]
    pub const fn castle(from: Square, to: Square) -> Self {
        Self::encode(from, to, Piece::King, CASTLING_FLAG)
    }

    /// Creates a pawn promotion, optionally capturing.
    #[inline]
    pub const fn new_promotion(from: Square, to: Square, promo: Piece, is_capture: bool) -> Self {
        let flags = (promo.index() as u32) << PROMOTION_SHIFT
            | if is_capture { CAPTURE_FLAG } else { 0 };
        Self::encode(from, to, Piece::Pawn, flags)
    }

    /// Returns the source square.
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: masked to 6 bits, always a valid square index
        unsafe { Square::from_index_unchecked((self.0 & 0x3F) as u8) }
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: masked to 6 bits, always a valid square index
        unsafe { Square::from_index_unchecked(((self.0 >> TO_SHIFT) & 0x3F) as u8) }
    }

    /// Returns the moved piece.
    #[inline]
    pub const fn piece(self) -> Piece {
        match (self.0 >> PIECE_SHIFT) & 0xF {
            0 => Piece::Pawn,
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            4 => Piece::Queen,
            _ => Piece::King,
        }
    }

    /// Returns the promotion piece, if this is a promotion.
    ///
    /// A zero promotion field means "no promotion"; a pawn can never be a
    /// promotion target, so the encoding is unambiguous.
    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match (self.0 >> PROMOTION_SHIFT) & 0xF {
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            _ => None,
        }
    }

    /// Returns true if this move captures a piece (including en passant).
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE_FLAG != 0
    }

    /// Returns true if this is a pawn double push.
    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.0 & DOUBLE_PUSH_FLAG != 0
    }

    /// Returns true if this is an en-passant capture.
    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.0 & EN_PASSANT_FLAG != 0
    }

    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        self.0 & CASTLING_FLAG != 0
    }

    /// Returns true if this is a promotion.
    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        let promo = match self.promotion() {
            Some(Piece::Knight) => "n",
            Some(Piece::Bishop) => "b",
            Some(Piece::Rook) => "r",
            Some(Piece::Queen) => "q",
            _ => "",
        };
        format!("{}{}{}", self.from(), self.to(), promo)
    }

    /// A null move (used as placeholder, not a legal move).
    pub const NULL: Move = Move(0);

    /// Returns true if this is the null placeholder.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Coordinate move text at the protocol boundary: source and destination
/// square plus an optional promotion letter. Carries no piece or flag
/// information; it must be matched against generated moves to become a
/// [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl UciMove {
    /// Parses 4-5 character coordinate notation.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = if s.len() == 5 {
            match s.chars().nth(4)? {
                'n' | 'N' => Some(Piece::Knight),
                'b' | 'B' => Some(Piece::Bishop),
                'r' | 'R' => Some(Piece::Rook),
                'q' | 'Q' => Some(Piece::Queen),
                _ => return None,
            }
        } else {
            None
        };
        Some(UciMove {
            from,
            to,
            promotion,
        })
    }

    /// Returns true if the given move has the same squares and promotion.
    #[inline]
    pub fn matches(self, m: Move) -> bool {
        m.from() == self.from && m.to() == self.to && m.promotion() == self.promotion
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    #[test]
    fn move_encoding() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let m = Move::double_push(e2, e4);

        assert_eq!(m.from(), e2);
        assert_eq!(m.to(), e4);
        assert_eq!(m.piece(), Piece::Pawn);
        assert!(m.is_double_push());
        assert!(!m.is_capture());
        assert!(!m.is_castling());
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn capture_encoding() {
        let d4 = Square::new(File::D, Rank::R4);
        let e5 = Square::new(File::E, Rank::R5);
        let m = Move::capture(d4, e5, Piece::Knight);
        assert!(m.is_capture());
        assert_eq!(m.piece(), Piece::Knight);
        assert!(!m.is_en_passant());
    }

    #[test]
    fn en_passant_is_capture() {
        let e5 = Square::new(File::E, Rank::R5);
        let d6 = Square::new(File::D, Rank::R6);
        let m = Move::en_passant(e5, d6);
        assert!(m.is_capture());
        assert!(m.is_en_passant());
        assert_eq!(m.piece(), Piece::Pawn);
    }

    #[test]
    fn promotion_encoding() {
        let e7 = Square::new(File::E, Rank::R7);
        let e8 = Square::new(File::E, Rank::R8);

        let quiet = Move::new_promotion(e7, e8, Piece::Queen, false);
        assert_eq!(quiet.promotion(), Some(Piece::Queen));
        assert!(quiet.is_promotion());
        assert!(!quiet.is_capture());
        assert_eq!(quiet.to_uci(), "e7e8q");

        let cap = Move::new_promotion(e7, e8, Piece::Knight, true);
        assert!(cap.is_capture());
        assert_eq!(cap.promotion(), Some(Piece::Knight));
        assert_eq!(cap.to_uci(), "e7e8n");
    }

    #[test]
    fn castle_encoding() {
        let m = Move::castle(Square::E1, Square::G1);
        assert!(m.is_castling());
        assert_eq!(m.piece(), Piece::King);
        assert_eq!(m.to_uci(), "e1g1");
    }

    #[test]
    fn uci_move_parse() {
        let m = UciMove::parse("e2e4").unwrap();
        assert_eq!(m.from.to_algebraic(), "e2");
        assert_eq!(m.to.to_algebraic(), "e4");
        assert_eq!(m.promotion, None);

        let promo = UciMove::parse("e7e8q").unwrap();
        assert_eq!(promo.promotion, Some(Piece::Queen));

        assert!(UciMove::parse("invalid").is_none());
        assert!(UciMove::parse("e2e9").is_none());
        assert!(UciMove::parse("e7e8x").is_none());
        assert!(UciMove::parse("e2").is_none());
        assert!(UciMove::parse("e2e4qq").is_none());
    }

    #[test]
    fn uci_move_matching() {
        let text = UciMove::parse("g1f3").unwrap();
        let g1 = Square::new(File::G, Rank::R1);
        let f3 = Square::new(File::F, Rank::R3);
        assert!(text.matches(Move::quiet(g1, f3, Piece::Knight)));
        assert!(!text.matches(Move::quiet(f3, g1, Piece::Knight)));

        let promo_text = UciMove::parse("a7a8r").unwrap();
        let a7 = Square::new(File::A, Rank::R7);
        let a8 = Square::new(File::A, Rank::R8);
        assert!(promo_text.matches(Move::new_promotion(a7, a8, Piece::Rook, false)));
        assert!(!promo_text.matches(Move::new_promotion(a7, a8, Piece::Queen, false)));
    }

    #[test]
    fn move_null() {
        assert!(Move::NULL.is_null());
        assert!(!Move::quiet(Square::E1, Square::E8, Piece::Rook).is_null());
    }

    proptest::proptest! {
        #[test]
        fn uci_text_round_trips(from in 0u8..64, to in 0u8..64, promo in 0usize..5) {
            let from = Square::from_index(from).unwrap();
            let to = Square::from_index(to).unwrap();
            let m = match promo {
                0 => Move::quiet(from, to, Piece::Knight),
                1 => Move::new_promotion(from, to, Piece::Knight, false),
                2 => Move::new_promotion(from, to, Piece::Bishop, true),
                3 => Move::new_promotion(from, to, Piece::Rook, false),
                _ => Move::new_promotion(from, to, Piece::Queen, true),
            };
            let parsed = UciMove::parse(&m.to_uci()).unwrap();
            proptest::prop_assert!(parsed.matches(m));
        }
    }

    #[test]
    fn move_debug_display() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        let m = Move::quiet(e2, e4, Piece::Pawn);
        assert_eq!(format!("{:?}", m), "Move(e2e4)");
        assert_eq!(format!("{}", m), "e2e4");
    }
}
