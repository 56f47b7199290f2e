//! Attack table generation and lookup for all piece types.

use crate::Bitboard;
use chess_core::{Color, Square};

pub use super::magics::{bishop_attacks, queen_attacks, rook_attacks};

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_knight_attacks();

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_king_attacks();

/// Precomputed pawn attack tables [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = compute_pawn_attacks();

/// Precomputed passed-pawn masks [color][square].
const PASSED_PAWN_MASKS: [[Bitboard; 64]; 2] = compute_passed_pawn_masks();

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns pawn attacks from the given square for the given color.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Returns the passed-pawn mask for a pawn of the given color.
///
/// The mask covers the pawn's own file and both adjacent files, on every
/// rank in front of the pawn. A pawn with no enemy pawn inside this mask
/// is passed.
#[inline]
pub fn passed_pawn_mask(sq: Square, color: Color) -> Bitboard {
    PASSED_PAWN_MASKS[color.index()][sq.index() as usize]
}

/// Computes knight attacks for all squares at compile time.
const fn compute_knight_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut bb = 0u64;

        // Knight move offsets: (rank_delta, file_delta)
        // (+2, +1), (+2, -1), (-2, +1), (-2, -1)
        // (+1, +2), (+1, -2), (-1, +2), (-1, -2)

        if rank < 6 && file < 7 {
            bb |= 1u64 << (sq + 17);
        } // +2, +1
        if rank < 6 && file > 0 {
            bb |= 1u64 << (sq + 15);
        } // +2, -1
        if rank > 1 && file < 7 {
            bb |= 1u64 << (sq - 15);
        } // -2, +1
        if rank > 1 && file > 0 {
            bb |= 1u64 << (sq - 17);
        } // -2, -1
        if rank < 7 && file < 6 {
            bb |= 1u64 << (sq + 10);
        } // +1, +2
        if rank < 7 && file > 1 {
            bb |= 1u64 << (sq + 6);
        } // +1, -2
        if rank > 0 && file < 6 {
            bb |= 1u64 << (sq - 6);
        } // -1, +2
        if rank > 0 && file > 1 {
            bb |= 1u64 << (sq - 10);
        } // -1, -2

        attacks[sq as usize] = Bitboard(bb);
        sq += 1;
    }

    attacks
}

/// Computes king attacks for all squares at compile time.
const fn compute_king_attacks() -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;
        let mut bb = 0u64;

        // King moves in all 8 directions
        if rank < 7 {
            bb |= 1u64 << (sq + 8);
        } // North
        if rank > 0 {
            bb |= 1u64 << (sq - 8);
        } // South
        if file < 7 {
            bb |= 1u64 << (sq + 1);
        } // East
        if file > 0 {
            bb |= 1u64 << (sq - 1);
        } // West
        if rank < 7 && file < 7 {
            bb |= 1u64 << (sq + 9);
        } // NE
        if rank < 7 && file > 0 {
            bb |= 1u64 << (sq + 7);
        } // NW
        if rank > 0 && file < 7 {
            bb |= 1u64 << (sq - 7);
        } // SE
        if rank > 0 && file > 0 {
            bb |= 1u64 << (sq - 9);
        } // SW

        attacks[sq as usize] = Bitboard(bb);
        sq += 1;
    }

    attacks
}

/// Computes pawn attacks for all squares at compile time.
const fn compute_pawn_attacks() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;

        // White pawns attack diagonally forward (north)
        let mut white_bb = 0u64;
        if rank < 7 && file < 7 {
            white_bb |= 1u64 << (sq + 9);
        } // NE
        if rank < 7 && file > 0 {
            white_bb |= 1u64 << (sq + 7);
        } // NW
        attacks[0][sq as usize] = Bitboard(white_bb);

        // Black pawns attack diagonally forward (south)
        let mut black_bb = 0u64;
        if rank > 0 && file < 7 {
            black_bb |= 1u64 << (sq - 7);
        } // SE
        if rank > 0 && file > 0 {
            black_bb |= 1u64 << (sq - 9);
        } // SW
        attacks[1][sq as usize] = Bitboard(black_bb);

        sq += 1;
    }

    attacks
}

/// Computes passed-pawn masks for all squares at compile time.
const fn compute_passed_pawn_masks() -> [[Bitboard; 64]; 2] {
    let mut masks = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0u8;

    while sq < 64 {
        let rank = sq / 8;
        let file = sq % 8;

        let mut files = 1u64 << file;
        if file > 0 {
            files |= 1u64 << (file - 1);
        }
        if file < 7 {
            files |= 1u64 << (file + 1);
        }

        let mut white_bb = 0u64;
        let mut r = rank + 1;
        while r < 8 {
            white_bb |= files << (r * 8);
            r += 1;
        }
        masks[0][sq as usize] = Bitboard(white_bb);

        let mut black_bb = 0u64;
        let mut r = 0;
        while r < rank {
            black_bb |= files << (r * 8);
            r += 1;
        }
        masks[1][sq as usize] = Bitboard(black_bb);

        sq += 1;
    }

    masks
}
