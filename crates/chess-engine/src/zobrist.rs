//! Zobrist hashing for position identification.
//!
//! Each board feature gets a fixed pseudo-random 64-bit key: every piece on
//! every square (12 x 64), every castling-rights value (16), every en passant
//! file (8), and one key for the side to move. A position hash is the XOR of
//! the keys for its features, which makes the hash cheap to maintain
//! incrementally as moves are made and unmade.

use chess_core::{Color, File, Piece, Square};

/// Zobrist hash keys.
///
/// Generated from a fixed seed so hashes are reproducible across runs.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square].
    pub pieces: [[[u64; 64]; 2]; 6],
    /// Key XORed in when black is to move.
    pub black_to_move: u64,
    /// Keys per castling-rights bitmask value.
    pub castling: [u64; 16],
    /// Keys per en passant file.
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    pub const fn new() -> Self {
        // xorshift64 is good enough here and works in const context
        const fn next_random(state: u64) -> (u64, u64) {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x, x)
        }

        let mut state = 0x9E3779B97F4A7C15u64; // Golden ratio seed
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 16];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    let (new_state, value) = next_random(state);
                    state = new_state;
                    pieces[piece][color][square] = value;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        let (new_state, black_to_move) = next_random(state);
        state = new_state;

        let mut i = 0;
        while i < 16 {
            let (new_state, value) = next_random(state);
            state = new_state;
            castling[i] = value;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            let (new_state, value) = next_random(state);
            state = new_state;
            en_passant[i] = value;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Returns the key for a castling-rights bitmask (0-15).
    #[inline]
    pub const fn castling_key(&self, rights: u8) -> u64 {
        self.castling[(rights & 0xF) as usize]
    }

    /// Returns the key for an en passant file.
    #[inline]
    pub const fn en_passant_key(&self, file: File) -> u64 {
        self.en_passant[file.index() as usize]
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zobrist_keys_are_nonzero() {
        // Statistically almost certain for a working PRNG
        assert_ne!(ZOBRIST.black_to_move, 0);
        assert_ne!(ZOBRIST.pieces[0][0][0], 0);
        assert_ne!(ZOBRIST.castling[0], 0);
        assert_ne!(ZOBRIST.en_passant[0], 0);
    }

    #[test]
    fn zobrist_keys_are_unique() {
        let key1 = ZOBRIST.piece_key(Piece::Pawn, Color::White, Square::A1);
        let key2 = ZOBRIST.piece_key(Piece::Pawn, Color::White, Square::B1);
        let key3 = ZOBRIST.piece_key(Piece::Pawn, Color::Black, Square::A1);
        let key4 = ZOBRIST.piece_key(Piece::Knight, Color::White, Square::A1);

        assert_ne!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key1, key4);
    }

    #[test]
    fn castling_keys_differ_per_rights_value() {
        let mut seen = std::collections::HashSet::new();
        for rights in 0u8..16 {
            assert!(seen.insert(ZOBRIST.castling_key(rights)));
        }
    }
}
