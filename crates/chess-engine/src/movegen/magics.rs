//! Magic bitboard tables for sliding piece attack generation.
//!
//! Magic bitboards use a perfect hashing technique to map blocker configurations
//! to precomputed attack bitboards in O(1) time.

use crate::Bitboard;
use chess_core::Square;
use std::sync::OnceLock;

/// Magic entry for a single square.
#[derive(Clone)]
pub struct Magic {
    /// Mask of relevant blocker squares (excludes edges).
    pub mask: Bitboard,
    /// The magic number for this square.
    pub magic: u64,
    /// Right shift amount (64 - number of bits in mask).
    pub shift: u8,
    /// Offset into the attack table.
    pub offset: usize,
}

/// Stores all precomputed attack tables.
pub struct AttackTables {
    /// Bishop attack table (~40KB with fancy magics).
    pub bishop_attacks: Vec<Bitboard>,
    /// Rook attack table (~800KB with fancy magics).
    pub rook_attacks: Vec<Bitboard>,
    /// Magic entries for bishops.
    pub bishop_magics: [Magic; 64],
    /// Magic entries for rooks.
    pub rook_magics: [Magic; 64],
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Gets the global attack tables, initializing if necessary.
pub fn get_attack_tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(AttackTables::new)
}

// Pre-computed magic numbers for bishops.
const BISHOP_MAGICS: [u64; 64] = [
    0x0040040844404084,
    0x002004208a004208,
    0x0010190041080202,
    0x0108060845042010,
    0x0581104180800210,
    0x2112080446200010,
    0x1080820820060210,
    0x03c0808410220200,
    0x0004050404440404,
    0x0000021001420088,
    0x24d0080801082102,
    0x0001020a0a020400,
    0x0000040308200402,
    0x0004011002100800,
    0x0401484104104005,
    0x0801010402020200,
    0x00400210c3880100,
    0x0404022024108200,
    0x0810018200204102,
    0x0004002801a02003,
    0x0085040820080400,
    0x810102c808880400,
    0x000e900410884800,
    0x8002020480840102,
    0x0220200865090201,
    0x2010100a02021202,
    0x0152048408022401,
    0x0020080002081110,
    0x4001001021004000,
    0x800040400a011002,
    0x00e4004081011002,
    0x001c004001012080,
    0x8004200962a00220,
    0x8422100208500202,
    0x2000402200300c08,
    0x8646020080080080,
    0x80020a0200100808,
    0x2010004880111000,
    0x623000a080011400,
    0x42008c0340209202,
    0x0209188240001000,
    0x400408a884001800,
    0x00110400a6080400,
    0x1840060a44020800,
    0x0090080104000041,
    0x0201011000808101,
    0x1a2208080504f080,
    0x8012020600211212,
    0x0500861011240000,
    0x0180806108200800,
    0x4000020e01040044,
    0x300000261044000a,
    0x0802241102020002,
    0x0020906061210001,
    0x5a84841004010310,
    0x0004010801011c04,
    0x000a010109502200,
    0x0000004a02012000,
    0x500201010098b028,
    0x8040002811040900,
    0x0028000010020204,
    0x06000020202d0240,
    0x8918844842082200,
    0x4010011029020020,
];

// Pre-computed magic numbers for rooks.
const ROOK_MAGICS: [u64; 64] = [
    0x8a80104000800020,
    0x0140002000100040,
    0x02801880a0017001,
    0x0100081001000420,
    0x0200020010080420,
    0x03001c0002010008,
    0x8480008002000100,
    0x2080088004402900,
    0x0000800098204000,
    0x2024401000200040,
    0x0100802000801000,
    0x0120800800801000,
    0x0208808088000400,
    0x0002802200800400,
    0x2200800100020080,
    0x0801000060821100,
    0x0080044006422000,
    0x0100808020004000,
    0x12108a0010204200,
    0x0140848010000802,
    0x0481828014002800,
    0x8094004002004100,
    0x4010040010010802,
    0x0000020008806104,
    0x0100400080208000,
    0x2040002120081000,
    0x0021200680100081,
    0x0020100080080080,
    0x0002000a00200410,
    0x0000020080800400,
    0x0080088400100102,
    0x0080004600042881,
    0x4040008040800020,
    0x0440003000200801,
    0x0004200011004500,
    0x0188020010100100,
    0x0014800401802800,
    0x2080040080800200,
    0x0124080204001001,
    0x0200046502000484,
    0x0480400080088020,
    0x1000422010034000,
    0x0030200100110040,
    0x0000100021010009,
    0x2002080100110004,
    0x0202008004008002,
    0x0020020004010100,
    0x2048440040820001,
    0x0101002200408200,
    0x0040802000401080,
    0x4008142004410100,
    0x02060820c0120200,
    0x0001001004080100,
    0x020c020080040080,
    0x2935610830022400,
    0x0044440041009200,
    0x0280001040802101,
    0x2100190040002085,
    0x80c0084100102001,
    0x4024081001000421,
    0x00020030a0244872,
    0x0012001008414402,
    0x02006104900a0804,
    0x0001004081002402,
];

// Bit counts for bishop relevant occupancy (excluding edges).
const BISHOP_BITS: [u8; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

// Bit counts for rook relevant occupancy.
const ROOK_BITS: [u8; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    12, 11, 11, 11, 11, 11, 11, 12,
];

impl AttackTables {
    /// Creates and initializes all attack tables.
    pub fn new() -> Self {
        let mut bishop_attacks = Vec::new();
        let mut rook_attacks = Vec::new();
        let mut bishop_magics: [Magic; 64] = std::array::from_fn(|_| Magic {
            mask: Bitboard::EMPTY,
            magic: 0,
            shift: 0,
            offset: 0,
        });
        let mut rook_magics: [Magic; 64] = std::array::from_fn(|_| Magic {
            mask: Bitboard::EMPTY,
            magic: 0,
            shift: 0,
            offset: 0,
        });

        // Initialize bishop tables
        for sq in 0..64 {
            let mask = bishop_mask(sq);
            let bits = BISHOP_BITS[sq as usize];
            let shift = 64 - bits;
            let table_size = 1 << bits;
            let offset = bishop_attacks.len();

            bishop_magics[sq as usize] = Magic {
                mask,
                magic: BISHOP_MAGICS[sq as usize],
                shift,
                offset,
            };

            // Initialize table entries
            bishop_attacks.resize(offset + table_size, Bitboard::EMPTY);

            // Fill attack table for all blocker configurations
            let mut blockers = Bitboard::EMPTY;
            loop {
                let attacks = bishop_attacks_slow(sq, blockers);
                let index = magic_index(&bishop_magics[sq as usize], blockers);
                bishop_attacks[offset + index] = attacks;

                // Carry-Rippler trick to enumerate all subsets
                blockers = Bitboard((blockers.0.wrapping_sub(mask.0)) & mask.0);
                if blockers.is_empty() {
                    break;
                }
            }
        }

        // Initialize rook tables
        for sq in 0..64 {
            let mask = rook_mask(sq);
            let bits = ROOK_BITS[sq as usize];
            let shift = 64 - bits;
            let table_size = 1 << bits;
            let offset = rook_attacks.len();

            rook_magics[sq as usize] = Magic {
                mask,
                magic: ROOK_MAGICS[sq as usize],
                shift,
                offset,
            };

            // Initialize table entries
            rook_attacks.resize(offset + table_size, Bitboard::EMPTY);

            // Fill attack table for all blocker configurations
            let mut blockers = Bitboard::EMPTY;
            loop {
                let attacks = rook_attacks_slow(sq, blockers);
                let index = magic_index(&rook_magics[sq as usize], blockers);
                rook_attacks[offset + index] = attacks;

                blockers = Bitboard((blockers.0.wrapping_sub(mask.0)) & mask.0);
                if blockers.is_empty() {
                    break;
                }
            }
        }

        AttackTables {
            bishop_attacks,
            rook_attacks,
            bishop_magics,
            rook_magics,
        }
    }
}

/// Computes the magic table index for a given blocker configuration.
#[inline]
fn magic_index(magic: &Magic, blockers: Bitboard) -> usize {
    let relevant = blockers & magic.mask;
    ((relevant.0.wrapping_mul(magic.magic)) >> magic.shift) as usize
}

/// Returns bishop attacks for a square given occupied squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = get_attack_tables();
    let magic = &tables.bishop_magics[sq.index() as usize];
    let index = magic_index(magic, occupied);
    tables.bishop_attacks[magic.offset + index]
}

/// Returns rook attacks for a square given occupied squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let tables = get_attack_tables();
    let magic = &tables.rook_magics[sq.index() as usize];
    let index = magic_index(magic, occupied);
    tables.rook_attacks[magic.offset + index]
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Generates the bishop blocker mask for a square (excludes edges).
fn bishop_mask(sq: u8) -> Bitboard {
    let mut mask = 0u64;
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;

    // Diagonal directions, stopping before edges
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while r > 0 && r < 7 && f > 0 && f < 7 {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }

    Bitboard(mask)
}

/// Generates the rook blocker mask for a square (excludes edges).
fn rook_mask(sq: u8) -> Bitboard {
    let mut mask = 0u64;
    let rank = sq / 8;
    let file = sq % 8;

    // Horizontal (exclude edge files)
    for f in 1..7 {
        if f != file {
            mask |= 1u64 << (rank * 8 + f);
        }
    }

    // Vertical (exclude edge ranks)
    for r in 1..7 {
        if r != rank {
            mask |= 1u64 << (r * 8 + file);
        }
    }

    Bitboard(mask)
}

/// Slow bishop attack generation (used to build tables).
fn bishop_attacks_slow(sq: u8, blockers: Bitboard) -> Bitboard {
    let mut attacks = 0u64;
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;

    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while r >= 0 && r <= 7 && f >= 0 && f <= 7 {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if blockers.0 & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    Bitboard(attacks)
}

/// Slow rook attack generation (used to build tables).
fn rook_attacks_slow(sq: u8, blockers: Bitboard) -> Bitboard {
    let mut attacks = 0u64;
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;

    for (dr, df) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while r >= 0 && r <= 7 && f >= 0 && f <= 7 {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if blockers.0 & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }

    Bitboard(attacks)
}
