//! Transposition table.
//!
//! A fixed-size, single-slot table keyed by the Zobrist hash. Each entry
//! remembers the depth it was searched to and whether the stored value is
//! exact or a bound, so a probe can answer directly, tighten the window,
//! or miss.

/// Default number of table slots.
pub const DEFAULT_TT_SIZE: usize = 0x1000;

/// How the stored value relates to the true score of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The value is the exact score.
    Exact,
    /// The value is an upper bound (the node failed low).
    Upper,
    /// The value is a lower bound (the node failed high).
    Lower,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    key: u64,
    depth: i32,
    bound: Bound,
    value: i32,
}

/// A fixed-size transposition table with always-replace eviction.
pub struct TranspositionTable {
    entries: Vec<Option<Entry>>,
}

impl TranspositionTable {
    /// Creates a table with the given number of slots.
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0);
        TranspositionTable {
            entries: vec![None; size],
        }
    }

    #[inline]
    fn slot(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Probes the table for a usable score.
    ///
    /// Returns a score only when the stored entry matches the key, was
    /// searched at least as deep as requested, and its bound decides the
    /// current window: an exact value is returned as-is, an upper bound at
    /// or below alpha returns alpha, a lower bound at or above beta returns
    /// beta. Anything else is a miss.
    pub fn probe(&self, key: u64, alpha: i32, beta: i32, depth: i32) -> Option<i32> {
        let entry = self.entries[self.slot(key)]?;
        if entry.key != key || entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.value),
            Bound::Upper if entry.value <= alpha => Some(alpha),
            Bound::Lower if entry.value >= beta => Some(beta),
            _ => None,
        }
    }

    /// Stores a value, unconditionally replacing whatever occupied the slot.
    pub fn store(&mut self, key: u64, value: i32, depth: i32, bound: Bound) {
        let slot = self.slot(key);
        self.entries[slot] = Some(Entry {
            key,
            depth,
            bound,
            value,
        });
    }

    /// Empties the table.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }
}
