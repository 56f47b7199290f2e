//! Bitboard chess engine with iterative-deepening alpha-beta search.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board representation with efficient operations
//! - [`Board`] - Full game state with reversible make/unmake and Zobrist
//!   hashing
//! - Pseudo-legal move generation backed by magic bitboards
//! - [`evaluate`] - material + piece-square-table evaluation
//! - [`SearchEngine`] - transposition table, killer/history heuristics,
//!   principal variation tracking, and adaptive iterative deepening
//!
//! # Architecture
//!
//! The engine uses bitboards for piece representation - each piece type/color
//! combination has a 64-bit integer where each bit represents a square.
//! Moves are applied in place and reverted exactly, so search walks a single
//! board up and down the tree.
//!
//! # Example
//!
//! ```
//! use chess_engine::{generate_legal_moves, Board, SearchEngine};
//!
//! let mut board = Board::startpos();
//! let moves = generate_legal_moves(&mut board);
//! println!("Legal moves from starting position: {}", moves.len());
//!
//! let mut engine = SearchEngine::new(board);
//! if let Some(best) = engine.search(4) {
//!     println!("best move: {best}");
//! }
//! ```

mod bitboard;
mod board;
pub mod eval;
pub mod movegen;
pub mod search;
mod zobrist;

pub use bitboard::Bitboard;
pub use board::{Board, BoardError, CastlingRights, GameState, MoveOutcome, MAX_HISTORY};
pub use eval::evaluate;
pub use movegen::{
    bishop_attacks, generate_legal_moves, generate_moves, is_king_attacked, is_square_attacked,
    king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks, MoveList,
};
pub use search::{
    SearchConfig, SearchEngine, SearchReport, INFINITY, MATE_THRESHOLD, MATE_VALUE,
};
