//! Iterative-deepening negamax search.
//!
//! All search state lives in [`SearchEngine`]: the board being searched, the
//! transposition table, killer and history heuristics, the principal
//! variation table, and the repetition map fed by the game controller.
//! The search itself is a fail-hard alpha-beta negamax with quiescence,
//! null-move pruning, late move reductions, and principal variation search,
//! driven one depth at a time with adaptive deepening.

mod tt;

pub use tt::{Bound, TranspositionTable, DEFAULT_TT_SIZE};

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chess_core::{Move, Piece};

use crate::board::Board;
use crate::eval::evaluate;
use crate::movegen::{generate_moves, MoveList};

/// The search window half-width; no score leaves (-INFINITY, INFINITY).
pub const INFINITY: i32 = 50_000;
/// Base score for checkmate, adjusted by ply so nearer mates score higher.
pub const MATE_VALUE: i32 = 49_000;
/// Scores above this are treated as forced mate.
pub const MATE_THRESHOLD: i32 = 45_000;

/// Table size for killers and the PV triangle.
pub const MAX_PLY: usize = 64;
/// The main search hands over to quiescence at this ply.
const MAX_SEARCH_PLY: usize = 32;

/// Moves searched at full depth before late move reductions kick in.
const FULL_DEPTH_MOVES: usize = 4;
/// Minimum remaining depth for a late move reduction.
const REDUCTION_LIMIT: i32 = 3;
/// History scores saturate here.
const HISTORY_CAP: i32 = 7_000;

/// MVV-LVA scores indexed [attacker][victim]: the victim dominates, the
/// cheaper attacker breaks ties.
#[rustfmt::skip]
const MVV_LVA: [[i32; 6]; 6] = [
    [105, 205, 305, 405, 505, 605],
    [104, 204, 304, 404, 504, 604],
    [103, 203, 303, 403, 503, 603],
    [102, 202, 302, 402, 502, 602],
    [101, 201, 301, 401, 501, 601],
    [100, 200, 300, 400, 500, 600],
];

/// Tunable search parameters.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Hard depth cap for quiescence search.
    pub quiescence_depth: u32,
    /// Reset the transposition table and heuristics before each
    /// iterative-deepening depth.
    pub clear_tables_between_depths: bool,
    /// Shrink the deepening target once a depth used this many nodes.
    pub node_budget: u64,
    /// Extend the deepening target while total elapsed time stays under this.
    pub depth_time_budget: Duration,
    /// Depths at or below this are always allowed to extend the target.
    pub shallow_depth_limit: u32,
    /// Never deepen beyond this.
    pub max_depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            quiescence_depth: 32,
            clear_tables_between_depths: true,
            node_budget: 3_000_000,
            depth_time_budget: Duration::from_secs(12),
            shallow_depth_limit: 14,
            max_depth: 32,
        }
    }
}

/// Diagnostics for one finished iterative-deepening depth.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

/// The engine: a board plus every piece of search state.
pub struct SearchEngine {
    board: Board,
    config: SearchConfig,
    tt: TranspositionTable,
    killers: [[Move; MAX_PLY]; 2],
    history: [[[i32; 64]; 6]; 2],
    pv_table: Box<[[Move; MAX_PLY]; MAX_PLY]>,
    pv_length: [usize; MAX_PLY],
    repetition: HashMap<u64, u32>,
    nodes: u64,
    ply: usize,
    follow_pv: bool,
    score_pv: bool,
    depth_start: i32,
}

impl SearchEngine {
    /// Creates an engine searching the given board with default settings.
    pub fn new(board: Board) -> Self {
        Self::with_config(board, SearchConfig::default())
    }

    /// Creates an engine with explicit settings.
    pub fn with_config(board: Board, config: SearchConfig) -> Self {
        SearchEngine {
            board,
            config,
            tt: TranspositionTable::new(DEFAULT_TT_SIZE),
            killers: [[Move::NULL; MAX_PLY]; 2],
            history: [[[0; 64]; 6]; 2],
            pv_table: Box::new([[Move::NULL; MAX_PLY]; MAX_PLY]),
            pv_length: [0; MAX_PLY],
            repetition: HashMap::new(),
            nodes: 0,
            ply: 0,
            follow_pv: false,
            score_pv: false,
            depth_start: 0,
        }
    }

    /// Returns the board being searched.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the board mutably, for the controller to apply game moves.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replaces the board and forgets the old game's repetition history.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.repetition.clear();
    }

    /// Records a position hash the game has actually passed through.
    ///
    /// Search returns a draw score at any non-root node whose hash is in
    /// this map.
    pub fn record_repetition(&mut self, hash: u64) {
        *self.repetition.entry(hash).or_insert(0) += 1;
    }

    fn reset_heuristics(&mut self) {
        self.killers = [[Move::NULL; MAX_PLY]; 2];
        self.history = [[[0; 64]; 6]; 2];
    }

    /// Searches to the given target depth and returns the best move, or
    /// `None` when the side to move has no legal move.
    pub fn search(&mut self, depth: u32) -> Option<Move> {
        self.search_with(depth, |_| {})
    }

    /// Searches with a per-depth callback for diagnostics.
    ///
    /// The target depth adapts as the search runs: it extends while depths
    /// finish quickly (or the target is still shallow), shrinks when a depth
    /// blows the node budget, and the whole search stops early once a forced
    /// mate is found.
    pub fn search_with<F>(&mut self, depth: u32, mut on_depth: F) -> Option<Move>
    where
        F: FnMut(&SearchReport),
    {
        self.reset_heuristics();
        self.pv_table = Box::new([[Move::NULL; MAX_PLY]; MAX_PLY]);
        self.pv_length = [0; MAX_PLY];
        self.ply = 0;
        self.score_pv = false;

        let start = Instant::now();
        let mut target = depth.clamp(1, self.config.max_depth) as i32;
        let mut current = 1i32;

        while current <= target {
            if self.config.clear_tables_between_depths {
                self.tt.clear();
                self.reset_heuristics();
            }
            self.nodes = 0;
            self.follow_pv = true;
            self.depth_start = current;

            let score = self.negamax(-INFINITY, INFINITY, current);

            let pv = (0..self.pv_length[0])
                .map(|i| self.pv_table[0][i])
                .collect();
            on_depth(&SearchReport {
                depth: current as u32,
                score,
                nodes: self.nodes,
                elapsed: start.elapsed(),
                pv,
            });

            if current == target
                && (start.elapsed() < self.config.depth_time_budget
                    || target <= self.config.shallow_depth_limit as i32)
            {
                target += 1;
            }
            if self.nodes >= self.config.node_budget {
                target -= 1;
            }
            if target > self.config.max_depth as i32 {
                break;
            }
            if score > MATE_THRESHOLD {
                break;
            }

            current += 1;
        }

        let best = self.pv_table[0][0];
        if best.is_null() {
            None
        } else {
            Some(best)
        }
    }

    fn negamax(&mut self, mut alpha: i32, beta: i32, mut depth: i32) -> i32 {
        let hash = self.board.hash();

        if self.ply > 0 {
            if let Some(mut score) = self.tt.probe(hash, alpha, beta, depth) {
                // Stored mate scores are relative to the node they were
                // found at; rebase them to this ply
                if score == MATE_VALUE {
                    score -= self.ply as i32;
                } else if score == -MATE_VALUE {
                    score += self.ply as i32;
                }
                return score;
            }
            if self.repetition.contains_key(&hash) {
                return 0;
            }
        }

        self.pv_length[self.ply] = self.ply;

        if depth <= 0 || self.ply >= MAX_SEARCH_PLY {
            return self.quiescence(alpha, beta, self.config.quiescence_depth);
        }

        self.nodes += 1;

        let us = self.board.side_to_move();
        let in_check = self.board.in_check();
        if in_check {
            depth += 1;
        }

        // Null move pruning: skip a turn and see if the reduced search
        // still fails high. Unsound in zugzwang, so pawn-only endings and
        // in-check nodes are exempt
        if depth >= 3 && !in_check && self.ply > 0 && self.board.has_non_pawn_material(us) {
            self.board.make_null_move();
            let score = -self.negamax(-beta, -beta + 1, depth - 1 - 2);
            self.board.unmake_null_move();
            if score >= beta {
                return beta;
            }
        }

        let mut moves = generate_moves(&self.board);
        if self.follow_pv {
            self.enable_pv_scoring(&moves);
        }
        self.order_moves(&mut moves);

        let mut legal_moves = 0usize;
        let mut moves_searched = 0usize;
        let mut bound = Bound::Upper;

        for i in 0..moves.len() {
            let m = moves[i];

            self.ply += 1;
            if !self.board.make_move(m).is_legal() {
                self.board.unmake_move(m);
                self.ply -= 1;
                continue;
            }
            legal_moves += 1;

            let score = if moves_searched == 0 {
                -self.negamax(-beta, -alpha, depth - 1)
            } else if self.depth_start > 6 {
                // Late move reductions at deeper targets: quiet,
                // non-killer moves late in the list get a reduced
                // null-window probe first
                let mut score = if moves_searched >= FULL_DEPTH_MOVES
                    && depth >= REDUCTION_LIMIT
                    && !in_check
                    && depth != self.depth_start
                    && !m.is_capture()
                    && !m.is_promotion()
                    && self.killers[0][self.ply] != m
                    && self.killers[1][self.ply] != m
                {
                    -self.negamax(-alpha - 1, -alpha, depth - 2)
                } else {
                    alpha + 1
                };
                if score > alpha {
                    score = -self.negamax(-alpha - 1, -alpha, depth - 1);
                    if score > alpha && score < beta {
                        score = -self.negamax(-beta, -alpha, depth - 1);
                    }
                }
                score
            } else {
                // Principal variation search: null-window probe, full
                // re-search only if it raises alpha inside the window
                let mut score = -self.negamax(-alpha - 1, -alpha, depth - 1);
                if score > alpha && score < beta {
                    score = -self.negamax(-beta, -alpha, depth - 1);
                }
                score
            };

            self.ply -= 1;
            self.board.unmake_move(m);
            moves_searched += 1;

            if score >= beta {
                self.tt.store(hash, score, depth, Bound::Lower);
                if !m.is_capture() {
                    self.killers[1][self.ply] = self.killers[0][self.ply];
                    self.killers[0][self.ply] = m;
                }
                return beta;
            }

            if score > alpha {
                bound = Bound::Exact;
                alpha = score;

                if !m.is_capture() {
                    let slot = &mut self.history[us.index()][m.piece().index()]
                        [m.to().index() as usize];
                    if *slot < HISTORY_CAP {
                        *slot += depth;
                    }
                }

                // Splice this move onto the child's principal variation
                self.pv_table[self.ply][self.ply] = m;
                for next in (self.ply + 1)..self.pv_length[self.ply + 1] {
                    self.pv_table[self.ply][next] = self.pv_table[self.ply + 1][next];
                }
                self.pv_length[self.ply] = self.pv_length[self.ply + 1];
            }
        }

        if legal_moves == 0 {
            return if in_check {
                self.tt.store(hash, -MATE_VALUE, depth, Bound::Exact);
                -MATE_VALUE + self.ply as i32
            } else {
                self.tt.store(hash, 0, depth, Bound::Exact);
                0
            };
        }

        self.tt.store(hash, alpha, depth, bound);
        alpha
    }

    fn quiescence(&mut self, mut alpha: i32, beta: i32, qdepth: u32) -> i32 {
        self.nodes += 1;

        let stand_pat = evaluate(&self.board);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if qdepth == 0 {
            return alpha;
        }

        let mut moves = generate_moves(&self.board);
        self.order_moves(&mut moves);

        for i in 0..moves.len() {
            let m = moves[i];
            if !m.is_capture() && !m.is_promotion() {
                continue;
            }

            self.ply += 1;
            if !self.board.make_move(m).is_legal() {
                self.board.unmake_move(m);
                self.ply -= 1;
                continue;
            }

            let score = -self.quiescence(-beta, -alpha, qdepth - 1);

            self.ply -= 1;
            self.board.unmake_move(m);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }

        alpha
    }

    /// Checks whether the previous iteration's PV move exists at this node;
    /// if so, keeps PV scoring alive for it.
    fn enable_pv_scoring(&mut self, moves: &MoveList) {
        self.follow_pv = false;
        for m in moves {
            if self.pv_table[0][self.ply] == *m {
                self.score_pv = true;
                self.follow_pv = true;
            }
        }
    }

    fn score_move(&mut self, m: Move) -> i32 {
        if self.score_pv && self.pv_table[0][self.ply] == m {
            self.score_pv = false;
            return 20_000;
        }

        if m.is_capture() {
            // En passant leaves the target square empty; the victim is
            // always a pawn
            let them = self.board.side_to_move().opposite();
            let mut victim = Piece::Pawn;
            for piece in Piece::ALL {
                if self.board.pieces_of(piece, them).contains(m.to()) {
                    victim = piece;
                    break;
                }
            }
            return MVV_LVA[m.piece().index()][victim.index()] + 10_000;
        }

        if self.killers[0][self.ply] == m {
            9_000
        } else if self.killers[1][self.ply] == m {
            8_000
        } else if m.is_castling() {
            15_000
        } else {
            let us = self.board.side_to_move();
            self.history[us.index()][m.piece().index()][m.to().index() as usize]
        }
    }

    /// Orders moves by descending score with a stable insertion sort.
    fn order_moves(&mut self, moves: &mut MoveList) {
        let mut scores = [0i32; MoveList::MAX_MOVES];
        for i in 0..moves.len() {
            scores[i] = self.score_move(moves[i]);
        }

        let len = moves.len();
        let slice = moves.as_mut_slice();
        for i in 1..len {
            let m = slice[i];
            let s = scores[i];
            let mut j = i;
            while j > 0 && scores[j - 1] < s {
                slice[j] = slice[j - 1];
                scores[j] = scores[j - 1];
                j -= 1;
            }
            slice[j] = m;
            scores[j] = s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::generate_legal_moves;
    use chess_core::Square;

    fn engine(fen: &str) -> SearchEngine {
        SearchEngine::new(Board::from_fen(fen).unwrap())
    }

    fn shallow_config() -> SearchConfig {
        // Keep the adaptive deepening from extending past the requested
        // depth in tests
        SearchConfig {
            depth_time_budget: Duration::ZERO,
            shallow_depth_limit: 0,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn startpos_search_returns_legal_move() {
        let mut engine =
            SearchEngine::with_config(Board::startpos(), shallow_config());
        let best = engine.search(3).unwrap();
        let legal = generate_legal_moves(engine.board_mut());
        assert!(legal.as_slice().contains(&best));
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        let mut engine = SearchEngine::with_config(
            Board::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap(),
            shallow_config(),
        );

        let mut last_score = 0;
        let best = engine
            .search_with(4, |report| last_score = report.score)
            .unwrap();

        assert_eq!(best.from(), Square::A1);
        assert_eq!(best.to(), Square::A8);
        assert!(last_score > MATE_THRESHOLD);
    }

    #[test]
    fn mated_position_returns_no_move() {
        let mut engine = engine("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(engine.search(3).is_none());
    }

    #[test]
    fn stalemate_returns_no_move() {
        let mut engine = engine("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(engine.search(3).is_none());
    }

    #[test]
    fn search_after_applied_moves() {
        let mut engine =
            SearchEngine::with_config(Board::startpos(), shallow_config());

        for text in ["e2e4", "e7e5", "g1f3"] {
            let parsed = chess_core::UciMove::parse(text).unwrap();
            let legal = generate_legal_moves(engine.board_mut());
            let m = *legal
                .as_slice()
                .iter()
                .find(|m| parsed.matches(**m))
                .unwrap();
            let outcome = engine.board_mut().make_move(m);
            assert!(outcome.is_legal());
            let hash = engine.board().hash();
            engine.record_repetition(hash);
        }

        let best = engine.search(1).unwrap();
        let legal = generate_legal_moves(engine.board_mut());
        assert!(legal.as_slice().contains(&best));
    }

    #[test]
    fn search_prefers_winning_capture() {
        // White queen takes the undefended rook on d8
        let mut engine = SearchEngine::with_config(
            Board::from_fen("3r3k/8/8/8/8/8/8/3Q3K w - - 0 1").unwrap(),
            shallow_config(),
        );
        let best = engine.search(3).unwrap();
        assert_eq!(best.to(), Square::D8);
        assert!(best.is_capture());
    }

    #[test]
    fn reports_are_emitted_per_depth() {
        let mut engine =
            SearchEngine::with_config(Board::startpos(), shallow_config());
        let mut depths = Vec::new();
        let _ = engine.search_with(3, |report| {
            depths.push(report.depth);
            assert!(report.nodes > 0);
            assert!(!report.pv.is_empty());
        });
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn search_leaves_board_unchanged() {
        let mut engine =
            SearchEngine::with_config(Board::startpos(), shallow_config());
        let before = engine.board().clone();
        let _ = engine.search(3);
        assert_eq!(*engine.board(), before);
    }

    #[test]
    fn quiescence_resolves_hanging_exchange() {
        // Without quiescence a depth-1 search would happily leave the
        // queen en prise after QxR; the capture search must see RxQ back
        let mut engine = SearchEngine::with_config(
            Board::from_fen("3rr2k/8/8/8/8/8/8/3Q3K w - - 0 1").unwrap(),
            shallow_config(),
        );
        let best = engine.search(1).unwrap();
        assert_ne!(best.to(), Square::D8);
    }
}
