//! Property tests for the board: make/unmake reversibility, incremental
//! hashing, and FEN round-trips across randomly generated games.

use chess_core::{Color, Piece};
use chess_engine::{generate_legal_moves, Bitboard, Board};
use proptest::prelude::*;

/// Plays a random legal game from the starting position, choosing each move
/// with one of the supplied indices. Stops early when no legal move remains.
fn play_random_game(picks: &[prop::sample::Index]) -> Board {
    let mut board = Board::startpos();
    for pick in picks {
        let moves = generate_legal_moves(&mut board);
        if moves.is_empty() {
            break;
        }
        let m = moves[pick.index(moves.len())];
        assert!(board.make_move(m).is_legal());
    }
    board
}

proptest! {
    #[test]
    fn incremental_hash_matches_fen_reload(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..60)) {
        let board = play_random_game(&picks);
        let reloaded = Board::from_fen(&board.to_fen()).unwrap();
        prop_assert_eq!(reloaded.hash(), board.hash());
    }

    #[test]
    fn fen_round_trip_preserves_position(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..60)) {
        let board = play_random_game(&picks);
        let fen = board.to_fen();
        let reloaded = Board::from_fen(&fen).unwrap();
        prop_assert_eq!(reloaded.to_fen(), fen);
    }

    #[test]
    fn unmake_restores_every_field(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40)) {
        let mut board = play_random_game(&picks);
        let before = board.clone();
        let moves = generate_legal_moves(&mut board);
        for i in 0..moves.len() {
            let m = moves[i];
            assert!(board.make_move(m).is_legal());
            board.unmake_move(m);
            prop_assert_eq!(&board, &before);
            prop_assert_eq!(board.hash(), before.hash());
        }
    }

    #[test]
    fn occupancy_stays_consistent(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..60)) {
        let board = play_random_game(&picks);
        for color in [Color::White, Color::Black] {
            let mut union = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = board.pieces_of(piece, color);
                prop_assert!((union & bb).is_empty());
                union |= bb;
            }
            prop_assert_eq!(union, board.occupancy(color));
        }
        prop_assert!((board.occupancy(Color::White) & board.occupancy(Color::Black)).is_empty());
        prop_assert_eq!(
            board.occupancy(Color::White) | board.occupancy(Color::Black),
            board.occupied()
        );
    }

    #[test]
    fn legal_moves_never_leave_king_in_check(picks in prop::collection::vec(any::<prop::sample::Index>(), 0..40)) {
        let mut board = play_random_game(&picks);
        let mover = board.side_to_move();
        let moves = generate_legal_moves(&mut board);
        for i in 0..moves.len() {
            let m = moves[i];
            assert!(board.make_move(m).is_legal());
            prop_assert!(!chess_engine::is_king_attacked(&board, mover));
            board.unmake_move(m);
        }
    }
}
