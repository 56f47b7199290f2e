//! Negamax bot speaking UCI.
//!
//! Thin controller around [`chess_engine::SearchEngine`]: it tracks the game
//! position from `position` commands, feeds each applied move into the
//! engine's repetition history, and runs the iterative-deepening search on
//! `go`.

use chess_core::UciMove;
use chess_engine::{generate_legal_moves, Board, SearchEngine, MATE_THRESHOLD, MATE_VALUE};
use uci::{stdio_engine, GuiCommand, InfoBuilder};

const DEFAULT_DEPTH: u32 = 7;

/// Converts an internal score into a UCI `score cp`/`score mate` builder call.
fn apply_score(builder: InfoBuilder, score: i32) -> InfoBuilder {
    if score > MATE_THRESHOLD {
        builder.score_mate((MATE_VALUE - score + 1) / 2)
    } else if score < -MATE_THRESHOLD {
        builder.score_mate(-((MATE_VALUE + score + 1) / 2))
    } else {
        builder.score_cp(score)
    }
}

/// Rebuilds the engine position from a `position` command.
///
/// Move texts that do not match a legal move are skipped, matching how
/// engines tolerate garbage from the GUI rather than dying mid-game.
fn set_position(engine: &mut SearchEngine, fen: Option<String>, moves: Vec<String>) {
    let board = match fen {
        Some(f) => Board::from_fen(&f).unwrap_or_else(|_| Board::startpos()),
        None => Board::startpos(),
    };
    engine.set_board(board);

    for text in moves {
        let Some(wanted) = UciMove::parse(&text) else {
            continue;
        };
        let board = engine.board_mut();
        let legal = generate_legal_moves(board);
        if let Some(&m) = legal.as_slice().iter().find(|m| wanted.matches(**m)) {
            let board = engine.board_mut();
            if board.make_move(m).is_legal() {
                let hash = board.hash();
                engine.record_repetition(hash);
            }
        }
    }
}

fn main() {
    let mut io = stdio_engine();
    let mut engine = SearchEngine::new(Board::startpos());

    loop {
        let cmd = match io.read_command() {
            Ok(cmd) => cmd,
            Err(e) => {
                eprintln!("Error reading command: {}", e);
                continue;
            }
        };

        match cmd {
            GuiCommand::Uci => {
                io.send_id("NegamaxBot", "Chess Devtools").unwrap();
                io.send_uciok().unwrap();
            }

            GuiCommand::IsReady => {
                io.send_readyok().unwrap();
            }

            GuiCommand::UciNewGame => {
                engine.set_board(Board::startpos());
            }

            GuiCommand::Position { fen, moves } => {
                set_position(&mut engine, fen, moves);
            }

            GuiCommand::Go(opts) => {
                let depth = opts.depth.unwrap_or(DEFAULT_DEPTH);

                let best = engine.search_with(depth, |report| {
                    let builder = InfoBuilder::new()
                        .depth(report.depth)
                        .nodes(report.nodes)
                        .time(report.elapsed.as_millis() as u64)
                        .pv(report.pv.iter().map(|m| m.to_uci()).collect());
                    let info = apply_score(builder, report.score).build();
                    io.send_info(info).ok();
                });

                match best {
                    Some(m) => io.send_bestmove(&m.to_uci()).unwrap(),
                    None => io.send_bestmove("0000").unwrap(),
                }
            }

            GuiCommand::Stop => {
                // Search runs to completion on go, nothing in flight to stop.
            }

            GuiCommand::Quit => {
                break;
            }

            GuiCommand::Unknown(_) => {
                // Ignore unknown commands
            }
        }
    }
}
