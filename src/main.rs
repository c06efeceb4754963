//! Terminal front-end for kingside
//!
//! A thin demonstration caller: parses options, renders the board, reads
//! moves from stdin, and drives the session pipeline. All game logic lives
//! in the workspace crates; this binary only presents it.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use shakmaty::{Chess, Position as _, Square};
use tracing_subscriber::EnvFilter;

use kingside_engine::Level;
use kingside_rules::{Rules, ShakmatyRules, Side};
use kingside_session::{
    ComputedApply, Participant, Pipeline, Session, SessionError, SessionStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    White,
    Black,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Side {
        match side {
            SideArg::White => Side::White,
            SideArg::Black => Side::Black,
        }
    }
}

/// Play chess against the engine in the terminal
#[derive(Debug, Parser)]
#[command(name = "kingside", version)]
struct Args {
    /// Engine strength
    #[arg(long, default_value = "medium")]
    level: Level,

    /// Side played by the human
    #[arg(long, value_enum, default_value_t = SideArg::White)]
    side: SideArg,

    /// Simulated thinking delay before the engine's move, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Player name shown in logs
    #[arg(long, default_value = "player")]
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let human_side: Side = args.side.into();
    let engine_side = human_side.opponent();

    let pipeline = Pipeline::new(ShakmatyRules::new());
    let mut session = Session::new();
    session
        .claim_seat(
            human_side,
            Participant::Human {
                name: args.name.clone(),
            },
        )
        .context("claiming the human seat")?;
    session
        .claim_seat(engine_side, Participant::Engine { level: args.level })
        .context("claiming the engine seat")?;

    let mut rng = rand::rng();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!(
        "kingside: you play {human_side}, the engine plays {engine_side} at {} strength",
        args.level
    );
    println!("enter moves in algebraic (Nf3) or coordinate (g1f3) form;");
    println!("'resign', 'draw', or 'quit' end the game\n");

    loop {
        let state = pipeline.derive_session_state(&session)?;
        render(&pipeline, &state.position);

        if state.outcome.is_decided() {
            println!("game over: {}", state.outcome);
            break;
        }

        if state.side_to_move == engine_side {
            // Reached when the engine opens the game for White. The
            // thinking delay is a presentation choice, so it lives here and
            // not in the core.
            if args.delay_ms > 0 {
                thread::sleep(Duration::from_millis(args.delay_ms));
            }
            let computed = pipeline.request_artificial_move(&session, args.level, &mut rng)?;
            if let ComputedApply::Committed(receipt) =
                pipeline.apply_computed_move(&mut session, &computed)?
            {
                println!("engine plays {}\n", receipt.notation);
            }
            continue;
        }

        print!("{human_side} to move> ");
        io::stdout().flush().context("flushing prompt")?;
        let Some(line) = lines.next() else {
            println!("\nno more input, leaving the game in place");
            break;
        };
        let input = line.context("reading move input")?;
        let input = input.trim();

        match input {
            "" => continue,
            "quit" => break,
            "resign" => {
                pipeline.resign(&mut session, human_side)?;
                continue;
            }
            "draw" => {
                pipeline.agree_draw(&mut session)?;
                continue;
            }
            notation => {
                if args.delay_ms > 0 {
                    // The reply is chained inside apply_player_move; pause
                    // first so it does not appear instantaneous.
                    thread::sleep(Duration::from_millis(args.delay_ms));
                }
                match pipeline.apply_player_move(&mut session, human_side, notation, &mut rng) {
                    Ok(receipt) => {
                        println!("you played {}", receipt.notation);
                        if let Some(reply) =
                            session.log().last().filter(|entry| entry.ply > receipt.ply)
                        {
                            println!("engine plays {}\n", reply.notation);
                        }
                    }
                    Err(
                        err @ (SessionError::IllegalMove { .. }
                        | SessionError::NotYourTurn { .. }),
                    ) => {
                        println!("{err}");
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    if session.status() == SessionStatus::Finished {
        println!(
            "final result for session {}: {}",
            session.id(),
            session.outcome()
        );
    }
    Ok(())
}

/// Print the board with White at the bottom
fn render(pipeline: &Pipeline<ShakmatyRules>, position: &Chess) {
    let board = position.board();
    println!("  +-----------------+");
    for rank in (0..8u32).rev() {
        print!("{} |", rank + 1);
        for file in 0..8u32 {
            let square = Square::new(rank * 8 + file);
            match board.piece_at(square) {
                Some(piece) => print!(" {}", piece.char()),
                None => print!(" ."),
            }
        }
        println!(" |");
    }
    println!("  +-----------------+");
    println!("    a b c d e f g h");
    println!("    {} to move\n", pipeline.rules().side_to_move(position));
}
