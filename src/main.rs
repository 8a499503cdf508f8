use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use rand::rngs::StdRng;
use rand::{thread_rng, RngCore, SeedableRng};

use minimax48::engine::search::DEFAULT_DEPTH;
use minimax48::engine::{Board, SearchConfig, Strategy};

mod tui;
mod tui48;

use tui::crossterm::{Crossterm, CrosstermEvents};
use tui48::{Tui48, BATCH_MOVES};

const DEFAULT_LOG_FILE: &str = "./minimax48.log";

/// Play 2048 by hand or let minimax / alpha-beta search play it.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity,

    /// Search depth in plies, counting the root move.
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Seed for the tile spawner; a random seed is used when omitted.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive game in the terminal (the default).
    Play {
        /// File that receives log output while the terminal is in use.
        #[arg(long, default_value = DEFAULT_LOG_FILE)]
        log_file: PathBuf,
    },
    /// Let a strategy play a whole game without a terminal UI.
    Auto {
        #[arg(long, value_enum, default_value_t = Strategy::AlphaBeta)]
        strategy: Strategy,

        /// Stop after this many moves even if the game is not over.
        #[arg(long)]
        max_moves: Option<usize>,
    },
    /// Time batches of moves for both strategies from the same starting game.
    Bench {
        /// Moves per batch.
        #[arg(long, default_value_t = BATCH_MOVES)]
        batch: usize,

        /// Number of batches per strategy.
        #[arg(long, default_value_t = 1)]
        rounds: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SearchConfig::new(cli.depth)?;
    let level = cli.verbose.log_level_filter();
    let seed = cli.seed.unwrap_or_else(|| thread_rng().next_u64());

    match cli.command {
        None => {
            init_logging(level, Some(Path::new(DEFAULT_LOG_FILE)))?;
            play(seed, config)
        }
        Some(Command::Play { log_file }) => {
            init_logging(level, Some(&log_file))?;
            play(seed, config)
        }
        Some(Command::Auto {
            strategy,
            max_moves,
        }) => {
            init_logging(level, None)?;
            auto(seed, config, strategy, max_moves);
            Ok(())
        }
        Some(Command::Bench { batch, rounds }) => {
            init_logging(level, None)?;
            bench(seed, config, batch, rounds);
            Ok(())
        }
    }
}

fn init_logging(level: log::LevelFilter, file: Option<&Path>) -> minimax48::error::Result<()> {
    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(level);
    let dispatch = match file {
        Some(path) => dispatch.chain(fern::log_file(path)?),
        None => dispatch.chain(std::io::stderr()),
    };
    dispatch.apply()?;
    Ok(())
}

fn play(seed: u64, config: SearchConfig) -> Result<()> {
    log::info!("seed {}", seed);
    let board = Board::new(StdRng::seed_from_u64(seed), config);
    let w = stdout().lock();
    let renderer = Crossterm::new(Box::new(w))?;
    let event_source = CrosstermEvents::default();
    let board = Tui48::new(board, renderer, event_source).run()?;
    println!(
        "final score {}, highest tile {}",
        board.score(),
        board.highest_tile()
    );
    Ok(())
}

fn auto(seed: u64, config: SearchConfig, strategy: Strategy, max_moves: Option<usize>) {
    log::info!("seed {}", seed);
    let mut board = Board::new(StdRng::seed_from_u64(seed), config);
    let start = Instant::now();
    let mut moves = 0;
    while max_moves.map_or(true, |max| moves < max) {
        match board.choose_and_apply(strategy) {
            Some(direction) => {
                moves += 1;
                log::info!(
                    "move {}: {} (score {}, {} nodes)",
                    moves,
                    direction,
                    board.score(),
                    board.last_stats().nodes
                );
            }
            None => break,
        }
    }
    print!("{}", board.grid());
    println!(
        "{} at depth {}: {} moves in {:?}, score {}, highest tile {}{}",
        strategy,
        board.config().depth(),
        moves,
        start.elapsed(),
        board.score(),
        board.highest_tile(),
        if board.is_terminal() { ", game over" } else { "" }
    );
}

fn bench(seed: u64, config: SearchConfig, batch: usize, rounds: usize) {
    println!(
        "seed {}, depth {}, {} batch(es) of {} moves",
        seed,
        config.depth(),
        rounds,
        batch
    );
    for strategy in [Strategy::Minimax, Strategy::AlphaBeta] {
        let mut board = Board::new(StdRng::seed_from_u64(seed), config);
        for round in 0..rounds {
            let elapsed = board.time_batch(strategy, batch);
            log::info!("{} batch {}: {:?}", strategy, round, elapsed);
        }
        println!(
            "{:>10}: total {} ms, score {}, highest tile {}, last search {} nodes",
            strategy.to_string(),
            board.timings().total(strategy).as_millis(),
            board.score(),
            board.highest_tile(),
            board.last_stats().nodes
        );
    }
}
