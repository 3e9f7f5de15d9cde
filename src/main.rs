//! Hex-Connection: a Hex rules engine.
//!
//! ## Usage
//!
//! - `hex-connection` - Show a demo
//! - `hex-connection htp` - Start the HTP command loop
//! - `hex-connection demo --size 11 --seed 3` - Play and print a random game
//! - `hex-connection show game.sgf` - Print the final position of a game record
//! - `hex-connection convert in.sgf out.sgf --to little-golem` - Rewrite a record

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use hex_connection::constants::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MAX_SGF_BOARD_SIZE};
use hex_connection::history::History;
use hex_connection::htp::HtpEngine;
use hex_connection::playout::random_playout;
use hex_connection::sgf::{self, Dialect};

/// Hex-Connection: a Hex rules engine
#[derive(Parser)]
#[command(name = "hex-connection")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase stderr logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write debug logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTP (Hex Text Protocol) command loop on stdin/stdout
    Htp {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, value_parser = parse_board_size)]
        size: usize,
    },
    /// Play a random game and print it
    Demo {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE, value_parser = parse_board_size)]
        size: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load a game record and print its final position
    Show {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = DialectArg::Auto)]
        dialect: DialectArg,
    },
    /// Rewrite a game record in another dialect
    Convert {
        input: PathBuf,
        output: PathBuf,
        #[arg(long, value_enum, default_value_t = DialectArg::Auto)]
        from: DialectArg,
        #[arg(long, value_enum, default_value_t = DialectArg::Standard)]
        to: DialectArg,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DialectArg {
    Auto,
    Standard,
    LittleGolem,
}

impl DialectArg {
    fn dialect(self) -> Option<Dialect> {
        match self {
            DialectArg::Auto => None,
            DialectArg::Standard => Some(Dialect::Standard),
            DialectArg::LittleGolem => Some(Dialect::LittleGolem),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose, cli.log_file.as_ref())?;

    match cli.command {
        Some(Commands::Htp { size }) => {
            let mut engine = HtpEngine::new(size)?;
            engine.run().context("htp command loop")?;
        }
        Some(Commands::Show { path, dialect }) => {
            let history = sgf::load(dialect.dialect(), &path)
                .with_context(|| format!("loading {}", path.display()))?;
            print_game(&history);
        }
        Some(Commands::Convert {
            input,
            output,
            from,
            to,
        }) => {
            let to = to
                .dialect()
                .ok_or_else(|| anyhow!("--to needs a concrete dialect"))?;
            let history = sgf::load(from.dialect(), &input)
                .with_context(|| format!("loading {}", input.display()))?;
            sgf::save(&history, to, &output)
                .with_context(|| format!("saving {}", output.display()))?;
            info!("converted {} moves", history.len());
        }
        Some(Commands::Demo { size, seed }) => run_demo(size, seed)?,
        None => run_demo(DEFAULT_BOARD_SIZE, None)?,
    }
    Ok(())
}

fn parse_board_size(text: &str) -> Result<usize, String> {
    let size: usize = text.parse().map_err(|err| format!("{err}"))?;
    if !(1..=MAX_BOARD_SIZE).contains(&size) {
        return Err(format!("board size must be between 1 and {MAX_BOARD_SIZE}"));
    }
    Ok(size)
}

fn setup_logger(verbose: u8, log_file: Option<&PathBuf>) -> Result<()> {
    let stderr_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let log_dispatcher = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    let log_dispatcher = match log_file {
        Some(log_file) => log_dispatcher
            .chain(
                fern::Dispatch::new()
                    .level(log::LevelFilter::Debug)
                    .chain(fern::log_file(log_file).context("opening log file")?),
            )
            .chain(fern::Dispatch::new().level(stderr_level).chain(io::stderr())),
        None => log_dispatcher.level(stderr_level).chain(io::stderr()),
    };
    log_dispatcher.apply().context("installing logger")?;
    Ok(())
}

fn run_demo(size: usize, seed: Option<u64>) -> Result<()> {
    println!("Hex-Connection: random game on a {size}x{size} board\n");

    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let mut history = History::new(size)?;
    random_playout(&mut history, &mut rng).ok_or_else(|| anyhow!("playout did not finish"))?;
    print_game(&history);

    if size <= MAX_SGF_BOARD_SIZE {
        println!("\n{}", sgf::to_sgf_string(&history, Dialect::Standard)?);
    }
    Ok(())
}

fn print_game(history: &History) {
    let game = history.game();
    println!("{}", game.board());
    println!("Moves: {} (at {})", history.len(), history.cursor());
    match game.winner() {
        Some(player) => println!(
            "Winner: {player}, chain of {} cells",
            game.winning_chain().len()
        ),
        None => println!("To move: {}", game.current_player()),
    }
}
