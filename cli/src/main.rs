use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;
use sweeper_core::{CellCount, Coord, MinePlacer, PlayEngine};

use command::{Command, HELP, ParseError};
use preset::Difficulty;

mod command;
mod preset;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset, individual dimensions below take precedence
    #[arg(short, long, value_enum, default_value_t)]
    difficulty: Difficulty,

    #[arg(long)]
    rows: Option<Coord>,

    #[arg(long)]
    cols: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Prints the board with row and column indices, followed by the counters.
fn draw<P: MinePlacer>(out: &mut impl Write, engine: &PlayEngine<P>) -> io::Result<()> {
    let status = engine.status();

    write!(out, "    ")?;
    for col in 0..status.cols {
        write!(out, "{}", col % 10)?;
    }
    writeln!(out)?;

    for (row, line) in engine.rendering().iter().enumerate() {
        writeln!(out, "{row:>3} {line}")?;
    }

    writeln!(
        out,
        "mines left: {}  revealed: {}/{}",
        status.mines_left(),
        status.revealed_count,
        engine.config().total_cells() - status.mine_count
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = preset::resolve(args.difficulty, args.rows, args.cols, args.mines);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Starting {:?} with seed {}", config, seed);

    let mut engine = PlayEngine::with_seed(config, seed);
    let mut out = io::stdout().lock();

    writeln!(out, "{HELP}")?;
    draw(&mut out, &engine)?;

    for line in io::stdin().lock().lines() {
        let command = match line?.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Reveal(coords) => {
                if !engine.reveal(coords) {
                    writeln!(out, "Cannot reveal {coords:?}")?;
                }
            }
            Command::Flag(coords) => {
                if !engine.toggle_flag(coords) {
                    writeln!(out, "Cannot flag {coords:?}")?;
                }
            }
            Command::New => engine.init(config.rows, config.cols, config.mines),
            Command::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            Command::Quit => break,
        }

        draw(&mut out, &engine)?;

        let status = engine.status();
        if status.done {
            if status.exploded {
                writeln!(out, "Oh no, you hit a mine!")?;
            } else {
                writeln!(out, "You win!")?;
            }
            writeln!(out, "Type `n` for a new game or `q` to quit")?;
        }
    }

    Ok(())
}
