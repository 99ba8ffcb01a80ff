use std::str::FromStr;

use sweeper_core::{Coord, Coord2};
use thiserror::Error;

/// One line typed by the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    New,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}, type `h` for help")]
    Unknown(String),
    #[error("Expected a row and a column")]
    MissingCoords,
    #[error("Invalid number {0:?}")]
    BadNumber(String),
    #[error("Unexpected trailing input {0:?}")]
    Trailing(String),
}

pub const HELP: &str = "\
r ROW COL   reveal a cell
f ROW COL   flag or unflag a cell
n           new game
h           this help
q           quit";

fn parse_coord(token: Option<&str>) -> Result<Coord, ParseError> {
    let token = token.ok_or(ParseError::MissingCoords)?;
    token
        .parse()
        .map_err(|_| ParseError::BadNumber(token.to_string()))
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(ParseError::Empty)?;

        let command = match name.to_ascii_lowercase().as_str() {
            "r" | "reveal" => {
                let row = parse_coord(tokens.next())?;
                let col = parse_coord(tokens.next())?;
                Self::Reveal((row, col))
            }
            "f" | "flag" => {
                let row = parse_coord(tokens.next())?;
                let col = parse_coord(tokens.next())?;
                Self::Flag((row, col))
            }
            "n" | "new" => Self::New,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(ParseError::Unknown(name.to_string())),
        };

        match tokens.next() {
            Some(extra) => Err(ParseError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}
