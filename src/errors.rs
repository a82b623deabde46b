//! Error types surfaced by the public API.
//!
//! Parsing failures are recoverable and carry the offending token so callers can
//! report precise diagnostics. Applying a move that the board did not generate
//! is a programmer error and has no variant here.

use std::error::Error;
use std::fmt;

/// Malformed FEN text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFenError {
    /// FEN must contain exactly six space-separated fields.
    FieldCount(usize),
    /// Placement field must contain exactly eight ranks.
    RankCount(usize),
    /// A rank (1-based, as written in FEN) did not cover exactly eight files.
    RankWidth { rank: u8, files: usize },
    /// Character outside the placement grammar.
    InvalidPiece(char),
    InvalidSideToMove(String),
    InvalidCastling(char),
    InvalidEnPassant(String),
    InvalidHalfmoveClock(String),
    InvalidFullmoveNumber(String),
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFenError::FieldCount(n) => {
                write!(f, "FEN must have 6 space-separated fields, found {n}")
            }
            ParseFenError::RankCount(n) => write!(f, "board layout must contain 8 ranks, found {n}"),
            ParseFenError::RankWidth { rank, files } => {
                write!(f, "rank {rank} covers {files} files instead of 8")
            }
            ParseFenError::InvalidPiece(ch) => {
                write!(f, "invalid character '{ch}' in board layout")
            }
            ParseFenError::InvalidSideToMove(s) => write!(f, "invalid side-to-move field '{s}'"),
            ParseFenError::InvalidCastling(ch) => {
                write!(f, "invalid castling rights character '{ch}'")
            }
            ParseFenError::InvalidEnPassant(s) => write!(f, "invalid en passant field '{s}'"),
            ParseFenError::InvalidHalfmoveClock(s) => write!(f, "invalid halfmove clock '{s}'"),
            ParseFenError::InvalidFullmoveNumber(s) => {
                write!(f, "invalid fullmove number '{s}'")
            }
        }
    }
}

impl Error for ParseFenError {}

/// Malformed square coordinate such as `"e9"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSquareError(pub String);

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid algebraic square '{}'", self.0)
    }
}

impl Error for ParseSquareError {}

/// Long algebraic move text that is malformed or names no legal move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoveError {
    Malformed(String),
    Illegal(String),
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoveError::Malformed(s) => write!(f, "malformed move '{s}'"),
            ParseMoveError::Illegal(s) => write!(f, "move '{s}' is not legal in this position"),
        }
    }
}

impl Error for ParseMoveError {}

impl From<ParseSquareError> for ParseMoveError {
    fn from(err: ParseSquareError) -> Self {
        ParseMoveError::Malformed(err.0)
    }
}

/// UCI command-line problems. None of these end the command loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciError {
    EmptyCommand,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument { name: &'static str, value: String },
    UnknownOption(String),
    InvalidOptionValue { name: String, value: String },
    Fen(ParseFenError),
    Move(ParseMoveError),
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::EmptyCommand => write!(f, "command is empty"),
            UciError::UnknownCommand(cmd) => write!(f, "unknown command '{cmd}'"),
            UciError::MissingArgument(name) => write!(f, "missing value for '{name}'"),
            UciError::InvalidArgument { name, value } => {
                write!(f, "invalid value '{value}' for '{name}'")
            }
            UciError::UnknownOption(name) => write!(f, "unknown option '{name}'"),
            UciError::InvalidOptionValue { name, value } => {
                write!(f, "invalid value '{value}' for option '{name}'")
            }
            UciError::Fen(err) => write!(f, "{err}"),
            UciError::Move(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UciError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            UciError::Fen(err) => Some(err),
            UciError::Move(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseFenError> for UciError {
    fn from(err: ParseFenError) -> Self {
        UciError::Fen(err)
    }
}

impl From<ParseMoveError> for UciError {
    fn from(err: ParseMoveError) -> Self {
        UciError::Move(err)
    }
}
