//! Square parsing for algebraic coordinates.
//!
//! Parses human-readable coordinates (e.g., `e4`) into the internal square
//! representation reused by the FEN and UCI layers.

use crate::errors::ParseSquareError;
use crate::game_state::chess_types::Square;

/// Convert algebraic notation (for example: "e4") to a square.
#[inline]
pub fn algebraic_to_square(square: &str) -> Result<Square, ParseSquareError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ParseSquareError(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ParseSquareError(square.to_owned()));
    }

    Ok(Square::new(rank - b'1', file - b'a'))
}
