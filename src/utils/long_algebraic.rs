//! Long algebraic (UCI) move text: `e2e4`, `e7e8q`, `e1g1`.
//!
//! Text is resolved against the board's legal moves, so the result always
//! carries the right move kind (castling, en passant, double push, capture).

use crate::errors::ParseMoveError;
use crate::game_state::board::Board;
use crate::game_state::chess_types::PieceKind;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

pub fn move_to_long_algebraic(mv: Move) -> String {
    mv.to_string()
}

pub fn parse_long_algebraic(text: &str, board: &Board) -> Result<Move, ParseMoveError> {
    let malformed = || ParseMoveError::Malformed(text.to_owned());

    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(malformed());
    }

    let from = algebraic_to_square(&text[0..2]).map_err(|_| malformed())?;
    let to = algebraic_to_square(&text[2..4]).map_err(|_| malformed())?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => match PieceKind::from_letter(ch) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(malformed()),
        },
    };

    board
        .legal_moves()
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion_kind() == promotion)
        .ok_or_else(|| ParseMoveError::Illegal(text.to_owned()))
}
