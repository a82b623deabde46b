//! Check detection.
//!
//! Attack tests scan outward from the target square along knight, king, pawn
//! and slider patterns instead of generating the attacker's move list.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};

/// True when any king of `color` is attacked. No king means no check.
#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    SquareIter::new(board.pieces(color, PieceKind::King))
        .any(|king_sq| is_square_attacked(board, king_sq, color.opposite()))
}

pub fn is_square_attacked(board: &Board, square: Square, attacker_color: Color) -> bool {
    // A pawn of `attacker_color` hits `square` exactly when a defending pawn
    // on `square` would hit it back.
    let pawns = board.pieces(attacker_color, PieceKind::Pawn);
    if pawn_attacks(attacker_color.opposite(), square) & pawns != 0 {
        return true;
    }

    if knight_attacks(square) & board.pieces(attacker_color, PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & board.pieces(attacker_color, PieceKind::King) != 0 {
        return true;
    }

    let queens = board.pieces(attacker_color, PieceKind::Queen);
    let occupancy = board.occupancy_all();

    let bishops_queens = board.pieces(attacker_color, PieceKind::Bishop) | queens;
    if bishops_queens != 0 && bishop_attacks(square, occupancy) & bishops_queens != 0 {
        return true;
    }

    let rooks_queens = board.pieces(attacker_color, PieceKind::Rook) | queens;
    rooks_queens != 0 && rook_attacks(square, occupancy) & rooks_queens != 0
}
