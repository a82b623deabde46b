//! Bishop, rook and queen generation. Rays stop at the first piece and include
//! it when it is an enemy.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Square, SquareIter};
use crate::move_generation::legal_move_shared::push_targets;
use crate::moves::attacks::{bishop_attacks, queen_attacks, rook_attacks};
use crate::moves::chess_move::Move;

pub fn generate_bishop_moves(board: &Board, out: &mut Vec<Move>) {
    generate_slider_moves(board, PieceKind::Bishop, bishop_attacks, out);
}

pub fn generate_rook_moves(board: &Board, out: &mut Vec<Move>) {
    generate_slider_moves(board, PieceKind::Rook, rook_attacks, out);
}

pub fn generate_queen_moves(board: &Board, out: &mut Vec<Move>) {
    generate_slider_moves(board, PieceKind::Queen, queen_attacks, out);
}

fn generate_slider_moves(
    board: &Board,
    kind: PieceKind,
    attacks: fn(Square, u64) -> u64,
    out: &mut Vec<Move>,
) {
    let side = board.side_to_move();
    let own_occ = board.occupancy(side);
    let occupancy = board.occupancy_all();

    for from in SquareIter::new(board.pieces(side, kind)) {
        push_targets(board, from, attacks(from, occupancy) & !own_occ, out);
    }
}
