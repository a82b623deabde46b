//! King steps and castling.
//!
//! Castling needs the right flag, the king on its home square, the matching
//! rook on its corner, an empty path, and the king's start, transit and
//! destination squares free of attack.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::castling_paths;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_targets;
use crate::moves::attacks::king_attacks;
use crate::moves::chess_move::{Move, MoveKind};

pub fn generate_king_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let own_occ = board.occupancy(side);

    for from in SquareIter::new(board.pieces(side, PieceKind::King)) {
        push_targets(board, from, king_attacks(from) & !own_occ, out);
    }

    generate_castling_moves(board, out);
}

fn generate_castling_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let enemy = side.opposite();
    let kings = board.pieces(side, PieceKind::King);
    let rooks = board.pieces(side, PieceKind::Rook);

    for path in castling_paths(side) {
        if !board.castling_rights().contains(path.right)
            || kings & path.king_from.bit() == 0
            || rooks & path.rook_from.bit() == 0
            || board.occupancy_all() & path.empty_mask != 0
        {
            continue;
        }

        let attacked = std::iter::once(path.king_from)
            .chain(path.transit)
            .any(|square| is_square_attacked(board, square, enemy));
        if !attacked {
            out.push(Move::new(path.king_from, path.king_to, MoveKind::Castling));
        }
    }
}
