use crate::game_state::board::Board;
use crate::game_state::chess_types::{Square, SquareIter};
use crate::moves::chess_move::{Move, MoveKind};

/// Pushes one move per target square, tagging those that land on an enemy
/// piece as captures. `targets` must already exclude friendly pieces.
#[inline]
pub fn push_targets(board: &Board, from: Square, targets: u64, out: &mut Vec<Move>) {
    let enemy_occ = board.occupancy(board.side_to_move().opposite());
    for to in SquareIter::new(targets) {
        let kind = if enemy_occ & to.bit() != 0 {
            MoveKind::Capture
        } else {
            MoveKind::Quiet
        };
        out.push(Move::new(from, to, kind));
    }
}
