use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::moves::attacks::pawn_attacks;
use crate::moves::chess_move::{Move, MoveKind};

pub fn generate_pawn_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let enemy_occ = board.occupancy(side.opposite());
    let empty = !board.occupancy_all();
    let forward = side.forward();

    for from in SquareIter::new(board.pieces(side, PieceKind::Pawn)) {
        // Pushes.
        if let Some(to) = from.offset(0, forward) {
            if to.bit() & empty != 0 {
                if to.rank() == side.promotion_rank() {
                    push_promotions(from, to, false, out);
                } else {
                    out.push(Move::new(from, to, MoveKind::Quiet));

                    if from.rank() == side.pawn_start_rank() {
                        if let Some(two_step) = to.offset(0, forward) {
                            if two_step.bit() & empty != 0 {
                                out.push(Move::new(from, two_step, MoveKind::DoublePawnPush));
                            }
                        }
                    }
                }
            }
        }

        // Captures and en passant.
        for to in SquareIter::new(pawn_attacks(side, from)) {
            if to.bit() & enemy_occ != 0 {
                if to.rank() == side.promotion_rank() {
                    push_promotions(from, to, true, out);
                } else {
                    out.push(Move::new(from, to, MoveKind::Capture));
                }
            } else if board.en_passant_square() == Some(to) && has_en_passant_victim(board, from, to) {
                out.push(Move::new(from, to, MoveKind::EnPassant));
            }
        }
    }
}

fn push_promotions(from: Square, to: Square, capture: bool, out: &mut Vec<Move>) {
    for kind in PieceKind::PROMOTIONS {
        if let Some(tag) = MoveKind::promotion(kind, capture) {
            out.push(Move::new(from, to, tag));
        }
    }
}

/// A hand-set en passant target is only usable with an enemy pawn beside the
/// capturing pawn.
fn has_en_passant_victim(board: &Board, from: Square, to: Square) -> bool {
    // Only a pawn that just double-pushed can be taken: it stands on rank 5
    // (white capturing) or rank 4 (black capturing).
    let capture_rank = match board.side_to_move() {
        Color::White => 4,
        Color::Black => 3,
    };
    if from.rank() != capture_rank {
        return false;
    }
    let victim = Square::new(from.rank(), to.file());
    let enemy = board.side_to_move().opposite();
    board.pieces(enemy, PieceKind::Pawn) & victim.bit() != 0
}
