use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, SquareIter};
use crate::move_generation::legal_move_shared::push_targets;
use crate::moves::attacks::knight_attacks;
use crate::moves::chess_move::Move;

pub fn generate_knight_moves(board: &Board, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let own_occ = board.occupancy(side);

    for from in SquareIter::new(board.pieces(side, PieceKind::Knight)) {
        push_targets(board, from, knight_attacks(from) & !own_occ, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::chess_move::MoveKind;

    #[test]
    fn corner_knight_has_two_targets_one_capture() {
        let board = Board::from_fen("8/8/8/8/8/1p6/2P5/N7 w - - 0 1").expect("FEN should parse");
        let mut moves = Vec::new();
        generate_knight_moves(&board, &mut moves);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to_string(), "a1b3");
        assert_eq!(moves[0].kind, MoveKind::Capture);
    }
}
