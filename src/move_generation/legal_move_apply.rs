//! Successor-board construction.
//!
//! `apply_move` clones the board and rewrites the clone: piece relocation,
//! captures (en passant removes the pawn beside the destination), the castling
//! rook hop, promotion, castling-right revocation, en passant target and both
//! clocks.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{castling_path_for_king_move, rights_touched_by};
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveKind};

pub fn apply_move(board: &Board, mv: Move) -> Board {
    let moving_color = board.side_to_move;
    let enemy_color = moving_color.opposite();

    let moved = board.at(mv.from).filter(|piece| piece.color == moving_color);
    debug_assert!(
        moved.is_some() && !mv.is_null(),
        "move {mv} does not start on a piece of the side to move"
    );
    let Some(moved) = moved else {
        return board.clone();
    };

    let from_mask = mv.from.bit();
    let to_mask = mv.to.bit();
    let mut next = board.clone();

    // Lift the mover.
    next.pieces[moving_color.index()][moved.kind.index()] &= !from_mask;

    // Captures.
    if mv.kind == MoveKind::EnPassant {
        let victim = Square::new(mv.from.rank(), mv.to.file());
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !victim.bit();
    } else {
        for bitboard in next.pieces[enemy_color.index()].iter_mut() {
            *bitboard &= !to_mask;
        }
    }

    // Drop the mover, or its promotion.
    let placed = mv.promotion_kind().unwrap_or(moved.kind);
    next.pieces[moving_color.index()][placed.index()] |= to_mask;

    if mv.kind == MoveKind::Castling {
        if let Some(path) = castling_path_for_king_move(mv.from, mv.to) {
            let rooks = &mut next.pieces[moving_color.index()][PieceKind::Rook.index()];
            *rooks &= !path.rook_from.bit();
            *rooks |= path.rook_to.bit();
        }
    }

    if moved.kind == PieceKind::King {
        next.castling_rights.remove(CastlingRights::both(moving_color));
    }
    next.castling_rights
        .remove(rights_touched_by(mv.from) | rights_touched_by(mv.to));

    next.en_passant_square = if mv.kind == MoveKind::DoublePawnPush {
        mv.from.offset(0, moving_color.forward())
    } else {
        None
    };

    let captured = mv.is_capture() || board.occupancy_by_color[enemy_color.index()] & to_mask != 0;
    if moved.kind == PieceKind::Pawn || captured {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.recalc_occupancy();
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Square {
        text.parse().expect("test square should parse")
    }

    fn find(board: &Board, text: &str) -> Move {
        board
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_string() == text)
            .expect("move should be legal")
    }

    #[test]
    fn double_push_sets_en_passant_target_for_one_ply() {
        let board = Board::default();
        let after = apply_move(&board, find(&board, "e2e4"));
        assert_eq!(after.en_passant_square(), Some(sq("e3")));
        assert_eq!(after.side_to_move(), Color::Black);
        assert_eq!(after.fullmove_number(), 1);

        let reply = apply_move(&after, find(&after, "g8f6"));
        assert_eq!(reply.en_passant_square(), None);
        assert_eq!(reply.fullmove_number(), 2);
        assert_eq!(reply.halfmove_clock(), 1);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let board = Board::from_fen("rnbqkbnr/ppp2ppp/4p3/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .expect("FEN should parse");
        let mv = find(&board, "e5d6");
        assert_eq!(mv.kind, MoveKind::EnPassant);
        let after = apply_move(&board, mv);
        assert_eq!(after.at(sq("d5")), None);
        assert_eq!(after.at(sq("d6")), Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(after.at(sq("e5")), None);
        assert_eq!(after.halfmove_clock(), 0);
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").expect("FEN should parse");
        let after = apply_move(&board, find(&board, "e1c1"));
        assert_eq!(after.at(sq("d1")), Some(Piece::new(Color::White, PieceKind::Rook)));
        assert_eq!(after.at(sq("a1")), None);
        assert_eq!(after.at(sq("c1")), Some(Piece::new(Color::White, PieceKind::King)));
        assert!(!after.castling_rights().contains(CastlingRights::WHITE_KINGSIDE));
        assert!(after.castling_rights().contains(CastlingRights::both(Color::Black)));
        assert_eq!(after.halfmove_clock(), 4);
    }

    #[test]
    fn capturing_a_corner_rook_revokes_that_right() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let after = apply_move(&board, find(&board, "a1a8"));
        assert!(!after.castling_rights().contains(CastlingRights::WHITE_QUEENSIDE));
        assert!(!after.castling_rights().contains(CastlingRights::BLACK_QUEENSIDE));
        assert!(after.castling_rights().contains(CastlingRights::BLACK_KINGSIDE));
        assert!(after.castling_rights().contains(CastlingRights::WHITE_KINGSIDE));
    }

    #[test]
    fn promotion_substitutes_the_piece() {
        let board = Board::from_fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let after = apply_move(&board, find(&board, "a7b8n"));
        assert_eq!(after.at(sq("b8")), Some(Piece::new(Color::White, PieceKind::Knight)));
        assert_eq!(after.pieces(Color::White, PieceKind::Pawn), 0);
        assert_eq!(after.occupancy(Color::Black), sq("h8").bit());
    }
}
