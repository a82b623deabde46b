//! Full legal move generation pipeline.
//!
//! Generates pseudo-legal moves piece by piece, applies each candidate and
//! drops those that leave the mover's king attacked. The simulate-and-filter
//! step is the only legality authority, so pinned pieces, discovered checks
//! and pinned en passant captures need no special rules.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};
use crate::moves::chess_move::Move;

/// A legal move paired with the position it produces.
#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub board_after: Board,
}

pub trait MoveGenerator: Send + Sync {
    /// Legal moves with their successor boards. Never fails; an empty result
    /// means checkmate or stalemate.
    fn generate_moves_with_successors(&self, board: &Board) -> Vec<GeneratedMove>;

    fn generate_legal_moves(&self, board: &Board) -> Vec<Move> {
        self.generate_moves_with_successors(board)
            .into_iter()
            .map(|generated| generated.mv)
            .collect()
    }
}

pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_moves_with_successors(&self, board: &Board) -> Vec<GeneratedMove> {
        let pseudo = generate_pseudo_legal_moves(board);
        let mover = board.side_to_move();

        let mut legal = Vec::with_capacity(pseudo.len());
        for mv in pseudo {
            let next = apply_move(board, mv);
            if is_king_in_check(&next, mover) {
                continue;
            }
            legal.push(GeneratedMove {
                mv,
                board_after: next,
            });
        }
        legal
    }

    fn generate_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mover = board.side_to_move();
        generate_pseudo_legal_moves(board)
            .into_iter()
            .filter(|&mv| !is_king_in_check(&apply_move(board, mv), mover))
            .collect()
    }
}

/// Moves that obey piece movement rules but may leave the king attacked.
pub fn generate_pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);

    generate_pawn_moves(board, &mut pseudo);
    generate_knight_moves(board, &mut pseudo);
    generate_bishop_moves(board, &mut pseudo);
    generate_rook_moves(board, &mut pseudo);
    generate_queen_moves(board, &mut pseudo);
    generate_king_moves(board, &mut pseudo);

    pseudo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::chess_move::MoveKind;

    fn legal(fen: &str) -> Vec<Move> {
        let board = Board::from_fen(fen).expect("FEN should parse");
        LegalMoveGenerator.generate_legal_moves(&board)
    }

    #[test]
    fn both_generator_paths_agree_on_startpos() {
        let board = Board::default();
        let plain = LegalMoveGenerator.generate_legal_moves(&board);
        let with_boards = LegalMoveGenerator.generate_moves_with_successors(&board);
        assert_eq!(plain.len(), 20);
        assert_eq!(plain, with_boards.iter().map(|g| g.mv).collect::<Vec<_>>());
        assert!(with_boards.iter().all(|g| g.board_after == board.do_move(g.mv)));
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        let mate = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .expect("FEN should parse");
        assert!(mate.legal_moves().is_empty());
        assert!(mate.is_in_check());

        let stalemate = Board::from_fen("k7/8/1QK5/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert!(stalemate.legal_moves().is_empty());
        assert!(!stalemate.is_in_check());
    }

    #[test]
    fn pinned_en_passant_is_rejected() {
        // Capturing on d6 would open the fifth rank to the rook on h5.
        let moves = legal("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1");
        assert!(moves.iter().all(|mv| mv.kind != MoveKind::EnPassant));
        assert!(moves.iter().any(|mv| mv.to_string() == "e5e6"));
    }

    #[test]
    fn pinned_piece_only_moves_along_the_pin() {
        let moves = legal("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1");
        assert!(moves.iter().all(|mv| mv.from.to_string() != "e2"));
    }

    #[test]
    fn check_must_be_answered() {
        // Rook check on the back rank: block, capture or step aside.
        let moves = legal("4k3/8/8/8/8/8/5PPP/r5K1 w - - 0 1");
        assert!(moves.is_empty());
        let moves = legal("4k3/8/8/8/8/8/4RPPP/r5K1 w - - 0 1");
        let texts: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
        assert_eq!(texts, vec!["e2e1"]);
    }
}
