//! Pluggable board evaluation interfaces and baseline implementations.
//!
//! Search stays modular by delegating static position scoring to this trait,
//! so heuristics can be swapped without touching search code.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;

/// Score of being mated at the root. Mate found `n` plies away scores
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 30000;
pub const DRAW_SCORE: i32 = 0;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, board: &Board) -> i32;
}

/// Plain material count: P=100 N=300 B=300 R=500 Q=900.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 300,
            PieceKind::Bishop => 300,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    #[inline]
    fn material_balance_white_minus_black(board: &Board) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|&piece| {
                let white = board.pieces(Color::White, piece).count_ones() as i32;
                let black = board.pieces(Color::Black, piece).count_ones() as i32;
                (white - black) * Self::piece_value(piece)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, board: &Board) -> i32 {
        from_side_to_move(board, Self::material_balance_white_minus_black(board))
    }
}

/// Material plus piece-square bonuses: central minor pieces, advanced pawns
/// and rooks, and a sheltered king.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl PieceSquareScorer {
    fn positional_term(board: &Board) -> i32 {
        let mut score = 0i32;
        for color in Color::ALL {
            let sign = if color == Color::White { 1 } else { -1 };
            for piece in PieceKind::ALL {
                for square in SquareIter::new(board.pieces(color, piece)) {
                    score += sign * piece_square_bonus(piece, color, square);
                }
            }
        }
        score
    }
}

impl BoardScorer for PieceSquareScorer {
    fn score(&self, board: &Board) -> i32 {
        let material = MaterialScorer::material_balance_white_minus_black(board);
        let positional = Self::positional_term(board);
        from_side_to_move(board, material + positional)
    }
}

/// Runtime-selectable evaluator, as exposed by the `Evaluation` engine option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationKind {
    #[default]
    PieceSquare,
    Material,
}

impl EvaluationKind {
    pub fn from_option_value(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "pst" => Some(EvaluationKind::PieceSquare),
            "material" => Some(EvaluationKind::Material),
            _ => None,
        }
    }

    pub const fn option_value(self) -> &'static str {
        match self {
            EvaluationKind::PieceSquare => "pst",
            EvaluationKind::Material => "material",
        }
    }
}

impl BoardScorer for EvaluationKind {
    fn score(&self, board: &Board) -> i32 {
        match self {
            EvaluationKind::PieceSquare => PieceSquareScorer.score(board),
            EvaluationKind::Material => MaterialScorer.score(board),
        }
    }
}

#[inline]
fn from_side_to_move(board: &Board, white_minus_black: i32) -> i32 {
    match board.side_to_move() {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

// Castled squares beat the centre on the home rank.
const KING_HOME_RANK: [i32; 8] = [10, 15, 10, 0, 0, 5, 20, 10];

fn piece_square_bonus(piece: PieceKind, color: Color, square: Square) -> i32 {
    let file = i32::from(square.file());
    let rank = i32::from(square.rank());
    // Ranks counted from the owner's side.
    let r = match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    };
    let dist_center = (file - 3).abs().min((file - 4).abs()) + (r - 3).abs().min((r - 4).abs());
    let center_bonus = 3 - dist_center;

    match piece {
        PieceKind::Pawn => r * 8 - (2 * file - 7).abs(),
        PieceKind::Knight => center_bonus * 8 - 4,
        PieceKind::Bishop => center_bonus * 4 + r,
        PieceKind::Rook if r == 6 => 20,
        PieceKind::Rook => r * 2,
        PieceKind::Queen => center_bonus * 2,
        PieceKind::King => {
            if r == 0 {
                KING_HOME_RANK[file as usize]
            } else {
                -10 * r
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn material_scorer_reflects_side_to_move_perspective() {
        let scorer = MaterialScorer;
        assert_eq!(scorer.score(&board("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1")), 900);
        assert_eq!(scorer.score(&board("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1")), -900);
        // Queen + bishop against rook + knight.
        assert_eq!(scorer.score(&board("4k3/8/8/8/8/8/6rn/4KBQ1 w - - 0 1")), 400);
    }

    #[test]
    fn starting_position_is_balanced() {
        let start = Board::default();
        assert_eq!(MaterialScorer.score(&start), 0);
        assert_eq!(PieceSquareScorer.score(&start), 0);
    }

    #[test]
    fn piece_square_scorer_is_color_symmetric() {
        let white = board("4k3/8/8/8/3N4/8/4P3/4K3 w - - 0 1");
        let black = board("4k3/4p3/8/3n4/8/8/8/4K3 b - - 0 1");
        assert_eq!(PieceSquareScorer.score(&white), PieceSquareScorer.score(&black));
    }

    #[test]
    fn piece_square_scorer_rewards_central_knight() {
        let center = board("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1");
        let rim = board("4k3/8/8/8/8/8/N7/4K3 w - - 0 1");
        assert!(
            PieceSquareScorer.score(&center) > PieceSquareScorer.score(&rim),
            "central knight should score better"
        );
    }

    #[test]
    fn evaluation_kind_dispatches_and_parses() {
        let position = board("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1");
        assert_eq!(EvaluationKind::Material.score(&position), 300);
        assert_eq!(
            EvaluationKind::PieceSquare.score(&position),
            PieceSquareScorer.score(&position)
        );
        assert_eq!(EvaluationKind::from_option_value("PST"), Some(EvaluationKind::PieceSquare));
        assert_eq!(EvaluationKind::from_option_value("material"), Some(EvaluationKind::Material));
        assert_eq!(EvaluationKind::from_option_value("nnue"), None);
    }
}
