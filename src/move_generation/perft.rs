//! Perft: exhaustive legal-move tree counting for generator validation.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::{GeneratedMove, MoveGenerator};
use crate::moves::chess_move::{Move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf statistics `depth` plies below `board`.
pub fn perft<G: MoveGenerator>(generator: &G, board: &Board, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for child in generator.generate_moves_with_successors(board) {
        perft_recurse(generator, &child, depth, 1, &mut total);
    }
    total
}

/// Leaf node count only. Skips successor bookkeeping at the last ply.
pub fn perft_nodes<G: MoveGenerator>(generator: &G, board: &Board, depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => generator.generate_legal_moves(board).len() as u64,
        _ => generator
            .generate_moves_with_successors(board)
            .iter()
            .map(|child| perft_nodes(generator, &child.board_after, depth - 1))
            .sum(),
    }
}

/// Leaf node count below each root move, in generation order.
pub fn perft_divide<G: MoveGenerator>(generator: &G, board: &Board, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    generator
        .generate_moves_with_successors(board)
        .into_iter()
        .map(|child| (child.mv, perft_nodes(generator, &child.board_after, depth - 1)))
        .collect()
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    child: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) {
    if current_depth == search_depth {
        counts.merge(leaf_counts(generator, child));
        return;
    }

    for grandchild in generator.generate_moves_with_successors(&child.board_after) {
        perft_recurse(generator, &grandchild, search_depth, current_depth + 1, counts);
    }
}

fn leaf_counts<G: MoveGenerator>(generator: &G, child: &GeneratedMove) -> PerftCounts {
    let mv = child.mv;
    let gives_check = child.board_after.is_in_check();
    let is_checkmate =
        gives_check && generator.generate_legal_moves(&child.board_after).is_empty();

    PerftCounts {
        nodes: 1,
        captures: u64::from(mv.is_capture()),
        en_passant: u64::from(mv.kind == MoveKind::EnPassant),
        castles: u64::from(mv.kind == MoveKind::Castling),
        promotions: u64::from(mv.is_promotion()),
        checks: u64::from(gives_check),
        checkmates: u64::from(is_checkmate),
    }
}
