//! Canonical chess-rule constants.
//!
//! Static rule literals: the standard starting position and the fixed king and
//! rook squares involved in castling.

use crate::game_state::chess_types::{CastlingRights, Color, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Geometry of one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingPath {
    pub right: CastlingRights,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub empty_mask: u64,
    /// Squares the king passes over, excluding its start.
    pub transit: [Square; 2],
}

pub const CASTLING_PATHS: [CastlingPath; 4] = [
    CastlingPath {
        right: CastlingRights::WHITE_KINGSIDE,
        king_from: Square::E1,
        king_to: Square::G1,
        rook_from: Square::H1,
        rook_to: Square::F1,
        empty_mask: Square::F1.bit() | Square::G1.bit(),
        transit: [Square::F1, Square::G1],
    },
    CastlingPath {
        right: CastlingRights::WHITE_QUEENSIDE,
        king_from: Square::E1,
        king_to: Square::C1,
        rook_from: Square::A1,
        rook_to: Square::D1,
        empty_mask: Square::B1.bit() | Square::C1.bit() | Square::D1.bit(),
        transit: [Square::D1, Square::C1],
    },
    CastlingPath {
        right: CastlingRights::BLACK_KINGSIDE,
        king_from: Square::E8,
        king_to: Square::G8,
        rook_from: Square::H8,
        rook_to: Square::F8,
        empty_mask: Square::F8.bit() | Square::G8.bit(),
        transit: [Square::F8, Square::G8],
    },
    CastlingPath {
        right: CastlingRights::BLACK_QUEENSIDE,
        king_from: Square::E8,
        king_to: Square::C8,
        rook_from: Square::A8,
        rook_to: Square::D8,
        empty_mask: Square::B8.bit() | Square::C8.bit() | Square::D8.bit(),
        transit: [Square::D8, Square::C8],
    },
];

/// Castling paths available to `color`.
pub fn castling_paths(color: Color) -> &'static [CastlingPath] {
    match color {
        Color::White => &CASTLING_PATHS[0..2],
        Color::Black => &CASTLING_PATHS[2..4],
    }
}

/// Castling path whose king move is `from -> to`, if any.
pub fn castling_path_for_king_move(from: Square, to: Square) -> Option<&'static CastlingPath> {
    CASTLING_PATHS
        .iter()
        .find(|path| path.king_from == from && path.king_to == to)
}

/// Rights lost when a piece leaves or arrives on `square`.
#[inline]
pub fn rights_touched_by(square: Square) -> CastlingRights {
    match square {
        Square::A1 => CastlingRights::WHITE_QUEENSIDE,
        Square::H1 => CastlingRights::WHITE_KINGSIDE,
        Square::E1 => CastlingRights::both(Color::White),
        Square::A8 => CastlingRights::BLACK_QUEENSIDE,
        Square::H8 => CastlingRights::BLACK_KINGSIDE,
        Square::E8 => CastlingRights::both(Color::Black),
        _ => CastlingRights::NONE,
    }
}
