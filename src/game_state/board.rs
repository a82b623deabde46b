//! Immutable position value.
//!
//! `Board` stores piece bitboards with occupancy caches, side to move, castling
//! rights, the en passant target and both move clocks. Play never mutates a
//! board: [`Board::do_move`] returns the successor position, so search can
//! branch freely without undo bookkeeping.
//!
//! The `put`/`remove`/`set_*` methods exist for building puzzle and test
//! positions on an owned value; they accept any arrangement, including boards
//! with zero or several kings.

use std::fmt;
use std::str::FromStr;

use crate::errors::ParseFenError;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{LegalMoveGenerator, MoveGenerator};
use crate::moves::chess_move::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::render_game_state::render_game_state;

const RANK_1: u64 = 0x0000_0000_0000_00FF;
const RANK_2: u64 = RANK_1 << 8;
const RANK_7: u64 = RANK_1 << 48;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    // [color][piece_kind]
    pub(crate) pieces: [[u64; 6]; 2],

    // Occupancy caches, kept in sync by `recalc_occupancy`.
    pub(crate) occupancy_by_color: [u64; 2],
    pub(crate) occupancy_all: u64,

    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Self {
        let back_rank = |rank: u64, shift: u32| -> [u64; 6] {
            [
                0,
                (rank & 0x42) << shift,
                (rank & 0x24) << shift,
                (rank & 0x81) << shift,
                (rank & 0x08) << shift,
                (rank & 0x10) << shift,
            ]
        };

        let mut white = back_rank(RANK_1, 0);
        white[PieceKind::Pawn.index()] = RANK_2;
        let mut black = back_rank(RANK_1, 56);
        black[PieceKind::Pawn.index()] = RANK_7;

        let mut board = Self {
            pieces: [white, black],
            castling_rights: CastlingRights::ALL,
            ..Self::empty()
        };
        board.recalc_occupancy();
        board
    }
}

impl Board {
    /// Board with no pieces, white to move, no castling rights and no en
    /// passant target.
    pub fn empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, ParseFenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn fen(&self) -> String {
        generate_fen(self)
    }

    /// Piece standing on `square`, if any.
    pub fn at(&self, square: Square) -> Option<Piece> {
        let mask = square.bit();
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in Color::ALL {
            if self.occupancy_by_color[color.index()] & mask == 0 {
                continue;
            }
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(color, kind));
                }
            }
        }
        None
    }

    /// Successor position after `mv`.
    ///
    /// `mv` must come from [`Board::legal_moves`] on this exact board. Other
    /// moves trip a debug assertion and otherwise give an unspecified board.
    #[inline]
    pub fn do_move(&self, mv: Move) -> Board {
        apply_move(self, mv)
    }

    /// True when any king of the side to move is attacked. A side without a
    /// king is never in check.
    #[inline]
    pub fn is_in_check(&self) -> bool {
        is_king_in_check(self, self.side_to_move)
    }

    #[inline]
    pub fn legal_moves(&self) -> Vec<Move> {
        LegalMoveGenerator.generate_legal_moves(self)
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Bitboard of `color`'s pieces of `kind`.
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy_by_color[color.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> u64 {
        self.occupancy_all
    }

    /// Places `piece` on `square`, replacing whatever stood there.
    pub fn put(&mut self, square: Square, piece: Piece) {
        self.clear_square(square.bit());
        self.pieces[piece.color.index()][piece.kind.index()] |= square.bit();
        self.recalc_occupancy();
    }

    /// Removes and returns the piece on `square`.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let removed = self.at(square);
        if removed.is_some() {
            self.clear_square(square.bit());
            self.recalc_occupancy();
        }
        removed
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights;
    }

    pub fn set_en_passant_square(&mut self, square: Option<Square>) {
        self.en_passant_square = square;
    }

    pub fn set_halfmove_clock(&mut self, halfmove_clock: u32) {
        self.halfmove_clock = halfmove_clock;
    }

    pub fn set_fullmove_number(&mut self, fullmove_number: u32) {
        self.fullmove_number = fullmove_number;
    }

    pub(crate) fn clear_square(&mut self, mask: u64) {
        for side in self.pieces.iter_mut() {
            for bitboard in side.iter_mut() {
                *bitboard &= !mask;
            }
        }
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in Color::ALL {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[0] | self.occupancy_by_color[1];
    }
}

impl FromStr for Board {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fen(s)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_game_state(self))
    }
}
