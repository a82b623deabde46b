//! Move encoding.
//!
//! A [`Move`] is fully self-describing: origin, destination and one of thirteen
//! [`MoveKind`] tags. The promotion piece is derived from the tag, so it can
//! never disagree with it.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    DoublePawnPush,
    EnPassant,
    Castling,
    PromoteKnight,
    PromoteBishop,
    PromoteRook,
    PromoteQueen,
    PromoteCaptureKnight,
    PromoteCaptureBishop,
    PromoteCaptureRook,
    PromoteCaptureQueen,
}

impl MoveKind {
    /// Promotion tag for `kind`, with or without a capture.
    ///
    /// Returns `None` for kinds a pawn cannot promote to.
    pub const fn promotion(kind: PieceKind, capture: bool) -> Option<MoveKind> {
        let tag = match (kind, capture) {
            (PieceKind::Knight, false) => MoveKind::PromoteKnight,
            (PieceKind::Bishop, false) => MoveKind::PromoteBishop,
            (PieceKind::Rook, false) => MoveKind::PromoteRook,
            (PieceKind::Queen, false) => MoveKind::PromoteQueen,
            (PieceKind::Knight, true) => MoveKind::PromoteCaptureKnight,
            (PieceKind::Bishop, true) => MoveKind::PromoteCaptureBishop,
            (PieceKind::Rook, true) => MoveKind::PromoteCaptureRook,
            (PieceKind::Queen, true) => MoveKind::PromoteCaptureQueen,
            _ => return None,
        };
        Some(tag)
    }

    pub const fn promotion_kind(self) -> Option<PieceKind> {
        match self {
            MoveKind::PromoteKnight | MoveKind::PromoteCaptureKnight => Some(PieceKind::Knight),
            MoveKind::PromoteBishop | MoveKind::PromoteCaptureBishop => Some(PieceKind::Bishop),
            MoveKind::PromoteRook | MoveKind::PromoteCaptureRook => Some(PieceKind::Rook),
            MoveKind::PromoteQueen | MoveKind::PromoteCaptureQueen => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// True for every kind that removes an enemy piece, en passant included.
    pub const fn is_capture(self) -> bool {
        matches!(
            self,
            MoveKind::Capture
                | MoveKind::EnPassant
                | MoveKind::PromoteCaptureKnight
                | MoveKind::PromoteCaptureBishop
                | MoveKind::PromoteCaptureRook
                | MoveKind::PromoteCaptureQueen
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    /// Sentinel move (`a1a1`, quiet). Never generated, never applied.
    pub const NULL: Move = Move {
        from: Square::A1,
        to: Square::A1,
        kind: MoveKind::Quiet,
    };

    #[inline]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Self { from, to, kind }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.from == self.to
    }

    #[inline]
    pub const fn promotion_kind(self) -> Option<PieceKind> {
        self.kind.promotion_kind()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.kind.promotion_kind().is_some()
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.kind.is_capture()
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

/// Long algebraic form: `e2e4`, `e7e8q`, and `0000` for the null move.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}
