//! Attack bitboards for every piece kind.
//!
//! Leaper tables (knight, king, pawn) are built at compile time. Slider attacks
//! trace rays against the current occupancy and include the first blocker, so
//! callers mask out their own pieces afterwards.

use crate::game_state::chess_types::{Color, Square};

pub const KNIGHT_ATTACKS: [u64; 64] = leaper_table(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);

pub const KING_ATTACKS: [u64; 64] = leaper_table(&[
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
]);

const WHITE_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, 1), (1, 1)]);
const BLACK_PAWN_ATTACKS: [u64; 64] = leaper_table(&[(-1, -1), (1, -1)]);

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square.index() as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square.index() as usize]
}

/// Squares a pawn of `color` standing on `square` attacks.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square.index() as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square.index() as usize],
    }
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    slide(square, &BISHOP_DIRECTIONS, occupancy)
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    slide(square, &ROOK_DIRECTIONS, occupancy)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

fn slide(square: Square, directions: &[(i8, i8)], occupancy: u64) -> u64 {
    let mut attacks = 0u64;
    for &(file_step, rank_step) in directions {
        let mut cursor = square;
        while let Some(next) = cursor.offset(file_step, rank_step) {
            attacks |= next.bit();
            if occupancy & next.bit() != 0 {
                break;
            }
            cursor = next;
        }
    }
    attacks
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut attacks = 0u64;
        let mut i = 0usize;

        while i < deltas.len() {
            let (df, dr) = deltas[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                attacks |= 1u64 << (r as usize * 8 + f as usize);
            }
            i += 1;
        }

        table[sq] = attacks;
        sq += 1;
    }

    table
}
