//! Board-to-FEN serializer, the left inverse of `parse_fen`.

use crate::game_state::board::Board;
use crate::game_state::chess_types::*;

pub fn generate_fen(board: &Board) -> String {
    let placement = generate_placement_field(board);
    let side_to_move = match board.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(board.castling_rights());
    let en_passant = board
        .en_passant_square()
        .map_or_else(|| "-".to_owned(), |square| square.to_string());

    format!(
        "{} {} {} {} {} {}",
        placement,
        side_to_move,
        castling,
        en_passant,
        board.halfmove_clock(),
        board.fullmove_number()
    )
}

fn generate_placement_field(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            match board.at(Square::new(rank, file)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    if rights.is_empty() {
        return "-".to_owned();
    }

    [
        (CastlingRights::WHITE_KINGSIDE, 'K'),
        (CastlingRights::WHITE_QUEENSIDE, 'Q'),
        (CastlingRights::BLACK_KINGSIDE, 'k'),
        (CastlingRights::BLACK_QUEENSIDE, 'q'),
    ]
    .iter()
    .filter(|(right, _)| rights.contains(*right))
    .map(|(_, ch)| *ch)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::board::Board;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trips_reference_positions() {
        for fen in [
            STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 17 42",
            "8/8/8/8/8/8/8/8 w - - 0 1",
        ] {
            let board = parse_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&board), fen);
        }
    }

    #[test]
    fn castling_field_uses_canonical_order() {
        let board = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w qkQK - 0 1").expect("FEN should parse");
        assert_eq!(board.fen(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    }

    #[test]
    fn fen_reflects_moves_played() {
        let board = Board::default();
        let e4 = board
            .legal_moves()
            .into_iter()
            .find(|mv| mv.to_string() == "e2e4")
            .expect("e2e4 should be legal");
        assert_eq!(
            board.do_move(e4).fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }
}
