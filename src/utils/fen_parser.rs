//! FEN-to-Board parser.
//!
//! Builds a fully-populated board from Forsyth-Edwards Notation: piece
//! bitboards, side to move, castling rights, en passant target and clocks.

use crate::errors::ParseFenError;
use crate::game_state::board::Board;
use crate::game_state::chess_types::*;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<Board, ParseFenError> {
    let parts: Vec<&str> = fen.split_whitespace().collect();
    let &[board_part, side_part, castling_part, en_passant_part, halfmove_part, fullmove_part] =
        parts.as_slice()
    else {
        return Err(ParseFenError::FieldCount(parts.len()));
    };

    let mut board = Board::empty();

    parse_placement(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_square = parse_en_passant_square(en_passant_part)?;
    board.halfmove_clock = parse_counter(halfmove_part)
        .ok_or_else(|| ParseFenError::InvalidHalfmoveClock(halfmove_part.to_owned()))?;
    board.fullmove_number = parse_counter(fullmove_part)
        .ok_or_else(|| ParseFenError::InvalidFullmoveNumber(fullmove_part.to_owned()))?;

    board.recalc_occupancy();
    Ok(board)
}

fn parse_placement(board_part: &str, board: &mut Board) -> Result<(), ParseFenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseFenError::RankCount(ranks.len()));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut files = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ParseFenError::InvalidPiece(ch));
                }
                files += empty_count as usize;
                continue;
            }

            let piece = Piece::from_fen_char(ch).ok_or(ParseFenError::InvalidPiece(ch))?;
            if files < 8 {
                let square = Square::new(rank, files as u8);
                board.pieces[piece.color.index()][piece.kind.index()] |= square.bit();
            }
            files += 1;
        }

        if files != 8 {
            return Err(ParseFenError::RankWidth {
                rank: rank + 1,
                files,
            });
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ParseFenError> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ParseFenError::InvalidSideToMove(side_part.to_owned())),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ParseFenError> {
    if castling_part == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut rights = CastlingRights::NONE;
    for ch in castling_part.chars() {
        let right = match ch {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => return Err(ParseFenError::InvalidCastling(ch)),
        };
        rights.insert(right);
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ParseFenError> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    // Any square is kept; move generation only uses it when a victim exists.
    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|_| ParseFenError::InvalidEnPassant(en_passant_part.to_owned()))
}

/// Plain decimal digits only; `str::parse` alone would accept a leading `+`.
fn parse_counter(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::errors::ParseFenError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn parse_starting_fen() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.castling_rights(), CastlingRights::ALL);
        assert_eq!(board.en_passant_square(), None);
        assert_eq!(board.fullmove_number(), 1);
        assert_eq!(board.halfmove_clock(), 0);
        assert_eq!(board.occupancy(Color::Black).count_ones(), 16);
    }

    #[test]
    fn parse_partial_rights_and_en_passant() {
        let board = parse_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w Kq d6 0 3")
            .expect("FEN should parse");
        assert!(board.castling_rights().contains(CastlingRights::WHITE_KINGSIDE));
        assert!(board.castling_rights().contains(CastlingRights::BLACK_QUEENSIDE));
        assert!(!board.castling_rights().contains(CastlingRights::WHITE_QUEENSIDE));
        assert_eq!(board.en_passant_square(), "d6".parse().ok());
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(ParseFenError::FieldCount(4))
        );
        assert_eq!(
            parse_fen(&format!("{STARTING_POSITION_FEN} extra")),
            Err(ParseFenError::FieldCount(7))
        );
        assert_eq!(parse_fen(""), Err(ParseFenError::FieldCount(0)));
    }

    #[test]
    fn rejects_bad_placement() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8 w - - 0 1"),
            Err(ParseFenError::RankCount(7))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/7 w - - 0 1"),
            Err(ParseFenError::RankWidth { rank: 1, files: 7 })
        );
        assert_eq!(
            parse_fen("ppppppppp/8/8/8/8/8/8/8 w - - 0 1"),
            Err(ParseFenError::RankWidth { rank: 8, files: 9 })
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/X7 w - - 0 1"),
            Err(ParseFenError::InvalidPiece('X'))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/09 w - - 0 1"),
            Err(ParseFenError::InvalidPiece('0'))
        );
    }

    #[test]
    fn rejects_bad_state_fields() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(ParseFenError::InvalidSideToMove("x".to_owned()))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(ParseFenError::InvalidCastling('X'))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - z9 0 1"),
            Err(ParseFenError::InvalidEnPassant("z9".to_owned()))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - -1 1"),
            Err(ParseFenError::InvalidHalfmoveClock("-1".to_owned()))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - 0 one"),
            Err(ParseFenError::InvalidFullmoveNumber("one".to_owned()))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - +5 1"),
            Err(ParseFenError::InvalidHalfmoveClock("+5".to_owned()))
        );
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/8 w - - 0 +1"),
            Err(ParseFenError::InvalidFullmoveNumber("+1".to_owned()))
        );
    }

    #[test]
    fn accepts_en_passant_target_on_any_square() {
        let board = parse_fen("8/8/8/8/8/8/8/8 w - e4 0 1").expect("FEN should parse");
        assert_eq!(board.en_passant_square(), "e4".parse().ok());
    }

    #[test]
    fn hand_set_en_passant_target_round_trips() {
        let mut board = crate::game_state::board::Board::default();
        board.set_en_passant_square("e4".parse().ok());
        let fen = board.fen();
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1");
        assert_eq!(parse_fen(&fen), Ok(board));
    }
}
