//! Crate root module declarations for the Plum Core chess engine.
//!
//! Exposes the board model, move generation, search, engine and UCI
//! subsystems so the binary, tests and benches import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
}

pub mod moves {
    pub mod attacks;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod search_limits;
    pub mod time_management;
}

pub mod engines {
    pub mod engine_iterative;
    pub mod engine_trait;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}

pub use errors::{ParseFenError, ParseMoveError, ParseSquareError, UciError};
pub use game_state::board::Board;
pub use game_state::chess_types::{CastlingRights, Color, Piece, PieceKind, Square};
pub use moves::chess_move::{Move, MoveKind};
pub use search::iterative_deepening::{search, search_with, SearchConfig, SearchResult};
pub use search::search_limits::{SearchParams, StopToken};
