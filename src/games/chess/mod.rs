//! Chess.
//!
//! - `board`: piece grid, coordinates, castling rights, FEN fields
//! - `movement`: per-piece legality, attacks, check and king safety
//! - `rules`: move application, status detection, `GameRules` impl
//!
//! Moves are submitted with tag `move` and payload
//! `{"from": {"row", "col"}, "to": {"row", "col"}, "promotion"?}`.

mod board;
mod movement;
mod rules;

pub use board::{CastlingRights, ChessBoard, ChessPiece, Color, FenError, PieceType, Position};
pub use movement::{
    attacks, can_move, has_legal_moves, is_in_check, is_square_attacked, leaves_king_safe,
    legal_destinations, play_on_copy, CastlingMode,
};
pub use rules::{
    ChessData, ChessMove, ChessOptions, ChessRules, ChessStatus, MovePayload, FIFTY_MOVE_LIMIT,
    MOVE_KIND,
};
