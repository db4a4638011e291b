//! Piece movement, attacks, and king safety.
//!
//! `can_move` is per-piece legality (the piece's movement pattern, path
//! blocking, capture rules, castling preconditions). It does not consider
//! whether the mover's own king ends up in check; `leaves_king_safe` answers
//! that by playing the move on a copy of the board.

use super::board::{ChessBoard, ChessPiece, Color, PieceType, Position};

/// How strictly castling is validated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastlingMode {
    /// Only the king/rook/flag/empty-path preconditions are checked. The king
    /// may castle out of, through, or into an attacked square.
    #[default]
    Permissive,
    /// Also forbids castling while in check, through an attacked square, or
    /// onto an attacked square.
    Strict,
}

/// Per-piece legality of moving `piece` from `from` to `to`.
#[must_use]
pub fn can_move(
    board: &ChessBoard,
    from: Position,
    to: Position,
    piece: ChessPiece,
    castling: CastlingMode,
) -> bool {
    if !from.is_on_board() || !to.is_on_board() || from == to {
        return false;
    }
    if board.get(to).is_some_and(|target| target.color == piece.color) {
        return false;
    }

    let dr = to.row - from.row;
    let dc = to.col - from.col;

    match piece.kind {
        PieceType::Pawn => pawn_can_move(board, from, to, piece.color),
        PieceType::Knight => is_knight_offset(dr, dc),
        PieceType::Bishop => dr.abs() == dc.abs() && path_clear(board, from, to),
        PieceType::Rook => (dr == 0 || dc == 0) && path_clear(board, from, to),
        PieceType::Queen => {
            (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && path_clear(board, from, to)
        }
        PieceType::King => {
            if dr.abs() <= 1 && dc.abs() <= 1 {
                true
            } else if dr == 0 && dc.abs() == 2 {
                can_castle(board, from, piece, dc > 0, castling)
            } else {
                false
            }
        }
    }
}

fn pawn_can_move(board: &ChessBoard, from: Position, to: Position, color: Color) -> bool {
    let dir = color.pawn_direction();
    let dr = to.row - from.row;
    let dc = to.col - from.col;

    if dc == 0 {
        if dr == dir {
            return board.is_empty(to);
        }
        if dr == 2 * dir && from.row == color.pawn_start_row() {
            return board.is_empty(from.offset(dir, 0)) && board.is_empty(to);
        }
        return false;
    }

    if dc.abs() == 1 && dr == dir {
        return match board.get(to) {
            Some(target) => target.color != color,
            None => board.en_passant_target == Some(to),
        };
    }

    false
}

#[inline]
fn is_knight_offset(dr: i32, dc: i32) -> bool {
    let (ar, ac) = (dr.abs(), dc.abs());
    (ar == 2 && ac == 1) || (ar == 1 && ac == 2)
}

/// Every square strictly between `from` and `to` is empty. `from` and `to`
/// must share a row, column, or diagonal.
fn path_clear(board: &ChessBoard, from: Position, to: Position) -> bool {
    let step_r = (to.row - from.row).signum();
    let step_c = (to.col - from.col).signum();
    if step_r == 0 && step_c == 0 {
        return false;
    }

    let mut cur = from.offset(step_r, step_c);
    while cur != to {
        if !board.is_empty(cur) {
            return false;
        }
        cur = cur.offset(step_r, step_c);
    }
    true
}

/// Square of the rook a castling king pairs with.
#[must_use]
pub fn castling_rook_square(color: Color, king_side: bool) -> Position {
    Position::new(color.back_row(), if king_side { 7 } else { 0 })
}

/// Square the rook lands on after castling.
#[must_use]
pub fn castling_rook_target(color: Color, king_side: bool) -> Position {
    Position::new(color.back_row(), if king_side { 5 } else { 3 })
}

fn can_castle(
    board: &ChessBoard,
    from: Position,
    king: ChessPiece,
    king_side: bool,
    mode: CastlingMode,
) -> bool {
    let color = king.color;
    if king.has_moved || !board.castling_rights.get(color, king_side) {
        return false;
    }

    let rook_square = castling_rook_square(color, king_side);
    if from.row != rook_square.row {
        return false;
    }
    match board.get(rook_square) {
        Some(rook) if rook.kind == PieceType::Rook && rook.color == color && !rook.has_moved => {}
        _ => return false,
    }
    if !path_clear(board, from, rook_square) {
        return false;
    }

    if mode == CastlingMode::Strict {
        let step = if king_side { 1 } else { -1 };
        let enemy = color.opposite();
        let crossed = [from, from.offset(0, step), from.offset(0, 2 * step)];
        if crossed.iter().any(|&sq| is_square_attacked(board, sq, enemy)) {
            return false;
        }
    }

    true
}

/// Whether `piece` standing on `from` attacks `target`.
///
/// Pawns attack diagonally forward; knights and kings by offset; sliding
/// pieces need a clear path.
#[must_use]
pub fn attacks(board: &ChessBoard, from: Position, piece: ChessPiece, target: Position) -> bool {
    if from == target {
        return false;
    }
    let dr = target.row - from.row;
    let dc = target.col - from.col;

    match piece.kind {
        PieceType::Pawn => dr == piece.color.pawn_direction() && dc.abs() == 1,
        PieceType::Knight => is_knight_offset(dr, dc),
        PieceType::King => dr.abs() <= 1 && dc.abs() <= 1,
        PieceType::Bishop => dr.abs() == dc.abs() && path_clear(board, from, target),
        PieceType::Rook => (dr == 0 || dc == 0) && path_clear(board, from, target),
        PieceType::Queen => {
            (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && path_clear(board, from, target)
        }
    }
}

/// Whether any piece of color `by` attacks `target`.
#[must_use]
pub fn is_square_attacked(board: &ChessBoard, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, piece)| attacks(board, from, piece, target))
}

/// Whether `color`'s king is attacked. A side without a king is never in check.
#[must_use]
pub fn is_in_check(board: &ChessBoard, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => false,
    }
}

/// Board after moving the piece on `from` to `to`, including the pawn removed
/// by an en-passant capture and the rook moved by castling. The input board
/// is left untouched.
#[must_use]
pub fn play_on_copy(board: &ChessBoard, from: Position, to: Position) -> ChessBoard {
    let mut next = board.clone();
    let Some(piece) = board.get(from) else {
        return next;
    };

    if piece.kind == PieceType::Pawn
        && from.col != to.col
        && board.is_empty(to)
        && board.en_passant_target == Some(to)
    {
        next.set(Position::new(from.row, to.col), None);
    }
    if piece.kind == PieceType::King && (to.col - from.col).abs() == 2 {
        let king_side = to.col > from.col;
        let rook_from = castling_rook_square(piece.color, king_side);
        let rook = next.get(rook_from);
        next.set(rook_from, None);
        next.set(castling_rook_target(piece.color, king_side), rook);
    }

    next.set(to, Some(piece));
    next.set(from, None);
    next
}

/// Whether playing `from`→`to` leaves the mover's king out of check.
#[must_use]
pub fn leaves_king_safe(board: &ChessBoard, from: Position, to: Position, color: Color) -> bool {
    !is_in_check(&play_on_copy(board, from, to), color)
}

/// Destinations the piece on `from` can legally reach, king safety included.
#[must_use]
pub fn legal_destinations(board: &ChessBoard, from: Position, castling: CastlingMode) -> Vec<Position> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    Position::all()
        .filter(|&to| {
            can_move(board, from, to, piece, castling)
                && leaves_king_safe(board, from, to, piece.color)
        })
        .collect()
}

/// Whether `color` has at least one legal move.
///
/// Brute force: every own piece against every square, each candidate played
/// on a copy and checked for king safety.
#[must_use]
pub fn has_legal_moves(board: &ChessBoard, color: Color, castling: CastlingMode) -> bool {
    board.pieces_of(color).any(|(from, piece)| {
        Position::all().any(|to| {
            can_move(board, from, to, piece, castling) && leaves_king_safe(board, from, to, color)
        })
    })
}
