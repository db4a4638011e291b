//! Board representation.
//!
//! The board is an 8×8 grid of `Option<ChessPiece>` values. Row 0 is rank 8
//! (Black's back rank), row 7 is rank 1, column 0 is the a-file. Squares hold
//! values, never shared references, so copying a board yields a fully
//! independent position.

use serde::{Deserialize, Serialize};

/// Side color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Seat index: White sits first, Black second.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Color for a seat index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Color::White),
            1 => Some(Color::Black),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step.
    #[inline]
    #[must_use]
    pub const fn pawn_direction(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row pawns start on.
    #[inline]
    #[must_use]
    pub const fn pawn_start_row(self) -> i32 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row where pawns promote.
    #[inline]
    #[must_use]
    pub const fn promotion_row(self) -> i32 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row the king and rooks start on.
    #[inline]
    #[must_use]
    pub const fn back_row(self) -> i32 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

/// Piece kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Letter used in move notation (empty for pawns).
    #[must_use]
    pub const fn notation_letter(self) -> &'static str {
        match self {
            PieceType::Pawn => "",
            PieceType::Knight => "N",
            PieceType::Bishop => "B",
            PieceType::Rook => "R",
            PieceType::Queen => "Q",
            PieceType::King => "K",
        }
    }

    fn fen_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    fn from_fen_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Whether a pawn may promote to this kind.
    #[must_use]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Knight | PieceType::Bishop | PieceType::Rook | PieceType::Queen
        )
    }
}

/// A piece on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessPiece {
    #[serde(rename = "type")]
    pub kind: PieceType,
    pub color: Color,
    #[serde(default)]
    pub has_moved: bool,
}

impl ChessPiece {
    #[must_use]
    pub const fn new(kind: PieceType, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    /// FEN letter: uppercase for White.
    #[must_use]
    pub fn fen_char(self) -> char {
        let c = self.kind.fen_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// Board coordinate. Values outside `0..8` are representable so that
/// off-board input can be rejected rather than failing to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    #[inline]
    #[must_use]
    pub const fn offset(self, dr: i32, dc: i32) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Parse a square like `e4`.
    #[must_use]
    pub fn from_algebraic(square: &str) -> Option<Self> {
        let mut chars = square.chars();
        let file = chars.next()?;
        let rank = chars.next()?.to_digit(10)? as i32;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return None;
        }
        Some(Self::new(8 - rank, file as i32 - 'a' as i32))
    }

    /// Square name like `e4`. Off-board positions render as `??`.
    #[must_use]
    pub fn to_algebraic(self) -> String {
        if !self.is_on_board() {
            return "??".to_string();
        }
        let file = (b'a' + self.col as u8) as char;
        format!("{}{}", file, 8 - self.row)
    }

    /// File letter alone.
    #[must_use]
    pub fn file_char(self) -> char {
        (b'a' + self.col.clamp(0, 7) as u8) as char
    }

    /// Every square on the board, rank 8 first.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8).flat_map(|row| (0..8).map(move |col| Position::new(row, col)))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

/// Castling eligibility flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self {
            white_king_side: true,
            white_queen_side: true,
            black_king_side: true,
            black_queen_side: true,
        }
    }
}

impl CastlingRights {
    /// No castling for either side.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            white_king_side: false,
            white_queen_side: false,
            black_king_side: false,
            black_queen_side: false,
        }
    }

    #[must_use]
    pub const fn get(&self, color: Color, king_side: bool) -> bool {
        match (color, king_side) {
            (Color::White, true) => self.white_king_side,
            (Color::White, false) => self.white_queen_side,
            (Color::Black, true) => self.black_king_side,
            (Color::Black, false) => self.black_queen_side,
        }
    }

    pub fn revoke(&mut self, color: Color, king_side: bool) {
        match (color, king_side) {
            (Color::White, true) => self.white_king_side = false,
            (Color::White, false) => self.white_queen_side = false,
            (Color::Black, true) => self.black_king_side = false,
            (Color::Black, false) => self.black_queen_side = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, true);
        self.revoke(color, false);
    }

    fn to_fen(self) -> String {
        let mut out = String::new();
        if self.white_king_side {
            out.push('K');
        }
        if self.white_queen_side {
            out.push('Q');
        }
        if self.black_king_side {
            out.push('k');
        }
        if self.black_queen_side {
            out.push('q');
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}

/// Back-rank piece order from the a-file.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Chess board: piece grid plus en-passant and castling bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessBoard {
    pub pieces: [[Option<ChessPiece>; 8]; 8],
    #[serde(default)]
    pub en_passant_target: Option<Position>,
    #[serde(default)]
    pub castling_rights: CastlingRights,
}

impl Default for ChessBoard {
    fn default() -> Self {
        Self::initial()
    }
}

impl ChessBoard {
    /// Board with no pieces and no castling rights.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pieces: [[None; 8]; 8],
            en_passant_target: None,
            castling_rights: CastlingRights::none(),
        }
    }

    /// Standard starting position.
    #[must_use]
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for (col, kind) in BACK_RANK.iter().enumerate() {
            board.pieces[0][col] = Some(ChessPiece::new(*kind, Color::Black));
            board.pieces[1][col] = Some(ChessPiece::new(PieceType::Pawn, Color::Black));
            board.pieces[6][col] = Some(ChessPiece::new(PieceType::Pawn, Color::White));
            board.pieces[7][col] = Some(ChessPiece::new(*kind, Color::White));
        }
        board.castling_rights = CastlingRights::default();
        board
    }

    /// Piece on a square. Off-board squares are empty.
    #[inline]
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<ChessPiece> {
        if pos.is_on_board() {
            self.pieces[pos.row as usize][pos.col as usize]
        } else {
            None
        }
    }

    /// Place or clear a square. Off-board writes are ignored.
    #[inline]
    pub fn set(&mut self, pos: Position, piece: Option<ChessPiece>) {
        if pos.is_on_board() {
            self.pieces[pos.row as usize][pos.col as usize] = piece;
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Square of the given side's king.
    #[must_use]
    pub fn find_king(&self, color: Color) -> Option<Position> {
        Position::all().find(|&pos| {
            self.get(pos)
                .is_some_and(|p| p.kind == PieceType::King && p.color == color)
        })
    }

    /// Squares occupied by the given side.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, ChessPiece)> + '_ {
        Position::all().filter_map(move |pos| {
            self.get(pos)
                .filter(|p| p.color == color)
                .map(|p| (pos, p))
        })
    }

    /// Piece-placement field of a FEN string.
    #[must_use]
    pub fn placement_fen(&self) -> String {
        let mut out = String::new();
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.pieces[row][col] {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if row < 7 {
                out.push('/');
            }
        }
        out
    }

    /// Castling field of a FEN string.
    #[must_use]
    pub fn castling_fen(&self) -> String {
        self.castling_rights.to_fen()
    }

    /// Parse the placement, castling, and en-passant fields of a FEN string.
    ///
    /// Kings and rooks on their home squares keep `has_moved == false` only
    /// while a matching castling right remains; pawns off their start row are
    /// marked as moved.
    pub fn from_fen_fields(
        placement: &str,
        castling: &str,
        en_passant: &str,
    ) -> Result<Self, FenError> {
        let mut board = Self::empty();

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::Placement(placement.to_string()));
        }
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0usize;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    continue;
                }
                let kind = PieceType::from_fen_char(c)
                    .ok_or_else(|| FenError::Placement(placement.to_string()))?;
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                if col >= 8 {
                    return Err(FenError::Placement(placement.to_string()));
                }
                board.pieces[row][col] = Some(ChessPiece::new(kind, color));
                col += 1;
            }
            if col != 8 {
                return Err(FenError::Placement(placement.to_string()));
            }
        }

        let mut rights = CastlingRights::none();
        if castling != "-" {
            for c in castling.chars() {
                match c {
                    'K' => rights.white_king_side = true,
                    'Q' => rights.white_queen_side = true,
                    'k' => rights.black_king_side = true,
                    'q' => rights.black_queen_side = true,
                    _ => return Err(FenError::Castling(castling.to_string())),
                }
            }
        }
        board.castling_rights = rights;

        board.en_passant_target = match en_passant {
            "-" => None,
            square => Some(
                Position::from_algebraic(square)
                    .ok_or_else(|| FenError::EnPassant(square.to_string()))?,
            ),
        };

        for pos in Position::all() {
            let Some(mut piece) = board.get(pos) else {
                continue;
            };
            let home = piece.color.back_row();
            piece.has_moved = match piece.kind {
                PieceType::Pawn => pos.row != piece.color.pawn_start_row(),
                PieceType::King => {
                    !(pos == Position::new(home, 4)
                        && (rights.get(piece.color, true) || rights.get(piece.color, false)))
                }
                PieceType::Rook if pos == Position::new(home, 7) => !rights.get(piece.color, true),
                PieceType::Rook if pos == Position::new(home, 0) => !rights.get(piece.color, false),
                PieceType::Rook => true,
                _ => false,
            };
            board.set(pos, Some(piece));
        }

        Ok(board)
    }
}

/// FEN parsing failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 6 space-separated fields, found {0}")]
    FieldCount(usize),
    #[error("bad piece placement {0:?}")]
    Placement(String),
    #[error("bad side to move {0:?}")]
    SideToMove(String),
    #[error("bad castling field {0:?}")]
    Castling(String),
    #[error("bad en passant square {0:?}")]
    EnPassant(String),
    #[error("bad move counter {0:?}")]
    Counter(String),
}
