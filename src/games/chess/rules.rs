//! Chess rules on top of the generic engine.
//!
//! White sits in seat 0, Black in seat 1. The engine's turn rotation and the
//! board's side to move advance together because every accepted chess move
//! ends the mover's turn.

use im::Vector;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::board::{ChessBoard, ChessPiece, Color, FenError, PieceType, Position};
use super::movement::{
    can_move, castling_rook_square, castling_rook_target, has_legal_moves, is_in_check,
    leaves_king_safe, legal_destinations, CastlingMode,
};
use crate::core::{GameConfig, GameState, GameType, Move, PlayerId};
use crate::rules::{Engine, GameRules};

/// Move tag for chess moves.
pub const MOVE_KIND: &str = "move";

/// Half-moves without a capture or pawn move before the game is drawn.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

/// Chess-specific status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChessStatus {
    #[default]
    Playing,
    Check,
    Checkmate,
    Stalemate,
    Draw,
}

impl ChessStatus {
    /// No further moves are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, ChessStatus::Checkmate | ChessStatus::Stalemate | ChessStatus::Draw)
    }
}

/// A played move, as recorded in the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessMove {
    pub from: Position,
    pub to: Position,
    pub piece: ChessPiece,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_piece: Option<ChessPiece>,
    #[serde(default)]
    pub is_en_passant: bool,
    #[serde(default)]
    pub is_castling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
    #[serde(default)]
    pub notation: String,
}

/// Payload of a `move` move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    pub from: Position,
    pub to: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

/// Chess game data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessData {
    #[serde(default)]
    pub board: ChessBoard,
    #[serde(default)]
    pub current_player: Color,
    #[serde(default)]
    pub move_history: Vector<ChessMove>,
    #[serde(default)]
    pub game_status: ChessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Color>,
    #[serde(default)]
    pub half_move_clock: u32,
    #[serde(default = "first_move")]
    pub full_move_number: u32,
}

fn first_move() -> u32 {
    1
}

impl Default for ChessData {
    fn default() -> Self {
        Self {
            board: ChessBoard::initial(),
            current_player: Color::White,
            move_history: Vector::new(),
            game_status: ChessStatus::Playing,
            winner: None,
            half_move_clock: 0,
            full_move_number: 1,
        }
    }
}

impl ChessData {
    /// Position from a FEN string. Status is computed for the side to move.
    pub fn from_fen(fen: &str, castling: CastlingMode) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let board = ChessBoard::from_fen_fields(fields[0], fields[2], fields[3])?;
        let current_player = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };
        let half_move_clock = fields[4]
            .parse()
            .map_err(|_| FenError::Counter(fields[4].to_string()))?;
        let full_move_number = fields[5]
            .parse()
            .map_err(|_| FenError::Counter(fields[5].to_string()))?;

        let mut data = Self {
            board,
            current_player,
            move_history: Vector::new(),
            game_status: ChessStatus::Playing,
            winner: None,
            half_move_clock,
            full_move_number,
        };
        data.update_game_status(castling);
        Ok(data)
    }

    /// FEN string of the current position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let side = match self.current_player {
            Color::White => "w",
            Color::Black => "b",
        };
        let en_passant = self
            .board
            .en_passant_target
            .map_or_else(|| "-".to_string(), Position::to_algebraic);
        format!(
            "{} {} {} {} {} {}",
            self.board.placement_fen(),
            side,
            self.board.castling_fen(),
            en_passant,
            self.half_move_clock,
            self.full_move_number
        )
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub fn in_check(&self) -> bool {
        is_in_check(&self.board, self.current_player)
    }

    /// All legal `(from, to)` pairs for the side to move.
    #[must_use]
    pub fn legal_moves(&self, castling: CastlingMode) -> Vec<(Position, Position)> {
        self.board
            .pieces_of(self.current_player)
            .flat_map(|(from, _)| {
                legal_destinations(&self.board, from, castling)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Legal destinations for the piece on `from`. Empty unless it belongs
    /// to the side to move.
    #[must_use]
    pub fn legal_moves_from(&self, from: Position, castling: CastlingMode) -> Vec<Position> {
        match self.board.get(from) {
            Some(piece) if piece.color == self.current_player => {
                legal_destinations(&self.board, from, castling)
            }
            _ => Vec::new(),
        }
    }

    /// Recompute check/checkmate/stalemate/draw for the side to move.
    pub fn update_game_status(&mut self, castling: CastlingMode) {
        let color = self.current_player;
        let in_check = is_in_check(&self.board, color);
        let has_moves = has_legal_moves(&self.board, color, castling);

        self.winner = None;
        self.game_status = match (in_check, has_moves) {
            (true, true) => ChessStatus::Check,
            (true, false) => {
                self.winner = Some(color.opposite());
                ChessStatus::Checkmate
            }
            (false, false) => ChessStatus::Stalemate,
            (false, true) => ChessStatus::Playing,
        };

        if self.half_move_clock >= FIFTY_MOVE_LIMIT {
            self.game_status = ChessStatus::Draw;
            self.winner = None;
        }
    }

    /// Move the piece and record the move. Legality is the caller's concern.
    pub fn play(&mut self, from: Position, to: Position, promotion: Option<PieceType>) -> Option<&ChessMove> {
        let mut piece = self.board.get(from)?;
        let color = piece.color;
        let dc = to.col - from.col;

        let mut captured = self.board.get(to);
        let is_en_passant = piece.kind == PieceType::Pawn
            && dc != 0
            && captured.is_none()
            && self.board.en_passant_target == Some(to);
        let is_castling = piece.kind == PieceType::King && dc.abs() == 2;

        if is_en_passant {
            let passed = Position::new(from.row, to.col);
            captured = self.board.get(passed);
            self.board.set(passed, None);
        }

        if is_castling {
            let king_side = dc > 0;
            let rook_from = castling_rook_square(color, king_side);
            if let Some(mut rook) = self.board.get(rook_from) {
                rook.has_moved = true;
                self.board.set(rook_from, None);
                self.board.set(castling_rook_target(color, king_side), Some(rook));
            }
            self.board.castling_rights.revoke_all(color);
        }

        self.revoke_rights_for(from, piece);
        if let Some(victim) = captured {
            if victim.kind == PieceType::Rook {
                self.revoke_rook_right(to, victim.color);
            }
        }

        let promoted = if piece.kind == PieceType::Pawn && to.row == color.promotion_row() {
            let kind = promotion
                .filter(|k| k.is_promotion_target())
                .unwrap_or(PieceType::Queen);
            Some(kind)
        } else {
            None
        };

        self.board.en_passant_target = if piece.kind == PieceType::Pawn && (to.row - from.row).abs() == 2 {
            Some(Position::new((from.row + to.row) / 2, from.col))
        } else {
            None
        };

        let moved = piece;
        piece.has_moved = true;
        if let Some(kind) = promoted {
            piece.kind = kind;
        }
        self.board.set(from, None);
        self.board.set(to, Some(piece));

        let record = ChessMove {
            from,
            to,
            piece: moved,
            captured_piece: captured,
            is_en_passant,
            is_castling,
            promotion: promoted,
            notation: notation(from, to, moved, captured.is_some(), is_castling, promoted),
        };
        self.move_history.push_back(record);

        self.current_player = color.opposite();
        if captured.is_some() || moved.kind == PieceType::Pawn {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock = self.half_move_clock.saturating_add(1);
        }
        if self.current_player == Color::White {
            self.full_move_number = self.full_move_number.saturating_add(1);
        }

        self.move_history.back()
    }

    fn revoke_rights_for(&mut self, from: Position, piece: ChessPiece) {
        match piece.kind {
            PieceType::King => self.board.castling_rights.revoke_all(piece.color),
            PieceType::Rook => self.revoke_rook_right(from, piece.color),
            _ => {}
        }
    }

    fn revoke_rook_right(&mut self, square: Position, color: Color) {
        for king_side in [true, false] {
            if square == castling_rook_square(color, king_side) {
                self.board.castling_rights.revoke(color, king_side);
            }
        }
    }
}

fn notation(
    from: Position,
    to: Position,
    piece: ChessPiece,
    capture: bool,
    castling: bool,
    promotion: Option<PieceType>,
) -> String {
    if castling {
        return if to.col > from.col { "O-O" } else { "O-O-O" }.to_string();
    }

    let mut out = String::new();
    if piece.kind == PieceType::Pawn {
        if capture {
            out.push(from.file_char());
        }
    } else {
        out.push_str(piece.kind.notation_letter());
    }
    if capture {
        out.push('x');
    }
    out.push_str(&to.to_algebraic());
    if let Some(kind) = promotion {
        out.push('=');
        out.push_str(kind.notation_letter());
    }
    out
}

/// Chess rule switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessOptions {
    #[serde(default)]
    pub castling: CastlingMode,
    /// Reject moves that leave the mover's own king in check. Off by
    /// default: only per-piece movement is checked.
    #[serde(default)]
    pub king_safety: bool,
}

impl Default for ChessOptions {
    fn default() -> Self {
        Self {
            castling: CastlingMode::Permissive,
            king_safety: false,
        }
    }
}

impl ChessOptions {
    /// Read switches from `GameConfig::rules`. Unknown or malformed values
    /// keep their defaults.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let mut options = Self::default();
        if let Some(mode) = config
            .rule("castling")
            .and_then(|v| CastlingMode::deserialize(v).ok())
        {
            options.castling = mode;
        }
        if let Some(enabled) = config.rule("kingSafety").and_then(|v| v.as_bool()) {
            options.king_safety = enabled;
        }
        options
    }

    #[must_use]
    pub fn with_castling(mut self, castling: CastlingMode) -> Self {
        self.castling = castling;
        self
    }

    #[must_use]
    pub fn with_king_safety(mut self, enabled: bool) -> Self {
        self.king_safety = enabled;
        self
    }
}

/// Chess rules.
#[derive(Clone, Debug, Default)]
pub struct ChessRules {
    options: ChessOptions,
}

impl ChessRules {
    #[must_use]
    pub fn new(options: ChessOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(ChessOptions::from_config(config))
    }

    #[must_use]
    pub fn options(&self) -> &ChessOptions {
        &self.options
    }

    fn mover_color(state: &GameState<ChessData>, player: &PlayerId) -> Option<Color> {
        state.seat_of(player).and_then(Color::from_index)
    }
}

impl GameRules for ChessRules {
    type Data = ChessData;
    const GAME_TYPE: GameType = GameType::Chess;

    fn initial_data(&mut self) -> ChessData {
        ChessData::default()
    }

    fn is_legal(&self, state: &GameState<ChessData>, mv: &Move) -> bool {
        let data = &state.data;
        if !mv.is(MOVE_KIND) || data.game_status.is_terminal() {
            return false;
        }
        let Some(payload) = mv.parse_data::<MovePayload>() else {
            return false;
        };
        let (from, to) = (payload.from, payload.to);
        if !from.is_on_board() || !to.is_on_board() {
            return false;
        }

        let Some(piece) = data.board.get(from) else {
            return false;
        };
        if piece.color != data.current_player {
            return false;
        }
        if Self::mover_color(state, &mv.player_id) != Some(piece.color) {
            debug!("{} tried to move a {:?} piece", mv.player_id, piece.color);
            return false;
        }

        if !can_move(&data.board, from, to, piece, self.options.castling) {
            return false;
        }
        !self.options.king_safety || leaves_king_safe(&data.board, from, to, piece.color)
    }

    fn apply(&mut self, state: &mut GameState<ChessData>, mv: &Move) {
        let Some(payload) = mv.parse_data::<MovePayload>() else {
            return;
        };
        let data = &mut state.data;
        if let Some(record) = data.play(payload.from, payload.to, payload.promotion) {
            debug!("chess: {}", record.notation);
        }
        data.update_game_status(self.options.castling);
    }

    fn winner(&self, state: &GameState<ChessData>) -> Option<PlayerId> {
        if state.data.game_status != ChessStatus::Checkmate {
            return None;
        }
        let color = state.data.winner?;
        state.players.get(color.index()).map(|p| p.id.clone())
    }

    fn is_drawn(&self, state: &GameState<ChessData>) -> bool {
        matches!(state.data.game_status, ChessStatus::Stalemate | ChessStatus::Draw)
    }

    fn repair(&mut self, state: &mut GameState<ChessData>) {
        let seat = state.data.current_player.index();
        if seat < state.players.len() && state.current_player_index != seat {
            warn!(
                "game {}: turn index {} disagrees with side to move, using {}",
                state.id, state.current_player_index, seat
            );
            state.current_player_index = seat;
        }
    }
}

/// Position queries on a live chess game.
impl Engine<ChessRules> {
    /// All legal `(from, to)` pairs for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<(Position, Position)> {
        self.data().legal_moves(self.rules().options().castling)
    }

    /// Legal destinations for the piece on `from`.
    #[must_use]
    pub fn legal_moves_from(&self, from: Position) -> Vec<Position> {
        self.data().legal_moves_from(from, self.rules().options().castling)
    }

    /// FEN of the current position.
    #[must_use]
    pub fn fen(&self) -> String {
        self.data().to_fen()
    }
}
