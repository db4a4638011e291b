//! Error types.
//!
//! Gameplay failures are expected and frequent (a player clicks an illegal
//! square), so the engine's public contract reports them as booleans. The
//! typed errors here back the `try_*` twins and the blob codec.

use thiserror::Error;

use super::player::PlayerId;
use super::state::{GameStatus, GameType};

/// Reason a move was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game is {0:?}, not playing")]
    NotPlaying(GameStatus),
    #[error("illegal {kind} move from {player}")]
    Illegal { player: PlayerId, kind: String },
}

/// Seat management, lifecycle, and persistence failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("game is full ({0} seats)")]
    GameFull(usize),
    #[error("player {0} is already seated")]
    DuplicatePlayer(PlayerId),
    #[error("player {0} is not seated")]
    UnknownPlayer(PlayerId),
    #[error("need at least {required} players, have {present}")]
    NotEnoughPlayers { required: usize, present: usize },
    #[error("game already started")]
    AlreadyStarted,
    #[error("unknown game type {0:?}")]
    UnknownGameType(String),
    #[error("expected a {expected} game, found {found}")]
    GameTypeMismatch { expected: GameType, found: GameType },
    #[error("malformed game state: {0}")]
    Json(#[from] serde_json::Error),
}
