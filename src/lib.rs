//! # tabletop-engine
//!
//! Turn-based game engine behind an online board-game platform.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic Core**: The engine owns seats, turn order, lifecycle,
//!    and persistence. Games plug in through `GameRules` and never touch
//!    the engine's bookkeeping.
//!
//! 2. **Moves Are Data**: A move is a tag plus a JSON payload. Games parse
//!    payloads themselves and treat anything malformed as illegal.
//!
//! 3. **Nothing Is Fatal**: Rejected moves report `false` and leave the state
//!    untouched. Corrupted blobs are repaired on restore, not refused.
//!
//! ## Architecture
//!
//! - **Closed game set**: `AnyEngine` dispatches a persisted blob to the
//!   right engine by its `gameType` tag.
//!
//! - **Injected dice**: Yahtzee rolls through a `DieSource`, so tests replay
//!   exact sequences.
//!
//! - **Host-driven bots**: The bot executor submits moves through a
//!   `TurnHost`, which applies and broadcasts them.
//!
//! ## Modules
//!
//! - `core`: Players, moves, state, configuration, dice, errors
//! - `rules`: `GameRules` trait and the generic `Engine`
//! - `games`: Chess and Yahtzee, plus `AnyEngine`
//! - `bot`: Yahtzee bot decisions and turn executor

pub mod core;
pub mod rules;
pub mod games;
pub mod bot;

// Re-export commonly used types
pub use crate::core::{
    DieSource, EngineError, GameConfig, GameRng, GameState, GameStatus, GameType, Move, MoveError,
    Player, PlayerId, ScriptedDice,
};

pub use crate::rules::{Engine, GameRules};

pub use crate::games::AnyEngine;
pub use crate::games::chess::{ChessData, ChessRules, ChessStatus};
pub use crate::games::yahtzee::{Category, Scorecard, YahtzeeData, YahtzeeRules};

pub use crate::bot::{execute_bot_turn, BotConfig, LocalHost, TurnHost};
