//! Core engine types: players, moves, state, configuration, dice, errors.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Concrete games plug in through `rules::GameRules` rather than modifying the core.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;
pub mod error;

pub use player::{Player, PlayerId};
pub use rng::{DieSource, GameRng, ScriptedDice};
pub use config::GameConfig;
pub use action::{now_millis, Move};
pub use state::{GameState, GameStatus, GameType};
pub use error::{EngineError, MoveError};
