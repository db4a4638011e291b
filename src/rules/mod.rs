//! Generic engine and the rules trait for game implementations.
//!
//! Games implement `GameRules` to define:
//! - Legal moves for each game state
//! - How moves modify state
//! - Win conditions and turn-advance policy
//!
//! The `Engine` calls into `GameRules` but never interprets
//! game-specific data directly.

pub mod engine;

pub use engine::{Engine, GameRules};
