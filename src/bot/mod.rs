//! Yahtzee bot: decision functions and the async turn executor.

pub mod executor;
pub mod yahtzee;

pub use executor::{execute_bot_turn, BotConfig, BotTurn, LocalHost, TurnHost};
pub use yahtzee::{choose_category, decide_holds, hold_flips, priority, should_stop_rolling, DiceIndices};
