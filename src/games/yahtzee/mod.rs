//! Yahtzee.
//!
//! - `scoring`: categories, scorecards, the score function
//! - `rules`: roll/hold/score moves and the `GameRules` impl
//!
//! Moves:
//! - `roll` with no payload
//! - `hold` with `{"index": 0..5}`, toggles one die
//! - `score` with `{"category": "fullHouse"}`, ends the turn

mod rules;
mod scoring;

pub use rules::{
    HoldPayload, ScorePayload, YahtzeeData, YahtzeeRules, DICE_COUNT, HOLD, ROLL, ROLLS_PER_TURN,
    SCORE,
};
pub use scoring::{
    face_counts, has_run, potential_scores, score, Category, Scorecard, FULL_HOUSE_SCORE,
    LARGE_STRAIGHT_SCORE, SMALL_STRAIGHT_SCORE, UPPER_BONUS, UPPER_BONUS_THRESHOLD, YAHTZEE_SCORE,
};
