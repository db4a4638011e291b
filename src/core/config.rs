//! Game configuration.
//!
//! A `GameConfig` is fixed when an engine is constructed. Seat limits are
//! enforced by the engine; the `rules` map carries game-specific switches
//! the concrete game reads at construction (for example `"castling"` for
//! chess).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Seats available. `add_player` fails beyond this.
    pub max_players: usize,

    /// Players required before `start` succeeds.
    pub min_players: usize,

    /// Per-turn time limit in seconds. Enforced by the host, not the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,

    /// Game-specific rule switches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<FxHashMap<String, Value>>,
}

impl GameConfig {
    /// Create a config with the given seat limits.
    #[must_use]
    pub fn new(min_players: usize, max_players: usize) -> Self {
        Self {
            max_players,
            min_players,
            time_limit: None,
            rules: None,
        }
    }

    /// Two seats, white then black.
    #[must_use]
    pub fn chess() -> Self {
        Self::new(2, 2)
    }

    /// One to four players.
    #[must_use]
    pub fn yahtzee() -> Self {
        Self::new(1, 4)
    }

    /// Set the per-turn time limit.
    #[must_use]
    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Set a game-specific rule switch.
    #[must_use]
    pub fn with_rule(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rules
            .get_or_insert_with(FxHashMap::default)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a rule switch.
    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&Value> {
        self.rules.as_ref().and_then(|rules| rules.get(key))
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(1, 4)
    }
}
