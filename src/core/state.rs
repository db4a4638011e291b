//! Game state shared by every game.
//!
//! ## GameState
//!
//! - Seats in turn order and the index of the player to act
//! - Lifecycle status (`waiting` → `playing` → `finished`)
//! - Winner, once decided
//! - Game-specific `data`, owned by the concrete game
//!
//! The wire shape is the persisted blob: camelCase keys, `data` nested as the
//! game's own structure.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::action::now_millis;
use super::player::{Player, PlayerId};

/// Which concrete game a state belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Chess,
    Yahtzee,
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameType::Chess => f.write_str("chess"),
            GameType::Yahtzee => f.write_str("yahtzee"),
        }
    }
}

/// Lifecycle status. Only moves forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Waiting,
    Playing,
    Finished,
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState<D> {
    pub id: String,

    pub game_type: GameType,

    /// Seats in turn order.
    #[serde(default, deserialize_with = "lenient_seq")]
    pub players: Vec<Player>,

    #[serde(default)]
    pub current_player_index: usize,

    #[serde(default)]
    pub status: GameStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,

    /// Game-specific data. The engine never inspects it.
    #[serde(default)]
    pub data: D,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub updated_at: i64,
}

impl<D> GameState<D> {
    /// Create a waiting game with no players.
    pub fn new(id: impl Into<String>, game_type: GameType, data: D) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            game_type,
            players: Vec::new(),
            current_player_index: 0,
            status: GameStatus::Waiting,
            winner: None,
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Look up a player by id.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Mutable lookup by id.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Seat index of a player.
    #[must_use]
    pub fn seat_of(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// Check if the game is in progress.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

/// Deserialize a sequence, substituting an empty one when the value is
/// missing, null, or not an array. Malformed elements are dropped.
pub(crate) fn lenient_seq<'de, De, T>(deserializer: De) -> Result<Vec<T>, De::Error>
where
    De: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            log::warn!("expected a sequence, found {other}; using an empty one");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::warn!("dropping malformed entry: {err}");
                None
            }
        })
        .collect())
}
