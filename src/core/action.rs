//! Move representation: type tag + opaque payload.
//!
//! A move is a string tag (the "verb") plus a JSON payload. For example:
//! - `roll` with no payload
//! - `hold` with `{"index": 2}`
//! - `move` with `{"from": {"row": 6, "col": 4}, "to": {"row": 4, "col": 4}}`
//!
//! The engine doesn't interpret the tag or payload - each game parses them
//! into its own typed action and treats anything unparseable as illegal.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::player::PlayerId;

/// A single player-submitted action.
///
/// ## Example
///
/// ```
/// use serde_json::json;
/// use tabletop_engine::core::Move;
///
/// let roll = Move::new("p1", "roll", json!({}));
/// assert_eq!(roll.kind, "roll");
///
/// let hold = Move::new("p1", "hold", json!({ "index": 2 }));
/// assert_eq!(hold.data["index"], 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// The player submitting the move.
    pub player_id: PlayerId,

    /// Game-specific move tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// Game-specific payload.
    #[serde(default)]
    pub data: Value,

    /// Submission time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

impl Move {
    /// Create a move stamped with the current time.
    pub fn new(player_id: impl Into<PlayerId>, kind: impl Into<String>, data: Value) -> Self {
        Self {
            player_id: player_id.into(),
            kind: kind.into(),
            data,
            timestamp: now_millis(),
        }
    }

    /// Override the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Check the move tag.
    #[must_use]
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Parse the payload into a typed value.
    ///
    /// Returns `None` when the payload has the wrong shape.
    #[must_use]
    pub fn parse_data<T: DeserializeOwned>(&self) -> Option<T> {
        T::deserialize(&self.data).ok()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
