//! Concrete games and the closed set of engines a host can load.
//!
//! Hosts persist games as JSON blobs and only learn which game a blob holds
//! by reading its `gameType`. [`AnyEngine`] does that dispatch once so the
//! caller can submit moves without knowing the game.

pub mod chess;
pub mod yahtzee;

use log::debug;
use serde_json::Value;

use crate::core::{EngineError, GameConfig, GameState, GameStatus, GameType, Move, PlayerId};
use crate::rules::Engine;
use chess::{ChessData, ChessRules};
use yahtzee::{YahtzeeData, YahtzeeRules};

/// An engine for any supported game.
#[derive(Debug)]
pub enum AnyEngine {
    Chess(Engine<ChessRules>),
    Yahtzee(Engine<YahtzeeRules>),
}

impl AnyEngine {
    /// Fresh waiting game of the given type with its default config.
    #[must_use]
    pub fn new(game_type: GameType) -> Self {
        match game_type {
            GameType::Chess => Self::Chess(Engine::new(ChessRules::default(), GameConfig::chess())),
            GameType::Yahtzee => {
                Self::Yahtzee(Engine::new(YahtzeeRules::default(), GameConfig::yahtzee()))
            }
        }
    }

    /// Load a persisted blob using the game's default config.
    pub fn from_json(blob: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(blob)?;
        let game_type = game_type_of(&value)?;
        let config = match game_type {
            GameType::Chess => GameConfig::chess(),
            GameType::Yahtzee => GameConfig::yahtzee(),
        };
        Self::from_value(value, game_type, config)
    }

    /// Load a persisted blob with an explicit config.
    ///
    /// The config's rule switches (for example `"castling"`) shape the
    /// rules instance the state is loaded into.
    pub fn from_json_with_config(blob: &str, config: GameConfig) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(blob)?;
        let game_type = game_type_of(&value)?;
        Self::from_value(value, game_type, config)
    }

    fn from_value(value: Value, game_type: GameType, config: GameConfig) -> Result<Self, EngineError> {
        debug!("loading {} game from blob", game_type);
        match game_type {
            GameType::Chess => {
                let saved = serde_json::from_value::<GameState<ChessData>>(value)?;
                let mut engine = Engine::new(ChessRules::from_config(&config), config);
                engine.restore(saved);
                Ok(Self::Chess(engine))
            }
            GameType::Yahtzee => {
                let saved = serde_json::from_value::<GameState<YahtzeeData>>(value)?;
                let mut engine = Engine::new(YahtzeeRules::default(), config);
                engine.restore(saved);
                Ok(Self::Yahtzee(engine))
            }
        }
    }

    /// Serialize the live state.
    pub fn to_json(&self) -> Result<String, EngineError> {
        match self {
            Self::Chess(engine) => engine.snapshot_json(),
            Self::Yahtzee(engine) => engine.snapshot_json(),
        }
    }

    #[must_use]
    pub fn game_type(&self) -> GameType {
        match self {
            Self::Chess(_) => GameType::Chess,
            Self::Yahtzee(_) => GameType::Yahtzee,
        }
    }

    /// Submit a move to whichever game this is.
    pub fn submit_move(&mut self, mv: &Move) -> bool {
        match self {
            Self::Chess(engine) => engine.submit_move(mv),
            Self::Yahtzee(engine) => engine.submit_move(mv),
        }
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        match self {
            Self::Chess(engine) => engine.state().status,
            Self::Yahtzee(engine) => engine.state().status,
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<&PlayerId> {
        match self {
            Self::Chess(engine) => engine.winner(),
            Self::Yahtzee(engine) => engine.winner(),
        }
    }

    /// Id of the player whose turn it is.
    #[must_use]
    pub fn current_player_id(&self) -> Option<&PlayerId> {
        let player = match self {
            Self::Chess(engine) => engine.current_player(),
            Self::Yahtzee(engine) => engine.current_player(),
        };
        player.map(|p| &p.id)
    }
}

fn game_type_of(value: &Value) -> Result<GameType, EngineError> {
    match value.get("gameType").and_then(Value::as_str) {
        Some("chess") => Ok(GameType::Chess),
        Some("yahtzee") => Ok(GameType::Yahtzee),
        other => Err(EngineError::UnknownGameType(other.unwrap_or_default().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;
    use serde_json::json;

    #[test]
    fn test_dispatch_on_game_type() {
        let blob = json!({ "id": "c1", "gameType": "chess", "status": "playing" }).to_string();
        let engine = AnyEngine::from_json(&blob).unwrap();
        assert_eq!(engine.game_type(), GameType::Chess);
        assert_eq!(engine.status(), GameStatus::Playing);

        let blob = json!({ "id": "y1", "gameType": "yahtzee" }).to_string();
        assert_eq!(AnyEngine::from_json(&blob).unwrap().game_type(), GameType::Yahtzee);
    }

    #[test]
    fn test_unknown_game_type() {
        let blob = json!({ "id": "g", "gameType": "checkers" }).to_string();
        let err = AnyEngine::from_json(&blob).unwrap_err();
        assert!(matches!(err, EngineError::UnknownGameType(ref t) if t == "checkers"));

        let err = AnyEngine::from_json(r#"{"id":"g"}"#).unwrap_err();
        assert!(matches!(err, EngineError::UnknownGameType(_)));

        assert!(matches!(AnyEngine::from_json("not json"), Err(EngineError::Json(_))));
    }

    #[test]
    fn test_submit_through_any_engine() {
        let mut engine = AnyEngine::new(GameType::Chess);
        if let AnyEngine::Chess(inner) = &mut engine {
            inner.add_player(Player::new("w", "White"));
            inner.add_player(Player::new("b", "Black"));
            inner.start();
        }

        let e4 = Move::new("w", "move", json!({ "from": { "row": 6, "col": 4 }, "to": { "row": 4, "col": 4 } }));
        assert!(engine.submit_move(&e4));
        assert_eq!(engine.current_player_id(), Some(&PlayerId::new("b")));

        let reloaded = AnyEngine::from_json(&engine.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.to_json().unwrap(), engine.to_json().unwrap());
    }

    #[test]
    fn test_config_rules_reach_chess() {
        let blob = json!({ "id": "c", "gameType": "chess" }).to_string();
        let config = GameConfig::chess().with_rule("castling", json!("strict"));
        let AnyEngine::Chess(engine) = AnyEngine::from_json_with_config(&blob, config).unwrap() else {
            panic!("expected chess");
        };
        assert_eq!(engine.rules().options().castling, chess::CastlingMode::Strict);
    }
}
