//! Generic turn engine and the rules trait games implement.
//!
//! `Engine` owns seats, turn order, and lifecycle status. Everything that
//! depends on *which* game is being played goes through `GameRules`:
//! - What the initial game data looks like
//! - Whether a move is legal
//! - How a move changes the game data
//! - Who has won, if anyone
//! - Whether a move ends the mover's turn

use std::fmt::Debug;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{
    now_millis, EngineError, GameConfig, GameState, GameStatus, GameType, Move, MoveError, Player,
    PlayerId,
};

/// Rules trait.
///
/// Games implement this trait to define their rules. The engine calls
/// these methods from `submit_move`; it never inspects `Data` itself.
///
/// ## Implementation Notes
///
/// - `is_legal`: Treat an unparseable payload as illegal, never panic
/// - `apply`: Only called after `is_legal` returned true
/// - `winner`: Return `None` while the game continues
/// - `should_advance_turn`: Defaults to advancing after every move
/// - `on_player_removed`: Keep per-seat data aligned with `players`
pub trait GameRules {
    /// Game-specific state stored in `GameState::data`.
    type Data: Clone + Debug + Default + Serialize + DeserializeOwned;

    /// Tag written to `GameState::game_type`.
    const GAME_TYPE: GameType;

    /// Data for a freshly created game.
    fn initial_data(&mut self) -> Self::Data;

    /// Check a move against the current state.
    fn is_legal(&self, state: &GameState<Self::Data>, mv: &Move) -> bool;

    /// Apply a legal move. May update player scores as well as `data`.
    fn apply(&mut self, state: &mut GameState<Self::Data>, mv: &Move);

    /// Winner, if the game has been won.
    fn winner(&self, state: &GameState<Self::Data>) -> Option<PlayerId>;

    /// Whether the game has ended without a winner.
    fn is_drawn(&self, _state: &GameState<Self::Data>) -> bool {
        false
    }

    /// Whether the turn passes to the next player after `mv`.
    fn should_advance_turn(&self, _mv: &Move) -> bool {
        true
    }

    /// Fill in defaults after restoring a persisted state.
    fn repair(&mut self, _state: &mut GameState<Self::Data>) {}

    /// Drop per-seat data after the player at `seat` left. Called once the
    /// player is gone from `state.players`.
    fn on_player_removed(&mut self, _state: &mut GameState<Self::Data>, _seat: usize) {}
}

/// Turn-based game engine.
///
/// One engine instance is driven by one caller at a time; callers that share
/// a game across tasks serialize access themselves.
///
/// ## Example
///
/// ```
/// use serde_json::json;
/// use tabletop_engine::core::{GameConfig, Move, Player};
/// use tabletop_engine::games::chess::ChessRules;
/// use tabletop_engine::rules::Engine;
///
/// let mut engine = Engine::new(ChessRules::default(), GameConfig::chess());
/// engine.add_player(Player::new("w", "White"));
/// engine.add_player(Player::new("b", "Black"));
/// assert!(engine.start());
///
/// let e4 = Move::new("w", "move", json!({
///     "from": { "row": 6, "col": 4 },
///     "to": { "row": 4, "col": 4 },
/// }));
/// assert!(engine.submit_move(&e4));
/// assert_eq!(engine.state().current_player_index, 1);
/// ```
#[derive(Debug)]
pub struct Engine<G: GameRules> {
    config: GameConfig,
    rules: G,
    state: GameState<G::Data>,
}

impl<G: GameRules> Engine<G> {
    /// Create a waiting game with a generated id.
    pub fn new(rules: G, config: GameConfig) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), rules, config)
    }

    /// Create a waiting game with the given id.
    pub fn with_id(id: impl Into<String>, mut rules: G, config: GameConfig) -> Self {
        let data = rules.initial_data();
        Self {
            config,
            rules,
            state: GameState::new(id, G::GAME_TYPE, data),
        }
    }

    // === Accessors ===

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get the rules.
    #[must_use]
    pub fn rules(&self) -> &G {
        &self.rules
    }

    /// Get the live state.
    #[must_use]
    pub fn state(&self) -> &GameState<G::Data> {
        &self.state
    }

    /// Get the game-specific data.
    #[must_use]
    pub fn data(&self) -> &G::Data {
        &self.state.data
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.state.current_player()
    }

    /// Check if the game has finished.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.status == GameStatus::Finished
    }

    /// Winner, once the game has finished with one.
    #[must_use]
    pub fn winner(&self) -> Option<&PlayerId> {
        self.state.winner.as_ref()
    }

    // === Seats ===

    /// Seat a player. Returns false when the game is full.
    pub fn add_player(&mut self, player: Player) -> bool {
        self.try_add_player(player).is_ok()
    }

    /// Seat a player.
    pub fn try_add_player(&mut self, player: Player) -> Result<(), EngineError> {
        if self.state.players.len() >= self.config.max_players {
            debug!("game {} is full, rejecting {}", self.state.id, player.id);
            return Err(EngineError::GameFull(self.config.max_players));
        }
        if self.state.seat_of(&player.id).is_some() {
            return Err(EngineError::DuplicatePlayer(player.id));
        }
        self.state.players.push(player);
        Ok(())
    }

    /// Remove a player by id. Returns false if they were not seated.
    ///
    /// When the removed seat was at or before the current turn and the turn
    /// index falls off the end, the turn resets to the first seat.
    pub fn remove_player(&mut self, player_id: &PlayerId) -> bool {
        self.try_remove_player(player_id).is_ok()
    }

    /// Remove a player by id, returning the removed seat.
    pub fn try_remove_player(&mut self, player_id: &PlayerId) -> Result<Player, EngineError> {
        let Some(index) = self.state.seat_of(player_id) else {
            return Err(EngineError::UnknownPlayer(player_id.clone()));
        };
        let removed = self.state.players.remove(index);
        self.rules.on_player_removed(&mut self.state, index);

        if index <= self.state.current_player_index
            && self.state.current_player_index >= self.state.players.len()
        {
            self.state.current_player_index = 0;
        }
        Ok(removed)
    }

    // === Lifecycle ===

    /// Start the game. Returns false without a state change when there are
    /// too few players or the game is not waiting.
    pub fn start(&mut self) -> bool {
        self.try_start().is_ok()
    }

    /// Start the game.
    pub fn try_start(&mut self) -> Result<(), EngineError> {
        if self.state.status != GameStatus::Waiting {
            return Err(EngineError::AlreadyStarted);
        }
        let present = self.state.players.len();
        if present < self.config.min_players {
            return Err(EngineError::NotEnoughPlayers {
                required: self.config.min_players,
                present,
            });
        }

        self.state.status = GameStatus::Playing;
        self.state.updated_at = now_millis();
        info!("game {} started with {} players", self.state.id, present);
        Ok(())
    }

    /// Submit a move. Returns false, with no state change, when rejected.
    pub fn submit_move(&mut self, mv: &Move) -> bool {
        match self.try_submit_move(mv) {
            Ok(()) => true,
            Err(err) => {
                debug!("game {}: {}", self.state.id, err);
                false
            }
        }
    }

    /// Submit a move.
    pub fn try_submit_move(&mut self, mv: &Move) -> Result<(), MoveError> {
        if self.state.status != GameStatus::Playing {
            return Err(MoveError::NotPlaying(self.state.status));
        }
        if !self.rules.is_legal(&self.state, mv) {
            return Err(MoveError::Illegal {
                player: mv.player_id.clone(),
                kind: mv.kind.clone(),
            });
        }

        self.rules.apply(&mut self.state, mv);
        self.state.updated_at = now_millis();
        debug!("game {}: applied {} from {}", self.state.id, mv.kind, mv.player_id);

        if let Some(winner) = self.rules.winner(&self.state) {
            info!("game {} finished, winner {}", self.state.id, winner);
            self.state.status = GameStatus::Finished;
            self.state.winner = Some(winner);
        } else if self.rules.is_drawn(&self.state) {
            info!("game {} finished without a winner", self.state.id);
            self.state.status = GameStatus::Finished;
        } else if self.rules.should_advance_turn(mv) {
            self.advance_turn();
        }
        Ok(())
    }

    fn advance_turn(&mut self) {
        let count = self.state.players.len();
        if count > 0 {
            self.state.current_player_index = (self.state.current_player_index + 1) % count;
        }
    }

    // === Persistence ===

    /// Independent copy of the state.
    #[must_use]
    pub fn snapshot(&self) -> GameState<G::Data> {
        self.state.clone()
    }

    /// Replace the state wholesale.
    ///
    /// An out-of-range turn index resets to the first seat, and the rules
    /// fill in any game data missing from the saved state.
    pub fn restore(&mut self, saved: GameState<G::Data>) {
        self.state = saved;
        if self.state.game_type != G::GAME_TYPE {
            warn!(
                "restoring a {} state into a {} engine",
                self.state.game_type,
                G::GAME_TYPE
            );
            self.state.game_type = G::GAME_TYPE;
        }
        if !self.state.players.is_empty() && self.state.current_player_index >= self.state.players.len() {
            warn!(
                "game {}: turn index {} out of range, resetting",
                self.state.id, self.state.current_player_index
            );
            self.state.current_player_index = 0;
        }
        self.rules.repair(&mut self.state);
    }

    /// Serialize the state as a JSON blob.
    pub fn snapshot_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(&self.state)?)
    }

    /// Restore from a JSON blob produced by `snapshot_json`.
    pub fn restore_json(&mut self, blob: &str) -> Result<(), EngineError> {
        let saved: GameState<G::Data> = serde_json::from_str(blob)?;
        if saved.game_type != G::GAME_TYPE {
            return Err(EngineError::GameTypeMismatch {
                expected: G::GAME_TYPE,
                found: saved.game_type,
            });
        }
        self.restore(saved);
        Ok(())
    }
}
