//! Yahtzee rules on top of the generic engine.
//!
//! A turn is up to three `roll` moves with `hold` toggles in between, closed
//! by one `score` move. Only `score` passes the turn.

use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::scoring::{score, Category, Scorecard};
use crate::core::{DieSource, GameRng, GameState, GameType, Move, PlayerId};
use crate::rules::{Engine, GameRules};

/// Dice per roll.
pub const DICE_COUNT: usize = 5;

/// Rolls per turn.
pub const ROLLS_PER_TURN: u8 = 3;

pub const ROLL: &str = "roll";
pub const HOLD: &str = "hold";
pub const SCORE: &str = "score";

/// Payload of a `hold` move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldPayload {
    pub index: usize,
}

/// Payload of a `score` move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePayload {
    pub category: Category,
}

/// Yahtzee game data.
///
/// `scores` is index-aligned with the engine's players. Entries are created
/// on demand, so a short or empty list is valid. Damaged arrays decode as
/// empty and are rebuilt by `repair`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahtzeeData {
    #[serde(default, deserialize_with = "crate::core::state::lenient_seq")]
    pub dice: Vec<u8>,
    #[serde(default, deserialize_with = "crate::core::state::lenient_seq")]
    pub held: Vec<bool>,
    #[serde(default = "full_rolls")]
    pub rolls_left: u8,
    #[serde(default, deserialize_with = "lenient_cards")]
    pub scores: Vec<Scorecard>,
    #[serde(default = "first_round")]
    pub round: u32,
}

/// Scorecards keep their seat positions: a malformed card becomes an empty
/// one instead of being dropped.
fn lenient_cards<'de, D>(deserializer: D) -> Result<Vec<Scorecard>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        warn!("scores is not a list, starting with empty scorecards");
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|err| {
                warn!("resetting malformed scorecard: {err}");
                Scorecard::default()
            })
        })
        .collect())
}

fn full_rolls() -> u8 {
    ROLLS_PER_TURN
}

fn first_round() -> u32 {
    1
}

impl Default for YahtzeeData {
    fn default() -> Self {
        Self {
            dice: Vec::new(),
            held: vec![false; DICE_COUNT],
            rolls_left: ROLLS_PER_TURN,
            scores: Vec::new(),
            round: 1,
        }
    }
}

impl YahtzeeData {
    /// Scorecard for a seat, if one exists yet.
    #[must_use]
    pub fn scorecard(&self, seat: usize) -> Option<&Scorecard> {
        self.scores.get(seat)
    }

    fn scorecard_mut(&mut self, seat: usize) -> &mut Scorecard {
        if self.scores.len() <= seat {
            self.scores.resize_with(seat + 1, Scorecard::default);
        }
        &mut self.scores[seat]
    }

    /// Whether `seat` may still score `category`.
    #[must_use]
    pub fn is_open(&self, seat: usize, category: Category) -> bool {
        self.scorecard(seat).map_or(true, |card| !card.is_filled(category))
    }

    fn roll_unheld(&mut self, dice: &mut dyn DieSource) {
        for (die, &held) in self.dice.iter_mut().zip(&self.held) {
            if !held {
                *die = dice.roll_die();
            }
        }
    }

    fn fresh_turn(&mut self, dice: &mut dyn DieSource) {
        self.dice = roll_all(dice);
        self.held = vec![false; DICE_COUNT];
        self.rolls_left = ROLLS_PER_TURN;
    }
}

fn roll_all(dice: &mut dyn DieSource) -> Vec<u8> {
    (0..DICE_COUNT).map(|_| dice.roll_die()).collect()
}

/// Yahtzee rules. Owns the die source used for every roll.
pub struct YahtzeeRules {
    dice: Box<dyn DieSource>,
}

impl std::fmt::Debug for YahtzeeRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahtzeeRules").finish_non_exhaustive()
    }
}

impl Default for YahtzeeRules {
    fn default() -> Self {
        Self::new(GameRng::from_entropy())
    }
}

impl YahtzeeRules {
    /// Rules rolling from the given source.
    pub fn new(dice: impl DieSource + 'static) -> Self {
        Self { dice: Box::new(dice) }
    }

    /// Rules rolling from a seeded RNG.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }

    /// Seat of the mover, when it is their turn.
    fn acting_seat(state: &GameState<YahtzeeData>, player: &PlayerId) -> Option<usize> {
        let seat = state.seat_of(player)?;
        (seat == state.current_player_index).then_some(seat)
    }
}

impl GameRules for YahtzeeRules {
    type Data = YahtzeeData;
    const GAME_TYPE: GameType = GameType::Yahtzee;

    fn initial_data(&mut self) -> YahtzeeData {
        let mut data = YahtzeeData::default();
        data.fresh_turn(self.dice.as_mut());
        data
    }

    fn is_legal(&self, state: &GameState<YahtzeeData>, mv: &Move) -> bool {
        if !state.is_playing() {
            return false;
        }
        let Some(seat) = Self::acting_seat(state, &mv.player_id) else {
            return false;
        };
        let data = &state.data;

        match mv.kind.as_str() {
            ROLL => data.rolls_left > 0,
            HOLD => mv
                .parse_data::<HoldPayload>()
                .is_some_and(|p| p.index < data.dice.len() && data.rolls_left < ROLLS_PER_TURN),
            SCORE => mv
                .parse_data::<ScorePayload>()
                .is_some_and(|p| data.is_open(seat, p.category)),
            _ => false,
        }
    }

    fn apply(&mut self, state: &mut GameState<YahtzeeData>, mv: &Move) {
        let Some(seat) = state.seat_of(&mv.player_id) else {
            return;
        };

        match mv.kind.as_str() {
            ROLL => {
                let data = &mut state.data;
                data.roll_unheld(self.dice.as_mut());
                data.rolls_left = data.rolls_left.saturating_sub(1);
                debug!("yahtzee: {} rolled {:?}", mv.player_id, data.dice);
            }
            HOLD => {
                if let Some(p) = mv.parse_data::<HoldPayload>() {
                    if let Some(held) = state.data.held.get_mut(p.index) {
                        *held = !*held;
                    }
                }
            }
            SCORE => {
                let Some(p) = mv.parse_data::<ScorePayload>() else {
                    return;
                };
                let data = &mut state.data;
                let points = score(p.category, &data.dice);
                let card = data.scorecard_mut(seat);
                card.record(p.category, points);
                let total = card.total();
                debug!("yahtzee: {} scored {} in {}", mv.player_id, points, p.category);

                data.fresh_turn(self.dice.as_mut());
                data.round += 1;
                if let Some(player) = state.players.get_mut(seat) {
                    player.score = Some(i64::from(total));
                }
            }
            _ => {}
        }
    }

    fn winner(&self, state: &GameState<YahtzeeData>) -> Option<PlayerId> {
        if state.players.is_empty() {
            return None;
        }
        let all_done = (0..state.players.len())
            .all(|seat| state.data.scorecard(seat).is_some_and(Scorecard::is_complete));
        if !all_done {
            return None;
        }

        let mut best: Option<&crate::core::Player> = None;
        for player in &state.players {
            if best.map_or(true, |b| player.score_or_zero() > b.score_or_zero()) {
                best = Some(player);
            }
        }
        best.map(|p| p.id.clone())
    }

    fn should_advance_turn(&self, mv: &Move) -> bool {
        mv.is(SCORE)
    }

    fn repair(&mut self, state: &mut GameState<YahtzeeData>) {
        let data = &mut state.data;
        if data.dice.len() != DICE_COUNT || data.dice.iter().any(|d| !(1..=6).contains(d)) {
            warn!("game {}: dice missing or invalid, rolling fresh", state.id);
            data.dice = roll_all(self.dice.as_mut());
        }
        if data.held.len() != DICE_COUNT {
            data.held = vec![false; DICE_COUNT];
        }
        if data.rolls_left > ROLLS_PER_TURN {
            data.rolls_left = ROLLS_PER_TURN;
        }
    }

    fn on_player_removed(&mut self, state: &mut GameState<YahtzeeData>, seat: usize) {
        if seat < state.data.scores.len() {
            state.data.scores.remove(seat);
        }
    }
}

/// Live turn accessors read by the bot.
impl Engine<YahtzeeRules> {
    /// Current dice faces.
    #[must_use]
    pub fn dice(&self) -> &[u8] {
        &self.data().dice
    }

    /// Held flags, index-aligned with `dice`.
    #[must_use]
    pub fn held(&self) -> &[bool] {
        &self.data().held
    }

    /// Rolls remaining this turn.
    #[must_use]
    pub fn rolls_left(&self) -> u8 {
        self.data().rolls_left
    }

    /// Scorecard of a player. Unscored players get an empty card.
    #[must_use]
    pub fn scorecard(&self, player: &PlayerId) -> Scorecard {
        self.state()
            .seat_of(player)
            .and_then(|seat| self.data().scorecard(seat))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameStatus, Player, ScriptedDice};
    use serde_json::json;

    fn engine(faces: &[u8], players: &[&str]) -> Engine<YahtzeeRules> {
        let rules = YahtzeeRules::new(ScriptedDice::new(faces.iter().copied()));
        let mut engine = Engine::with_id("y", rules, GameConfig::yahtzee());
        for id in players {
            engine.add_player(Player::new(*id, id.to_uppercase()));
        }
        engine.start();
        engine
    }

    fn roll(player: &str) -> Move {
        Move::new(player, ROLL, json!({}))
    }

    fn hold(player: &str, index: usize) -> Move {
        Move::new(player, HOLD, json!({ "index": index }))
    }

    fn score_in(player: &str, category: Category) -> Move {
        Move::new(player, SCORE, json!({ "category": category }))
    }

    #[test]
    fn test_initial_dice_rolled() {
        let engine = engine(&[1, 2, 3, 4, 5], &["a"]);
        assert_eq!(engine.dice(), &[1, 2, 3, 4, 5]);
        assert_eq!(engine.held(), &[false; 5]);
        assert_eq!(engine.rolls_left(), 3);
    }

    #[test]
    fn test_roll_decrements_and_respects_holds() {
        let mut engine = engine(&[1, 2, 3, 4, 5, 6, 6, 6, 6, 6], &["a"]);
        assert!(!engine.submit_move(&hold("a", 0)));

        assert!(engine.submit_move(&roll("a")));
        assert_eq!(engine.dice(), &[6, 6, 6, 6, 6]);
        assert_eq!(engine.rolls_left(), 2);

        assert!(engine.submit_move(&hold("a", 0)));
        assert!(engine.submit_move(&hold("a", 4)));
        assert_eq!(engine.held(), &[true, false, false, false, true]);

        assert!(engine.submit_move(&roll("a")));
        let dice = engine.dice();
        assert_eq!(dice[0], 6);
        assert_eq!(dice[4], 6);
        assert_eq!(&dice[1..4], &[1, 2, 3]);
    }

    #[test]
    fn test_hold_toggles() {
        let mut engine = engine(&[3], &["a"]);
        engine.submit_move(&roll("a"));
        engine.submit_move(&hold("a", 2));
        engine.submit_move(&hold("a", 2));
        assert_eq!(engine.held(), &[false; 5]);
        assert!(!engine.submit_move(&hold("a", 5)));
    }

    #[test]
    fn test_roll_limit() {
        let mut engine = engine(&[2], &["a"]);
        for _ in 0..3 {
            assert!(engine.submit_move(&roll("a")));
        }
        assert!(!engine.submit_move(&roll("a")));
    }

    #[test]
    fn test_score_records_and_resets() {
        let mut engine = engine(&[6], &["a", "b"]);
        engine.submit_move(&roll("a"));
        engine.submit_move(&hold("a", 1));

        assert!(engine.submit_move(&score_in("a", Category::Sixes)));
        assert_eq!(engine.scorecard(&PlayerId::new("a")).get(Category::Sixes), Some(30));
        assert_eq!(engine.state().players[0].score, Some(30));
        assert_eq!(engine.rolls_left(), 3);
        assert_eq!(engine.held(), &[false; 5]);
        assert_eq!(engine.data().round, 2);
        assert_eq!(engine.state().current_player_index, 1);
    }

    #[test]
    fn test_only_current_player_may_act() {
        let mut engine = engine(&[4], &["a", "b"]);
        assert!(!engine.submit_move(&roll("b")));
        assert!(!engine.submit_move(&roll("stranger")));
        assert!(engine.submit_move(&roll("a")));
    }

    #[test]
    fn test_filled_category_rejected() {
        let mut engine = engine(&[5], &["a"]);
        assert!(engine.submit_move(&score_in("a", Category::Fives)));
        assert!(!engine.submit_move(&score_in("a", Category::Fives)));
        assert!(engine.submit_move(&score_in("a", Category::Chance)));
    }

    #[test]
    fn test_unknown_kind_and_bad_payload_rejected() {
        let mut engine = engine(&[5], &["a"]);
        assert!(!engine.submit_move(&Move::new("a", "cheat", json!({}))));
        assert!(!engine.submit_move(&Move::new("a", SCORE, json!({ "category": "bogus" }))));
        assert!(!engine.submit_move(&Move::new("a", HOLD, json!({}))));
    }

    #[test]
    fn test_full_game_finishes_with_highest_score() {
        // Fresh turns alternate between all sixes for "a" and all ones for "b".
        let mut engine = engine(&[6, 6, 6, 6, 6, 1, 1, 1, 1, 1], &["a", "b"]);
        for (i, cat) in Category::ALL.into_iter().enumerate() {
            assert!(engine.submit_move(&score_in("a", cat)));
            if i < 12 {
                assert!(engine.submit_move(&score_in("b", cat)));
            }
        }
        assert_eq!(engine.state().status, GameStatus::Playing);
        assert!(engine.submit_move(&score_in("b", Category::Chance)));

        assert_eq!(engine.state().status, GameStatus::Finished);
        assert_eq!(engine.state().players[0].score, Some(170));
        assert_eq!(engine.state().players[1].score, Some(70));
        assert_eq!(engine.winner(), Some(&PlayerId::new("a")));
    }

    #[test]
    fn test_tie_goes_to_first_seat() {
        let mut engine = engine(&[6], &["a", "b"]);
        for cat in Category::ALL {
            engine.submit_move(&score_in("a", cat));
            engine.submit_move(&score_in("b", cat));
        }
        assert_eq!(engine.state().players[0].score, engine.state().players[1].score);
        assert_eq!(engine.winner(), Some(&PlayerId::new("a")));
    }

    #[test]
    fn test_removed_player_takes_scorecard_along() {
        let mut engine = engine(&[6], &["a", "b", "c"]);
        assert!(engine.submit_move(&score_in("a", Category::Sixes)));
        assert!(engine.submit_move(&score_in("b", Category::Chance)));
        assert_eq!(engine.data().scores.len(), 2);

        assert!(engine.remove_player(&PlayerId::new("a")));
        assert_eq!(engine.data().scores.len(), 1);
        assert_eq!(engine.scorecard(&PlayerId::new("b")).get(Category::Chance), Some(30));
        assert_eq!(engine.scorecard(&PlayerId::new("b")).get(Category::Sixes), None);
        assert_eq!(engine.scorecard(&PlayerId::new("c")).open_categories().count(), 13);

        // Seats shifted to [b, c]; the turn index 2 fell off and reset to b.
        assert_eq!(engine.state().current_player_index, 0);
        assert!(engine.submit_move(&score_in("b", Category::Sixes)));
        assert!(engine.submit_move(&score_in("c", Category::Sixes)));
    }

    #[test]
    fn test_removing_unscored_seat_keeps_cards() {
        let mut engine = engine(&[6], &["a", "b", "c"]);
        assert!(engine.submit_move(&score_in("a", Category::Sixes)));

        assert!(engine.remove_player(&PlayerId::new("c")));
        assert_eq!(engine.data().scores.len(), 1);
        assert_eq!(engine.scorecard(&PlayerId::new("a")).get(Category::Sixes), Some(30));
    }

    #[test]
    fn test_repair_fills_missing_fields() {
        let mut engine = engine(&[2], &["a"]);
        let blob = json!({
            "id": "y",
            "gameType": "yahtzee",
            "players": [{ "id": "a", "name": "A" }],
            "status": "playing",
            "data": { "rollsLeft": 2 }
        })
        .to_string();

        engine.restore_json(&blob).unwrap();
        assert_eq!(engine.dice(), &[2, 2, 2, 2, 2]);
        assert_eq!(engine.held(), &[false; 5]);
        assert_eq!(engine.rolls_left(), 2);
        assert!(engine.data().scores.is_empty());
        assert!(engine.submit_move(&score_in("a", Category::Twos)));
        assert_eq!(engine.data().scores.len(), 1);
    }
}
