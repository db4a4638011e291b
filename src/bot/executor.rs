//! Drives one complete bot turn against a live Yahtzee engine.
//!
//! The executor never applies moves itself. Every move goes through
//! [`TurnHost::on_move`], whose implementor applies, persists, and broadcasts
//! it; the executor then reads dice, holds, and rolls left back from
//! [`TurnHost::engine`] before deciding the next step.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::yahtzee::{choose_category, decide_holds, hold_flips, should_stop_rolling};
use crate::core::{Move, PlayerId};
use crate::games::yahtzee::{Category, YahtzeeRules, HOLD, ROLL, SCORE};
use crate::rules::Engine;

/// Simulated thinking time between bot moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub first_roll_delay: Duration,
    pub hold_delay: Duration,
    pub reroll_delay: Duration,
    pub score_delay: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            first_roll_delay: Duration::from_millis(1000),
            hold_delay: Duration::from_millis(300),
            reroll_delay: Duration::from_millis(800),
            score_delay: Duration::from_millis(1000),
        }
    }
}

impl BotConfig {
    /// No delays.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            first_roll_delay: Duration::ZERO,
            hold_delay: Duration::ZERO,
            reroll_delay: Duration::ZERO,
            score_delay: Duration::ZERO,
        }
    }
}

/// The collaborator a bot turn runs against.
#[async_trait]
pub trait TurnHost: Send {
    /// Live engine. Read again after every `on_move`.
    fn engine(&self) -> &Engine<YahtzeeRules>;

    /// Apply, persist, and broadcast one bot move.
    async fn on_move(&mut self, mv: Move);

    /// Wait before the next move. Hosts without a timer return immediately.
    async fn think(&mut self, _delay: Duration) {}
}

/// What a bot turn submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BotTurn {
    pub rolls: u8,
    pub hold_toggles: usize,
    pub scored: Option<Category>,
}

/// Play one full turn for `bot_id`: roll, up to two re-rolls with holds, then
/// score.
///
/// Returns without submitting anything when the bot is not seated.
pub async fn execute_bot_turn<H>(host: &mut H, bot_id: &PlayerId, config: &BotConfig) -> BotTurn
where
    H: TurnHost + ?Sized,
{
    let mut turn = BotTurn::default();
    if host.engine().state().player(bot_id).is_none() {
        warn!("bot {} is not seated, skipping turn", bot_id);
        return turn;
    }

    host.think(config.first_roll_delay).await;
    if host.engine().rolls_left() > 0 {
        host.on_move(Move::new(bot_id.clone(), ROLL, json!({}))).await;
        turn.rolls += 1;
    }

    for _ in 0..2 {
        let flips = {
            let engine = host.engine();
            let rolls_left = engine.rolls_left();
            if rolls_left == 0 {
                break;
            }
            let dice = engine.dice();
            if should_stop_rolling(dice) {
                debug!("bot {} keeps {:?}", bot_id, dice);
                break;
            }
            let target = decide_holds(dice, rolls_left, &engine.scorecard(bot_id));
            debug!("bot {} dice {:?}, holding {:?}", bot_id, dice, target);
            hold_flips(engine.held(), &target)
        };

        for index in flips {
            host.think(config.hold_delay).await;
            host.on_move(Move::new(bot_id.clone(), HOLD, json!({ "index": index }))).await;
            turn.hold_toggles += 1;
        }

        host.think(config.reroll_delay).await;
        host.on_move(Move::new(bot_id.clone(), ROLL, json!({}))).await;
        turn.rolls += 1;
    }

    let choice = {
        let engine = host.engine();
        choose_category(engine.dice(), &engine.scorecard(bot_id))
    };
    let Some(category) = choice else {
        warn!("bot {} has no open category", bot_id);
        return turn;
    };

    debug!("bot {} scores {}", bot_id, category);
    host.think(config.score_delay).await;
    host.on_move(Move::new(bot_id.clone(), SCORE, json!({ "category": category }))).await;
    turn.scored = Some(category);
    turn
}

/// Host that owns its engine and applies moves directly.
#[derive(Debug)]
pub struct LocalHost {
    engine: Engine<YahtzeeRules>,
    moves: Vec<Move>,
    rejected: usize,
}

impl LocalHost {
    pub fn new(engine: Engine<YahtzeeRules>) -> Self {
        Self {
            engine,
            moves: Vec::new(),
            rejected: 0,
        }
    }

    pub fn engine_mut(&mut self) -> &mut Engine<YahtzeeRules> {
        &mut self.engine
    }

    #[must_use]
    pub fn into_engine(self) -> Engine<YahtzeeRules> {
        self.engine
    }

    /// Every move received, accepted or not.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Count of moves the engine rejected.
    #[must_use]
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[async_trait]
impl TurnHost for LocalHost {
    fn engine(&self) -> &Engine<YahtzeeRules> {
        &self.engine
    }

    async fn on_move(&mut self, mv: Move) {
        if !self.engine.submit_move(&mv) {
            warn!("bot move {} from {} rejected", mv.kind, mv.player_id);
            self.rejected += 1;
        }
        self.moves.push(mv);
    }
}
