//! Yahtzee rules through the generic engine.

use proptest::prelude::*;
use serde_json::json;

use tabletop_engine::core::{GameConfig, GameStatus, Move, Player, PlayerId, ScriptedDice};
use tabletop_engine::games::yahtzee::{
    score, Category, Scorecard, YahtzeeRules, HOLD, ROLL, SCORE, UPPER_BONUS,
};
use tabletop_engine::rules::Engine;

fn yahtzee(rules: YahtzeeRules, players: usize) -> Engine<YahtzeeRules> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine = Engine::with_id("yahtzee-test", rules, GameConfig::yahtzee());
    for i in 0..players {
        assert!(engine.add_player(Player::new(format!("p{i}"), format!("Player {i}"))));
    }
    assert!(engine.start());
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

// =============================================================================
// Scoring
// =============================================================================

#[test]
fn test_reference_scores() {
    let ones = [1, 1, 1, 1, 1];
    assert_eq!(score(Category::Yahtzee, &ones), 50);
    assert_eq!(score(Category::Chance, &ones), 5);
    assert_eq!(score(Category::Ones, &ones), 5);
    assert_eq!(score(Category::ThreeOfKind, &ones), 5);
    assert_eq!(score(Category::FullHouse, &ones), 0);

    let straight = [2, 3, 4, 5, 6];
    assert_eq!(score(Category::LargeStraight, &straight), 40);
    assert_eq!(score(Category::SmallStraight, &straight), 30);
    assert_eq!(score(Category::Chance, &straight), 20);

    let house = [1, 1, 2, 2, 2];
    assert_eq!(score(Category::FullHouse, &house), 25);
    assert_eq!(score(Category::Chance, &house), 8);
}

#[test]
fn test_upper_bonus_boundary() {
    let mut card = Scorecard::default();
    for (cat, value) in Category::UPPER.iter().zip([3, 6, 9, 12, 15, 18]) {
        card.record(*cat, value);
    }
    assert_eq!(card.upper_total(), 63);
    assert_eq!(card.total(), 63 + UPPER_BONUS);

    let mut short = Scorecard::default();
    for (cat, value) in Category::UPPER.iter().zip([2, 6, 9, 12, 15, 18]) {
        short.record(*cat, value);
    }
    assert_eq!(short.upper_total(), 62);
    assert_eq!(short.total(), 62);
}

// =============================================================================
// Turn flow
// =============================================================================

#[test]
fn test_scripted_turn() {
    let dice = ScriptedDice::new([1, 2, 3, 4, 6, 5, 5, 5, 5]);
    let mut engine = yahtzee(YahtzeeRules::new(dice), 2);
    assert_eq!(engine.dice(), &[1, 2, 3, 4, 6]);

    assert!(engine.submit_move(&roll("p0")));
    assert_eq!(engine.dice(), &[5, 5, 5, 5, 1]);

    for i in 0..4 {
        assert!(engine.submit_move(&hold("p0", i)));
    }
    assert!(engine.submit_move(&roll("p0")));
    assert_eq!(engine.dice(), &[5, 5, 5, 5, 2]);
    assert_eq!(engine.rolls_left(), 1);

    assert!(engine.submit_move(&score_in("p0", Category::FourOfKind)));
    assert_eq!(engine.scorecard(&PlayerId::new("p0")).get(Category::FourOfKind), Some(22));
    assert_eq!(engine.state().players[0].score, Some(22));
    assert_eq!(engine.state().current_player_index, 1);
    assert_eq!(engine.rolls_left(), 3);
}

#[test]
fn test_other_player_cannot_act() {
    let mut engine = yahtzee(YahtzeeRules::seeded(9), 3);
    assert!(!engine.submit_move(&roll("p1")));
    assert!(!engine.submit_move(&score_in("p2", Category::Chance)));
    assert!(engine.submit_move(&score_in("p0", Category::Chance)));
    assert!(engine.submit_move(&roll("p1")));
}

#[test]
fn test_solo_game_runs_thirteen_rounds() {
    let mut engine = yahtzee(YahtzeeRules::seeded(3), 1);

    for (round, cat) in Category::ALL.into_iter().enumerate() {
        assert_eq!(engine.data().round, round as u32 + 1);
        assert!(engine.submit_move(&roll("p0")));
        assert!(engine.submit_move(&score_in("p0", cat)));
    }

    assert_eq!(engine.state().status, GameStatus::Finished);
    assert_eq!(engine.winner(), Some(&PlayerId::new("p0")));
    assert!(engine.scorecard(&PlayerId::new("p0")).is_complete());
    assert!(!engine.submit_move(&roll("p0")));
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Clone, Debug)]
enum Step {
    Roll,
    Hold(usize),
    Score(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Roll),
        3 => (0..5usize).prop_map(Step::Hold),
        2 => (0..13usize).prop_map(Step::Score),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_only_scoring_passes_the_turn(seed in any::<u64>(), steps in proptest::collection::vec(step(), 1..60)) {
        let mut engine = yahtzee(YahtzeeRules::seeded(seed), 3);

        for step in steps {
            if engine.is_over() {
                break;
            }
            let before = engine.state().current_player_index;
            let actor = engine.current_player().map(|p| p.id.to_string()).unwrap_or_default();
            let (mv, is_score) = match step {
                Step::Roll => (roll(&actor), false),
                Step::Hold(i) => (hold(&actor, i), false),
                Step::Score(c) => (score_in(&actor, Category::ALL[c]), true),
            };

            let accepted = engine.submit_move(&mv);
            let after = engine.state().current_player_index;
            if engine.is_over() {
                prop_assert!(accepted && is_score);
            } else if accepted && is_score {
                prop_assert_eq!(after, (before + 1) % 3);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn prop_filled_categories_never_change(seed in any::<u64>(), picks in proptest::collection::vec(0..13usize, 1..40)) {
        let mut engine = yahtzee(YahtzeeRules::seeded(seed), 1);
        let player = PlayerId::new("p0");

        for pick in picks {
            let cat = Category::ALL[pick];
            let card_before = engine.scorecard(&player);
            let accepted = engine.submit_move(&score_in("p0", cat));
            let card_after = engine.scorecard(&player);

            prop_assert_eq!(accepted, card_before.get(cat).is_none());
            for other in Category::ALL {
                if let Some(value) = card_before.get(other) {
                    prop_assert_eq!(card_after.get(other), Some(value));
                }
            }
        }
    }

    #[test]
    fn prop_scores_within_bounds(dice in proptest::collection::vec(1u8..=6, 5)) {
        for cat in Category::ALL {
            let value = score(cat, &dice);
            prop_assert!(value <= 50, "{} scored {}", cat, value);
        }
        prop_assert_eq!(score(Category::Chance, &dice), dice.iter().map(|&d| u32::from(d)).sum::<u32>());
    }
}
