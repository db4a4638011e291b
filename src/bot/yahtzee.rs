//! Yahtzee bot decisions.
//!
//! Pure functions over dice and a scorecard. Nothing here looks further
//! ahead than the current roll: holds chase the strongest visible pattern,
//! and category choice is a greedy weighting of what the dice score now.
//!
//! ## Hold priorities
//!
//! After the first roll (two rolls left):
//! 1. Five of a kind: hold everything
//! 2. Four of a kind: hold the four
//! 3. Three of a kind, if its upper box or an of-a-kind box is open
//! 4. A four-long run, if a straight box is open
//! 5. Every pair
//! 6. Fives and sixes
//!
//! Before the last roll the same groups are chased harder: made full houses
//! and straights are kept whole, any three of a kind is kept, and fours join
//! the high dice.

use smallvec::SmallVec;

use crate::games::yahtzee::{face_counts, has_run, score, Category, Scorecard, UPPER_BONUS_THRESHOLD};

/// Dice indices, at most five.
pub type DiceIndices = SmallVec<[usize; 5]>;

/// Upper total from which the bonus is worth chasing.
const BONUS_CHASE_MARGIN: u32 = 20;

/// Which dice to hold before the next roll.
///
/// `rolls_left` is the count before that roll; one means the last roll.
#[must_use]
pub fn decide_holds(dice: &[u8], rolls_left: u8, card: &Scorecard) -> Vec<bool> {
    let keep = if rolls_left <= 1 {
        last_roll_holds(dice, card)
    } else {
        early_holds(dice, card)
    };

    let mut holds = vec![false; dice.len()];
    for i in keep {
        if let Some(h) = holds.get_mut(i) {
            *h = true;
        }
    }
    holds
}

/// Indices whose held flag differs from `target`.
#[must_use]
pub fn hold_flips(held: &[bool], target: &[bool]) -> DiceIndices {
    held.iter()
        .zip(target)
        .enumerate()
        .filter(|(_, (now, want))| now != want)
        .map(|(i, _)| i)
        .collect()
}

/// Whether the dice are already worth banking.
///
/// Stops on a Yahtzee, a five-long straight, a full house, or four of a kind
/// totalling at least 24.
#[must_use]
pub fn should_stop_rolling(dice: &[u8]) -> bool {
    let counts = face_counts(dice);
    let top = counts.iter().copied().max().unwrap_or(0);
    let total: u32 = dice.iter().map(|&d| u32::from(d)).sum();

    top == 5
        || has_run(dice, 5)
        || (counts.contains(&3) && counts.contains(&2))
        || (top == 4 && total >= 24)
}

/// Open category to score the dice in. `None` when the card is complete.
#[must_use]
pub fn choose_category(dice: &[u8], card: &Scorecard) -> Option<Category> {
    let mut candidates: Vec<(Category, i32, u32)> = card
        .open_categories()
        .map(|cat| {
            let points = score(cat, dice);
            (cat, priority(cat, points, card), points)
        })
        .collect();

    candidates.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));
    candidates.first().map(|&(cat, _, _)| cat)
}

/// Weighted preference for scoring `points` in `category`.
#[must_use]
pub fn priority(category: Category, points: u32, card: &Scorecard) -> i32 {
    let p = points as i32;

    if points == 0 {
        return match category {
            Category::Ones | Category::Twos => -50,
            _ => -100,
        };
    }

    match category {
        Category::Yahtzee => 1000,
        Category::LargeStraight => 500,
        Category::SmallStraight => 400,
        Category::FullHouse => 350,
        Category::FourOfKind if points >= 20 => 300 + p,
        Category::ThreeOfKind if points >= 18 => 200 + p,
        Category::Chance if points >= 20 => p + 150,
        Category::Chance if points < 15 => p - 80,
        cat if cat.is_upper() => {
            let upper = card.upper_total();
            let mut weight = p;
            if upper < UPPER_BONUS_THRESHOLD && upper + BONUS_CHASE_MARGIN >= UPPER_BONUS_THRESHOLD {
                weight += 100;
                if matches!(cat, Category::Fives | Category::Sixes) {
                    weight += 50;
                }
            }
            weight
        }
        _ => p,
    }
}

fn early_holds(dice: &[u8], card: &Scorecard) -> DiceIndices {
    let counts = face_counts(dice);
    let (face, count) = top_group(&counts);

    if count >= 4 {
        return indices_of(dice, face);
    }
    if count == 3 {
        let bankable = Category::for_face(face).is_some_and(|c| !card.is_filled(c))
            || !card.is_filled(Category::ThreeOfKind)
            || !card.is_filled(Category::FourOfKind)
            || !card.is_filled(Category::Yahtzee);
        if bankable {
            return indices_of(dice, face);
        }
    }
    if let Some(run) = run_indices(dice, 4) {
        return run;
    }

    let pairs = pair_indices(dice, &counts);
    if !pairs.is_empty() {
        return pairs;
    }
    high_dice(dice, 5)
}

fn last_roll_holds(dice: &[u8], card: &Scorecard) -> DiceIndices {
    let counts = face_counts(dice);
    let (face, count) = top_group(&counts);
    let all: DiceIndices = (0..dice.len()).collect();

    if count == 5 {
        return all;
    }
    if counts.contains(&3) && counts.contains(&2) && !card.is_filled(Category::FullHouse) {
        return all;
    }
    if !card.is_filled(Category::LargeStraight) && has_run(dice, 5) {
        return all;
    }
    if straights_open(card) {
        if let Some(run) = run_indices(dice, 4) {
            return run;
        }
    }
    if count >= 3 {
        return indices_of(dice, face);
    }

    let pairs = pair_indices(dice, &counts);
    if !pairs.is_empty() {
        return pairs;
    }
    high_dice(dice, 4)
}

/// Largest group, higher face on ties.
fn top_group(counts: &[u8; 7]) -> (u8, u8) {
    (1..=6u8)
        .map(|face| (face, counts[face as usize]))
        .max_by_key(|&(face, count)| (count, face))
        .unwrap_or((1, 0))
}

fn straights_open(card: &Scorecard) -> bool {
    !card.is_filled(Category::SmallStraight) || !card.is_filled(Category::LargeStraight)
}

fn indices_of(dice: &[u8], face: u8) -> DiceIndices {
    dice.iter()
        .enumerate()
        .filter(|&(_, &d)| d == face)
        .map(|(i, _)| i)
        .collect()
}

fn pair_indices(dice: &[u8], counts: &[u8; 7]) -> DiceIndices {
    dice.iter()
        .enumerate()
        .filter(|&(_, &d)| counts[d as usize] == 2)
        .map(|(i, _)| i)
        .collect()
}

fn high_dice(dice: &[u8], min_face: u8) -> DiceIndices {
    dice.iter()
        .enumerate()
        .filter(|&(_, &d)| d >= min_face)
        .map(|(i, _)| i)
        .collect()
}

/// One die per face of the highest run of at least `len` consecutive faces.
fn run_indices(dice: &[u8], len: usize) -> Option<DiceIndices> {
    let counts = face_counts(dice);
    let mut best: Option<(u8, u8)> = None;
    let mut start = 1u8;
    for face in 1..=6u8 {
        if counts[face as usize] == 0 {
            start = face + 1;
            continue;
        }
        if usize::from(face - start + 1) >= len {
            best = Some((start, face));
        }
    }

    let (low, high) = best?;
    let picked = (low..=high)
        .filter_map(|face| dice.iter().position(|&d| d == face))
        .collect();
    Some(picked)
}
