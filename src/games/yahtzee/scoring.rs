//! Categories, scorecards, and dice scoring.

use serde::{Deserialize, Serialize};

/// Upper-section total that earns the bonus.
pub const UPPER_BONUS_THRESHOLD: u32 = 63;

/// Bonus for reaching the upper threshold.
pub const UPPER_BONUS: u32 = 35;

pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YAHTZEE_SCORE: u32 = 50;

/// Scorecard category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfKind,
    FourOfKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// All thirteen categories in scorecard order.
    pub const ALL: [Category; 13] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfKind,
        Category::FourOfKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// The six upper-section categories.
    pub const UPPER: [Category; 6] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    /// Face counted by an upper category.
    #[must_use]
    pub const fn face(self) -> Option<u8> {
        match self {
            Category::Ones => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }

    /// Upper category for a face.
    #[must_use]
    pub const fn for_face(face: u8) -> Option<Category> {
        match face {
            1 => Some(Category::Ones),
            2 => Some(Category::Twos),
            3 => Some(Category::Threes),
            4 => Some(Category::Fours),
            5 => Some(Category::Fives),
            6 => Some(Category::Sixes),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_upper(self) -> bool {
        self.face().is_some()
    }

    /// Wire name, e.g. `threeOfKind`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Category::Ones => "ones",
            Category::Twos => "twos",
            Category::Threes => "threes",
            Category::Fours => "fours",
            Category::Fives => "fives",
            Category::Sixes => "sixes",
            Category::ThreeOfKind => "threeOfKind",
            Category::FourOfKind => "fourOfKind",
            Category::FullHouse => "fullHouse",
            Category::SmallStraight => "smallStraight",
            Category::LargeStraight => "largeStraight",
            Category::Yahtzee => "yahtzee",
            Category::Chance => "chance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Count of each face, indexed by face value (index 0 unused).
#[must_use]
pub fn face_counts(dice: &[u8]) -> [u8; 7] {
    let mut counts = [0u8; 7];
    for &d in dice {
        if (1..=6).contains(&d) {
            counts[d as usize] += 1;
        }
    }
    counts
}

fn sum(dice: &[u8]) -> u32 {
    dice.iter().map(|&d| u32::from(d)).sum()
}

/// Whether the distinct faces contain a run of `len` consecutive values.
#[must_use]
pub fn has_run(dice: &[u8], len: usize) -> bool {
    let counts = face_counts(dice);
    let mut run = 0;
    for face in 1..=6 {
        if counts[face] > 0 {
            run += 1;
            if run >= len {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Score `dice` in `category`.
#[must_use]
pub fn score(category: Category, dice: &[u8]) -> u32 {
    let counts = face_counts(dice);
    let max_count = counts.iter().copied().max().unwrap_or(0);

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.face().unwrap_or(0);
            u32::from(counts[face as usize]) * u32::from(face)
        }
        Category::ThreeOfKind if max_count >= 3 => sum(dice),
        Category::FourOfKind if max_count >= 4 => sum(dice),
        Category::FullHouse if counts.contains(&3) && counts.contains(&2) => FULL_HOUSE_SCORE,
        Category::SmallStraight if has_run(dice, 4) => SMALL_STRAIGHT_SCORE,
        Category::LargeStraight if is_large_straight(dice) => LARGE_STRAIGHT_SCORE,
        Category::Yahtzee if max_count == 5 => YAHTZEE_SCORE,
        Category::Chance => sum(dice),
        _ => 0,
    }
}

fn is_large_straight(dice: &[u8]) -> bool {
    let mut sorted = dice.to_vec();
    sorted.sort_unstable();
    sorted == [1, 2, 3, 4, 5] || sorted == [2, 3, 4, 5, 6]
}

/// One player's scorecard. Unset categories are absent on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ones: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twos: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fives: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sixes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_of_kind: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub four_of_kind: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_house: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small_straight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_straight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yahtzee: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<u32>,
}

impl Scorecard {
    fn slot(&self, category: Category) -> &Option<u32> {
        match category {
            Category::Ones => &self.ones,
            Category::Twos => &self.twos,
            Category::Threes => &self.threes,
            Category::Fours => &self.fours,
            Category::Fives => &self.fives,
            Category::Sixes => &self.sixes,
            Category::ThreeOfKind => &self.three_of_kind,
            Category::FourOfKind => &self.four_of_kind,
            Category::FullHouse => &self.full_house,
            Category::SmallStraight => &self.small_straight,
            Category::LargeStraight => &self.large_straight,
            Category::Yahtzee => &self.yahtzee,
            Category::Chance => &self.chance,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<u32> {
        match category {
            Category::Ones => &mut self.ones,
            Category::Twos => &mut self.twos,
            Category::Threes => &mut self.threes,
            Category::Fours => &mut self.fours,
            Category::Fives => &mut self.fives,
            Category::Sixes => &mut self.sixes,
            Category::ThreeOfKind => &mut self.three_of_kind,
            Category::FourOfKind => &mut self.four_of_kind,
            Category::FullHouse => &mut self.full_house,
            Category::SmallStraight => &mut self.small_straight,
            Category::LargeStraight => &mut self.large_straight,
            Category::Yahtzee => &mut self.yahtzee,
            Category::Chance => &mut self.chance,
        }
    }

    /// Recorded score, if filled.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<u32> {
        *self.slot(category)
    }

    #[must_use]
    pub fn is_filled(&self, category: Category) -> bool {
        self.slot(category).is_some()
    }

    /// Fill a category. Returns false, leaving the card untouched, when the
    /// category already has a score.
    pub fn record(&mut self, category: Category, value: u32) -> bool {
        let slot = self.slot_mut(category);
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Categories still open, in scorecard order.
    pub fn open_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|&c| !self.is_filled(c))
    }

    /// Every category has a score.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|&c| self.is_filled(c))
    }

    /// Sum of the filled upper categories.
    #[must_use]
    pub fn upper_total(&self) -> u32 {
        Category::UPPER.iter().filter_map(|&c| self.get(c)).sum()
    }

    /// Sum of the filled lower categories.
    #[must_use]
    pub fn lower_total(&self) -> u32 {
        Category::ALL
            .iter()
            .filter(|c| !c.is_upper())
            .filter_map(|&c| self.get(c))
            .sum()
    }

    #[must_use]
    pub fn has_upper_bonus(&self) -> bool {
        self.upper_total() >= UPPER_BONUS_THRESHOLD
    }

    /// Upper total, plus the bonus when earned, plus lower total.
    #[must_use]
    pub fn total(&self) -> u32 {
        let bonus = if self.has_upper_bonus() { UPPER_BONUS } else { 0 };
        self.upper_total() + bonus + self.lower_total()
    }
}

/// Score `dice` would earn in each open category.
#[must_use]
pub fn potential_scores(dice: &[u8], card: &Scorecard) -> Vec<(Category, u32)> {
    card.open_categories().map(|c| (c, score(c, dice))).collect()
}
