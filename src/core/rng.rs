//! Dice randomness.
//!
//! Games never reach for ambient randomness. Anything that rolls dice takes a
//! [`DieSource`], so tests can script exact roll sequences while live games
//! use a seeded [`GameRng`].
//!
//! ```
//! use tabletop_engine::core::{DieSource, GameRng, ScriptedDice};
//!
//! let mut rng = GameRng::new(42);
//! let face = rng.roll_die();
//! assert!((1..=6).contains(&face));
//!
//! let mut scripted = ScriptedDice::new([6, 6, 1]);
//! assert_eq!(scripted.roll_die(), 6);
//! assert_eq!(scripted.roll_die(), 6);
//! assert_eq!(scripted.roll_die(), 1);
//! assert_eq!(scripted.roll_die(), 6); // cycles
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of six-sided die faces.
pub trait DieSource: Send {
    /// Roll one die, returning a face in `1..=6`.
    fn roll_die(&mut self) -> u8;
}

/// Deterministic seedable RNG on ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }
}

impl DieSource for GameRng {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }
}

/// Replays a fixed cycle of faces. Faces outside `1..=6` are clamped.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create a scripted source. An empty script rolls ones.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().map(|f| f.clamp(1, 6)).collect(),
            cursor: 0,
        }
    }

    /// Number of faces handed out so far.
    #[must_use]
    pub fn rolls_made(&self) -> usize {
        self.cursor
    }
}

impl DieSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}

impl<T: DieSource + ?Sized> DieSource for Box<T> {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}
