//! Dice and shuffling.
//!
//! ## Key Features
//!
//! - **Unseeded in play**: `GameRng::from_entropy` draws its seed from the OS,
//!   so live sessions are not reproducible.
//! - **Seeded in tests**: `GameRng::new(seed)` gives identical sequences.
//! - **Scriptable**: `ScriptedDice` replays fixed rolls before falling back
//!   to a `GameRng`, which lets tests and replays force doubles, jail, etc.
//!
//! ```
//! use monopoly_engine::core::{DiceSource, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.roll();
//! assert!((1..=6).contains(&roll.die1));
//! assert!((2..=12).contains(&roll.total()));
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// One throw of two six-sided dice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub die1: u8,
    pub die2: u8,
}

impl DiceRoll {
    /// Build a roll from two die faces.
    ///
    /// Faces are clamped into 1..=6 so a scripted roll can never move a
    /// player off the board arithmetic.
    #[must_use]
    pub fn new(die1: u8, die2: u8) -> Self {
        Self {
            die1: die1.clamp(1, 6),
            die2: die2.clamp(1, 6),
        }
    }

    #[must_use]
    pub fn total(self) -> u8 {
        self.die1 + self.die2
    }

    #[must_use]
    pub fn is_doubles(self) -> bool {
        self.die1 == self.die2
    }

    #[must_use]
    pub fn as_pair(self) -> [u8; 2] {
        [self.die1, self.die2]
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}][{}] = {}", self.die1, self.die2, self.total())
    }
}

/// Anything that can throw the dice for the dispatcher.
pub trait DiceSource {
    /// Throw both dice.
    fn roll(&mut self) -> DiceRoll;
}

/// ChaCha8-backed RNG for dice and deck shuffles.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create an RNG with a fixed seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed = rand::thread_rng().gen();
        Self::new(seed)
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Throw a single six-sided die.
    pub fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=6)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }
}

impl DiceSource for GameRng {
    fn roll(&mut self) -> DiceRoll {
        let die1 = self.roll_die();
        let die2 = self.roll_die();
        DiceRoll { die1, die2 }
    }
}

/// Replays queued rolls, then falls back to a seeded `GameRng`.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    queue: VecDeque<DiceRoll>,
    fallback: GameRng,
}

impl ScriptedDice {
    /// Queue the given `(die1, die2)` pairs.
    pub fn new(rolls: impl IntoIterator<Item = (u8, u8)>) -> Self {
        Self {
            queue: rolls.into_iter().map(|(a, b)| DiceRoll::new(a, b)).collect(),
            fallback: GameRng::new(0),
        }
    }

    /// Append more rolls to the end of the queue.
    pub fn push(&mut self, die1: u8, die2: u8) {
        self.queue.push_back(DiceRoll::new(die1, die2));
    }

    /// Rolls still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> DiceRoll {
        self.queue.pop_front().unwrap_or_else(|| self.fallback.roll())
    }
}
