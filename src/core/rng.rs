//! Random draw sources.
//!
//! The rules engine never calls a global random function. Every random
//! decision goes through a `SuitSource`:
//!
//! - **`GameRng`**: seeded ChaCha8, uniform and reproducible
//! - **`ScriptedSource`**: a fixed sequence of draws for tests and replays
//!
//! ## Usage
//!
//! ```
//! use suit_race::core::{GameRng, ScriptedSource, Suit, SuitSource};
//!
//! let mut rng = GameRng::new(42);
//! let suit = rng.draw();
//! assert!(Suit::ALL.contains(&suit));
//!
//! let mut script = ScriptedSource::new([Suit::Hearts, Suit::Clubs]);
//! assert_eq!(script.draw(), Suit::Hearts);
//! assert_eq!(script.draw(), Suit::Clubs);
//! ```

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::suit::{Suit, SUIT_COUNT};

/// Source of random suits.
///
/// Implementations must return valid suits; an exhausted or malformed source
/// is a programming error in the source, and the engine does not guard
/// against it.
pub trait SuitSource {
    /// Draw one suit. Uniform and independent across calls for real sources.
    fn draw(&mut self) -> Suit;

    /// A permutation of all four suits, used to deal action tiles.
    fn permutation(&mut self) -> [Suit; SUIT_COUNT];
}

impl<S: SuitSource + ?Sized> SuitSource for &mut S {
    fn draw(&mut self) -> Suit {
        (**self).draw()
    }

    fn permutation(&mut self) -> [Suit; SUIT_COUNT] {
        (**self).permutation()
    }
}

/// Deterministic RNG for draws and tile dealing.
///
/// Uses ChaCha8 for speed while keeping a reproducible stream per seed.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG with a seed taken from the thread RNG.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// The seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl SuitSource for GameRng {
    fn draw(&mut self) -> Suit {
        let index = self.gen_range_usize(0..SUIT_COUNT);
        Suit::ALL[index]
    }

    fn permutation(&mut self) -> [Suit; SUIT_COUNT] {
        let mut suits = Suit::ALL;
        self.shuffle(&mut suits);
        suits
    }
}

/// Serializable RNG state for resuming a seeded session.
///
/// Uses the ChaCha8 word position, so capture and restore cost the same
/// regardless of how many suits have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// A scripted suit source.
///
/// Draws come from a fixed queue; permutations come from a fixed layout
/// (enumeration order unless `with_layout` is used). Running out of draws
/// panics unless the script was built with `cycle`.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    script: Vec<Suit>,
    pending: VecDeque<Suit>,
    cycle: bool,
    layout: [Suit; SUIT_COUNT],
}

impl ScriptedSource {
    /// Draw the given suits in order, once.
    pub fn new(draws: impl IntoIterator<Item = Suit>) -> Self {
        let script: Vec<Suit> = draws.into_iter().collect();
        Self {
            pending: script.iter().copied().collect(),
            script,
            cycle: false,
            layout: Suit::ALL,
        }
    }

    /// Draw the given suits in order, repeating forever.
    pub fn cycle(draws: impl IntoIterator<Item = Suit>) -> Self {
        let source = Self::new(draws);
        assert!(!source.script.is_empty(), "Cannot cycle an empty script");
        Self {
            cycle: true,
            ..source
        }
    }

    /// Always draw the same suit.
    pub fn repeat(suit: Suit) -> Self {
        Self::cycle([suit])
    }

    /// Deal action tiles in this order instead of enumeration order.
    #[must_use]
    pub fn with_layout(mut self, layout: [Suit; SUIT_COUNT]) -> Self {
        let mut sorted = layout;
        sorted.sort();
        assert_eq!(sorted, Suit::ALL, "Layout must be a permutation of all suits");
        self.layout = layout;
        self
    }

    /// Draws left before the script runs out (`None` when cycling).
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        (!self.cycle).then_some(self.pending.len())
    }
}

impl SuitSource for ScriptedSource {
    fn draw(&mut self) -> Suit {
        if self.pending.is_empty() && self.cycle {
            self.pending.extend(self.script.iter().copied());
        }
        self.pending
            .pop_front()
            .expect("scripted suit source exhausted")
    }

    fn permutation(&mut self) -> [Suit; SUIT_COUNT] {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.draw(), rng2.draw());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..32).map(|_| rng1.draw()).collect();
        let seq2: Vec<_> = (0..32).map(|_| rng2.draw()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_draw_covers_all_suits() {
        let mut rng = GameRng::new(7);
        let mut seen = [0usize; SUIT_COUNT];

        for _ in 0..4000 {
            seen[rng.draw().index()] += 1;
        }

        // Uniform draws: each suit lands near 1000
        for count in seen {
            assert!((800..1200).contains(&count), "skewed draw count {count}");
        }
    }

    #[test]
    fn test_permutation_is_complete() {
        let mut rng = GameRng::new(42);

        for _ in 0..20 {
            let mut perm = rng.permutation();
            perm.sort();
            assert_eq!(perm, Suit::ALL);
        }
    }

    #[test]
    fn test_state_serialization() {
        let mut rng = GameRng::new(42);

        for _ in 0..100 {
            rng.draw();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.draw()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.draw()).collect();

        assert_eq!(expected, actual);
        assert_eq!(restored.seed(), 42);
    }

    #[test]
    fn test_state_serde() {
        let state = GameRngState {
            seed: 42,
            word_pos: 12345,
        };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameRngState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }

    #[test]
    fn test_scripted_in_order() {
        let mut script = ScriptedSource::new([Suit::Spades, Suit::Hearts]);

        assert_eq!(script.remaining(), Some(2));
        assert_eq!(script.draw(), Suit::Spades);
        assert_eq!(script.draw(), Suit::Hearts);
        assert_eq!(script.remaining(), Some(0));
    }

    #[test]
    #[should_panic(expected = "scripted suit source exhausted")]
    fn test_scripted_exhausted() {
        let mut script = ScriptedSource::new([Suit::Spades]);
        script.draw();
        script.draw();
    }

    #[test]
    fn test_scripted_cycle() {
        let mut script = ScriptedSource::cycle([Suit::Clubs, Suit::Diamonds]);
        let drawn: Vec<_> = (0..5).map(|_| script.draw()).collect();

        assert_eq!(
            drawn,
            vec![Suit::Clubs, Suit::Diamonds, Suit::Clubs, Suit::Diamonds, Suit::Clubs]
        );
        assert_eq!(script.remaining(), None);
    }

    #[test]
    fn test_scripted_layout() {
        let layout = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];
        let mut script = ScriptedSource::repeat(Suit::Hearts).with_layout(layout);

        assert_eq!(script.permutation(), layout);
        assert_eq!(ScriptedSource::new([]).permutation(), Suit::ALL);
    }

    #[test]
    #[should_panic(expected = "Layout must be a permutation")]
    fn test_scripted_layout_rejects_duplicates() {
        let _ = ScriptedSource::new([]).with_layout([Suit::Hearts; SUIT_COUNT]);
    }

    #[test]
    fn test_source_through_reference() {
        fn draw_twice(mut source: impl SuitSource) -> (Suit, Suit) {
            (source.draw(), source.draw())
        }

        let mut script = ScriptedSource::new([Suit::Clubs, Suit::Hearts, Suit::Spades]);
        assert_eq!(draw_twice(&mut script), (Suit::Clubs, Suit::Hearts));
        assert_eq!(script.draw(), Suit::Spades);
    }
}
