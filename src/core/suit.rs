//! Suits and per-suit data storage.
//!
//! ## Suit
//!
//! The four card suits. A suit is both the identity of a token on the
//! track and the face value of a drawn card.
//!
//! ## SuitMap
//!
//! Fixed per-suit storage backed by an array for O(1) access.
//! Iteration always follows the suit enumeration order, which is also the
//! tie-break order for win detection.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Number of suits (and therefore tokens and lanes).
pub const SUIT_COUNT: usize = 4;

/// One of the four card suits.
///
/// Declaration order is the enumeration order used everywhere a stable
/// order matters (lanes, win tie-break, iteration).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All suits in enumeration order.
    pub const ALL: [Suit; SUIT_COUNT] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Position of this suit in enumeration order (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Convert from an enumeration index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Suit> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Diamonds),
            2 => Some(Suit::Clubs),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    /// Lowercase name, as used in card identifiers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }

    /// Card symbol for this suit.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    /// Red suits (hearts, diamonds).
    #[must_use]
    pub const fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Suit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Suit::ALL
            .into_iter()
            .find(|suit| suit.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown suit '{s}'"))
    }
}

/// Per-suit data storage with O(1) access.
///
/// Holds exactly one value per suit, so "one entry per suit" is a property
/// of the type rather than something to check at runtime.
///
/// ```
/// use suit_race::core::{Suit, SuitMap};
///
/// let mut moves: SuitMap<u32> = SuitMap::new(|_| 0);
/// moves[Suit::Clubs] += 1;
/// assert_eq!(moves[Suit::Clubs], 1);
/// assert_eq!(moves[Suit::Hearts], 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuitMap<T> {
    data: [T; SUIT_COUNT],
}

impl<T> SuitMap<T> {
    /// Create a new SuitMap with values from a factory function.
    pub fn new(factory: impl Fn(Suit) -> T) -> Self {
        Self {
            data: Suit::ALL.map(factory),
        }
    }

    /// Get a reference to a suit's data.
    #[must_use]
    pub fn get(&self, suit: Suit) -> &T {
        &self.data[suit.index()]
    }

    /// Get a mutable reference to a suit's data.
    pub fn get_mut(&mut self, suit: Suit) -> &mut T {
        &mut self.data[suit.index()]
    }

    /// Iterate over (Suit, &T) pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Suit, &T)> {
        Suit::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over values in enumeration order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<Suit> for SuitMap<T> {
    type Output = T;

    fn index(&self, suit: Suit) -> &Self::Output {
        self.get(suit)
    }
}

impl<T> IndexMut<Suit> for SuitMap<T> {
    fn index_mut(&mut self, suit: Suit) -> &mut Self::Output {
        self.get_mut(suit)
    }
}
