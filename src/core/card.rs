//! Card identification.
//!
//! Every card on the table has a stable `CardId`, so a renderer can key
//! its views (and animations) on identity rather than on position.
//!
//! ## ID Layout
//!
//! - `player-<suit>`: the token of a suit (one per suit)
//! - `action-<row>`: the action tile on a row (one per configured row)
//! - `proceeding`: the single draw-pile card
//!
//! ```
//! use suit_race::core::{CardId, Suit};
//!
//! assert_eq!(CardId::Token(Suit::Hearts).to_string(), "player-hearts");
//! assert_eq!(CardId::Action(3).to_string(), "action-3");
//! assert_eq!(CardId::Proceeding.to_string(), "proceeding");
//! ```

use serde::{Deserialize, Serialize};

use super::config::Row;
use super::suit::Suit;

/// Unique identifier for a card on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "lowercase")]
pub enum CardId {
    /// A suit token on the track.
    Token(Suit),
    /// The action tile on a row.
    Action(Row),
    /// The draw pile's revealed card.
    Proceeding,
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardId::Token(suit) => write!(f, "player-{}", suit),
            CardId::Action(row) => write!(f, "action-{}", row),
            CardId::Proceeding => f.write_str("proceeding"),
        }
    }
}
