//! Player intents and the accepted-intent log.
//!
//! The host turns user input into an `Intent` and hands it to the engine.
//! Every intent the engine accepts is recorded as a `TurnRecord`, which
//! carries whatever randomness the intent consumed. The tile deal is not
//! logged, so a game replays from its starting state plus the log.

use serde::{Deserialize, Serialize};

use super::config::Row;
use super::suit::Suit;

/// A discrete player intent.
///
/// ```
/// use suit_race::core::Intent;
///
/// let intent: Intent = "a 3".parse().unwrap();
/// assert_eq!(intent, Intent::Activate(3));
/// assert_eq!(intent.to_string(), "activate row 3");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Draw the proceeding card and advance the matching token.
    Draw,
    /// Fire the action tile on a row.
    Activate(Row),
    /// Start a fresh game.
    Reset,
}

impl Intent {
    /// Does this intent require a live (non-terminal) game?
    #[must_use]
    pub const fn needs_live_game(self) -> bool {
        !matches!(self, Intent::Reset)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Draw => f.write_str("draw"),
            Intent::Activate(row) => write!(f, "activate row {}", row),
            Intent::Reset => f.write_str("reset"),
        }
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    /// Parse the short command form used by terminal hosts:
    /// `d`, `a <row>`, `r` (long names are accepted too).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;

        let intent = match verb {
            "d" | "draw" => Intent::Draw,
            "r" | "reset" => Intent::Reset,
            "a" | "activate" => {
                let row = words
                    .next()
                    .ok_or_else(|| "activate needs a row".to_string())?;
                let row = row
                    .parse::<Row>()
                    .map_err(|_| format!("'{row}' is not a row number"))?;
                Intent::Activate(row)
            }
            other => return Err(format!("unknown command '{other}'")),
        };

        match words.next() {
            Some(extra) => Err(format!("unexpected '{extra}'")),
            None => Ok(intent),
        }
    }
}

/// A recorded, accepted intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Draw count at the time of the intent (draws are numbered from 1).
    pub turn: u32,

    /// The intent that was accepted.
    pub intent: Intent,

    /// Suit drawn by this intent, if it drew.
    pub drawn: Option<Suit>,

    /// Action row that fired and the suit it penalized, if any.
    pub penalty: Option<(Row, Suit)>,
}

impl TurnRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(turn: u32, intent: Intent) -> Self {
        Self {
            turn,
            intent,
            drawn: None,
            penalty: None,
        }
    }
}
