//! Game state: the authoritative snapshot of a race.
//!
//! ## GameState
//!
//! - One token per suit (a `SuitMap`, so the invariant is structural)
//! - One action tile per configured row
//! - The proceeding card (the current draw)
//! - Outcome (`winner`, `is_game_over`)
//! - Log of accepted intents
//!
//! Hosts only ever see `&GameState` and shared references into it. All
//! mutation goes through the rules engine, which replaces the state
//! wholesale on every accepted intent. The log is an `im` persistent
//! vector so that replacement stays cheap.
//!
//! ## Derived values
//!
//! `ActionTile::clickable` is a projection of token positions and tile
//! state, recomputed after every transition. `ActionHistory` is not stored
//! at all; `GameState::action_history` projects it from the tiles.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::TurnRecord;
use super::card::CardId;
use super::config::{BoardConfig, Row};
use super::suit::{Suit, SuitMap};

/// Which side of a card is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Face {
    FaceUp,
    #[default]
    FaceDown,
}

/// Location on the board: lane (`x`, 1-based) and row (`y`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: Row,
}

/// A suit token on the track.
///
/// Tokens never change suit or lane; only `position.y` moves.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: CardId,
    pub suit: Suit,
    pub position: Position,
    pub face: Face,
}

impl Token {
    /// Current row.
    #[must_use]
    pub fn row(&self) -> Row {
        self.position.y
    }

    /// Has this token reached (or passed) `row`?
    #[must_use]
    pub fn has_reached(&self, row: Row) -> bool {
        self.position.y <= row
    }
}

/// A one-shot trap tile on an action row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionTile {
    pub id: CardId,
    /// Penalty suit. `None` only for face-down tiles dealt without a suit.
    pub suit: Option<Suit>,
    pub row: Row,
    pub face: Face,
    /// Has this tile fired? Never reverts to false.
    pub triggered: bool,
    /// Derived: untriggered and every token has reached `row`.
    pub clickable: bool,
}

/// The draw pile's revealed card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProceedingCard {
    pub id: CardId,
    /// Face value of the last draw; `None` while idle.
    pub suit: Option<Suit>,
    pub face: Face,
}

impl ProceedingCard {
    /// A face-down card with nothing drawn yet.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            id: CardId::Proceeding,
            suit: None,
            face: Face::FaceDown,
        }
    }

    /// A face-up card showing `suit`.
    #[must_use]
    pub fn revealed(suit: Suit) -> Self {
        Self {
            id: CardId::Proceeding,
            suit: Some(suit),
            face: Face::FaceUp,
        }
    }
}

/// Per-row "already fired" flags, projected from the action tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistory {
    entries: SmallVec<[(Row, bool); 8]>,
}

impl ActionHistory {
    /// Has the tile on `row` fired? `None` if `row` has no tile.
    #[must_use]
    pub fn triggered(&self, row: Row) -> Option<bool> {
        self.entries
            .iter()
            .find(|(r, _)| *r == row)
            .map(|&(_, fired)| fired)
    }

    /// Iterate over (row, fired) in configured row order.
    pub fn iter(&self) -> impl Iterator<Item = (Row, bool)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of tiles that have fired.
    #[must_use]
    pub fn triggered_count(&self) -> usize {
        self.entries.iter().filter(|(_, fired)| *fired).count()
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) start_row: Row,
    pub(crate) goal_row: Row,
    pub(crate) tokens: SuitMap<Token>,
    pub(crate) tiles: SmallVec<[ActionTile; 8]>,
    pub(crate) proceeding: ProceedingCard,
    pub(crate) winner: Option<Suit>,
    pub(crate) game_over: bool,
    pub(crate) turn: u32,
    pub(crate) log: Vector<TurnRecord>,
}

impl GameState {
    /// Create a starting state.
    ///
    /// All tokens on the start row, one lane per suit in enumeration order.
    /// `tile_suits` supplies one entry per configured action row.
    pub(crate) fn new(config: &BoardConfig, tile_suits: &[Option<Suit>]) -> Self {
        debug_assert_eq!(tile_suits.len(), config.action_rows.len());

        let tokens = SuitMap::new(|suit| Token {
            id: CardId::Token(suit),
            suit,
            position: Position {
                x: suit.index() as u8 + 1,
                y: config.start_row,
            },
            face: Face::FaceUp,
        });

        let tiles = config
            .action_rows
            .iter()
            .zip(tile_suits)
            .map(|(&row, &suit)| ActionTile {
                id: CardId::Action(row),
                suit,
                row,
                face: Face::FaceDown,
                triggered: false,
                clickable: false,
            })
            .collect();

        let mut state = Self {
            start_row: config.start_row,
            goal_row: config.goal_row,
            tokens,
            tiles,
            proceeding: ProceedingCard::idle(),
            winner: None,
            game_over: false,
            turn: 0,
            log: Vector::new(),
        };
        state.refresh_clickable();
        state
    }

    // === Board ===

    /// Row tokens start on.
    #[must_use]
    pub fn start_row(&self) -> Row {
        self.start_row
    }

    /// Row tokens race toward.
    #[must_use]
    pub fn goal_row(&self) -> Row {
        self.goal_row
    }

    // === Tokens ===

    /// All tokens, keyed by suit.
    #[must_use]
    pub fn tokens(&self) -> &SuitMap<Token> {
        &self.tokens
    }

    /// The token of a suit.
    #[must_use]
    pub fn token(&self, suit: Suit) -> &Token {
        &self.tokens[suit]
    }

    /// Have all tokens reached (or passed) `row`?
    #[must_use]
    pub fn all_reached(&self, row: Row) -> bool {
        self.tokens.values().all(|token| token.has_reached(row))
    }

    // === Action tiles ===

    /// Action tiles in configured row order.
    #[must_use]
    pub fn action_tiles(&self) -> &[ActionTile] {
        &self.tiles
    }

    /// The action tile on `row`, if one is configured.
    #[must_use]
    pub fn tile(&self, row: Row) -> Option<&ActionTile> {
        self.tiles.iter().find(|tile| tile.row == row)
    }

    /// Rows whose tiles can currently be activated.
    pub fn clickable_rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.tiles
            .iter()
            .filter(|tile| tile.clickable)
            .map(|tile| tile.row)
    }

    /// Project the per-row fired flags from the tiles.
    #[must_use]
    pub fn action_history(&self) -> ActionHistory {
        ActionHistory {
            entries: self.tiles.iter().map(|t| (t.row, t.triggered)).collect(),
        }
    }

    // === Draw pile and outcome ===

    /// The proceeding (draw pile) card.
    #[must_use]
    pub fn proceeding_card(&self) -> &ProceedingCard {
        &self.proceeding
    }

    /// The winning suit, once the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<Suit> {
        self.winner
    }

    /// Has a token reached the goal?
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Number of accepted draws so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Accepted intents, oldest first.
    #[must_use]
    pub fn log(&self) -> &Vector<TurnRecord> {
        &self.log
    }

    // === Engine-side mutation ===

    pub(crate) fn tile_mut(&mut self, row: Row) -> Option<&mut ActionTile> {
        self.tiles.iter_mut().find(|tile| tile.row == row)
    }

    /// Move a token one row toward the goal, clamped at the goal row.
    pub(crate) fn advance(&mut self, suit: Suit) {
        let goal = self.goal_row;
        let token = &mut self.tokens[suit];
        token.position.y = token.position.y.saturating_sub(1).max(goal);
    }

    /// Move a token one row back toward the start, clamped at the start row.
    pub(crate) fn retreat(&mut self, suit: Suit) {
        let start = self.start_row;
        let token = &mut self.tokens[suit];
        token.position.y = token.position.y.saturating_add(1).min(start);
    }

    /// Recompute every tile's `clickable` flag from canonical fields.
    pub(crate) fn refresh_clickable(&mut self) {
        let tokens = &self.tokens;
        for tile in self.tiles.iter_mut() {
            tile.clickable =
                !tile.triggered && tokens.values().all(|token| token.has_reached(tile.row));
        }
    }
}
