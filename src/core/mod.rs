//! Core types: suits, card identifiers, board configuration, draw sources,
//! intents, and the game state model.
//!
//! Nothing here knows the rules of the race; the `rules` module drives
//! these types through their transitions.

pub mod suit;
pub mod card;
pub mod config;
pub mod rng;
pub mod action;
pub mod state;

pub use suit::{Suit, SuitMap, SUIT_COUNT};
pub use card::CardId;
pub use config::{ActionRows, BoardConfig, ConfigError, ExtraRowPolicy, Row, TriggerMode};
pub use rng::{GameRng, GameRngState, ScriptedSource, SuitSource};
pub use action::{Intent, TurnRecord};
pub use state::{ActionHistory, ActionTile, Face, GameState, Position, ProceedingCard, Token};
