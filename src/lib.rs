//! # suit-race
//!
//! Rules engine for a four-suit card race.
//!
//! Four suit tokens start on the bottom row of a shared track. Each turn a
//! card is drawn and the token of its suit moves one row toward the goal.
//! Action tiles sit face-down on interior rows; once every token has
//! reached a tile's row it can be fired, sending the token of the tile's
//! hidden suit back one row. The first token on the goal row wins.
//!
//! ## Design Principles
//!
//! 1. **Functional core**: `RaceEngine` holds configuration only. The host
//!    owns the `GameState` and gets a new one back from every intent.
//!
//! 2. **Injected randomness**: every draw and deal goes through a
//!    `SuitSource`. Seeded `GameRng` for play, `ScriptedSource` for tests.
//!
//! 3. **Derived flags stay derived**: tile `clickable` flags and the
//!    per-row action history are projections of canonical state.
//!
//! ## Modules
//!
//! - `core`: Suits, card ids, board config, draw sources, intents, state
//! - `rules`: The rules engine and rejection reasons
//! - `display`: Plain-text board rendering for terminal hosts
//!
//! ## Example
//!
//! ```
//! use suit_race::{Intent, RaceEngine, ScriptedSource, Suit};
//!
//! let engine = RaceEngine::default();
//! let mut source = ScriptedSource::repeat(Suit::Hearts);
//! let mut state = engine.initialize(&mut source);
//!
//! while !state.is_game_over() {
//!     state = engine.apply(&state, Intent::Draw, &mut source).state;
//! }
//! assert_eq!(state.winner(), Some(Suit::Hearts));
//! ```

pub mod core;
pub mod rules;
pub mod display;

// Re-export commonly used types
pub use crate::core::{
    Suit, SuitMap, SUIT_COUNT,
    CardId,
    BoardConfig, ConfigError, ExtraRowPolicy, Row, TriggerMode,
    GameRng, GameRngState, ScriptedSource, SuitSource,
    Intent, TurnRecord,
    ActionHistory, ActionTile, Face, GameState, Position, ProceedingCard, Token,
};

pub use crate::rules::{GameResult, IntentError, RaceEngine, Transition};
