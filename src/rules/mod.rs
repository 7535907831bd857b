//! Rules of the race.
//!
//! `RaceEngine` turns a state plus an intent into the next state:
//! - Drawing and advancing tokens
//! - Firing action tiles and applying penalties
//! - Win detection
//!
//! Refused intents leave the state unchanged; `IntentError` says why.

pub mod engine;
pub mod error;

pub use engine::{GameResult, RaceEngine, Transition};
pub use error::IntentError;
