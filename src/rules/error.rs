//! Rejected intents.

use thiserror::Error;

use crate::core::Row;

/// Why the engine refused an intent.
///
/// Hosts that only care about the resulting state can ignore this: every
/// rejection leaves the state unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IntentError {
    #[error("the game is over; only reset is accepted")]
    GameOver,
    #[error("row {0} has no action tile")]
    UnknownRow(Row),
    #[error("the action tile on row {0} has already fired")]
    AlreadyTriggered(Row),
    #[error("not every token has reached row {row}")]
    NotReached { row: Row },
}
