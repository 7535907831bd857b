//! Board configuration.
//!
//! The engine never hardcodes track geometry. A `BoardConfig` supplies:
//! - start and goal rows (rows are numbered from the top, goal is lowest)
//! - the interior rows that carry an action tile
//! - how action tiles beyond the fourth get their suit
//! - whether action tiles fire manually or automatically
//!
//! Two presets mirror the two board revisions: `short()` (the default,
//! six rows with four action tiles) and `long()` (ten rows, eight tiles).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Row index on the track. Lower is closer to the goal.
pub type Row = u8;

/// Storage for the configured action rows (inline up to the long preset).
pub type ActionRows = SmallVec<[Row; 8]>;

/// How action rows beyond the number of suits receive a suit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraRowPolicy {
    /// Extra tiles start without a suit; the penalty suit is drawn from the
    /// suit source when the tile fires.
    #[default]
    DrawOnTrigger,
    /// Every block of four rows is dealt a fresh permutation.
    Reshuffle,
}

/// When action tiles fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerMode {
    /// Only through an explicit activate intent.
    #[default]
    Manual,
    /// After each draw, the first eligible tile (in configured order) fires.
    Automatic,
}

/// Errors raised when a board configuration is not playable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("goal row must be at least 1")]
    GoalRowZero,
    #[error("goal row {goal} must be above start row {start}")]
    EmptyTrack { start: Row, goal: Row },
    #[error("action row {row} must lie strictly between goal row {goal} and start row {start}")]
    ActionRowOutOfRange { row: Row, goal: Row, start: Row },
    #[error("action row {0} is configured more than once")]
    DuplicateActionRow(Row),
}

/// Complete board configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Row every token starts on (the bottom of the track).
    pub start_row: Row,

    /// Row a token must reach to win (the top of the track).
    pub goal_row: Row,

    /// Rows carrying an action tile, in dealing and auto-trigger order.
    pub action_rows: ActionRows,

    /// Suit assignment for rows beyond the number of suits.
    pub extra_rows: ExtraRowPolicy,

    /// Manual or automatic action tiles.
    pub trigger: TriggerMode,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::short()
    }
}

impl BoardConfig {
    /// Six-row track, action tiles on rows 2 through 5.
    #[must_use]
    pub fn short() -> Self {
        Self {
            start_row: 6,
            goal_row: 1,
            action_rows: SmallVec::from_slice(&[2, 3, 4, 5]),
            extra_rows: ExtraRowPolicy::default(),
            trigger: TriggerMode::default(),
        }
    }

    /// Ten-row track, action tiles on rows 2 through 9.
    #[must_use]
    pub fn long() -> Self {
        Self {
            start_row: 10,
            goal_row: 1,
            action_rows: (2..=9).collect(),
            extra_rows: ExtraRowPolicy::default(),
            trigger: TriggerMode::default(),
        }
    }

    /// Look up a preset by name (`short` or `long`).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "short" => Some(Self::short()),
            "long" => Some(Self::long()),
            _ => None,
        }
    }

    /// Set start and goal rows.
    #[must_use]
    pub fn with_rows(mut self, start_row: Row, goal_row: Row) -> Self {
        self.start_row = start_row;
        self.goal_row = goal_row;
        self
    }

    /// Replace the action rows.
    #[must_use]
    pub fn with_action_rows(mut self, rows: &[Row]) -> Self {
        self.action_rows = SmallVec::from_slice(rows);
        self
    }

    /// Set the extra-row suit policy.
    #[must_use]
    pub fn with_extra_rows(mut self, policy: ExtraRowPolicy) -> Self {
        self.extra_rows = policy;
        self
    }

    /// Set the trigger mode.
    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerMode) -> Self {
        self.trigger = trigger;
        self
    }

    /// Rows a token must advance from start to reach the goal.
    #[must_use]
    pub fn track_length(&self) -> u8 {
        self.start_row.saturating_sub(self.goal_row)
    }

    /// Check that the configuration describes a playable board.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goal_row == 0 {
            return Err(ConfigError::GoalRowZero);
        }
        if self.track_length() == 0 {
            return Err(ConfigError::EmptyTrack {
                start: self.start_row,
                goal: self.goal_row,
            });
        }

        for (i, &row) in self.action_rows.iter().enumerate() {
            if row <= self.goal_row || row >= self.start_row {
                return Err(ConfigError::ActionRowOutOfRange {
                    row,
                    goal: self.goal_row,
                    start: self.start_row,
                });
            }
            if self.action_rows[..i].contains(&row) {
                return Err(ConfigError::DuplicateActionRow(row));
            }
        }

        Ok(())
    }
}
