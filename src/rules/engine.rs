//! The race rules engine.
//!
//! `RaceEngine` holds only the board configuration. Game state is owned by
//! the host and passed in; every operation returns a new state and leaves
//! its input untouched. The one impure input is the `SuitSource`, which the
//! host injects per call.
//!
//! ## Turn structure
//!
//! - **Draw**: reveal a suit, advance that suit's token one row (clamped at
//!   the goal). In automatic mode the first eligible tile then fires.
//! - **Activate**: fire an eligible tile; its suit's token moves back one
//!   row (clamped at the start).
//! - **Win check**: after every accepted intent, the first token (in suit
//!   order) on the goal row wins. A game is won exactly once.

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use super::error::IntentError;
use crate::core::{
    BoardConfig, ConfigError, ExtraRowPolicy, Face, GameState, Intent, ProceedingCard, Row, Suit,
    SuitSource, TriggerMode, TurnRecord, SUIT_COUNT,
};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// Suit whose token reached the goal first.
    pub winner: Suit,
    /// Draws it took.
    pub turns: u32,
}

/// Outcome of `RaceEngine::apply`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The next state (equal to the input when rejected).
    pub state: GameState,
    /// Why the intent was refused, if it was.
    pub rejected: Option<IntentError>,
}

impl Transition {
    /// Was the intent accepted?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.rejected.is_none()
    }
}

/// Rules engine for one board configuration.
#[derive(Clone, Debug)]
pub struct RaceEngine {
    config: BoardConfig,
}

impl Default for RaceEngine {
    fn default() -> Self {
        Self {
            config: BoardConfig::default(),
        }
    }
}

impl RaceEngine {
    /// Create an engine for a validated configuration.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the board configuration.
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    // === Lifecycle ===

    /// Create the starting state.
    ///
    /// Tokens sit on the start row, tiles are face-down and dealt suits from
    /// the source's permutation, the proceeding card is idle.
    pub fn initialize<S: SuitSource + ?Sized>(&self, source: &mut S) -> GameState {
        let tile_suits = self.deal_tile_suits(source);
        let state = GameState::new(&self.config, &tile_suits);
        debug!(
            start_row = self.config.start_row,
            goal_row = self.config.goal_row,
            tiles = ?tile_suits.as_slice(),
            "game initialized"
        );
        state
    }

    /// Start over. Always accepted, whatever the current state.
    pub fn reset<S: SuitSource + ?Sized>(&self, source: &mut S) -> GameState {
        self.initialize(source)
    }

    fn deal_tile_suits<S: SuitSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> SmallVec<[Option<Suit>; 8]> {
        let rows = self.config.action_rows.len();
        if rows == 0 {
            return SmallVec::new();
        }

        let mut deck = source.permutation();
        (0..rows)
            .map(|i| {
                let slot = i % SUIT_COUNT;
                if i < SUIT_COUNT {
                    return Some(deck[slot]);
                }
                match self.config.extra_rows {
                    ExtraRowPolicy::DrawOnTrigger => None,
                    ExtraRowPolicy::Reshuffle => {
                        if slot == 0 {
                            deck = source.permutation();
                        }
                        Some(deck[slot])
                    }
                }
            })
            .collect()
    }

    // === Intents ===

    /// Draw a suit and advance its token. A terminal state is returned unchanged.
    pub fn draw_and_advance<S: SuitSource + ?Sized>(
        &self,
        state: &GameState,
        source: &mut S,
    ) -> GameState {
        self.apply(state, Intent::Draw, source).state
    }

    /// Draw a suit and advance its token, reporting rejection.
    pub fn try_draw_and_advance<S: SuitSource + ?Sized>(
        &self,
        state: &GameState,
        source: &mut S,
    ) -> Result<GameState, IntentError> {
        if state.is_game_over() {
            return Err(IntentError::GameOver);
        }

        let mut next = state.clone();
        let suit = source.draw();

        next.turn += 1;
        next.proceeding = ProceedingCard::revealed(suit);
        next.advance(suit);
        debug!(turn = next.turn, %suit, row = next.token(suit).row(), "token advanced");

        let mut record = TurnRecord::new(next.turn, Intent::Draw);
        record.drawn = Some(suit);

        if self.config.trigger == TriggerMode::Automatic {
            let eligible = next
                .action_tiles()
                .iter()
                .find(|tile| !tile.triggered && next.all_reached(tile.row))
                .map(|tile| tile.row);
            if let Some(row) = eligible {
                let penalized = self.fire_tile(&mut next, row, source);
                record.penalty = Some((row, penalized));
            }
        }

        next.refresh_clickable();
        next.log.push_back(record);
        Ok(self.declare_winner(next))
    }

    /// Fire the action tile on `row`. Ineligible requests return the state unchanged.
    pub fn activate_action<S: SuitSource + ?Sized>(
        &self,
        state: &GameState,
        row: Row,
        source: &mut S,
    ) -> GameState {
        self.apply(state, Intent::Activate(row), source).state
    }

    /// Fire the action tile on `row`, reporting rejection.
    ///
    /// Eligibility is checked here regardless of the tile's `clickable` hint.
    pub fn try_activate_action<S: SuitSource + ?Sized>(
        &self,
        state: &GameState,
        row: Row,
        source: &mut S,
    ) -> Result<GameState, IntentError> {
        Self::check_activation(state, row)?;

        let mut next = state.clone();
        let penalized = self.fire_tile(&mut next, row, source);
        next.refresh_clickable();

        let mut record = TurnRecord::new(next.turn, Intent::Activate(row));
        record.penalty = Some((row, penalized));
        next.log.push_back(record);

        Ok(self.declare_winner(next))
    }

    /// Apply any intent, keeping the rejection reason alongside the state.
    pub fn apply<S: SuitSource + ?Sized>(
        &self,
        state: &GameState,
        intent: Intent,
        source: &mut S,
    ) -> Transition {
        if intent.needs_live_game() && state.is_game_over() {
            trace!(%intent, "intent rejected: game over");
            return Transition {
                state: state.clone(),
                rejected: Some(IntentError::GameOver),
            };
        }

        let result = match intent {
            Intent::Draw => self.try_draw_and_advance(state, source),
            Intent::Activate(row) => self.try_activate_action(state, row, source),
            Intent::Reset => Ok(self.reset(source)),
        };

        match result {
            Ok(next) => Transition {
                state: next,
                rejected: None,
            },
            Err(err) => {
                trace!(%intent, reason = %err, "intent rejected");
                Transition {
                    state: state.clone(),
                    rejected: Some(err),
                }
            }
        }
    }

    fn check_activation(state: &GameState, row: Row) -> Result<(), IntentError> {
        if state.is_game_over() {
            return Err(IntentError::GameOver);
        }
        let tile = state.tile(row).ok_or(IntentError::UnknownRow(row))?;
        if tile.triggered {
            return Err(IntentError::AlreadyTriggered(row));
        }
        if !state.all_reached(row) {
            return Err(IntentError::NotReached { row });
        }
        Ok(())
    }

    /// Flip a tile, mark it fired, and push its suit's token back a row.
    ///
    /// Returns the penalized suit. A tile dealt without a suit takes one
    /// from the source now and keeps it.
    fn fire_tile<S: SuitSource + ?Sized>(
        &self,
        state: &mut GameState,
        row: Row,
        source: &mut S,
    ) -> Suit {
        let Some(tile) = state.tile_mut(row) else {
            unreachable!("fire_tile called for unconfigured row {row}");
        };

        let suit = match tile.suit {
            Some(suit) => suit,
            None => source.draw(),
        };
        tile.suit = Some(suit);
        tile.face = Face::FaceUp;
        tile.triggered = true;
        tile.clickable = false;

        state.retreat(suit);
        debug!(row, %suit, to_row = state.token(suit).row(), "action tile fired");
        suit
    }

    // === Win detection ===

    /// Run the win check on a state.
    ///
    /// The first token in suit order standing on (or past) the goal row wins.
    /// A state that is already over is returned unchanged.
    #[must_use]
    pub fn check_winner(&self, state: &GameState) -> GameState {
        self.declare_winner(state.clone())
    }

    fn declare_winner(&self, mut state: GameState) -> GameState {
        if state.game_over {
            return state;
        }

        let goal = state.goal_row;
        let winner = state
            .tokens
            .iter()
            .find(|(_, token)| token.has_reached(goal))
            .map(|(suit, _)| suit);

        if let Some(suit) = winner {
            state.winner = Some(suit);
            state.game_over = true;
            info!(winner = %suit, turns = state.turn, "game over");
        }
        state
    }

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` once a token has won, `None` while play continues.
    #[must_use]
    pub fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner().map(|winner| GameResult {
            winner,
            turns: state.turn(),
        })
    }

    // === Queries ===

    /// Intents the engine would accept on `state`.
    ///
    /// Reset is always legal; draw and the clickable tiles only while the
    /// game is live.
    #[must_use]
    pub fn legal_intents(&self, state: &GameState) -> Vec<Intent> {
        let mut intents = Vec::new();

        if !state.is_game_over() {
            intents.push(Intent::Draw);
            intents.extend(state.clickable_rows().map(Intent::Activate));
        }
        intents.push(Intent::Reset);

        intents
    }

    /// Play until someone wins: fire any clickable tile first, otherwise draw.
    pub fn play_out<S: SuitSource + ?Sized>(&self, state: &GameState, source: &mut S) -> GameState {
        let mut current = state.clone();

        while !current.is_game_over() {
            let clickable = current.clickable_rows().next();
            current = match clickable {
                Some(row) => self.activate_action(&current, row, source),
                None => self.draw_and_advance(&current, source),
            };
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, ScriptedSource};

    const LAYOUT: [Suit; SUIT_COUNT] = [Suit::Spades, Suit::Clubs, Suit::Diamonds, Suit::Hearts];

    fn engine() -> RaceEngine {
        RaceEngine::default()
    }

    /// Draw once for every suit: all tokens land on row 5.
    fn after_one_lap(engine: &RaceEngine) -> (GameState, ScriptedSource) {
        let mut source = ScriptedSource::new(Suit::ALL).with_layout(LAYOUT);
        let mut state = engine.initialize(&mut source);
        for _ in 0..SUIT_COUNT {
            state = engine.draw_and_advance(&state, &mut source);
        }
        (state, source)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = BoardConfig::short().with_action_rows(&[7]);
        assert!(matches!(
            RaceEngine::new(config),
            Err(ConfigError::ActionRowOutOfRange { row: 7, .. })
        ));
    }

    #[test]
    fn test_initialize_deals_layout() {
        let mut source = ScriptedSource::new([]).with_layout(LAYOUT);
        let state = engine().initialize(&mut source);

        let suits: Vec<_> = state.action_tiles().iter().map(|t| t.suit).collect();
        assert_eq!(suits, LAYOUT.map(Some).to_vec());
        assert_eq!(state.turn(), 0);
    }

    #[test]
    fn test_draw_reveals_and_advances() {
        let engine = engine();
        let mut source = ScriptedSource::new([Suit::Diamonds]);
        let state = engine.initialize(&mut source);

        let next = engine.draw_and_advance(&state, &mut source);

        assert_eq!(next.proceeding_card().suit, Some(Suit::Diamonds));
        assert_eq!(next.proceeding_card().face, Face::FaceUp);
        assert_eq!(next.token(Suit::Diamonds).row(), 5);
        assert_eq!(next.token(Suit::Hearts).row(), 6);
        assert_eq!(next.turn(), 1);
        assert_eq!(next.log().len(), 1);
        assert_eq!(next.log()[0].drawn, Some(Suit::Diamonds));
        // Input snapshot untouched
        assert_eq!(state.token(Suit::Diamonds).row(), 6);
    }

    #[test]
    fn test_clickable_after_all_reach_row() {
        let (state, _) = after_one_lap(&engine());

        assert_eq!(state.clickable_rows().collect::<Vec<_>>(), vec![5]);
        assert!(!state.tile(4).unwrap().clickable);
    }

    #[test]
    fn test_activate_penalizes_tile_suit() {
        let engine = engine();
        let (state, mut source) = after_one_lap(&engine);

        // Row 5 is the fourth tile: hearts in LAYOUT
        let next = engine.activate_action(&state, 5, &mut source);
        let tile = next.tile(5).unwrap();

        assert!(tile.triggered);
        assert!(!tile.clickable);
        assert_eq!(tile.face, Face::FaceUp);
        assert_eq!(next.token(Suit::Hearts).row(), 6);
        assert_eq!(next.token(Suit::Spades).row(), 5);
        assert_eq!(next.clickable_rows().count(), 0);
        assert_eq!(next.log().last().and_then(|r| r.penalty), Some((5, Suit::Hearts)));
    }

    #[test]
    fn test_activate_rejections() {
        let engine = engine();
        let (state, mut source) = after_one_lap(&engine);

        let cases = [
            (4, IntentError::NotReached { row: 4 }),
            (9, IntentError::UnknownRow(9)),
        ];
        for (row, expected) in cases {
            assert_eq!(engine.try_activate_action(&state, row, &mut source), Err(expected));
            assert_eq!(engine.activate_action(&state, row, &mut source), state);
        }

        let fired = engine.activate_action(&state, 5, &mut source);
        assert_eq!(
            engine.try_activate_action(&fired, 5, &mut source),
            Err(IntentError::AlreadyTriggered(5))
        );
    }

    #[test]
    fn test_apply_reports_rejection() {
        let engine = engine();
        let mut source = ScriptedSource::new([]);
        let state = engine.initialize(&mut source);

        let transition = engine.apply(&state, Intent::Activate(2), &mut source);

        assert!(!transition.is_accepted());
        assert_eq!(transition.rejected, Some(IntentError::NotReached { row: 2 }));
        assert_eq!(transition.state, state);
    }

    #[test]
    fn test_win_tie_break_uses_suit_order() {
        let engine = engine();
        let mut source = ScriptedSource::new([]);
        let mut state = engine.initialize(&mut source);

        // Put spades and diamonds on the goal together
        for _ in 0..5 {
            state.advance(Suit::Spades);
            state.advance(Suit::Diamonds);
        }
        let checked = engine.check_winner(&state);

        assert_eq!(checked.winner(), Some(Suit::Diamonds));
        assert!(checked.is_game_over());

        // Winner is sticky
        let mut moved = checked.clone();
        moved.retreat(Suit::Diamonds);
        assert_eq!(engine.check_winner(&moved).winner(), Some(Suit::Diamonds));
    }

    #[test]
    fn test_terminal_rejects_intents() {
        let engine = engine();
        let mut source = ScriptedSource::repeat(Suit::Clubs);
        let mut state = engine.initialize(&mut source);
        for _ in 0..5 {
            state = engine.draw_and_advance(&state, &mut source);
        }

        assert_eq!(
            engine.is_terminal(&state),
            Some(GameResult { winner: Suit::Clubs, turns: 5 })
        );
        assert_eq!(
            engine.try_draw_and_advance(&state, &mut source),
            Err(IntentError::GameOver)
        );
        assert_eq!(engine.draw_and_advance(&state, &mut source), state);
        assert_eq!(engine.legal_intents(&state), vec![Intent::Reset]);
    }

    #[test]
    fn test_legal_intents_live() {
        let engine = engine();
        let (state, _) = after_one_lap(&engine);

        assert_eq!(
            engine.legal_intents(&state),
            vec![Intent::Draw, Intent::Activate(5), Intent::Reset]
        );
    }

    #[test]
    fn test_automatic_trigger_fires_first_eligible() {
        let engine =
            RaceEngine::new(BoardConfig::short().with_trigger(TriggerMode::Automatic)).unwrap();
        let (state, _) = after_one_lap(&engine);

        // The fourth draw (spades) brought everyone to row 5; hearts fired
        let tile = state.tile(5).unwrap();
        assert!(tile.triggered);
        assert_eq!(state.token(Suit::Hearts).row(), 6);
        assert_eq!(state.log().last().and_then(|r| r.penalty), Some((5, Suit::Hearts)));
        assert_eq!(state.action_history().triggered_count(), 1);
    }

    #[test]
    fn test_draw_on_trigger_for_extra_rows() {
        let engine = RaceEngine::new(BoardConfig::long()).unwrap();
        let mut source = ScriptedSource::new([]).with_layout(LAYOUT);
        let state = engine.initialize(&mut source);

        let suits: Vec<_> = state.action_tiles().iter().map(|t| t.suit).collect();
        assert!(suits[..4].iter().all(Option::is_some));
        assert!(suits[4..].iter().all(Option::is_none));
    }

    #[test]
    fn test_reshuffle_for_extra_rows() {
        let config = BoardConfig::long().with_extra_rows(ExtraRowPolicy::Reshuffle);
        let engine = RaceEngine::new(config).unwrap();
        let mut rng = GameRng::new(42);
        let state = engine.initialize(&mut rng);

        for block in state.action_tiles().chunks(SUIT_COUNT) {
            let mut suits: Vec<_> = block.iter().filter_map(|t| t.suit).collect();
            suits.sort();
            assert_eq!(suits, Suit::ALL.to_vec());
        }
    }

    #[test]
    fn test_play_out_fires_clickable_before_drawing() {
        let engine = engine();
        let (state, _) = after_one_lap(&engine);
        // Only draw left in the script: the row-5 tile has to go first
        let mut source = ScriptedSource::cycle([Suit::Spades]).with_layout(LAYOUT);

        let done = engine.play_out(&state, &mut source);

        assert_eq!(done.log()[SUIT_COUNT].intent, Intent::Activate(5));
        assert_eq!(done.log()[SUIT_COUNT].penalty, Some((5, Suit::Hearts)));
        assert_eq!(done.winner(), Some(Suit::Spades));
        assert_eq!(engine.is_terminal(&done).map(|r| r.turns), Some(done.turn()));
    }

    #[test]
    fn test_apply_after_game_over_only_resets() {
        let engine = engine();
        let mut source = ScriptedSource::repeat(Suit::Hearts);
        let state = engine.initialize(&mut source);
        let done = engine.play_out(&state, &mut source);

        for intent in [Intent::Draw, Intent::Activate(2), Intent::Activate(9)] {
            let transition = engine.apply(&done, intent, &mut source);
            assert_eq!(transition.rejected, Some(IntentError::GameOver));
            assert_eq!(transition.state, done);
        }
        assert!(engine.apply(&done, Intent::Reset, &mut source).is_accepted());
    }

    #[test]
    fn test_play_out_finishes() {
        let engine = engine();
        let mut rng = GameRng::new(7);
        let state = engine.initialize(&mut rng);

        let done = engine.play_out(&state, &mut rng);

        assert!(done.is_game_over());
        assert!(done.turn() >= 5);
        assert_eq!(engine.is_terminal(&done).map(|r| r.turns), Some(done.turn()));
        let winner = done.winner().unwrap();
        assert_eq!(done.token(winner).row(), done.goal_row());
    }
}
