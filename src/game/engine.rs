//! Round orchestration
//!
//! The engine owns the [`RoundState`], pulls items from an [`ItemRepository`]
//! and narrates every guess through a [`GuessOutcome`]. Rounds move
//! `NotStarted -> InProgress -> GameOver` and never leave `GameOver`.

use super::clock::{Clock, SystemClock};
use super::display::DisplaySnapshot;
use super::error::EngineError;
use super::guess::Guess;
use super::outcome::{GuessOutcome, OutcomeKind, SaveStatus};
use super::state::{Phase, RoundState, UsedItems};
use crate::core::{GameMode, Item, Player, QuestionType};
use crate::output::formatters::{format_labelled_value, format_seconds};
use crate::repository::{ItemRepository, unavailable_or};
use tracing::{debug, info, warn};

/// Points between celebratory annotations
pub const MILESTONE: u32 = 10;

const RULE_WIDTH: usize = 50;

/// Higher-or-lower game engine
///
/// Generic over the repository so callers can lend a SQLite handle, an
/// in-memory fixture or `&mut` either.
pub struct GameEngine<R, C = SystemClock> {
    repository: R,
    clock: C,
    state: Option<RoundState>,
}

impl<R: ItemRepository> GameEngine<R> {
    pub const fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: ItemRepository, C: Clock> GameEngine<R, C> {
    pub const fn with_clock(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            state: None,
        }
    }

    /// Begin a new round, replacing any previous one
    ///
    /// A replaced round that had not ended is dropped without persisting.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotEnoughItems`] when two distinct items cannot
    /// be drawn; the engine is left in [`Phase::NotStarted`].
    pub fn start_round(
        &mut self,
        player: &Player,
        question_type: QuestionType,
        mode: GameMode,
    ) -> Result<(), EngineError> {
        if let Some(previous) = self.state.take()
            && !previous.is_game_over()
        {
            info!(score = previous.score(), "abandoning unfinished round");
        }

        let high_score = unavailable_or(self.repository.best_score(player.id, mode), "best score");

        let mut used = UsedItems::default();
        let current = draw_item(&self.repository, question_type, &mut used);
        let next = current
            .is_some()
            .then(|| draw_item(&self.repository, question_type, &mut used))
            .flatten();

        let (Some(current), Some(next)) = (current, next) else {
            warn!(question = question_type.tag(), "not enough items to start a round");
            return Err(EngineError::NotEnoughItems { question_type });
        };

        info!(
            player = %player.username,
            question = question_type.tag(),
            mode = mode.tag(),
            high_score,
            "round started"
        );

        self.state = Some(RoundState::new(
            player.clone(),
            question_type,
            mode,
            high_score,
            (current, next),
            used,
            self.clock.now(),
        ));
        Ok(())
    }

    /// Resolve one guess
    ///
    /// Never fails: invalid calls come back as a non-correct outcome with
    /// [`OutcomeKind::NotStarted`] or [`OutcomeKind::AlreadyEnded`] and leave
    /// the state untouched.
    pub fn submit_guess(&mut self, guess: Guess) -> GuessOutcome {
        let now = self.clock.now();
        let Some(state) = self.state.as_mut() else {
            return GuessOutcome::not_started();
        };
        if state.is_game_over() {
            return GuessOutcome::already_ended(state.save_status());
        }
        if state.refresh_time(now) {
            return end_round(
                &mut self.repository,
                state,
                OutcomeKind::TimedOut,
                false,
                "Time's up!".to_string(),
            );
        }

        let question_type = state.question_type();
        let current_value = state.current_item().value();
        let next_value = state.next_item().value();
        let correct = guess.is_correct(current_value, next_value);
        state.revealed = true;

        debug!(%guess, current_value, next_value, correct, "guess evaluated");

        let reveal = format!(
            "{}\n{}",
            state.next_item().display_name(),
            format_labelled_value(question_type, next_value)
        );

        if correct {
            state.reward();
            let mut message = format!("Correct! {reveal}");
            if state.is_new_record() {
                message.push_str("\n🎉 NEW RECORD! 🎉");
            }
            if state.score() % MILESTONE == 0 {
                message.push_str(&format!("\n\nGreat! {} points!", state.score()));
            }

            let Some(next) = draw_item(&self.repository, question_type, &mut state.used) else {
                return end_round(
                    &mut self.repository,
                    state,
                    OutcomeKind::PoolExhausted,
                    true,
                    message,
                );
            };
            state.advance(next);
            GuessOutcome::new(true, OutcomeKind::Correct, message)
        } else {
            let message = format!("Wrong! {reveal}");
            if state.penalize() {
                return end_round(
                    &mut self.repository,
                    state,
                    OutcomeKind::OutOfLives,
                    false,
                    message,
                );
            }

            let Some(next) = draw_item(&self.repository, question_type, &mut state.used) else {
                return end_round(
                    &mut self.repository,
                    state,
                    OutcomeKind::PoolExhausted,
                    false,
                    message,
                );
            };
            state.replace_next(next);
            GuessOutcome::new(false, OutcomeKind::Wrong, message)
        }
    }

    /// Snapshot for drawing the round
    ///
    /// In a time-limited round this re-checks the clock first, so polling the
    /// display can end the round (and persist its score).
    pub fn current_display(&mut self) -> Option<DisplaySnapshot> {
        let now = self.clock.now();
        let state = self.state.as_mut()?;

        if !state.is_game_over() && state.refresh_time(now) {
            state.finish(OutcomeKind::TimedOut);
            persist(&mut self.repository, state);
            info!(score = state.score(), "time ran out while idle");
        }

        Some(DisplaySnapshot::from_state(state))
    }

    /// Game-over narration for the current round, once it has ended
    #[must_use]
    pub fn game_over_message(&self) -> Option<String> {
        let state = self.state.as_ref().filter(|s| s.is_game_over())?;
        let kind = state.end_kind().unwrap_or(OutcomeKind::OutOfLives);
        Some(game_over_summary(state, kind))
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.as_ref().map_or(Phase::NotStarted, RoundState::phase)
    }

    #[must_use]
    pub const fn state(&self) -> Option<&RoundState> {
        self.state.as_ref()
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    pub const fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }
}

/// Draw an unseen item for the question type and mark it used
fn draw_item<R: ItemRepository>(
    repository: &R,
    question_type: QuestionType,
    used: &mut UsedItems,
) -> Option<Item> {
    let item = match question_type {
        QuestionType::Elevation => {
            unavailable_or(repository.sample_airport(used.airport_ids()), "airport")
                .map(Item::Airport)
        }
        QuestionType::Population => {
            unavailable_or(repository.sample_country(used.country_codes()), "country")
                .map(Item::Country)
        }
    }?;

    let key = item.key();
    debug!(%key, value = item.value(), "drew item");
    if !used.insert(key) {
        // Repository ignored the exclusion list
        warn!(key = %item.key(), "repository returned an already used item");
        return None;
    }
    Some(item)
}

/// Write the final score once, retrying a failed write a single time
fn persist<R: ItemRepository>(repository: &mut R, state: &mut RoundState) -> SaveStatus {
    if let Some(status) = state.save_status() {
        return status;
    }

    let (player_id, score, mode) = (state.player().id, state.score(), state.mode());
    let status = match repository.record_score(player_id, score, mode) {
        Ok(()) => SaveStatus::Saved,
        Err(first) => {
            warn!(error = %first, "saving score failed, retrying");
            match repository.record_score(player_id, score, mode) {
                Ok(()) => SaveStatus::Saved,
                Err(err) => {
                    warn!(error = %err, score, "score not saved");
                    SaveStatus::NotSaved
                }
            }
        }
    };

    state.save_status = Some(status);
    status
}

fn end_round<R: ItemRepository>(
    repository: &mut R,
    state: &mut RoundState,
    kind: OutcomeKind,
    correct: bool,
    mut message: String,
) -> GuessOutcome {
    state.finish(kind);
    let status = persist(repository, state);

    message.push_str(&game_over_summary(state, kind));
    if status == SaveStatus::NotSaved {
        message.push_str("\n⚠️  Score could not be saved.");
    }

    info!(
        score = state.score(),
        mode = state.mode().tag(),
        reason = ?kind,
        saved = status == SaveStatus::Saved,
        "round over"
    );

    GuessOutcome {
        correct,
        kind,
        message,
        save_status: Some(status),
    }
}

fn game_over_summary(state: &RoundState, kind: OutcomeKind) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let reason = match kind {
        OutcomeKind::PoolExhausted => "No unseen items left!\n",
        _ => "",
    };
    let mode_line = match state.mode() {
        GameMode::Classic => String::new(),
        GameMode::SuddenDeath => "Sudden death: one mistake was enough!\n".to_string(),
        GameMode::TimeLimited => format!(
            "Time remaining: {}\n",
            format_seconds(state.time_remaining().unwrap_or_default())
        ),
    };

    format!(
        "\n\n{rule}\nGAME OVER!\n{reason}Score: {}\n{mode_line}Your best: {}\n{rule}",
        state.score(),
        state.high_score()
    )
}
