//! Result of one call into the engine

/// Whether the final score reached the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// Both the write and its single retry failed
    NotSaved,
}

/// What a guess (or a time check) did to the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Correct,
    /// Wrong guess with lives left
    Wrong,
    /// Wrong guess that used the last life
    OutOfLives,
    /// Time budget ran out before the guess was evaluated
    TimedOut,
    /// No unseen item left to compare against
    PoolExhausted,
    /// The round had already ended; nothing changed
    AlreadyEnded,
    /// No round has been started
    NotStarted,
}

impl OutcomeKind {
    /// True for the outcomes that move the round to game over
    #[must_use]
    pub const fn ends_round(self) -> bool {
        matches!(self, Self::OutOfLives | Self::TimedOut | Self::PoolExhausted)
    }
}

/// Narrated result of a guess
///
/// The message channel covers normal play as well as terminal and invalid
/// calls; `kind` is the machine-readable counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub correct: bool,
    pub kind: OutcomeKind,
    pub message: String,
    /// Set once the round has ended and persistence was attempted
    pub save_status: Option<SaveStatus>,
}

impl GuessOutcome {
    pub(crate) fn new(correct: bool, kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            correct,
            kind,
            message: message.into(),
            save_status: None,
        }
    }

    pub(crate) fn not_started() -> Self {
        Self::new(false, OutcomeKind::NotStarted, "No round in progress")
    }

    pub(crate) fn already_ended(save_status: Option<SaveStatus>) -> Self {
        Self {
            save_status,
            ..Self::new(false, OutcomeKind::AlreadyEnded, "Round already ended")
        }
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(
            self.kind,
            OutcomeKind::OutOfLives
                | OutcomeKind::TimedOut
                | OutcomeKind::PoolExhausted
                | OutcomeKind::AlreadyEnded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_kinds() {
        assert!(OutcomeKind::OutOfLives.ends_round());
        assert!(OutcomeKind::TimedOut.ends_round());
        assert!(OutcomeKind::PoolExhausted.ends_round());
        assert!(!OutcomeKind::Wrong.ends_round());
        assert!(!OutcomeKind::AlreadyEnded.ends_round());
    }

    #[test]
    fn invalid_calls_are_not_correct() {
        assert!(!GuessOutcome::not_started().correct);
        let ended = GuessOutcome::already_ended(Some(SaveStatus::Saved));
        assert!(!ended.correct);
        assert!(ended.is_game_over());
        assert_eq!(ended.save_status, Some(SaveStatus::Saved));
    }
}
