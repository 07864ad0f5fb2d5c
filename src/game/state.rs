//! Mutable record of one round
//!
//! Only the engine mutates a [`RoundState`]; everything else sees it through
//! shared references or a [`DisplaySnapshot`](super::DisplaySnapshot).

use super::outcome::{OutcomeKind, SaveStatus};
use crate::core::{GameMode, Item, ItemKey, Player, QuestionType};
use rustc_hash::FxHashSet;
use std::time::{Duration, Instant};

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    GameOver,
}

/// Identifiers already shown in the current round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedItems {
    pub(crate) airport_ids: FxHashSet<i64>,
    pub(crate) country_codes: FxHashSet<String>,
}

impl UsedItems {
    pub(crate) fn insert(&mut self, key: ItemKey) -> bool {
        match key {
            ItemKey::Airport(id) => self.airport_ids.insert(id),
            ItemKey::Country(code) => self.country_codes.insert(code),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &ItemKey) -> bool {
        match key {
            ItemKey::Airport(id) => self.airport_ids.contains(id),
            ItemKey::Country(code) => self.country_codes.contains(code),
        }
    }

    #[must_use]
    pub fn airport_ids(&self) -> &FxHashSet<i64> {
        &self.airport_ids
    }

    #[must_use]
    pub fn country_codes(&self) -> &FxHashSet<String> {
        &self.country_codes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.airport_ids.len() + self.country_codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One round from start to game over
#[derive(Debug, Clone)]
pub struct RoundState {
    pub(crate) player: Player,
    pub(crate) question_type: QuestionType,
    pub(crate) mode: GameMode,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    /// Best recorded score at round start
    pub(crate) previous_best: u32,
    pub(crate) high_score: u32,
    pub(crate) current: Item,
    pub(crate) next: Item,
    pub(crate) revealed: bool,
    pub(crate) used: UsedItems,
    pub(crate) started_at: Instant,
    pub(crate) time_remaining: Option<Duration>,
    pub(crate) game_over: bool,
    pub(crate) end: Option<OutcomeKind>,
    pub(crate) save_status: Option<SaveStatus>,
}

impl RoundState {
    pub(crate) fn new(
        player: Player,
        question_type: QuestionType,
        mode: GameMode,
        high_score: u32,
        (current, next): (Item, Item),
        used: UsedItems,
        started_at: Instant,
    ) -> Self {
        Self {
            player,
            question_type,
            mode,
            score: 0,
            lives: mode.initial_lives(),
            previous_best: high_score,
            high_score,
            current,
            next,
            revealed: false,
            used,
            started_at,
            time_remaining: mode.time_budget(),
            game_over: false,
            end: None,
            save_status: None,
        }
    }

    /// Recompute the remaining budget; returns true once it is used up
    pub(crate) fn refresh_time(&mut self, now: Instant) -> bool {
        let Some(budget) = self.mode.time_budget() else {
            return false;
        };
        let elapsed = now.saturating_duration_since(self.started_at);
        let remaining = budget.saturating_sub(elapsed);
        self.time_remaining = Some(remaining);
        remaining.is_zero()
    }

    /// Move to game over; the first recorded reason wins
    pub(crate) fn finish(&mut self, kind: OutcomeKind) {
        self.game_over = true;
        self.end.get_or_insert(kind);
    }

    pub(crate) fn reward(&mut self) {
        self.score += 1;
        self.high_score = self.high_score.max(self.score);
    }

    /// Take one life; returns true when none are left
    pub(crate) fn penalize(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }

    pub(crate) fn advance(&mut self, next: Item) {
        self.current = std::mem::replace(&mut self.next, next);
    }

    pub(crate) fn replace_next(&mut self, next: Item) {
        self.next = next;
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub const fn question_type(&self) -> QuestionType {
        self.question_type
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Highest of the recorded best and the running score
    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub const fn previous_best(&self) -> u32 {
        self.previous_best
    }

    /// True once the score beats the best recorded before this round
    #[must_use]
    pub const fn is_new_record(&self) -> bool {
        self.score > self.previous_best
    }

    #[must_use]
    pub const fn current_item(&self) -> &Item {
        &self.current
    }

    #[must_use]
    pub const fn next_item(&self) -> &Item {
        &self.next
    }

    /// Whether the current value may be shown
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Why the round ended, once it has
    #[must_use]
    pub const fn end_kind(&self) -> Option<OutcomeKind> {
        self.end
    }

    #[must_use]
    pub const fn used_items(&self) -> &UsedItems {
        &self.used
    }

    /// Remaining budget as of the last time check, time-limited rounds only
    #[must_use]
    pub const fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining
    }

    #[must_use]
    pub const fn save_status(&self) -> Option<SaveStatus> {
        self.save_status
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            Phase::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Country, PlayerId};

    fn country(code: &str, population: i64) -> Item {
        Item::Country(Country {
            iso_country: code.to_string(),
            name: code.to_string(),
            continent: None,
            population,
            wikipedia_link: None,
            keywords: None,
        })
    }

    fn state(mode: GameMode, now: Instant) -> RoundState {
        let player = Player {
            id: PlayerId(1),
            username: "aino".to_string(),
        };
        RoundState::new(
            player,
            QuestionType::Population,
            mode,
            4,
            (country("FI", 5), country("SE", 10)),
            UsedItems::default(),
            now,
        )
    }

    #[test]
    fn initial_budget_per_mode() {
        let now = Instant::now();
        let classic = state(GameMode::Classic, now);
        assert_eq!(classic.lives(), 3);
        assert_eq!(classic.time_remaining(), None);
        assert!(!classic.is_revealed());

        let timed = state(GameMode::TimeLimited, now);
        assert_eq!(timed.lives(), 1);
        assert_eq!(timed.time_remaining(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn refresh_time_counts_down_and_saturates() {
        let now = Instant::now();
        let mut timed = state(GameMode::TimeLimited, now);

        assert!(!timed.refresh_time(now + Duration::from_secs(20)));
        assert_eq!(timed.time_remaining(), Some(Duration::from_secs(40)));

        assert!(timed.refresh_time(now + Duration::from_secs(75)));
        assert_eq!(timed.time_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn refresh_time_ignored_without_budget() {
        let now = Instant::now();
        let mut classic = state(GameMode::Classic, now);
        assert!(!classic.refresh_time(now + Duration::from_secs(3_600)));
        assert_eq!(classic.time_remaining(), None);
    }

    #[test]
    fn reward_tracks_high_score() {
        let mut s = state(GameMode::Classic, Instant::now());
        for _ in 0..4 {
            s.reward();
        }
        assert_eq!(s.high_score(), 4);
        assert!(!s.is_new_record());

        s.reward();
        assert_eq!(s.high_score(), 5);
        assert_eq!(s.previous_best(), 4);
        assert!(s.is_new_record());
    }

    #[test]
    fn penalize_never_goes_negative() {
        let mut s = state(GameMode::SuddenDeath, Instant::now());
        assert!(s.penalize());
        assert!(s.penalize());
        assert_eq!(s.lives(), 0);
    }

    #[test]
    fn advance_shifts_next_into_current() {
        let mut s = state(GameMode::Classic, Instant::now());
        s.advance(country("NO", 7));
        assert_eq!(s.current_item().key(), ItemKey::Country("SE".to_string()));
        assert_eq!(s.next_item().key(), ItemKey::Country("NO".to_string()));
    }

    #[test]
    fn end_keeps_first_reason() {
        let mut s = state(GameMode::TimeLimited, Instant::now());
        s.finish(OutcomeKind::TimedOut);
        s.finish(OutcomeKind::OutOfLives);
        assert!(s.is_game_over());
        assert_eq!(s.phase(), Phase::GameOver);
        assert_eq!(s.end_kind(), Some(OutcomeKind::TimedOut));
    }

    #[test]
    fn used_items_by_kind() {
        let mut used = UsedItems::default();
        assert!(used.insert(ItemKey::Airport(3)));
        assert!(!used.insert(ItemKey::Airport(3)));
        assert!(used.insert(ItemKey::Country("FI".to_string())));

        assert!(used.contains(&ItemKey::Airport(3)));
        assert!(!used.contains(&ItemKey::Country("SE".to_string())));
        assert_eq!(used.len(), 2);
    }
}
