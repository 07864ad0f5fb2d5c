//! Data-access contract for the game
//!
//! The engine only talks to an [`ItemRepository`]: random item sampling with
//! exclusion, append-only score persistence and aggregate reads. Login flows
//! additionally use a [`PlayerRegistry`].

mod error;
pub mod memory;
pub mod sqlite;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;

use crate::core::{Airport, Country, GameMode, Player, PlayerId, Username};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;

/// One entry from a player's score history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentGame {
    pub score: u32,
    pub mode: GameMode,
    pub played_at: DateTime<Utc>,
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
    pub played_at: DateTime<Utc>,
}

/// Aggregate statistics over every score a player has recorded
///
/// All zero when the player has not finished a game yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerStats {
    pub games_played: u32,
    pub best: u32,
    /// Mean score rounded to one decimal
    pub average: f64,
    pub worst: u32,
}

/// Rows written by a seeding or import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub airports: usize,
    pub countries: usize,
}

/// Item sampling and score persistence
///
/// Sampling is uniformly random over the eligible population. Implementations
/// report transport failures as errors; callers decide how to degrade (see
/// [`unavailable_or`]).
pub trait ItemRepository {
    /// Random large or medium airport whose id is not in `exclude_ids`
    ///
    /// Returns `Ok(None)` when no eligible row remains.
    fn sample_airport(&self, exclude_ids: &FxHashSet<i64>) -> Result<Option<Airport>>;

    /// Random country with known population whose code is not in `exclude_codes`
    fn sample_country(&self, exclude_codes: &FxHashSet<String>) -> Result<Option<Country>>;

    /// Append one score entry; prior entries are never overwritten
    fn record_score(&mut self, player_id: PlayerId, score: u32, mode: GameMode) -> Result<()>;

    /// Highest recorded score for the player in `mode`, or 0
    fn best_score(&self, player_id: PlayerId, mode: GameMode) -> Result<u32>;

    /// Most recent games first
    fn recent_games(&self, player_id: PlayerId, limit: usize) -> Result<Vec<RecentGame>>;

    /// Highest scores in `mode`, descending
    ///
    /// Equal scores are ordered by who reached them first.
    fn top_scores(&self, mode: GameMode, limit: usize) -> Result<Vec<LeaderboardEntry>>;

    fn aggregate_stats(&self, player_id: PlayerId) -> Result<PlayerStats>;
}

/// Player lookup and registration
pub trait PlayerRegistry {
    fn find_player(&self, username: &Username) -> Result<Option<Player>>;

    /// Existing player with this name, or a newly registered one
    fn get_or_create_player(&mut self, username: &Username) -> Result<Player>;
}

impl<R: ItemRepository + ?Sized> ItemRepository for &mut R {
    fn sample_airport(&self, exclude_ids: &FxHashSet<i64>) -> Result<Option<Airport>> {
        (**self).sample_airport(exclude_ids)
    }

    fn sample_country(&self, exclude_codes: &FxHashSet<String>) -> Result<Option<Country>> {
        (**self).sample_country(exclude_codes)
    }

    fn record_score(&mut self, player_id: PlayerId, score: u32, mode: GameMode) -> Result<()> {
        (**self).record_score(player_id, score, mode)
    }

    fn best_score(&self, player_id: PlayerId, mode: GameMode) -> Result<u32> {
        (**self).best_score(player_id, mode)
    }

    fn recent_games(&self, player_id: PlayerId, limit: usize) -> Result<Vec<RecentGame>> {
        (**self).recent_games(player_id, limit)
    }

    fn top_scores(&self, mode: GameMode, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        (**self).top_scores(mode, limit)
    }

    fn aggregate_stats(&self, player_id: PlayerId) -> Result<PlayerStats> {
        (**self).aggregate_stats(player_id)
    }
}

impl<R: PlayerRegistry + ?Sized> PlayerRegistry for &mut R {
    fn find_player(&self, username: &Username) -> Result<Option<Player>> {
        (**self).find_player(username)
    }

    fn get_or_create_player(&mut self, username: &Username) -> Result<Player> {
        (**self).get_or_create_player(username)
    }
}

/// Degrade a failed read to its "no data yet" value
///
/// A data-access failure must never end a round, so reads fall back to the
/// empty/zero/absent result and the failure is logged.
pub fn unavailable_or<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "{what} unavailable");
        T::default()
    })
}

/// Round a mean to one decimal place
#[must_use]
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_or_passes_values_through() {
        assert_eq!(unavailable_or(Ok(7_u32), "best score"), 7);
    }

    #[test]
    fn unavailable_or_defaults_on_error() {
        let failed: Result<Vec<RecentGame>> =
            Err(RepositoryError::InvalidData("boom".to_string()));
        assert!(unavailable_or(failed, "recent games").is_empty());

        let failed: Result<PlayerStats> = Err(RepositoryError::UnknownPlayer(PlayerId(9)));
        assert_eq!(unavailable_or(failed, "stats"), PlayerStats::default());
    }

    #[test]
    fn round_tenth_rounds_half_up() {
        assert!((round_tenth(3.333) - 3.3).abs() < f64::EPSILON);
        assert!((round_tenth(2.25) - 2.3).abs() < 1e-9);
        assert!((round_tenth(0.0)).abs() < f64::EPSILON);
    }
}
