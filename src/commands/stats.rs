//! Personal statistics

use crate::core::Player;
use crate::repository::{ItemRepository, PlayerStats, RecentGame, unavailable_or};

/// Number of games listed under "recent games"
pub const RECENT_GAMES: usize = 5;

/// Everything the stats screen shows for one player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub username: String,
    pub stats: PlayerStats,
    pub recent: Vec<RecentGame>,
}

impl PlayerReport {
    #[must_use]
    pub const fn has_games(&self) -> bool {
        self.stats.games_played > 0
    }
}

/// Gather stats and recent games; read failures show as "no data yet"
pub fn player_report<R: ItemRepository>(repository: &R, player: &Player) -> PlayerReport {
    PlayerReport {
        username: player.username.clone(),
        stats: unavailable_or(repository.aggregate_stats(player.id), "player stats"),
        recent: unavailable_or(
            repository.recent_games(player.id, RECENT_GAMES),
            "recent games",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameMode, Username};
    use crate::repository::{InMemoryRepository, PlayerRegistry};

    #[test]
    fn new_player_report_is_empty() {
        let mut repo = InMemoryRepository::new();
        let me = repo
            .get_or_create_player(&Username::new("aino").unwrap())
            .unwrap();

        let report = player_report(&repo, &me);
        assert!(!report.has_games());
        assert_eq!(report.stats, PlayerStats::default());
        assert!(report.recent.is_empty());
    }

    #[test]
    fn report_lists_at_most_five_recent_games() {
        let mut repo = InMemoryRepository::new();
        let me = repo
            .get_or_create_player(&Username::new("aino").unwrap())
            .unwrap();
        for score in 0..8 {
            repo.record_score(me.id, score, GameMode::Classic).unwrap();
        }

        let report = player_report(&repo, &me);
        assert!(report.has_games());
        assert_eq!(report.stats.games_played, 8);
        assert_eq!(report.recent.len(), RECENT_GAMES);
        assert_eq!(report.recent[0].score, 7);
    }
}
