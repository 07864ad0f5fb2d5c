//! Top scores per mode

use crate::core::GameMode;
use crate::repository::{ItemRepository, LeaderboardEntry, unavailable_or};

/// Rows shown per mode unless overridden
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardSection {
    pub mode: GameMode,
    pub entries: Vec<LeaderboardEntry>,
}

/// One section per requested mode, in the order given
pub fn leaderboard<R: ItemRepository>(
    repository: &R,
    modes: &[GameMode],
    limit: usize,
) -> Vec<LeaderboardSection> {
    modes
        .iter()
        .map(|&mode| LeaderboardSection {
            mode,
            entries: unavailable_or(repository.top_scores(mode, limit), "leaderboard"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Username;
    use crate::repository::{InMemoryRepository, PlayerRegistry};

    #[test]
    fn sections_follow_requested_modes() {
        let mut repo = InMemoryRepository::new();
        let me = repo
            .get_or_create_player(&Username::new("aino").unwrap())
            .unwrap();
        repo.record_score(me.id, 3, GameMode::SuddenDeath).unwrap();

        let board = leaderboard(&repo, &GameMode::ALL, DEFAULT_LIMIT);
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].mode, GameMode::Classic);
        assert!(board[0].entries.is_empty());
        assert_eq!(board[1].entries.len(), 1);
        assert_eq!(board[1].entries[0].username, "aino");
    }

    #[test]
    fn limit_is_applied() {
        let mut repo = InMemoryRepository::new();
        let me = repo
            .get_or_create_player(&Username::new("aino").unwrap())
            .unwrap();
        for score in 0..15 {
            repo.record_score(me.id, score, GameMode::Classic).unwrap();
        }

        let board = leaderboard(&repo, &[GameMode::Classic], DEFAULT_LIMIT);
        assert_eq!(board[0].entries.len(), DEFAULT_LIMIT);
        assert_eq!(board[0].entries[0].score, 14);
    }
}
