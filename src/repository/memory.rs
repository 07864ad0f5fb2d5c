//! In-process repository
//!
//! Keeps reference rows and score history in vectors. Used by `--in-memory`
//! runs and as a fast fixture in tests.

use super::{
    ItemRepository, LeaderboardEntry, PlayerRegistry, PlayerStats, RecentGame, RepositoryError,
    Result, SeedStats, round_tenth,
};
use crate::core::{Airport, AirportClass, Country, GameMode, Player, PlayerId, Username};
use crate::dataset::loader::{airports_from_embedded, countries_from_embedded};
use crate::dataset::{AIRPORTS, AirportRecord, COUNTRIES, CountryRecord};
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone)]
struct ScoreEntry {
    player_id: PlayerId,
    score: u32,
    mode: GameMode,
    played_at: DateTime<Utc>,
}

/// Vector-backed [`ItemRepository`] and [`PlayerRegistry`]
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    airports: Vec<AirportRecord>,
    countries: Vec<CountryRecord>,
    country_names: FxHashMap<String, String>,
    players: Vec<Player>,
    // Insertion order doubles as the tie breaker for equal timestamps
    scores: Vec<ScoreEntry>,
}

impl InMemoryRepository {
    /// Empty repository with no reference data
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_reference_data(
        airports: Vec<AirportRecord>,
        countries: Vec<CountryRecord>,
    ) -> Self {
        let mut repo = Self::new();
        repo.seed_reference_data(airports, countries);
        repo
    }

    /// Repository seeded from the embedded tables
    #[must_use]
    pub fn from_embedded() -> Self {
        Self::with_reference_data(
            airports_from_embedded(AIRPORTS),
            countries_from_embedded(COUNTRIES),
        )
    }

    /// Replace rows with matching keys and append the rest
    pub fn seed_reference_data(
        &mut self,
        airports: Vec<AirportRecord>,
        countries: Vec<CountryRecord>,
    ) -> SeedStats {
        let stats = SeedStats {
            airports: airports.len(),
            countries: countries.len(),
        };

        for country in countries {
            self.country_names
                .insert(country.iso_country.clone(), country.name.clone());
            match self
                .countries
                .iter_mut()
                .find(|c| c.iso_country == country.iso_country)
            {
                Some(existing) => *existing = country,
                None => self.countries.push(country),
            }
        }

        for airport in airports {
            match self.airports.iter_mut().find(|a| a.id == airport.id) {
                Some(existing) => *existing = airport,
                None => self.airports.push(airport),
            }
        }

        stats
    }

    #[must_use]
    pub fn reference_counts(&self) -> SeedStats {
        SeedStats {
            airports: self.airports.len(),
            countries: self.countries.len(),
        }
    }

    fn to_airport(&self, record: &AirportRecord) -> Airport {
        Airport {
            id: record.id,
            ident: record.ident.clone(),
            class: AirportClass::from_tag(&record.kind),
            name: record.name.clone(),
            latitude_deg: record.latitude_deg,
            longitude_deg: record.longitude_deg,
            elevation_ft: record.elevation_ft,
            continent: record.continent.clone(),
            iso_country: record.iso_country.clone(),
            municipality: record.municipality.clone(),
            country_name: record
                .iso_country
                .as_ref()
                .and_then(|code| self.country_names.get(code))
                .cloned(),
        }
    }

    fn has_player(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    fn scores_of(&self, player_id: PlayerId) -> impl Iterator<Item = &ScoreEntry> {
        self.scores.iter().filter(move |s| s.player_id == player_id)
    }

    fn username_of(&self, player_id: PlayerId) -> String {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.username.clone())
            .unwrap_or_default()
    }
}

impl ItemRepository for InMemoryRepository {
    fn sample_airport(&self, exclude_ids: &FxHashSet<i64>) -> Result<Option<Airport>> {
        let eligible: Vec<&AirportRecord> = self
            .airports
            .iter()
            .filter(|a| AirportClass::from_tag(&a.kind).is_sampled())
            .filter(|a| !exclude_ids.contains(&a.id))
            .collect();

        Ok(eligible
            .choose(&mut rand::rng())
            .map(|record| self.to_airport(record)))
    }

    fn sample_country(&self, exclude_codes: &FxHashSet<String>) -> Result<Option<Country>> {
        let eligible: Vec<(&CountryRecord, i64)> = self
            .countries
            .iter()
            .filter(|c| !exclude_codes.contains(&c.iso_country))
            .filter_map(|c| c.population.map(|population| (c, population)))
            .collect();

        Ok(eligible
            .choose(&mut rand::rng())
            .map(|&(record, population)| Country {
                iso_country: record.iso_country.clone(),
                name: record.name.clone(),
                continent: record.continent.clone(),
                population,
                wikipedia_link: record.wikipedia_link.clone(),
                keywords: record.keywords.clone(),
            }))
    }

    fn record_score(&mut self, player_id: PlayerId, score: u32, mode: GameMode) -> Result<()> {
        if !self.has_player(player_id) {
            return Err(RepositoryError::UnknownPlayer(player_id));
        }
        self.scores.push(ScoreEntry {
            player_id,
            score,
            mode,
            played_at: Utc::now(),
        });
        Ok(())
    }

    fn best_score(&self, player_id: PlayerId, mode: GameMode) -> Result<u32> {
        Ok(self
            .scores_of(player_id)
            .filter(|s| s.mode == mode)
            .map(|s| s.score)
            .max()
            .unwrap_or(0))
    }

    fn recent_games(&self, player_id: PlayerId, limit: usize) -> Result<Vec<RecentGame>> {
        let mut entries: Vec<(usize, &ScoreEntry)> = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.player_id == player_id)
            .collect();
        entries.sort_by(|(ia, a), (ib, b)| b.played_at.cmp(&a.played_at).then(ib.cmp(ia)));

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|(_, s)| RecentGame {
                score: s.score,
                mode: s.mode,
                played_at: s.played_at,
            })
            .collect())
    }

    fn top_scores(&self, mode: GameMode, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut entries: Vec<(usize, &ScoreEntry)> = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, s)| s.mode == mode)
            .collect();
        entries.sort_by(|(ia, a), (ib, b)| {
            b.score
                .cmp(&a.score)
                .then(a.played_at.cmp(&b.played_at))
                .then(ia.cmp(ib))
        });

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|(_, s)| LeaderboardEntry {
                username: self.username_of(s.player_id),
                score: s.score,
                played_at: s.played_at,
            })
            .collect())
    }

    fn aggregate_stats(&self, player_id: PlayerId) -> Result<PlayerStats> {
        let scores: Vec<u32> = self.scores_of(player_id).map(|s| s.score).collect();
        if scores.is_empty() {
            return Ok(PlayerStats::default());
        }

        let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        Ok(PlayerStats {
            games_played: scores.len() as u32,
            best: scores.iter().copied().max().unwrap_or(0),
            average: round_tenth(total as f64 / scores.len() as f64),
            worst: scores.iter().copied().min().unwrap_or(0),
        })
    }
}

impl PlayerRegistry for InMemoryRepository {
    fn find_player(&self, username: &Username) -> Result<Option<Player>> {
        Ok(self
            .players
            .iter()
            .find(|p| p.username == username.as_str())
            .cloned())
    }

    fn get_or_create_player(&mut self, username: &Username) -> Result<Player> {
        if let Some(player) = self.find_player(username)? {
            return Ok(player);
        }

        let player = Player {
            id: PlayerId(self.players.len() as i64 + 1),
            username: username.to_string(),
        };
        self.players.push(player.clone());
        Ok(player)
    }
}
