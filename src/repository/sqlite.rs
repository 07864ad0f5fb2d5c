//! SQLite-backed repository
//!
//! Reference tables (`airport`, `country`) and the append-only score history
//! (`players`, `high_scores`) live in one database file.

use super::{
    ItemRepository, LeaderboardEntry, PlayerRegistry, PlayerStats, RecentGame, RepositoryError,
    Result, SeedStats, round_tenth,
};
use crate::core::{Airport, AirportClass, Country, GameMode, Player, PlayerId, Username};
use crate::dataset::{AirportRecord, CountryRecord};
use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, ToSql, params, params_from_iter};
use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = r"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS players (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  username TEXT NOT NULL UNIQUE,
  created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS high_scores (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  player_id INTEGER NOT NULL REFERENCES players(id),
  score INTEGER NOT NULL CHECK (score >= 0),
  game_mode TEXT NOT NULL,
  played_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS high_scores_player ON high_scores (player_id, game_mode);
CREATE INDEX IF NOT EXISTS high_scores_mode ON high_scores (game_mode, score);

CREATE TABLE IF NOT EXISTS country (
  iso_country TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  continent TEXT,
  population INTEGER,
  wikipedia_link TEXT,
  keywords TEXT
);

CREATE TABLE IF NOT EXISTS airport (
  id INTEGER PRIMARY KEY,
  ident TEXT NOT NULL,
  type TEXT NOT NULL,
  name TEXT NOT NULL,
  latitude_deg REAL,
  longitude_deg REAL,
  elevation_ft INTEGER,
  continent TEXT,
  iso_country TEXT,
  municipality TEXT
);
";

const AIRPORT_SELECT: &str = "
SELECT a.id, a.ident, a.type, a.name, a.latitude_deg, a.longitude_deg,
       a.elevation_ft, a.continent, a.iso_country, a.municipality, c.name
FROM airport a
LEFT JOIN country c ON a.iso_country = c.iso_country";

const COUNTRY_SELECT: &str = "
SELECT iso_country, name, continent, population, wikipedia_link, keywords
FROM country
WHERE population IS NOT NULL";

impl ToSql for GameMode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.tag()))
    }
}

impl FromSql for GameMode {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let tag = value.as_str()?;
        Self::from_name(tag)
            .ok_or_else(|| FromSqlError::Other(format!("unknown game mode '{tag}'").into()))
    }
}

impl ToSql for PlayerId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for PlayerId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(Self)
    }
}

/// Repository over a single SQLite connection
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open (or create) a database file and ensure the schema exists
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the schema cannot be applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        Self::init(Connection::open(path)?)
    }

    /// Fresh private in-memory database
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be applied.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of airport and country rows currently stored
    ///
    /// # Errors
    ///
    /// Returns an error if the count queries fail.
    pub fn reference_counts(&self) -> Result<SeedStats> {
        let airports: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM airport", [], |row| row.get(0))?;
        let countries: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM country", [], |row| row.get(0))?;
        Ok(SeedStats {
            airports: airports as usize,
            countries: countries as usize,
        })
    }

    /// Insert or replace reference rows in a single transaction
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn seed_reference_data(
        &mut self,
        airports: &[AirportRecord],
        countries: &[CountryRecord],
    ) -> Result<SeedStats> {
        self.seed_reference_data_with(airports, countries, |_| {})
    }

    /// Like [`Self::seed_reference_data`], calling `progress` after every row
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; nothing is written in that case.
    pub fn seed_reference_data_with(
        &mut self,
        airports: &[AirportRecord],
        countries: &[CountryRecord],
        mut progress: impl FnMut(usize),
    ) -> Result<SeedStats> {
        let tx = self.conn.transaction()?;
        let mut written = 0;

        {
            let mut insert_country = tx.prepare(
                "INSERT OR REPLACE INTO country
                 (iso_country, name, continent, population, wikipedia_link, keywords)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for country in countries {
                insert_country.execute(params![
                    country.iso_country,
                    country.name,
                    country.continent,
                    country.population,
                    country.wikipedia_link,
                    country.keywords,
                ])?;
                written += 1;
                progress(written);
            }

            let mut insert_airport = tx.prepare(
                "INSERT OR REPLACE INTO airport
                 (id, ident, type, name, latitude_deg, longitude_deg, elevation_ft,
                  continent, iso_country, municipality)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for airport in airports {
                insert_airport.execute(params![
                    airport.id,
                    airport.ident,
                    airport.kind,
                    airport.name,
                    airport.latitude_deg,
                    airport.longitude_deg,
                    airport.elevation_ft,
                    airport.continent,
                    airport.iso_country,
                    airport.municipality,
                ])?;
                written += 1;
                progress(written);
            }
        }

        tx.commit()?;
        info!(
            airports = airports.len(),
            countries = countries.len(),
            "reference data written"
        );

        Ok(SeedStats {
            airports: airports.len(),
            countries: countries.len(),
        })
    }

    /// Delete every airport and country row; score history is kept
    ///
    /// # Errors
    ///
    /// Returns an error if the deletes fail.
    pub fn clear_reference_data(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM airport", [])?;
        tx.execute("DELETE FROM country", [])?;
        tx.commit()?;
        Ok(())
    }
}

/// ` AND column NOT IN (?, ?, ...)` or nothing for an empty exclusion set
fn not_in_clause(column: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }
    format!(" AND {column} NOT IN ({})", vec!["?"; count].join(", "))
}

fn sampled_classes() -> String {
    AirportClass::SAMPLED_TAGS
        .iter()
        .map(|tag| format!("'{tag}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn airport_from_row(row: &Row<'_>) -> rusqlite::Result<Airport> {
    let class: String = row.get(2)?;
    Ok(Airport {
        id: row.get(0)?,
        ident: row.get(1)?,
        class: AirportClass::from_tag(&class),
        name: row.get(3)?,
        latitude_deg: row.get(4)?,
        longitude_deg: row.get(5)?,
        elevation_ft: row.get(6)?,
        continent: row.get(7)?,
        iso_country: row.get(8)?,
        municipality: row.get(9)?,
        country_name: row.get(10)?,
    })
}

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        iso_country: row.get(0)?,
        name: row.get(1)?,
        continent: row.get(2)?,
        population: row.get(3)?,
        wikipedia_link: row.get(4)?,
        keywords: row.get(5)?,
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl ItemRepository for SqliteRepository {
    fn sample_airport(&self, exclude_ids: &FxHashSet<i64>) -> Result<Option<Airport>> {
        let sql = format!(
            "{AIRPORT_SELECT} WHERE a.type IN ({}){} ORDER BY RANDOM() LIMIT 1",
            sampled_classes(),
            not_in_clause("a.id", exclude_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let airport = stmt
            .query_row(params_from_iter(exclude_ids.iter()), airport_from_row)
            .optional()?;
        debug!(excluded = exclude_ids.len(), found = airport.is_some(), "sampled airport");
        Ok(airport)
    }

    fn sample_country(&self, exclude_codes: &FxHashSet<String>) -> Result<Option<Country>> {
        let sql = format!(
            "{COUNTRY_SELECT}{} ORDER BY RANDOM() LIMIT 1",
            not_in_clause("iso_country", exclude_codes.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let country = stmt
            .query_row(params_from_iter(exclude_codes.iter()), country_from_row)
            .optional()?;
        debug!(excluded = exclude_codes.len(), found = country.is_some(), "sampled country");
        Ok(country)
    }

    fn record_score(&mut self, player_id: PlayerId, score: u32, mode: GameMode) -> Result<()> {
        let inserted = self.conn.execute(
            "INSERT INTO high_scores (player_id, score, game_mode, played_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![player_id, score, mode, Utc::now()],
        );

        match inserted {
            Ok(_) => {
                debug!(%player_id, score, mode = mode.tag(), "score recorded");
                Ok(())
            }
            Err(err) if is_constraint_violation(&err) => {
                Err(RepositoryError::UnknownPlayer(player_id))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn best_score(&self, player_id: PlayerId, mode: GameMode) -> Result<u32> {
        let best: Option<u32> = self.conn.query_row(
            "SELECT MAX(score) FROM high_scores WHERE player_id = ?1 AND game_mode = ?2",
            params![player_id, mode],
            |row| row.get(0),
        )?;
        Ok(best.unwrap_or(0))
    }

    fn recent_games(&self, player_id: PlayerId, limit: usize) -> Result<Vec<RecentGame>> {
        let mut stmt = self.conn.prepare(
            "SELECT score, game_mode, played_at FROM high_scores
             WHERE player_id = ?1
             ORDER BY played_at DESC, id DESC
             LIMIT ?2",
        )?;
        let games = stmt
            .query_map(params![player_id, limit as i64], |row| {
                Ok(RecentGame {
                    score: row.get(0)?,
                    mode: row.get(1)?,
                    played_at: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(games)
    }

    fn top_scores(&self, mode: GameMode, limit: usize) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.username, h.score, h.played_at
             FROM high_scores h
             JOIN players p ON h.player_id = p.id
             WHERE h.game_mode = ?1
             ORDER BY h.score DESC, h.played_at ASC, h.id ASC
             LIMIT ?2",
        )?;
        let entries = stmt
            .query_map(params![mode, limit as i64], |row| {
                Ok(LeaderboardEntry {
                    username: row.get(0)?,
                    score: row.get(1)?,
                    played_at: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn aggregate_stats(&self, player_id: PlayerId) -> Result<PlayerStats> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), MAX(score), AVG(score), MIN(score)
             FROM high_scores WHERE player_id = ?1",
            params![player_id],
            |row| {
                Ok(PlayerStats {
                    games_played: row.get(0)?,
                    best: row.get::<_, Option<u32>>(1)?.unwrap_or(0),
                    average: row.get::<_, Option<f64>>(2)?.map_or(0.0, round_tenth),
                    worst: row.get::<_, Option<u32>>(3)?.unwrap_or(0),
                })
            },
        )?;
        Ok(stats)
    }
}

impl PlayerRegistry for SqliteRepository {
    fn find_player(&self, username: &Username) -> Result<Option<Player>> {
        let player = self
            .conn
            .query_row(
                "SELECT id, username FROM players WHERE username = ?1",
                params![username.as_str()],
                |row| {
                    Ok(Player {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(player)
    }

    fn get_or_create_player(&mut self, username: &Username) -> Result<Player> {
        if let Some(player) = self.find_player(username)? {
            return Ok(player);
        }

        let inserted = self.conn.execute(
            "INSERT INTO players (username, created_at) VALUES (?1, ?2)",
            params![username.as_str(), Utc::now()],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_constraint_violation(&err) => {
                return Err(RepositoryError::DuplicatePlayer(username.to_string()));
            }
            Err(err) => return Err(err.into()),
        }

        let player = Player {
            id: PlayerId(self.conn.last_insert_rowid()),
            username: username.to_string(),
        };
        info!(player_id = %player.id, username = %player.username, "registered player");
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::loader::{airports_from_embedded, countries_from_embedded};
    use crate::dataset::{AIRPORTS, COUNTRIES};

    fn seeded() -> SqliteRepository {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        repo.seed_reference_data(
            &airports_from_embedded(AIRPORTS),
            &countries_from_embedded(COUNTRIES),
        )
        .unwrap();
        repo
    }

    fn player(repo: &mut SqliteRepository, name: &str) -> Player {
        repo.get_or_create_player(&Username::new(name).unwrap())
            .unwrap()
    }

    #[test]
    fn seeding_reports_counts() {
        let repo = seeded();
        let counts = repo.reference_counts().unwrap();
        assert_eq!(counts.airports, AIRPORTS.len());
        assert_eq!(counts.countries, COUNTRIES.len());
    }

    #[test]
    fn seeding_twice_replaces_rows() {
        let mut repo = seeded();
        repo.seed_reference_data(
            &airports_from_embedded(AIRPORTS),
            &countries_from_embedded(COUNTRIES),
        )
        .unwrap();
        assert_eq!(repo.reference_counts().unwrap().airports, AIRPORTS.len());
    }

    #[test]
    fn sampled_airports_are_large_or_medium() {
        let repo = seeded();
        let none = FxHashSet::default();
        for _ in 0..200 {
            let airport = repo.sample_airport(&none).unwrap().unwrap();
            assert!(airport.class.is_sampled(), "{} sampled", airport.ident);
        }
    }

    #[test]
    fn sampled_airport_has_country_name() {
        let repo = seeded();
        let airport = repo.sample_airport(&FxHashSet::default()).unwrap().unwrap();
        assert!(airport.country_name.is_some());
    }

    #[test]
    fn airport_exclusion_is_honoured() {
        let repo = seeded();
        let eligible: Vec<i64> = AIRPORTS
            .iter()
            .filter(|a| AirportClass::from_tag(a.kind).is_sampled())
            .map(|a| a.id)
            .collect();

        // Exclude all but one eligible airport
        let keep = eligible[0];
        let exclude: FxHashSet<i64> = eligible.iter().copied().filter(|&id| id != keep).collect();
        for _ in 0..20 {
            let airport = repo.sample_airport(&exclude).unwrap().unwrap();
            assert_eq!(airport.id, keep);
        }

        let all: FxHashSet<i64> = eligible.into_iter().collect();
        assert_eq!(repo.sample_airport(&all).unwrap(), None);
    }

    #[test]
    fn countries_without_population_are_never_sampled() {
        let repo = seeded();
        let known: Vec<String> = COUNTRIES
            .iter()
            .filter(|c| c.population.is_some())
            .map(|c| c.iso_country.to_string())
            .collect();

        // Everything with a population excluded: only AQ would remain
        let exclude: FxHashSet<String> = known.into_iter().collect();
        assert_eq!(repo.sample_country(&exclude).unwrap(), None);
    }

    #[test]
    fn empty_database_samples_nothing() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        assert_eq!(repo.sample_airport(&FxHashSet::default()).unwrap(), None);
        assert_eq!(repo.sample_country(&FxHashSet::default()).unwrap(), None);
    }

    #[test]
    fn record_then_best_score() {
        let mut repo = seeded();
        let p = player(&mut repo, "aino");

        repo.record_score(p.id, 7, GameMode::Classic).unwrap();
        assert!(repo.best_score(p.id, GameMode::Classic).unwrap() >= 7);
        assert_eq!(repo.best_score(p.id, GameMode::SuddenDeath).unwrap(), 0);
    }

    #[test]
    fn scores_are_appended() {
        let mut repo = seeded();
        let p = player(&mut repo, "aino");

        repo.record_score(p.id, 3, GameMode::Classic).unwrap();
        repo.record_score(p.id, 2, GameMode::Classic).unwrap();
        repo.record_score(p.id, 6, GameMode::TimeLimited).unwrap();

        let stats = repo.aggregate_stats(p.id).unwrap();
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.best, 6);
        assert_eq!(stats.worst, 2);
        assert!((stats.average - 3.7).abs() < 1e-9);
        // A lower later score does not replace the best
        assert_eq!(repo.best_score(p.id, GameMode::Classic).unwrap(), 3);
    }

    #[test]
    fn new_player_has_zero_stats() {
        let mut repo = seeded();
        let p = player(&mut repo, "uusi");

        assert_eq!(repo.aggregate_stats(p.id).unwrap(), PlayerStats::default());
        assert_eq!(repo.best_score(p.id, GameMode::Classic).unwrap(), 0);
        assert!(repo.recent_games(p.id, 5).unwrap().is_empty());
    }

    #[test]
    fn recent_games_newest_first() {
        let mut repo = seeded();
        let p = player(&mut repo, "aino");

        for score in [1, 2, 3, 4, 5, 6] {
            repo.record_score(p.id, score, GameMode::SuddenDeath).unwrap();
        }

        let recent = repo.recent_games(p.id, 5).unwrap();
        let scores: Vec<u32> = recent.iter().map(|g| g.score).collect();
        assert_eq!(scores, vec![6, 5, 4, 3, 2]);
        assert!(recent.iter().all(|g| g.mode == GameMode::SuddenDeath));
    }

    #[test]
    fn top_scores_descending_per_mode() {
        let mut repo = seeded();
        let a = player(&mut repo, "aino");
        let b = player(&mut repo, "bertta");

        repo.record_score(a.id, 5, GameMode::Classic).unwrap();
        repo.record_score(b.id, 9, GameMode::Classic).unwrap();
        repo.record_score(b.id, 5, GameMode::Classic).unwrap();
        repo.record_score(a.id, 50, GameMode::SuddenDeath).unwrap();

        let top = repo.top_scores(GameMode::Classic, 10).unwrap();
        let rows: Vec<(&str, u32)> = top.iter().map(|e| (e.username.as_str(), e.score)).collect();
        // Equal scores keep the earlier one first
        assert_eq!(rows, vec![("bertta", 9), ("aino", 5), ("bertta", 5)]);

        assert_eq!(repo.top_scores(GameMode::Classic, 1).unwrap().len(), 1);
        assert!(repo.top_scores(GameMode::TimeLimited, 10).unwrap().is_empty());
    }

    #[test]
    fn record_for_unknown_player_fails() {
        let mut repo = seeded();
        let err = repo
            .record_score(PlayerId(999), 1, GameMode::Classic)
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownPlayer(PlayerId(999))));
    }

    #[test]
    fn get_or_create_player_is_idempotent() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let first = player(&mut repo, "aino");
        let second = player(&mut repo, "aino");
        let other = player(&mut repo, "bertta");

        assert_eq!(first, second);
        assert_ne!(first.id, other.id);
        assert_eq!(
            repo.find_player(&Username::new("aino").unwrap()).unwrap(),
            Some(first)
        );
        assert_eq!(
            repo.find_player(&Username::new("nobody").unwrap()).unwrap(),
            None
        );
    }

    #[test]
    fn scores_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.db");

        let id = {
            let mut repo = SqliteRepository::open(&path).unwrap();
            let p = player(&mut repo, "aino");
            repo.record_score(p.id, 12, GameMode::TimeLimited).unwrap();
            p.id
        };

        let repo = SqliteRepository::open(&path).unwrap();
        assert_eq!(repo.best_score(id, GameMode::TimeLimited).unwrap(), 12);
    }

    #[test]
    fn clear_reference_data_keeps_scores() {
        let mut repo = seeded();
        let p = player(&mut repo, "aino");
        repo.record_score(p.id, 4, GameMode::Classic).unwrap();

        repo.clear_reference_data().unwrap();
        assert_eq!(repo.reference_counts().unwrap(), SeedStats::default());
        assert_eq!(repo.best_score(p.id, GameMode::Classic).unwrap(), 4);
    }

    #[test]
    fn not_in_clause_shapes() {
        assert_eq!(not_in_clause("a.id", 0), "");
        assert_eq!(not_in_clause("a.id", 3), " AND a.id NOT IN (?, ?, ?)");
    }
}
