//! Reference data seeding and import

use crate::dataset::loader::{
    airports_from_embedded, countries_from_embedded, load_airports_from_file,
    load_countries_from_file,
};
use crate::dataset::{AIRPORTS, COUNTRIES};
use crate::repository::{SeedStats, SqliteRepository};
use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

/// Load the embedded tables, optionally wiping existing reference rows first
///
/// # Errors
///
/// Returns an error if the database rejects the writes.
pub fn seed_embedded(repository: &mut SqliteRepository, force: bool) -> Result<SeedStats> {
    if force {
        repository
            .clear_reference_data()
            .context("failed to clear reference data")?;
        info!("reference data cleared");
    }

    repository
        .seed_reference_data(
            &airports_from_embedded(AIRPORTS),
            &countries_from_embedded(COUNTRIES),
        )
        .context("failed to seed reference data")
}

/// Seed from the embedded tables if either reference table is empty
///
/// Returns the rows written, or `None` when nothing was needed.
///
/// # Errors
///
/// Returns an error if the counts cannot be read or seeding fails.
pub fn ensure_seeded(repository: &mut SqliteRepository) -> Result<Option<SeedStats>> {
    let counts = repository
        .reference_counts()
        .context("failed to count reference rows")?;
    if counts.airports > 0 && counts.countries > 0 {
        return Ok(None);
    }

    info!("reference tables empty, seeding embedded data");
    seed_embedded(repository, false).map(Some)
}

/// Import TSV reference files with a progress bar
///
/// # Errors
///
/// Returns an error if a file cannot be read, contains no usable rows, or the
/// database rejects the writes.
pub fn import_files(
    repository: &mut SqliteRepository,
    airports_path: &Path,
    countries_path: &Path,
) -> Result<SeedStats> {
    let airports = load_airports_from_file(airports_path)
        .with_context(|| format!("failed to read {}", airports_path.display()))?;
    let countries = load_countries_from_file(countries_path)
        .with_context(|| format!("failed to read {}", countries_path.display()))?;

    if airports.is_empty() {
        bail!("no airport rows found in {}", airports_path.display());
    }
    if countries.is_empty() {
        bail!("no country rows found in {}", countries_path.display());
    }

    let pb = ProgressBar::new((airports.len() + countries.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
            .context("invalid progress template")?
            .progress_chars("█▓▒░"),
    );
    pb.set_message("importing");

    let stats = repository
        .seed_reference_data_with(&airports, &countries, |written| {
            pb.set_position(written as u64);
        })
        .context("failed to import reference data")?;

    pb.finish_with_message("done");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ensure_seeded_only_seeds_once() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();

        let first = ensure_seeded(&mut repo).unwrap().unwrap();
        assert_eq!(first.airports, AIRPORTS.len());
        assert_eq!(ensure_seeded(&mut repo).unwrap(), None);
    }

    #[test]
    fn forced_seed_replaces_imported_rows() {
        let dir = tempfile::tempdir().unwrap();
        let airports = dir.path().join("airports.tsv");
        let countries = dir.path().join("countries.tsv");

        let mut file = std::fs::File::create(&airports).unwrap();
        writeln!(file, "9001\tZZZZ\tlarge_airport\tTest Field\t0\t0\t42\tEU\tFI\tNowhere").unwrap();
        let mut file = std::fs::File::create(&countries).unwrap();
        writeln!(file, "FI\tFinland\tEU\t5600000\t\t").unwrap();

        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let imported = import_files(&mut repo, &airports, &countries).unwrap();
        assert_eq!(imported, SeedStats { airports: 1, countries: 1 });

        seed_embedded(&mut repo, true).unwrap();
        let counts = repo.reference_counts().unwrap();
        assert_eq!(counts.airports, AIRPORTS.len());
        assert_eq!(counts.countries, COUNTRIES.len());
    }

    #[test]
    fn import_rejects_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let airports = dir.path().join("airports.tsv");
        let countries = dir.path().join("countries.tsv");
        std::fs::write(&airports, "# header only\n").unwrap();
        std::fs::write(&countries, "FI\tFinland\tEU\t5600000\n").unwrap();

        let mut repo = SqliteRepository::open_in_memory().unwrap();
        assert!(import_files(&mut repo, &airports, &countries).is_err());
        assert_eq!(repo.reference_counts().unwrap(), SeedStats::default());
    }

    #[test]
    fn import_missing_file_fails() {
        let mut repo = SqliteRepository::open_in_memory().unwrap();
        let missing = Path::new("/definitely/not/here.tsv");
        assert!(import_files(&mut repo, missing, missing).is_err());
    }
}
