//! Reference data loading utilities
//!
//! Provides functions to load tab-separated reference files or use the embedded tables.

use super::{AirportRecord, CountryRecord, EmbeddedAirport, EmbeddedCountry};
use std::fs;
use std::io;
use std::path::Path;

/// Load airport rows from a TSV file
///
/// Columns: id, ident, type, name, latitude, longitude, elevation (ft),
/// continent, country code, municipality. Blank lines, `#` comments and
/// malformed rows are skipped.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or opened.
///
/// # Examples
/// ```no_run
/// use higher_lower::dataset::loader::load_airports_from_file;
///
/// let airports = load_airports_from_file("data/airports.tsv").unwrap();
/// println!("Loaded {} airports", airports.len());
/// ```
pub fn load_airports_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<AirportRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(data_lines(&content).filter_map(parse_airport_line).collect())
}

/// Load country rows from a TSV file
///
/// Columns: code, name, continent, population, reference link, keywords.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read or opened.
pub fn load_countries_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<CountryRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(data_lines(&content).filter_map(parse_country_line).collect())
}

fn data_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
}

fn optional(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

/// Parse one airport line; `None` if the id or name is missing
#[must_use]
pub fn parse_airport_line(line: &str) -> Option<AirportRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    let field = |i: usize| fields.get(i).copied();

    let id = field(0)?.trim().parse().ok()?;
    let name = optional(field(3))?;

    Some(AirportRecord {
        id,
        ident: optional(field(1)).unwrap_or_default(),
        kind: optional(field(2)).unwrap_or_default(),
        name,
        latitude_deg: field(4).and_then(|f| f.trim().parse().ok()),
        longitude_deg: field(5).and_then(|f| f.trim().parse().ok()),
        elevation_ft: field(6).and_then(|f| f.trim().parse().ok()),
        continent: optional(field(7)),
        iso_country: optional(field(8)),
        municipality: optional(field(9)),
    })
}

/// Parse one country line; `None` if the code or name is missing
#[must_use]
pub fn parse_country_line(line: &str) -> Option<CountryRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    let field = |i: usize| fields.get(i).copied();

    Some(CountryRecord {
        iso_country: optional(field(0))?,
        name: optional(field(1))?,
        continent: optional(field(2)),
        population: field(3).and_then(|f| f.trim().parse().ok()),
        wikipedia_link: optional(field(4)),
        keywords: optional(field(5)),
    })
}

/// Convert the embedded airport table to owned records
///
/// # Examples
/// ```
/// use higher_lower::dataset::loader::airports_from_embedded;
/// use higher_lower::dataset::AIRPORTS;
///
/// let airports = airports_from_embedded(AIRPORTS);
/// assert_eq!(airports.len(), AIRPORTS.len());
/// ```
#[must_use]
pub fn airports_from_embedded(slice: &[EmbeddedAirport]) -> Vec<AirportRecord> {
    slice
        .iter()
        .map(|a| AirportRecord {
            id: a.id,
            ident: a.ident.to_string(),
            kind: a.kind.to_string(),
            name: a.name.to_string(),
            latitude_deg: a.latitude_deg,
            longitude_deg: a.longitude_deg,
            elevation_ft: a.elevation_ft,
            continent: a.continent.map(str::to_string),
            iso_country: a.iso_country.map(str::to_string),
            municipality: a.municipality.map(str::to_string),
        })
        .collect()
}

/// Convert the embedded country table to owned records
#[must_use]
pub fn countries_from_embedded(slice: &[EmbeddedCountry]) -> Vec<CountryRecord> {
    slice
        .iter()
        .map(|c| CountryRecord {
            iso_country: c.iso_country.to_string(),
            name: c.name.to_string(),
            continent: c.continent.map(str::to_string),
            population: c.population,
            wikipedia_link: c.wikipedia_link.map(str::to_string),
            keywords: c.keywords.map(str::to_string),
        })
        .collect()
}
