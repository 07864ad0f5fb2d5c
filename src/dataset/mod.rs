//! Reference data for airports and countries
//!
//! Provides the embedded tables and owned records used to seed a repository.

mod embedded;
pub mod loader;

pub use embedded::{
    AIRPORTS, AIRPORTS_COUNT, COUNTRIES, COUNTRIES_COUNT, EmbeddedAirport, EmbeddedCountry,
};

/// An airport reference row, before any sampling filter is applied
#[derive(Debug, Clone, PartialEq)]
pub struct AirportRecord {
    pub id: i64,
    pub ident: String,
    pub kind: String,
    pub name: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
    pub municipality: Option<String>,
}

/// A country reference row; population may be unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    pub iso_country: String,
    pub name: String,
    pub continent: Option<String>,
    pub population: Option<i64>,
    pub wikipedia_link: Option<String>,
    pub keywords: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AirportClass;
    use std::collections::HashSet;

    #[test]
    fn airports_count_matches_const() {
        assert_eq!(AIRPORTS.len(), AIRPORTS_COUNT);
    }

    #[test]
    fn countries_count_matches_const() {
        assert_eq!(COUNTRIES.len(), COUNTRIES_COUNT);
    }

    #[test]
    fn airport_ids_are_unique() {
        let ids: HashSet<i64> = AIRPORTS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), AIRPORTS.len());
    }

    #[test]
    fn country_codes_are_unique() {
        let codes: HashSet<&str> = COUNTRIES.iter().map(|c| c.iso_country).collect();
        assert_eq!(codes.len(), COUNTRIES.len());
    }

    #[test]
    fn embedded_data_has_unsampled_rows() {
        // The filters need something to filter
        assert!(
            AIRPORTS
                .iter()
                .any(|a| !AirportClass::from_tag(a.kind).is_sampled())
        );
        assert!(COUNTRIES.iter().any(|c| c.population.is_none()));
    }

    #[test]
    fn airport_countries_resolve() {
        let codes: HashSet<&str> = COUNTRIES.iter().map(|c| c.iso_country).collect();
        for airport in AIRPORTS {
            if let Some(code) = airport.iso_country {
                assert!(codes.contains(code), "{} has unknown country {code}", airport.ident);
            }
        }
    }
}
