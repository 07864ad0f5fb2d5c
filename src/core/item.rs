//! Comparison subjects
//!
//! An [`Item`] is an immutable snapshot of one airport or one country row,
//! fetched from the repository and held by the round until it is replaced.

use std::fmt;

/// Facility classification carried by airport rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AirportClass {
    LargeAirport,
    MediumAirport,
    SmallAirport,
    Heliport,
    SeaplaneBase,
    BalloonPort,
    Closed,
    Other(String),
}

impl AirportClass {
    /// Classifications eligible for sampling
    pub const SAMPLED_TAGS: [&'static str; 2] = ["large_airport", "medium_airport"];

    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "large_airport" => Self::LargeAirport,
            "medium_airport" => Self::MediumAirport,
            "small_airport" => Self::SmallAirport,
            "heliport" => Self::Heliport,
            "seaplane_base" => Self::SeaplaneBase,
            "balloonport" => Self::BalloonPort,
            "closed" => Self::Closed,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::LargeAirport => "large_airport",
            Self::MediumAirport => "medium_airport",
            Self::SmallAirport => "small_airport",
            Self::Heliport => "heliport",
            Self::SeaplaneBase => "seaplane_base",
            Self::BalloonPort => "balloonport",
            Self::Closed => "closed",
            Self::Other(tag) => tag,
        }
    }

    /// Only large and medium airports take part in a round
    #[inline]
    #[must_use]
    pub const fn is_sampled(&self) -> bool {
        matches!(self, Self::LargeAirport | Self::MediumAirport)
    }
}

/// A sampled airport row with its resolved country name
#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub id: i64,
    pub ident: String,
    pub class: AirportClass,
    pub name: String,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    /// Elevation in feet; rows without one compare as 0
    pub elevation_ft: Option<i64>,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
    pub municipality: Option<String>,
    /// Joined from the country table, absent when the code is unknown
    pub country_name: Option<String>,
}

/// A sampled country row; rows with unknown population are never sampled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub iso_country: String,
    pub name: String,
    pub continent: Option<String>,
    pub population: i64,
    pub wikipedia_link: Option<String>,
    pub keywords: Option<String>,
}

/// Identity of an item, used to prevent repeats within a round
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Airport(i64),
    Country(String),
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Airport(id) => write!(f, "airport #{id}"),
            Self::Country(code) => write!(f, "country {code}"),
        }
    }
}

/// One comparison subject
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Airport(Airport),
    Country(Country),
}

impl Item {
    #[must_use]
    pub fn key(&self) -> ItemKey {
        match self {
            Self::Airport(airport) => ItemKey::Airport(airport.id),
            Self::Country(country) => ItemKey::Country(country.iso_country.clone()),
        }
    }

    /// The compared value: elevation for airports, population for countries
    #[inline]
    #[must_use]
    pub fn value(&self) -> i64 {
        match self {
            Self::Airport(airport) => airport.elevation_ft.unwrap_or(0),
            Self::Country(country) => country.population,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Airport(airport) => &airport.name,
            Self::Country(country) => &country.name,
        }
    }

    /// Name with location context
    ///
    /// Airports read `Name (Municipality, Country)`, falling back to
    /// `Name (Country)` or the bare name when parts are missing.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Airport(airport) => {
                let municipality = airport.municipality.as_deref().filter(|m| !m.is_empty());
                let country = airport.country_name.as_deref().filter(|c| !c.is_empty());
                match (municipality, country) {
                    (Some(municipality), Some(country)) => {
                        format!("{} ({municipality}, {country})", airport.name)
                    }
                    (None, Some(country)) => format!("{} ({country})", airport.name),
                    _ => airport.name.clone(),
                }
            }
            Self::Country(country) => country.name.clone(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport() -> Airport {
        Airport {
            id: 1,
            ident: "EFHK".to_string(),
            class: AirportClass::LargeAirport,
            name: "Helsinki Vantaa Airport".to_string(),
            latitude_deg: Some(60.3172),
            longitude_deg: Some(24.9633),
            elevation_ft: Some(179),
            continent: Some("EU".to_string()),
            iso_country: Some("FI".to_string()),
            municipality: Some("Helsinki".to_string()),
            country_name: Some("Finland".to_string()),
        }
    }

    #[test]
    fn airport_value_is_elevation() {
        assert_eq!(Item::Airport(airport()).value(), 179);
    }

    #[test]
    fn missing_elevation_counts_as_zero() {
        let mut a = airport();
        a.elevation_ft = None;
        assert_eq!(Item::Airport(a).value(), 0);
    }

    #[test]
    fn airport_display_name_with_municipality_and_country() {
        assert_eq!(
            Item::Airport(airport()).display_name(),
            "Helsinki Vantaa Airport (Helsinki, Finland)"
        );
    }

    #[test]
    fn airport_display_name_falls_back() {
        let mut a = airport();
        a.municipality = None;
        assert_eq!(
            Item::Airport(a.clone()).display_name(),
            "Helsinki Vantaa Airport (Finland)"
        );

        a.country_name = None;
        assert_eq!(Item::Airport(a).display_name(), "Helsinki Vantaa Airport");
    }

    #[test]
    fn country_key_and_value() {
        let item = Item::Country(Country {
            iso_country: "FI".to_string(),
            name: "Finland".to_string(),
            continent: Some("EU".to_string()),
            population: 5_600_000,
            wikipedia_link: None,
            keywords: None,
        });
        assert_eq!(item.key(), ItemKey::Country("FI".to_string()));
        assert_eq!(item.value(), 5_600_000);
        assert_eq!(item.display_name(), "Finland");
    }

    #[test]
    fn airport_class_sampling() {
        assert!(AirportClass::from_tag("large_airport").is_sampled());
        assert!(AirportClass::from_tag("medium_airport").is_sampled());
        assert!(!AirportClass::from_tag("small_airport").is_sampled());
        assert!(!AirportClass::from_tag("heliport").is_sampled());
        assert!(!AirportClass::from_tag("space_port").is_sampled());
    }

    #[test]
    fn airport_class_tag_round_trip() {
        for tag in ["large_airport", "closed", "seaplane_base", "weird"] {
            assert_eq!(AirportClass::from_tag(tag).tag(), tag);
        }
    }
}
