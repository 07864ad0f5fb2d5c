//! Embedded reference tables
//!
//! Airport and country rows compiled into the binary at build time.

/// One airport row as it appears in `data/airports.tsv`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddedAirport {
    pub id: i64,
    pub ident: &'static str,
    pub kind: &'static str,
    pub name: &'static str,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_ft: Option<i64>,
    pub continent: Option<&'static str>,
    pub iso_country: Option<&'static str>,
    pub municipality: Option<&'static str>,
}

/// One country row as it appears in `data/countries.tsv`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedCountry {
    pub iso_country: &'static str,
    pub name: &'static str,
    pub continent: Option<&'static str>,
    pub population: Option<i64>,
    pub wikipedia_link: Option<&'static str>,
    pub keywords: Option<&'static str>,
}

// Include generated tables from build script
include!(concat!(env!("OUT_DIR"), "/airports.rs"));
include!(concat!(env!("OUT_DIR"), "/countries.rs"));
