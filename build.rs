//! Build script to generate embedded reference tables
//!
//! Reads the airport and country TSV files and generates Rust source code with const arrays.

use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();

    generate_airports(
        "data/airports.tsv",
        &Path::new(&out_dir).join("airports.rs"),
    );
    generate_countries(
        "data/countries.tsv",
        &Path::new(&out_dir).join("countries.rs"),
    );

    // Rebuild if reference data changes
    println!("cargo:rerun-if-changed=data/airports.tsv");
    println!("cargo:rerun-if-changed=data/countries.tsv");
}

/// Data rows of a TSV file; blank lines and `#` comments are skipped.
fn rows(input_path: &str) -> Vec<Vec<String>> {
    let content = fs::read_to_string(input_path)
        .unwrap_or_else(|e| panic!("Failed to read {input_path}: {e}"));

    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.split('\t').map(|f| f.trim().to_string()).collect())
        .collect()
}

fn field<'a>(row: &'a [String], index: usize) -> Option<&'a str> {
    row.get(index).map(String::as_str).filter(|f| !f.is_empty())
}

fn generate_airports(input_path: &str, output_path: &Path) {
    let rows = rows(input_path);
    let count = rows.len();

    let mut output = fs::File::create(output_path)
        .unwrap_or_else(|e| panic!("Failed to create {}: {e}", output_path.display()));

    writeln!(output, "// Generated airport table").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "/// Embedded airport reference rows ({count} rows)").unwrap();
    writeln!(output, "pub const AIRPORTS: &[EmbeddedAirport] = &[").unwrap();

    for row in &rows {
        let id: i64 = field(row, 0)
            .and_then(|f| f.parse().ok())
            .unwrap_or_else(|| panic!("{input_path}: bad airport id in {row:?}"));
        let ident = field(row, 1).unwrap_or_default();
        let kind = field(row, 2).unwrap_or_default();
        let name = field(row, 3).unwrap_or_default();
        let latitude: Option<f64> = field(row, 4).and_then(|f| f.parse().ok());
        let longitude: Option<f64> = field(row, 5).and_then(|f| f.parse().ok());
        let elevation: Option<i64> = field(row, 6).and_then(|f| f.parse().ok());

        writeln!(output, "    EmbeddedAirport {{").unwrap();
        writeln!(output, "        id: {id},").unwrap();
        writeln!(output, "        ident: {ident:?},").unwrap();
        writeln!(output, "        kind: {kind:?},").unwrap();
        writeln!(output, "        name: {name:?},").unwrap();
        writeln!(output, "        latitude_deg: {latitude:?},").unwrap();
        writeln!(output, "        longitude_deg: {longitude:?},").unwrap();
        writeln!(output, "        elevation_ft: {elevation:?},").unwrap();
        writeln!(output, "        continent: {:?},", field(row, 7)).unwrap();
        writeln!(output, "        iso_country: {:?},", field(row, 8)).unwrap();
        writeln!(output, "        municipality: {:?},", field(row, 9)).unwrap();
        writeln!(output, "    }},").unwrap();
    }

    writeln!(output, "];").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "/// Number of rows in AIRPORTS").unwrap();
    writeln!(output, "pub const AIRPORTS_COUNT: usize = {count};").unwrap();
}

fn generate_countries(input_path: &str, output_path: &Path) {
    let rows = rows(input_path);
    let count = rows.len();

    let mut output = fs::File::create(output_path)
        .unwrap_or_else(|e| panic!("Failed to create {}: {e}", output_path.display()));

    writeln!(output, "// Generated country table").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "/// Embedded country reference rows ({count} rows)").unwrap();
    writeln!(output, "pub const COUNTRIES: &[EmbeddedCountry] = &[").unwrap();

    for row in &rows {
        let code = field(row, 0)
            .unwrap_or_else(|| panic!("{input_path}: missing country code in {row:?}"));
        let name = field(row, 1).unwrap_or_default();
        let population: Option<i64> = field(row, 3).and_then(|f| f.parse().ok());

        writeln!(output, "    EmbeddedCountry {{").unwrap();
        writeln!(output, "        iso_country: {code:?},").unwrap();
        writeln!(output, "        name: {name:?},").unwrap();
        writeln!(output, "        continent: {:?},", field(row, 2)).unwrap();
        writeln!(output, "        population: {population:?},").unwrap();
        writeln!(output, "        wikipedia_link: {:?},", field(row, 4)).unwrap();
        writeln!(output, "        keywords: {:?},", field(row, 5)).unwrap();
        writeln!(output, "    }},").unwrap();
    }

    writeln!(output, "];").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "/// Number of rows in COUNTRIES").unwrap();
    writeln!(output, "pub const COUNTRIES_COUNT: usize = {count};").unwrap();
}
