//! CSV loading for the raw CO2 dataset.
//!
//! The source file has a header row and many more columns than the charts
//! use; columns are located by name. Only rows whose `iso_code` is exactly
//! three characters are kept, which drops continent, income-group and other
//! aggregate entities.
//!
//! # Required columns
//!
//! `iso_code, country, year, co2, co2_per_capita, gdp, population,
//! coal_co2, oil_co2, gas_co2, flaring_co2, cement_co2`
//!
//! # Example CSV
//! ```text
//! iso_code,country,year,co2,co2_per_capita,gdp,population,coal_co2,oil_co2,gas_co2,flaring_co2,cement_co2
//! USA,United States,2020,4715.7,14.2,18e12,331e6,1000,2000,1600,40,40
//! ,World,2020,34800,4.4,,7.8e9,,,,,
//! ```

use crate::error::{DataError, Result};
use crate::interpolation;
use crate::observation::{Dataset, Measure, Observation};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Number of characters a country code must have to be kept.
pub const COUNTRY_CODE_LEN: usize = 3;

/// Read a dataset file from disk, clean it, and return the table.
pub fn load_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let bytes = read_source(path)?;
    load_bytes(&bytes)
}

/// Read the raw bytes of a dataset file.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| DataError::DataAccess {
        path: path.display().to_string(),
        source,
    })
}

/// Parse and clean a dataset from plain or gzip-compressed CSV bytes.
pub fn load_bytes(bytes: &[u8]) -> Result<Dataset> {
    let csv_bytes = decode_source(bytes)?;
    let mut observations = parse_observations(&csv_bytes)?;
    observations.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
    interpolation::fill_by_country(&mut observations);
    log::info!(
        "[CO2] loader: cleaned {} observations",
        observations.len()
    );
    Ok(Dataset::from_sorted(observations))
}

/// Inflate gzip input; pass plain CSV through untouched.
pub fn decode_source(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.is_empty() {
        return Err(DataError::Empty);
    }
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes.to_vec());
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| DataError::Decompress(e.to_string()))?;
    if out.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(out)
}

/// Column indices resolved from the header row.
struct Columns {
    iso_code: usize,
    country: usize,
    year: usize,
    measures: [(Measure, usize); 9],
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DataError::MissingColumn(name))
        };
        let mut measures = [(Measure::Co2, 0usize); 9];
        for (slot, measure) in measures.iter_mut().zip(Measure::ALL) {
            *slot = (measure, find(measure.column())?);
        }
        Ok(Self {
            iso_code: find("iso_code")?,
            country: find("country")?,
            year: find("year")?,
            measures,
        })
    }
}

/// Parse rows into unsorted, unfilled observations.
///
/// Rows with a non-3-character `iso_code` are skipped. Measure fields that do
/// not parse as finite numbers become `None`.
pub fn parse_observations(csv_data: &[u8]) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::Empty);
    }
    let columns = Columns::resolve(&headers)?;

    let mut observations = Vec::new();
    let mut skipped = 0u32;
    for result in rdr.records() {
        let r = result?;
        // Exact character count, no trimming
        let iso_code = r.get(columns.iso_code).unwrap_or("");
        if !is_country_code(iso_code) {
            skipped += 1;
            continue;
        }

        let year_str = r.get(columns.year).unwrap_or("");
        let year = parse_year(year_str).ok_or_else(|| DataError::InvalidYear {
            line: r.position().map_or(0, |p| p.line()),
            value: year_str.to_string(),
        })?;

        let country = r.get(columns.country).unwrap_or("");
        let mut obs = Observation::new(iso_code, country, year);
        for (measure, idx) in columns.measures {
            obs.set_measure(measure, r.get(idx).and_then(coerce_numeric));
        }
        observations.push(obs);
    }
    log::info!(
        "[CO2] loader: kept {} country rows, skipped {} aggregate rows",
        observations.len(),
        skipped
    );
    Ok(observations)
}

/// True when the code field marks a sovereign country row.
pub fn is_country_code(code: &str) -> bool {
    code.chars().count() == COUNTRY_CODE_LEN
}

/// Parse a numeric field, treating blanks and junk as missing.
pub fn coerce_numeric(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_year(field: &str) -> Option<i32> {
    let field = field.trim();
    if let Ok(year) = field.parse::<i32>() {
        return Some(year);
    }
    // Exports sometimes write years as floats ("2000.0")
    let value = field.parse::<f64>().ok()?;
    if value.fract() == 0.0 && value.abs() < i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const HEADER: &str = "iso_code,country,year,co2,co2_per_capita,gdp,population,coal_co2,oil_co2,gas_co2,flaring_co2,cement_co2";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out.into_bytes()
    }

    #[test]
    fn keeps_only_three_character_codes() {
        let data = csv(&[
            "USA,United States,2020,4715,14.2,,,,,,,",
            ",World,2020,34800,4.4,,,,,,,",
            "OWID_EUR,Europe,2020,5000,6.8,,,,,,,",
            "AB,Short,2020,1,1,,,,,,,",
        ]);
        let rows = parse_observations(&data).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].iso_code, "USA");
    }

    #[test]
    fn code_length_counts_characters_not_bytes() {
        assert!(is_country_code("ÅLA"));
        assert!(!is_country_code("USA "));
        assert!(!is_country_code("OWID_WRL"));
        assert!(!is_country_code(""));
    }

    #[test]
    fn country_names_are_kept_as_written() {
        let data = csv(&[
            "USA,United States,2020,4715,14.2,,,,,,,",
            "USA, United States,2021,4900,14.8,,,,,,,",
        ]);
        let rows = parse_observations(&data).unwrap();
        assert_eq!(rows[0].country, "United States");
        assert_eq!(rows[1].country, " United States");
    }

    #[test]
    fn non_numeric_measures_become_missing() {
        let data = csv(&["FRA,France,2020,abc,,NaN,67e6,inf,1.5,,,"]);
        let rows = parse_observations(&data).unwrap();
        assert_eq!(rows[0].co2, None);
        assert_eq!(rows[0].co2_per_capita, None);
        assert_eq!(rows[0].gdp, None);
        assert_eq!(rows[0].population, Some(67e6));
        assert_eq!(rows[0].coal_co2, None);
        assert_eq!(rows[0].oil_co2, Some(1.5));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = b"country,year,iso_code,methane,co2,co2_per_capita,gdp,population,coal_co2,oil_co2,gas_co2,flaring_co2,cement_co2\n\
Chile,2019,CHL,99,85,4.5,,,,,,,\n";
        let rows = parse_observations(data).unwrap();
        assert_eq!(rows[0].country, "Chile");
        assert_eq!(rows[0].co2, Some(85.0));
    }

    #[test]
    fn missing_column_is_a_parse_error() {
        let data = b"iso_code,country,year,co2\nUSA,United States,2020,1\n";
        match parse_observations(data) {
            Err(DataError::MissingColumn(name)) => assert_eq!(name, "co2_per_capita"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn bad_year_reports_the_line() {
        let data = csv(&["USA,United States,2020,1,,,,,,,,", "USA,United States,soon,1,,,,,,,,"]);
        match parse_observations(&data) {
            Err(DataError::InvalidYear { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "soon");
            }
            other => panic!("expected InvalidYear, got {:?}", other),
        }
    }

    #[test]
    fn float_years_are_accepted() {
        let data = csv(&["USA,United States,2020.0,1,,,,,,,,"]);
        assert_eq!(parse_observations(&data).unwrap()[0].year, 2020);
    }

    #[test]
    fn load_sorts_and_fills() {
        let data = csv(&[
            "ZZZ,Zed,2001,,,,,,,,,",
            "AAA,Able,2004,30,,,,,,,,",
            "AAA,Able,2000,10,,,,,,,,",
            "AAA,Able,2002,,,,,,,,,",
            "ZZZ,Zed,2000,7,,,,,,,,",
        ]);
        let dataset = load_bytes(&data).unwrap();
        let rows = dataset.observations();
        let keys: Vec<(&str, i32)> = rows.iter().map(|o| (o.country.as_str(), o.year)).collect();
        assert_eq!(
            keys,
            vec![("Able", 2000), ("Able", 2002), ("Able", 2004), ("Zed", 2000), ("Zed", 2001)]
        );
        assert_eq!(rows[1].co2, Some(20.0));
        assert_eq!(rows[4].co2, Some(7.0));
    }

    #[test]
    fn gzip_input_is_inflated() {
        let plain = csv(&["IND,India,2022,2830,2.0,,,,,,,"]);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&plain).unwrap();
        let gz = encoder.finish().unwrap();

        let dataset = load_bytes(&gz).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.observations()[0].co2, Some(2830.0));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(load_bytes(b""), Err(DataError::Empty)));
    }

    #[test]
    fn missing_file_is_a_data_access_error() {
        let err = load_path("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataError::DataAccess { .. }));
        assert!(err.to_string().contains("definitely/not/here.csv"));
    }
}
