//! SQL schema for the in-memory SQLite database.
//!
//! One table holds the cleaned observations. Measure columns are nullable:
//! a country whose series never had a value keeps NULL after cleaning.

/// Returns the full SQL schema as a single batch string.
///
/// - `observations` - one row per (country, year) with the nine measures
///
/// Per-year rankings, latest-year snapshots and global maxima are derived
/// on-the-fly by the query methods.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS observations (
        iso_code TEXT NOT NULL,
        country TEXT NOT NULL,
        year INTEGER NOT NULL,
        co2 REAL,
        co2_per_capita REAL,
        gdp REAL,
        population REAL,
        coal_co2 REAL,
        oil_co2 REAL,
        gas_co2 REAL,
        flaring_co2 REAL,
        cement_co2 REAL,
        PRIMARY KEY (country, year)
    );
    CREATE INDEX IF NOT EXISTS idx_obs_year ON observations(year);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use co2_data::Measure;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_has_a_column_per_measure() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(observations)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        for measure in Measure::ALL {
            assert!(
                columns.iter().any(|c| c == measure.column()),
                "missing column {}",
                measure.column()
            );
        }
    }
}
