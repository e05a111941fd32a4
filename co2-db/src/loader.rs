//! Bulk loading of cleaned observations into the in-memory database.

use crate::Database;
use co2_data::Dataset;
use rusqlite::params;

impl Database {
    /// Insert every observation of a cleaned dataset.
    ///
    /// Runs in a single transaction. A repeated (country, year) key replaces
    /// the earlier row.
    pub fn load_dataset(&self, dataset: &Dataset) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO observations
                 (iso_code, country, year, co2, co2_per_capita, gdp, population,
                  coal_co2, oil_co2, gas_co2, flaring_co2, cement_co2)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for o in dataset.observations() {
                stmt.execute(params![
                    o.iso_code,
                    o.country,
                    o.year,
                    o.co2,
                    o.co2_per_capita,
                    o.gdp,
                    o.population,
                    o.coal_co2,
                    o.oil_co2,
                    o.gas_co2,
                    o.flaring_co2,
                    o.cement_co2,
                ])?;
            }
        }
        tx.commit()?;
        log::info!("[CO2] db: loaded {} observations", dataset.len());
        Ok(())
    }
}
