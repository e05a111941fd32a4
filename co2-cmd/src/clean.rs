//! `clean`: write the cleaned table back out as CSV.

use co2_data::loader;
use log::info;

/// Load, filter and gap-fill `input`, then write one row per country-year.
///
/// Missing measures are written as empty fields.
pub fn run_clean(input: &str, output: &str) -> anyhow::Result<()> {
    let dataset = loader::load_path(input)?;

    let mut writer = csv::Writer::from_path(output)?;
    for observation in dataset.observations() {
        writer.serialize(observation)?;
    }
    writer.flush()?;

    info!(
        "[CO2] clean: wrote {} rows for {} countries to {}",
        dataset.len(),
        dataset.countries().len(),
        output
    );
    Ok(())
}
