//! `render`: compute the dashboard view-model without a browser.

use co2_data::cache;
use co2_db::{render_dashboard, ChartKind, Database, Selection};
use log::info;
use std::io::Write;

/// Build the selection from CLI values; blank country names are ignored.
pub fn selection_from_args(charts: &[ChartKind], countries: &[String]) -> Selection {
    Selection {
        charts: charts.iter().copied().collect(),
        radar_countries: countries
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect(),
    }
}

/// Render the active charts of `input` to pretty JSON.
pub fn render_json(input: &str, selection: &Selection) -> anyhow::Result<String> {
    let dataset = cache::load_path_cached(input)?;
    let db = Database::from_dataset(&dataset)?;
    let view = render_dashboard(&db, selection)?;
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn run_render(
    input: &str,
    charts: &[ChartKind],
    countries: &[String],
    output: Option<&str>,
) -> anyhow::Result<()> {
    let selection = selection_from_args(charts, countries);
    let json = render_json(input, &selection)?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            info!("[CO2] render: wrote {} charts to {}", selection.charts.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
