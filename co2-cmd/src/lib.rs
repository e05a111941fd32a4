//! Command implementations for the CO2 CLI.
//!
//! Runs the same cleaning pipeline and chart queries as the dashboard, but
//! writes the results to disk instead of drawing them.

use clap::Subcommand;
use co2_data::DEFAULT_DATASET_PATH;
use co2_db::ChartKind;

pub mod clean;
pub mod render;

#[derive(Subcommand)]
pub enum Command {
    /// Clean and gap-fill the dataset, writing the country rows as CSV
    Clean {
        /// Input OWID CSV (plain or gzip-compressed)
        #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
        input: String,

        /// Output path for the cleaned CSV
        #[arg(short, long)]
        output: String,
    },

    /// Build the dashboard view-model and write it as JSON
    Render {
        /// Input OWID CSV (plain or gzip-compressed)
        #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
        input: String,

        /// Charts to include (labels or slugs: bar-race, bubble-map, radar, sunburst)
        #[arg(long, value_delimiter = ',', default_value = "bar-race,bubble-map,radar,sunburst")]
        charts: Vec<ChartKind>,

        /// Countries compared on the radar
        #[arg(long, value_delimiter = ',', default_value = "United States,China,India")]
        countries: Vec<String>,

        /// Output path for the JSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Clean { input, output } => clean::run_clean(&input, &output),
        Command::Render {
            input,
            charts,
            countries,
            output,
        } => render::run_render(&input, &charts, &countries, output.as_deref()),
    }
}
