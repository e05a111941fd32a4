//! Global CO2 & Energy Interactive Dashboard
//!
//! Single-page app over the OWID country CO2/energy dataset: a sidebar picks
//! which of four D3.js charts to show and a chip list picks the countries on
//! the radar.
//!
//! Data flow:
//! 1. `build.rs` gzips `fixtures/owid-co2-data.csv` into `OUT_DIR`.
//! 2. `include_bytes!` embeds the compressed file into the WASM binary.
//! 3. On mount: decode, clean and gap-fill through the process-wide cache,
//!    then bulk-load the cleaned rows into in-memory SQLite.
//! 4. On every selection change: `render_dashboard` rebuilds the view-model
//!    and each active panel is redrawn via D3.js.

use co2_chart_ui::components::{
    ChartContainer, ChartHeader, ChartSelector, CountrySelector, ErrorDisplay, InfoMessage,
    LoadingSpinner,
};
use co2_chart_ui::state::AppState;
use co2_chart_ui::{js_bridge, panels};
use co2_db::dashboard::DASHBOARD_TITLE;
use co2_db::models::RadarPanel;
use co2_db::{render_dashboard, ChartKind, Database, Panel};
use dioxus::prelude::*;

// Gzip-compressed dataset, inflated by the loader on first access.
const DATASET_GZ: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/owid-co2-data.csv.gz"));

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("co2-dashboard-root"))
        .launch(App);
}

/// Decode, clean and load the embedded dataset; returns the database and the
/// countries the radar can offer.
fn load_database() -> anyhow::Result<(Database, Vec<String>)> {
    let dataset = co2_data::cache::load_cached(DATASET_GZ)?;
    let db = Database::from_dataset(&dataset)?;
    let (_, latest_year) = db
        .query_year_range()?
        .ok_or_else(|| anyhow::anyhow!("dataset contains no country rows"))?;
    let options = db.query_radar_countries(latest_year)?;
    Ok((db, options))
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);

    // ─── Effect 1: Load and clean the dataset once on mount ───
    use_effect(move || {
        match load_database() {
            Ok((db, options)) => {
                log::info!("[CO2] dashboard: {} radar countries available", options.len());
                state.radar_options.set(options);
                state.db.set(Some(db));
                js_bridge::init_charts();
            }
            Err(e) => {
                log::error!("[CO2] dashboard: failed to load dataset: {:#}", e);
                state
                    .error_msg
                    .set(Some(format!("Unable to load the CO\u{2082} dataset: {:#}", e)));
            }
        }
        state.loading.set(false);
    });

    // ─── Effect 2: Rebuild the view-model on every selection change ───
    use_effect(move || {
        let selection = state.selection.read().clone();
        let Some(db) = state.db.read().clone() else {
            return;
        };

        match render_dashboard(&db, &selection) {
            Ok(view) => {
                state.view.set(Some(view));
            }
            Err(e) => {
                log::error!("[CO2] dashboard: render failed: {:#}", e);
                state.error_msg.set(Some(format!("{:#}", e)));
                state.view.set(None);
            }
        }
    });

    // ─── Effect 3: Draw the panels once their containers are mounted ───
    use_effect(move || {
        if let Some(view) = state.view.read().as_ref() {
            for panel in &view.panels {
                panels::draw(panel, view);
            }
        }
    });

    // ─── Render ───
    if let Some(err) = state.error_msg.read().as_ref() {
        return rsx! {
            div {
                style: "max-width: 900px; margin: 40px auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",
                ErrorDisplay { message: err.clone() }
            }
        };
    }

    rsx! {
        div {
            style: "display: flex; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif;",

            aside {
                style: "width: 240px; flex-shrink: 0; padding: 16px; background: #F0F2F6; border-right: 1px solid #e0e0e0;",
                h2 {
                    style: "margin: 0 0 12px 0; font-size: 18px;",
                    "Configuration"
                }
                ChartSelector {}
            }

            main {
                style: "flex: 1; max-width: 1000px; margin: 0 auto; padding: 8px 24px;",
                h1 {
                    style: "font-size: 28px; margin: 16px 0;",
                    "{DASHBOARD_TITLE}"
                }

                if *state.loading.read() {
                    LoadingSpinner {}
                } else if let Some(view) = state.view.read().clone() {
                    for (kind, panel) in view.panels.iter().map(|p| (p.kind(), p.clone())) {
                        PanelSection { key: "{kind}", panel: panel, latest_year: view.latest_year }
                    }
                }
            }
        }
    }
}

/// One chart panel: heading, optional controls and the D3 container.
#[component]
fn PanelSection(panel: Panel, latest_year: i32) -> Element {
    let kind = panel.kind();
    let caption = match kind {
        ChartKind::BarChartRace => "Press play or drag the slider to step through the years.".to_string(),
        ChartKind::BubbleMap => "Bubble size: total CO\u{2082}. Colour: CO\u{2082} per person.".to_string(),
        ChartKind::CountryRadar => format!("Each metric divided by its {latest_year} maximum across all countries."),
        ChartKind::SourceSunburst => format!("Top emitters in {latest_year}, split by fuel and process."),
    };

    rsx! {
        section {
            ChartHeader { title: kind.subheader().to_string(), caption: caption }

            if kind == ChartKind::CountryRadar {
                CountrySelector {}
            }

            {match &panel {
                Panel::CountryRadar(RadarPanel::Info(message)) => rsx! {
                    InfoMessage { message: message.clone() }
                },
                _ => rsx! {
                    ChartContainer {
                        id: panels::container_id(kind),
                        min_height: if kind == ChartKind::BubbleMap { 520 } else { 420 },
                    }
                },
            }}
        }
    }
}
