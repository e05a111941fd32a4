//! Per-panel chart configuration and dispatch to the D3.js bridge.

use crate::js_bridge;
use co2_db::models::{RadarMetric, RadarPanel};
use co2_db::{ChartKind, DashboardView, Panel};

/// World country polygons keyed by ISO 3166-1 alpha-3 `id`.
pub const WORLD_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";

/// Milliseconds each year stays on screen while playing.
const FRAME_DURATION_MS: u32 = 600;

/// DOM id of the D3 container for one chart.
pub fn container_id(kind: ChartKind) -> String {
    format!("co2-{}-chart", kind.slug())
}

/// Chart title with the year span of the data baked in.
pub fn chart_title(kind: ChartKind, view: &DashboardView) -> String {
    match kind {
        ChartKind::BarChartRace => format!(
            "Top 10 CO\u{2082} Emitters ({}\u{2013}{})",
            view.first_year, view.latest_year
        ),
        ChartKind::BubbleMap => format!(
            "Scale & Intensity of Emissions ({}\u{2013}{})",
            view.first_year, view.latest_year
        ),
        ChartKind::CountryRadar => format!("Country Metric Comparison in {}", view.latest_year),
        ChartKind::SourceSunburst => format!("CO\u{2082} by Source in {}", view.latest_year),
    }
}

/// Config JSON handed to the chart's render function.
pub fn chart_config(kind: ChartKind, view: &DashboardView) -> serde_json::Value {
    let title = chart_title(kind, view);
    match kind {
        ChartKind::BarChartRace => serde_json::json!({
            "title": title,
            "xAxisLabel": "Mt CO\u{2082}",
            "frameDuration": FRAME_DURATION_MS,
        }),
        ChartKind::BubbleMap => serde_json::json!({
            "title": title,
            "colorLabel": "tCO\u{2082} per person",
            "geoJsonUrl": WORLD_GEOJSON_URL,
            "frameDuration": FRAME_DURATION_MS,
        }),
        ChartKind::CountryRadar => {
            let metrics: Vec<serde_json::Value> = RadarMetric::ALL
                .iter()
                .map(|m| serde_json::json!({ "key": m.key(), "label": m.label() }))
                .collect();
            serde_json::json!({
                "title": title,
                "metrics": metrics,
                "background": "#111111",
                "foreground": "#f2f2f2",
            })
        }
        ChartKind::SourceSunburst => serde_json::json!({
            "title": title,
            "valueUnit": "Mt CO\u{2082}",
        }),
    }
}

/// Render one panel into its container.
///
/// An informational radar panel has nothing to draw; its container is
/// cleared instead.
pub fn draw(panel: &Panel, view: &DashboardView) {
    let kind = panel.kind();
    let id = container_id(kind);
    let config_json = chart_config(kind, view).to_string();

    let data_json = match panel {
        Panel::BarChartRace(race) => serde_json::to_string(race),
        Panel::BubbleMap(map) => serde_json::to_string(map),
        Panel::CountryRadar(RadarPanel::Chart(chart)) => serde_json::to_string(chart),
        Panel::CountryRadar(RadarPanel::Info(_)) => {
            js_bridge::destroy_chart(&id);
            return;
        }
        Panel::SourceSunburst(sunburst) => serde_json::to_string(&sunburst.hierarchy()),
    };
    let data_json = match data_json {
        Ok(json) => json,
        Err(e) => {
            log::error!("[CO2] panels: failed to serialize {}: {}", kind, e);
            return;
        }
    };

    log::info!("[CO2] panels: drawing {} into #{}", kind, id);
    match kind {
        ChartKind::BarChartRace => js_bridge::render_bar_race(&id, &data_json, &config_json),
        ChartKind::BubbleMap => js_bridge::render_bubble_map(&id, &data_json, &config_json),
        ChartKind::CountryRadar => js_bridge::render_radar_chart(&id, &data_json, &config_json),
        ChartKind::SourceSunburst => js_bridge::render_sunburst(&id, &data_json, &config_json),
    }
}
