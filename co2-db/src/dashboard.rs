//! Viewer selections and the per-interaction render function.
//!
//! Every viewer interaction re-runs [`render_dashboard`] against the same
//! cached database. The function is cheap: it only issues the queries of the
//! active panels.

use crate::error::{SelectionError, UnknownChart};
use crate::models::{BarRaceView, BubbleMapView, RadarPanel, SunburstView};
use crate::Database;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Number of bars per bar-race frame.
pub const BAR_RACE_TOP_N: usize = 10;

/// Number of emitters broken down in the sunburst.
pub const SUNBURST_TOP_N: usize = 5;

/// Countries preselected for the radar comparison.
pub const DEFAULT_RADAR_COUNTRIES: [&str; 3] = ["United States", "China", "India"];

/// Page title.
pub const DASHBOARD_TITLE: &str = "\u{1F30D} Global CO\u{2082} & Energy Interactive Dashboard";

/// The four chart panels a viewer can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    BarChartRace,
    BubbleMap,
    CountryRadar,
    SourceSunburst,
}

impl ChartKind {
    /// Every chart, in rendering order.
    pub const ALL: [ChartKind; 4] = [
        ChartKind::BarChartRace,
        ChartKind::BubbleMap,
        ChartKind::CountryRadar,
        ChartKind::SourceSunburst,
    ];

    /// Name shown in the sidebar selector.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::BarChartRace => "Bar-Chart Race",
            ChartKind::BubbleMap => "Bubble Map",
            ChartKind::CountryRadar => "Country Radar",
            ChartKind::SourceSunburst => "Source Sunburst",
        }
    }

    /// Short identifier used for CLI flags and DOM ids.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::BarChartRace => "bar-race",
            ChartKind::BubbleMap => "bubble-map",
            ChartKind::CountryRadar => "radar",
            ChartKind::SourceSunburst => "sunburst",
        }
    }

    /// Panel heading.
    pub fn subheader(&self) -> &'static str {
        match self {
            ChartKind::BarChartRace => "\u{1F3C1} Top-10 CO\u{2082} Emitters Over Time",
            ChartKind::BubbleMap => "\u{1F4A1} CO\u{2082} per Capita Bubble Map",
            ChartKind::CountryRadar => "\u{1F4C8} Multimetric Radar Chart (Latest Year)",
            ChartKind::SourceSunburst => "\u{1F333} Emissions by Source (Top 5 Emitters)",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = UnknownChart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ChartKind::ALL
            .into_iter()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(wanted) || kind.slug().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownChart(s.to_string()))
    }
}

/// Everything the viewer can change between render passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Active charts; order is irrelevant.
    pub charts: BTreeSet<ChartKind>,
    /// Countries compared on the radar, in legend order.
    pub radar_countries: Vec<String>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            charts: ChartKind::ALL.into_iter().collect(),
            radar_countries: DEFAULT_RADAR_COUNTRIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

impl Selection {
    pub fn is_active(&self, kind: ChartKind) -> bool {
        self.charts.contains(&kind)
    }

    /// Flip one chart on or off.
    pub fn toggle(&mut self, kind: ChartKind) {
        if !self.charts.remove(&kind) {
            self.charts.insert(kind);
        }
    }
}

/// View-model of one active panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "chart", content = "view", rename_all = "snake_case")]
pub enum Panel {
    BarChartRace(BarRaceView),
    BubbleMap(BubbleMapView),
    CountryRadar(RadarPanel),
    SourceSunburst(SunburstView),
}

impl Panel {
    pub fn kind(&self) -> ChartKind {
        match self {
            Panel::BarChartRace(_) => ChartKind::BarChartRace,
            Panel::BubbleMap(_) => ChartKind::BubbleMap,
            Panel::CountryRadar(_) => ChartKind::CountryRadar,
            Panel::SourceSunburst(_) => ChartKind::SourceSunburst,
        }
    }
}

/// The whole page for one render pass.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub first_year: i32,
    pub latest_year: i32,
    pub panels: Vec<Panel>,
}

impl DashboardView {
    pub fn panel(&self, kind: ChartKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind() == kind)
    }
}

/// Build the view-model of every active chart.
///
/// Fails only when the table is empty or a query fails; an empty radar
/// selection becomes an informational panel.
pub fn render_dashboard(db: &Database, selection: &Selection) -> anyhow::Result<DashboardView> {
    let (first_year, latest_year) = db
        .query_year_range()?
        .ok_or_else(|| anyhow::anyhow!("dataset contains no country rows"))?;

    let mut panels = Vec::with_capacity(selection.charts.len());
    for kind in ChartKind::ALL {
        if !selection.is_active(kind) {
            continue;
        }
        let panel = match kind {
            ChartKind::BarChartRace => Panel::BarChartRace(db.query_bar_race(BAR_RACE_TOP_N)?),
            ChartKind::BubbleMap => Panel::BubbleMap(db.query_bubble_map()?),
            ChartKind::CountryRadar => {
                match db.query_radar(latest_year, &selection.radar_countries) {
                    Ok(chart) => Panel::CountryRadar(RadarPanel::Chart(chart)),
                    Err(e) => match e.downcast_ref::<SelectionError>() {
                        Some(empty) => Panel::CountryRadar(RadarPanel::Info(empty.to_string())),
                        None => return Err(e),
                    },
                }
            }
            ChartKind::SourceSunburst => {
                Panel::SourceSunburst(db.query_sunburst(latest_year, SUNBURST_TOP_N)?)
            }
        };
        panels.push(panel);
    }

    log::info!(
        "[CO2] dashboard: rendered {} of {} panels",
        panels.len(),
        ChartKind::ALL.len()
    );
    Ok(DashboardView {
        title: DASHBOARD_TITLE.to_string(),
        first_year,
        latest_year,
        panels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        let csv = "iso_code,country,year,co2,co2_per_capita,gdp,population,coal_co2,oil_co2,gas_co2,flaring_co2,cement_co2\n\
USA,United States,1990,5100,20,9e12,250e6,1800,2200,1000,10,30\n\
USA,United States,2022,5000,15,25e12,330e6,1000,2200,1700,40,40\n\
CHN,China,1990,2500,2,1e12,1100e6,1900,300,20,1,200\n\
CHN,China,2022,11400,8,18e12,1400e6,8200,1600,700,10,800\n\
IND,India,2022,2800,2,3.4e12,1400e6,1800,700,130,5,150\n\
OWID_WRL,World,2022,37000,4.7,,8e9,,,,,\n";
        let dataset = co2_data::loader::load_bytes(csv.as_bytes()).unwrap();
        Database::from_dataset(&dataset).unwrap()
    }

    #[test]
    fn default_selection_renders_all_four_in_order() {
        let view = render_dashboard(&db(), &Selection::default()).unwrap();
        let kinds: Vec<ChartKind> = view.panels.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
        assert_eq!(view.first_year, 1990);
        assert_eq!(view.latest_year, 2022);
    }

    #[test]
    fn inactive_charts_are_not_rendered() {
        let selection = Selection {
            charts: [ChartKind::SourceSunburst, ChartKind::BarChartRace]
                .into_iter()
                .collect(),
            ..Selection::default()
        };
        let view = render_dashboard(&db(), &selection).unwrap();
        assert_eq!(view.panels.len(), 2);
        assert_eq!(view.panels[0].kind(), ChartKind::BarChartRace);
        assert!(view.panel(ChartKind::BubbleMap).is_none());
    }

    #[test]
    fn empty_radar_selection_becomes_a_message() {
        let selection = Selection {
            charts: [ChartKind::CountryRadar].into_iter().collect(),
            radar_countries: Vec::new(),
        };
        let view = render_dashboard(&db(), &selection).unwrap();
        match view.panel(ChartKind::CountryRadar) {
            Some(Panel::CountryRadar(RadarPanel::Info(msg))) => {
                assert!(msg.contains("Select at least one country"))
            }
            other => panic!("expected info panel, got {:?}", other),
        }
    }

    #[test]
    fn radar_uses_the_latest_year() {
        let view = render_dashboard(&db(), &Selection::default()).unwrap();
        match view.panel(ChartKind::CountryRadar) {
            Some(Panel::CountryRadar(RadarPanel::Chart(chart))) => {
                assert_eq!(chart.year, 2022);
                assert_eq!(chart.series.len(), 3);
            }
            other => panic!("expected radar chart, got {:?}", other),
        }
    }

    #[test]
    fn aggregate_rows_never_reach_the_charts() {
        let view = render_dashboard(&db(), &Selection::default()).unwrap();
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("World"));
    }

    #[test]
    fn empty_table_is_fatal() {
        let db = Database::new().unwrap();
        assert!(render_dashboard(&db, &Selection::default()).is_err());
    }

    #[test]
    fn chart_names_parse_from_labels_and_slugs() {
        assert_eq!("Bar-Chart Race".parse::<ChartKind>(), Ok(ChartKind::BarChartRace));
        assert_eq!("bubble-map".parse::<ChartKind>(), Ok(ChartKind::BubbleMap));
        assert_eq!(" RADAR ".parse::<ChartKind>(), Ok(ChartKind::CountryRadar));
        assert_eq!("source sunburst".parse::<ChartKind>(), Ok(ChartKind::SourceSunburst));
        assert!("pie".parse::<ChartKind>().is_err());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = Selection::default();
        selection.toggle(ChartKind::BubbleMap);
        assert!(!selection.is_active(ChartKind::BubbleMap));
        selection.toggle(ChartKind::BubbleMap);
        assert!(selection.is_active(ChartKind::BubbleMap));
    }
}
