//! View-model structs for the four chart panels.
//!
//! All structs derive `Serialize` so they can be passed to D3.js as JSON
//! from the Dioxus WASM frontend, or written out by the CLI.

use serde::Serialize;

/// One bar in a bar-race frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarEntry {
    pub country: String,
    /// Total CO2 for the frame's year, in million tonnes.
    pub co2: f64,
    /// 1-based position within the frame (1 = largest emitter).
    pub rank: u32,
}

/// All bars shown for one year of the race.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarRaceFrame {
    pub year: i32,
    pub bars: Vec<BarEntry>,
}

/// Bar-chart race across every year with CO2 data.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarRaceView {
    pub frames: Vec<BarRaceFrame>,
    /// Fixed upper bound of the x-axis: 1.05 x the largest bar of any frame.
    pub x_max: f64,
}

/// A single country-year bubble.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BubblePoint {
    pub iso_code: String,
    pub country: String,
    pub year: i32,
    pub co2: f64,
    pub co2_per_capita: f64,
    /// Marker size in [5, 65], linear in `co2`.
    pub bubble_size: f64,
}

/// Animated bubble map data; frames are grouped by `year` on the JS side.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BubbleMapView {
    pub points: Vec<BubblePoint>,
    pub max_co2: f64,
    pub max_co2_per_capita: f64,
}

/// The four radar axes, in display order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RadarMetric {
    Population,
    GdpPerCapita,
    Co2,
    Co2PerCapita,
}

impl RadarMetric {
    pub const ALL: [RadarMetric; 4] = [
        RadarMetric::Population,
        RadarMetric::GdpPerCapita,
        RadarMetric::Co2,
        RadarMetric::Co2PerCapita,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RadarMetric::Population => "population",
            RadarMetric::GdpPerCapita => "gdp_per_capita",
            RadarMetric::Co2 => "co2",
            RadarMetric::Co2PerCapita => "co2_per_capita",
        }
    }

    /// Axis label shown on the chart.
    pub fn label(&self) -> &'static str {
        match self {
            RadarMetric::Population => "Population",
            RadarMetric::GdpPerCapita => "GDP per capita",
            RadarMetric::Co2 => "CO\u{2082}",
            RadarMetric::Co2PerCapita => "CO\u{2082} per capita",
        }
    }
}

/// Latest-year metrics of one country, before normalization.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryMetrics {
    pub country: String,
    pub population: f64,
    pub gdp_per_capita: f64,
    pub co2: f64,
    pub co2_per_capita: f64,
}

impl CountryMetrics {
    pub fn get(&self, metric: RadarMetric) -> f64 {
        match metric {
            RadarMetric::Population => self.population,
            RadarMetric::GdpPerCapita => self.gdp_per_capita,
            RadarMetric::Co2 => self.co2,
            RadarMetric::Co2PerCapita => self.co2_per_capita,
        }
    }
}

/// One vertex of a radar polygon.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RadarPoint {
    pub metric: RadarMetric,
    /// Raw value divided by the metric's maximum over all latest-year countries.
    pub value: f64,
    pub raw: f64,
}

/// One closed polygon on the radar.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RadarSeries {
    pub country: String,
    pub points: Vec<RadarPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RadarChart {
    pub year: i32,
    pub metrics: Vec<RadarMetric>,
    pub series: Vec<RadarSeries>,
}

/// The radar panel: a chart, or a message when nothing is selected.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum RadarPanel {
    Chart(RadarChart),
    Info(String),
}

/// A (country, source, emissions) triple of the sunburst.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SunburstSegment {
    pub country: String,
    pub source: String,
    pub emissions: f64,
}

/// A top emitter with its reported total for the snapshot year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SunburstCountry {
    pub country: String,
    pub co2: f64,
}

/// Nested node consumed by `d3.hierarchy`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SunburstNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SunburstNode>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SunburstView {
    pub year: i32,
    pub countries: Vec<SunburstCountry>,
    pub segments: Vec<SunburstSegment>,
}

impl SunburstView {
    /// Country ring around source ring, in top-emitter order.
    pub fn hierarchy(&self) -> SunburstNode {
        let children = self
            .countries
            .iter()
            .map(|c| SunburstNode {
                name: c.country.clone(),
                value: None,
                children: self
                    .segments
                    .iter()
                    .filter(|s| s.country == c.country)
                    .map(|s| SunburstNode {
                        name: s.source.clone(),
                        value: Some(s.emissions),
                        children: Vec::new(),
                    })
                    .collect(),
            })
            .collect();
        SunburstNode {
            name: format!("CO\u{2082} {}", self.year),
            value: None,
            children,
        }
    }

    /// Sum of the source segments of one country.
    pub fn source_total(&self, country: &str) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.country == country)
            .map(|s| s.emissions)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SunburstView {
        SunburstView {
            year: 2022,
            countries: vec![SunburstCountry {
                country: "China".to_string(),
                co2: 11400.0,
            }],
            segments: vec![
                SunburstSegment {
                    country: "China".to_string(),
                    source: "Coal".to_string(),
                    emissions: 8200.0,
                },
                SunburstSegment {
                    country: "China".to_string(),
                    source: "Oil".to_string(),
                    emissions: 1600.0,
                },
            ],
        }
    }

    #[test]
    fn hierarchy_nests_sources_under_countries() {
        let root = view().hierarchy();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "China");
        assert_eq!(root.children[0].children.len(), 2);
        assert_eq!(root.children[0].children[1].value, Some(1600.0));
    }

    #[test]
    fn hierarchy_json_omits_empty_fields() {
        let json = serde_json::to_value(view().hierarchy()).unwrap();
        assert!(json.get("value").is_none());
        let leaf = &json["children"][0]["children"][0];
        assert!(leaf.get("children").is_none());
        assert_eq!(leaf["value"], 8200.0);
    }

    #[test]
    fn radar_panel_serializes_with_a_kind_tag() {
        let json = serde_json::to_value(RadarPanel::Info("pick one".to_string())).unwrap();
        assert_eq!(json["kind"], "info");
        assert_eq!(json["data"], "pick one");
    }
}
