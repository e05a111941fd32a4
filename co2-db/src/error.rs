use thiserror::Error;

/// Raised when the radar comparison has no country to draw.
///
/// Never fatal: the dashboard shows the message in place of the chart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Select at least one country to display the radar chart.")]
    EmptySelection,
}

/// A chart name outside the fixed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown chart {0:?} (expected one of: Bar-Chart Race, Bubble Map, Country Radar, Source Sunburst)")]
pub struct UnknownChart(pub String);
