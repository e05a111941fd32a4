use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One of the nine numeric columns carried through cleaning.
///
/// Variants are listed in dataset column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Measure {
    Co2,
    Co2PerCapita,
    Gdp,
    Population,
    CoalCo2,
    OilCo2,
    GasCo2,
    FlaringCo2,
    CementCo2,
}

impl Measure {
    /// Every measure, in dataset column order.
    pub const ALL: [Measure; 9] = [
        Measure::Co2,
        Measure::Co2PerCapita,
        Measure::Gdp,
        Measure::Population,
        Measure::CoalCo2,
        Measure::OilCo2,
        Measure::GasCo2,
        Measure::FlaringCo2,
        Measure::CementCo2,
    ];

    /// Per-source emission columns used by the sunburst breakdown.
    pub const SOURCES: [Measure; 5] = [
        Measure::CoalCo2,
        Measure::OilCo2,
        Measure::GasCo2,
        Measure::FlaringCo2,
        Measure::CementCo2,
    ];

    /// Column name in the CSV header (and the SQL schema).
    pub fn column(&self) -> &'static str {
        match self {
            Measure::Co2 => "co2",
            Measure::Co2PerCapita => "co2_per_capita",
            Measure::Gdp => "gdp",
            Measure::Population => "population",
            Measure::CoalCo2 => "coal_co2",
            Measure::OilCo2 => "oil_co2",
            Measure::GasCo2 => "gas_co2",
            Measure::FlaringCo2 => "flaring_co2",
            Measure::CementCo2 => "cement_co2",
        }
    }
}

/// A single country-year record.
///
/// Measures are `None` where the source had no parseable value and the
/// fill policy could not close the gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub iso_code: String,
    pub country: String,
    pub year: i32,
    pub co2: Option<f64>,
    pub co2_per_capita: Option<f64>,
    pub gdp: Option<f64>,
    pub population: Option<f64>,
    pub coal_co2: Option<f64>,
    pub oil_co2: Option<f64>,
    pub gas_co2: Option<f64>,
    pub flaring_co2: Option<f64>,
    pub cement_co2: Option<f64>,
}

impl Observation {
    /// An observation with every measure missing.
    pub fn new(iso_code: &str, country: &str, year: i32) -> Self {
        Self {
            iso_code: iso_code.to_string(),
            country: country.to_string(),
            year,
            co2: None,
            co2_per_capita: None,
            gdp: None,
            population: None,
            coal_co2: None,
            oil_co2: None,
            gas_co2: None,
            flaring_co2: None,
            cement_co2: None,
        }
    }

    pub fn measure(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Co2 => self.co2,
            Measure::Co2PerCapita => self.co2_per_capita,
            Measure::Gdp => self.gdp,
            Measure::Population => self.population,
            Measure::CoalCo2 => self.coal_co2,
            Measure::OilCo2 => self.oil_co2,
            Measure::GasCo2 => self.gas_co2,
            Measure::FlaringCo2 => self.flaring_co2,
            Measure::CementCo2 => self.cement_co2,
        }
    }

    pub fn set_measure(&mut self, measure: Measure, value: Option<f64>) {
        let slot = match measure {
            Measure::Co2 => &mut self.co2,
            Measure::Co2PerCapita => &mut self.co2_per_capita,
            Measure::Gdp => &mut self.gdp,
            Measure::Population => &mut self.population,
            Measure::CoalCo2 => &mut self.coal_co2,
            Measure::OilCo2 => &mut self.oil_co2,
            Measure::GasCo2 => &mut self.gas_co2,
            Measure::FlaringCo2 => &mut self.flaring_co2,
            Measure::CementCo2 => &mut self.cement_co2,
        };
        *slot = value;
    }
}

/// The cleaned, immutable table: country rows sorted by (country, year).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    /// Wrap observations that are already sorted and filled.
    pub(crate) fn from_sorted(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Earliest year present, if any rows survived filtering.
    pub fn first_year(&self) -> Option<i32> {
        self.observations.iter().map(|o| o.year).min()
    }

    /// The snapshot year used by the radar and sunburst views.
    pub fn latest_year(&self) -> Option<i32> {
        self.observations.iter().map(|o| o.year).max()
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.observations
            .iter()
            .map(|o| o.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
