//! Typed query methods producing the chart view-models.
//!
//! All queries return structs from [`crate::models`] that serialize to the
//! JSON shapes the D3.js chart scripts expect.
//!
//! # Snapshot year
//!
//! The radar and sunburst views describe a single year, normally the latest
//! year present in the table (see [`Database::query_year_range`]).

use crate::error::SelectionError;
use crate::models::{
    BarEntry, BarRaceFrame, BarRaceView, BubbleMapView, BubblePoint, CountryMetrics, RadarChart,
    RadarMetric, RadarPoint, RadarSeries, SunburstCountry, SunburstSegment, SunburstView,
};
use crate::Database;
use co2_data::Measure;
use rusqlite::params;

/// Headroom applied to the bar-race x-axis so bars never clip.
pub const BAR_RACE_HEADROOM: f64 = 1.05;

/// Smallest bubble size on the map.
pub const BUBBLE_MIN_SIZE: f64 = 5.0;

/// Size added for the largest emitter; bubbles span [5, 65].
pub const BUBBLE_SIZE_RANGE: f64 = 60.0;

impl Database {
    /// Earliest and latest year in the table, or `None` when it is empty.
    pub fn query_year_range(&self) -> anyhow::Result<Option<(i32, i32)>> {
        let conn = self.conn.borrow();
        let (min, max): (Option<i32>, Option<i32>) = conn.query_row(
            "SELECT MIN(year), MAX(year) FROM observations",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(min.zip(max))
    }

    // ───────────────────── Bar-Chart Race ─────────────────────

    /// Top `top_n` CO2 emitters of every year.
    ///
    /// Country-years without a CO2 value are not ranked. Ties are broken by
    /// country name so frames are deterministic.
    pub fn query_bar_race(&self, top_n: usize) -> anyhow::Result<BarRaceView> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT year, country, total, pos FROM (
                 SELECT year, country, total,
                        ROW_NUMBER() OVER (
                            PARTITION BY year ORDER BY total DESC, country ASC
                        ) AS pos
                 FROM (
                     SELECT year, country, SUM(co2) AS total
                     FROM observations
                     WHERE co2 IS NOT NULL
                     GROUP BY year, country
                 )
             )
             WHERE pos <= ?1
             ORDER BY year, pos",
        )?;
        let rows = stmt
            .query_map(params![top_n as i64], |row| {
                Ok((
                    row.get::<_, i32>(0)?,
                    BarEntry {
                        country: row.get(1)?,
                        co2: row.get(2)?,
                        rank: row.get(3)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut frames: Vec<BarRaceFrame> = Vec::new();
        let mut max_value: f64 = 0.0;
        for (year, bar) in rows {
            max_value = max_value.max(bar.co2);
            match frames.last_mut() {
                Some(frame) if frame.year == year => frame.bars.push(bar),
                _ => frames.push(BarRaceFrame {
                    year,
                    bars: vec![bar],
                }),
            }
        }
        log::info!(
            "[CO2] query: query_bar_race returned {} frames",
            frames.len()
        );
        Ok(BarRaceView {
            frames,
            x_max: max_value * BAR_RACE_HEADROOM,
        })
    }

    // ───────────────────── Bubble Map ─────────────────────

    /// Every country-year with both CO2 and CO2 per capita, sized for the map.
    pub fn query_bubble_map(&self) -> anyhow::Result<BubbleMapView> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT iso_code, country, year, co2, co2_per_capita
             FROM observations
             WHERE co2 IS NOT NULL AND co2_per_capita IS NOT NULL
             ORDER BY year, country",
        )?;
        let mut points = stmt
            .query_map([], |row| {
                Ok(BubblePoint {
                    iso_code: row.get(0)?,
                    country: row.get(1)?,
                    year: row.get(2)?,
                    co2: row.get(3)?,
                    co2_per_capita: row.get(4)?,
                    bubble_size: BUBBLE_MIN_SIZE,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let max_co2 = points.iter().map(|p| p.co2).fold(0.0, f64::max);
        let max_co2_per_capita = points.iter().map(|p| p.co2_per_capita).fold(0.0, f64::max);
        for point in &mut points {
            point.bubble_size = bubble_size(point.co2, max_co2);
        }
        log::info!(
            "[CO2] query: query_bubble_map returned {} points",
            points.len()
        );
        Ok(BubbleMapView {
            points,
            max_co2,
            max_co2_per_capita,
        })
    }

    // ───────────────────── Country Radar ─────────────────────

    /// Countries with all four radar inputs present in `year`, by name.
    pub fn query_radar_table(&self, year: i32) -> anyhow::Result<Vec<CountryMetrics>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT country, population, gdp, co2, co2_per_capita
             FROM observations
             WHERE year = ?1
               AND co2 IS NOT NULL AND co2_per_capita IS NOT NULL
               AND gdp IS NOT NULL AND population IS NOT NULL
             ORDER BY country",
        )?;
        let rows = stmt
            .query_map(params![year], |row| {
                let population: f64 = row.get(1)?;
                let gdp: f64 = row.get(2)?;
                Ok(CountryMetrics {
                    country: row.get(0)?,
                    population,
                    gdp_per_capita: if population > 0.0 { gdp / population } else { 0.0 },
                    co2: row.get(3)?,
                    co2_per_capita: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Names offered in the radar country picker.
    pub fn query_radar_countries(&self, year: i32) -> anyhow::Result<Vec<String>> {
        Ok(self
            .query_radar_table(year)?
            .into_iter()
            .map(|m| m.country)
            .collect())
    }

    /// Normalized radar polygons for the selected countries.
    ///
    /// Each metric is divided by its maximum over *all* countries of the
    /// snapshot year, not only the selected ones. Selection order is kept;
    /// duplicates and countries absent from that year are dropped. Fails with
    /// [`SelectionError::EmptySelection`] when nothing is left to draw.
    pub fn query_radar(&self, year: i32, countries: &[String]) -> anyhow::Result<RadarChart> {
        if countries.is_empty() {
            return Err(SelectionError::EmptySelection.into());
        }
        let table = self.query_radar_table(year)?;

        let maxima: Vec<f64> = RadarMetric::ALL
            .iter()
            .map(|metric| {
                table
                    .iter()
                    .map(|m| m.get(*metric))
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect();

        let mut series: Vec<RadarSeries> = Vec::new();
        for name in countries {
            if series.iter().any(|s| &s.country == name) {
                continue;
            }
            let Some(metrics) = table.iter().find(|m| &m.country == name) else {
                log::warn!("[CO2] query: radar skips {} (no complete data in {})", name, year);
                continue;
            };
            let points = RadarMetric::ALL
                .iter()
                .zip(&maxima)
                .map(|(metric, max)| {
                    let raw = metrics.get(*metric);
                    RadarPoint {
                        metric: *metric,
                        value: normalize(raw, *max),
                        raw,
                    }
                })
                .collect();
            series.push(RadarSeries {
                country: name.clone(),
                points,
            });
        }

        if series.is_empty() {
            return Err(SelectionError::EmptySelection.into());
        }
        log::info!(
            "[CO2] query: query_radar returned {} series",
            series.len()
        );
        Ok(RadarChart {
            year,
            metrics: RadarMetric::ALL.to_vec(),
            series,
        })
    }

    // ───────────────────── Source Sunburst ─────────────────────

    /// Per-source breakdown of the `top_n` largest emitters of `year`.
    ///
    /// Sources with no value are omitted rather than drawn as zero.
    pub fn query_sunburst(&self, year: i32, top_n: usize) -> anyhow::Result<SunburstView> {
        let source_columns: Vec<&str> = Measure::SOURCES.iter().map(|m| m.column()).collect();
        let sql = format!(
            "SELECT country, co2, {}
             FROM observations
             WHERE year = ?1 AND co2 IS NOT NULL
             ORDER BY co2 DESC, country ASC
             LIMIT ?2",
            source_columns.join(", ")
        );

        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![year, top_n as i64], |row| {
                let mut sources = Vec::with_capacity(Measure::SOURCES.len());
                for i in 0..Measure::SOURCES.len() {
                    sources.push(row.get::<_, Option<f64>>(i + 2)?);
                }
                Ok((
                    SunburstCountry {
                        country: row.get(0)?,
                        co2: row.get(1)?,
                    },
                    sources,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut countries = Vec::with_capacity(rows.len());
        let mut segments = Vec::new();
        for (country, sources) in rows {
            for (column, emissions) in source_columns.iter().zip(sources) {
                if let Some(emissions) = emissions {
                    segments.push(SunburstSegment {
                        country: country.country.clone(),
                        source: source_label(column),
                        emissions,
                    });
                }
            }
            countries.push(country);
        }
        log::info!(
            "[CO2] query: query_sunburst returned {} segments",
            segments.len()
        );
        Ok(SunburstView {
            year,
            countries,
            segments,
        })
    }
}

/// Bubble size linear in CO2 relative to the global maximum.
pub fn bubble_size(co2: f64, max_co2: f64) -> f64 {
    if max_co2 <= 0.0 {
        return BUBBLE_MIN_SIZE;
    }
    (BUBBLE_MIN_SIZE + BUBBLE_SIZE_RANGE * co2 / max_co2)
        .clamp(BUBBLE_MIN_SIZE, BUBBLE_MIN_SIZE + BUBBLE_SIZE_RANGE)
}

fn normalize(raw: f64, max: f64) -> f64 {
    if max > 0.0 {
        raw / max
    } else {
        0.0
    }
}

/// Display label for a source column: drop `_co2`, then title-case words.
///
/// `coal_co2` becomes `Coal`; `other_industry_co2` becomes `Other_Industry`.
pub fn source_label(column: &str) -> String {
    let stripped = column.replace("_co2", "");
    let mut label = String::with_capacity(stripped.len());
    let mut previous_alpha = false;
    for c in stripped.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
        } else {
            label.push(c);
        }
        previous_alpha = c.is_alphabetic();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SelectionError;

    const HEADER: &str = "iso_code,country,year,co2,co2_per_capita,gdp,population,coal_co2,oil_co2,gas_co2,flaring_co2,cement_co2";

    fn db(rows: &[&str]) -> Database {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        let dataset = co2_data::loader::load_bytes(csv.as_bytes()).unwrap();
        Database::from_dataset(&dataset).unwrap()
    }

    /// Twelve countries in 2021, CO2 = 10 x index; a few also in 2020.
    fn race_db() -> Database {
        let mut rows: Vec<String> = (1..=12)
            .map(|i| format!("C{:02},Country {:02},2021,{},1,,,,,,,,", i, i, i * 10))
            .collect();
        rows.push("C01,Country 01,2020,500,1,,,,,,,,".to_string());
        rows.push("C02,Country 02,2020,400,1,,,,,,,,".to_string());
        let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        db(&refs)
    }

    #[test]
    fn bar_race_keeps_top_ten_per_year() {
        let view = race_db().query_bar_race(10).unwrap();
        assert_eq!(view.frames.len(), 2);

        let frame_2021 = &view.frames[1];
        assert_eq!(frame_2021.year, 2021);
        assert_eq!(frame_2021.bars.len(), 10);
        assert_eq!(frame_2021.bars[0].country, "Country 12");
        assert_eq!(frame_2021.bars[0].rank, 1);
        assert_eq!(frame_2021.bars[9].country, "Country 03");
        assert!(frame_2021.bars.iter().all(|b| b.country != "Country 01"));
        assert!(frame_2021.bars.windows(2).all(|w| w[0].co2 >= w[1].co2));
    }

    #[test]
    fn bar_race_frames_with_few_countries_are_short() {
        let view = race_db().query_bar_race(10).unwrap();
        let frame_2020 = &view.frames[0];
        // Country 03..12 have no 2020 row at all
        assert_eq!(frame_2020.year, 2020);
        assert_eq!(frame_2020.bars.len(), 2);
    }

    #[test]
    fn bar_race_axis_has_headroom_over_the_global_max() {
        let view = race_db().query_bar_race(10).unwrap();
        assert!((view.x_max - 500.0 * 1.05).abs() < 1e-9);
    }

    #[test]
    fn bar_race_skips_missing_co2() {
        let view = db(&["AAA,A,2000,,,,,,,,,", "BBB,B,2000,3,,,,,,,,"])
            .query_bar_race(10)
            .unwrap();
        assert_eq!(view.frames[0].bars.len(), 1);
        assert_eq!(view.frames[0].bars[0].country, "B");
    }

    #[test]
    fn bubble_sizes_scale_between_five_and_sixty_five() {
        let view = db(&[
            "AAA,A,2000,0,0.5,,,,,,,",
            "BBB,B,2000,50,2,,,,,,,",
            "CCC,C,2000,100,9,,,,,,,",
            "DDD,D,2000,40,,,,,,,,",
        ])
        .query_bubble_map()
        .unwrap();

        assert_eq!(view.points.len(), 3, "rows without per-capita are dropped");
        assert_eq!(view.max_co2, 100.0);
        assert_eq!(view.max_co2_per_capita, 9.0);
        let sizes: Vec<f64> = view.points.iter().map(|p| p.bubble_size).collect();
        assert_eq!(sizes, vec![5.0, 35.0, 65.0]);
    }

    #[test]
    fn bubble_size_with_zero_max_is_minimum() {
        assert_eq!(bubble_size(0.0, 0.0), BUBBLE_MIN_SIZE);
    }

    fn radar_db() -> Database {
        db(&[
            "USA,United States,2022,5000,15,25e12,330e6,,,,,",
            "CHN,China,2022,11000,8,18e12,1400e6,,,,,",
            "IND,India,2022,2800,2,3.4e12,1400e6,,,,,",
            "QAT,Qatar,2022,100,37,0.2e12,2.7e6,,,,,",
            "XXX,Nowhere,2022,10,1,,5e6,,,,,",
        ])
    }

    #[test]
    fn radar_values_are_normalized_against_all_countries() {
        let chart = radar_db()
            .query_radar(2022, &["India".to_string(), "China".to_string()])
            .unwrap();
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].country, "India");

        for series in &chart.series {
            assert_eq!(series.points.len(), 4);
            for point in &series.points {
                assert!((0.0..=1.0).contains(&point.value), "{:?}", point);
            }
        }

        // CO2 per capita max is Qatar's 37, which is not selected
        let china_per_capita = chart.series[1]
            .points
            .iter()
            .find(|p| p.metric == RadarMetric::Co2PerCapita)
            .unwrap();
        assert!((china_per_capita.value - 8.0 / 37.0).abs() < 1e-12);

        let china_co2 = chart.series[1]
            .points
            .iter()
            .find(|p| p.metric == RadarMetric::Co2)
            .unwrap();
        assert_eq!(china_co2.value, 1.0);
    }

    #[test]
    fn radar_derives_gdp_per_capita() {
        let table = radar_db().query_radar_table(2022).unwrap();
        let usa = table.iter().find(|m| m.country == "United States").unwrap();
        assert!((usa.gdp_per_capita - 25e12 / 330e6).abs() < 1e-6);
        assert!(table.iter().all(|m| m.country != "Nowhere"), "incomplete rows are excluded");
    }

    #[test]
    fn radar_with_no_selection_is_an_empty_selection_error() {
        let err = radar_db().query_radar(2022, &[]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SelectionError>(),
            Some(&SelectionError::EmptySelection)
        );
    }

    #[test]
    fn radar_skips_unknown_and_duplicate_countries() {
        let chart = radar_db()
            .query_radar(
                2022,
                &["Atlantis".to_string(), "Qatar".to_string(), "Qatar".to_string()],
            )
            .unwrap();
        assert_eq!(chart.series.len(), 1);

        let err = radar_db()
            .query_radar(2022, &["Atlantis".to_string()])
            .unwrap_err();
        assert!(err.downcast_ref::<SelectionError>().is_some());
    }

    #[test]
    fn radar_options_list_complete_countries() {
        let options = radar_db().query_radar_countries(2022).unwrap();
        assert_eq!(options, vec!["China", "India", "Qatar", "United States"]);
    }

    fn sunburst_db() -> Database {
        db(&[
            "AAA,A,2022,100,1,,,50,30,10,5,5",
            "BBB,B,2022,90,1,,,40,,20,,",
            "CCC,C,2022,80,1,,,1,1,1,1,1",
            "DDD,D,2022,70,1,,,1,1,1,1,1",
            "EEE,E,2022,60,1,,,1,1,1,1,1",
            "FFF,F,2022,50,1,,,1,1,1,1,1",
            "GGG,G,2021,999,1,,,1,1,1,1,1",
        ])
    }

    #[test]
    fn sunburst_takes_top_five_of_the_year() {
        let view = sunburst_db().query_sunburst(2022, 5).unwrap();
        let names: Vec<&str> = view.countries.iter().map(|c| c.country.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn sunburst_omits_missing_sources() {
        let view = sunburst_db().query_sunburst(2022, 5).unwrap();
        let b_sources: Vec<&str> = view
            .segments
            .iter()
            .filter(|s| s.country == "B")
            .map(|s| s.source.as_str())
            .collect();
        assert_eq!(b_sources, vec!["Coal", "Gas"]);
    }

    #[test]
    fn sunburst_sources_do_not_exceed_reported_total() {
        let view = sunburst_db().query_sunburst(2022, 5).unwrap();
        for country in &view.countries {
            assert!(view.source_total(&country.country) <= country.co2 + 1e-9);
        }
    }

    #[test]
    fn source_labels_are_title_cased() {
        assert_eq!(source_label("coal_co2"), "Coal");
        assert_eq!(source_label("flaring_co2"), "Flaring");
        assert_eq!(source_label("other_industry_co2"), "Other_Industry");
    }

    #[test]
    fn year_range_spans_the_table() {
        assert_eq!(sunburst_db().query_year_range().unwrap(), Some((2021, 2022)));
    }
}
