//! Gap filling for per-country yearly series.
//!
//! Each country's series is filled one measure at a time:
//! linear interpolation closes interior gaps, forward-fill carries the last
//! known value to the end, backward-fill carries the first known value to
//! the start. Rows are never dropped.

use crate::observation::{Measure, Observation};

/// Linearly interpolate the value at `year` between two known points.
///
/// The fraction is weighted by year distance. If both points share a year
/// (duplicate rows) the start value is returned.
pub fn interpolate_pair(start: (i32, f64), end: (i32, f64), year: i32) -> f64 {
    let span = end.0 - start.0;
    if span <= 0 {
        return start.1;
    }
    let slope = (end.1 - start.1) / span as f64;
    start.1 + slope * (year - start.0) as f64
}

/// Fill interior gaps (missing values bracketed by known values).
///
/// The fill is weighted by year distance rather than by row position. The
/// two agree on consecutive annual rows; with uneven spacing (2000, 2001,
/// 2005) the result differs from a positional fill, and only duplicate
/// bracketing years fall back to row position.
///
/// `years` and `values` are parallel and must be sorted by year.
/// Leading and trailing gaps are left untouched.
pub fn interpolate_gaps(years: &[i32], values: &mut [Option<f64>]) {
    debug_assert_eq!(years.len(), values.len());
    let mut previous: Option<usize> = None;

    for i in 0..values.len() {
        let Some(end_value) = values[i] else {
            continue;
        };
        if let Some(start) = previous {
            if i - start > 1 {
                let start_point = (years[start], values[start].unwrap_or(end_value));
                let end_point = (years[i], end_value);
                for k in start + 1..i {
                    values[k] = Some(if years[i] > years[start] {
                        interpolate_pair(start_point, end_point, years[k])
                    } else {
                        // Equal bracketing years: fall back to row position
                        let t = (k - start) as f64 / (i - start) as f64;
                        start_point.1 + (end_value - start_point.1) * t
                    });
                }
            }
        }
        previous = Some(i);
    }
}

/// Carry the last known value forward over missing entries.
pub fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for value in values.iter_mut() {
        match value {
            Some(v) => last = Some(*v),
            None => *value = last,
        }
    }
}

/// Carry the next known value backward over missing entries.
pub fn backward_fill(values: &mut [Option<f64>]) {
    let mut next = None;
    for value in values.iter_mut().rev() {
        match value {
            Some(v) => next = Some(*v),
            None => *value = next,
        }
    }
}

/// Apply the full fill policy to one series.
pub fn fill_series(years: &[i32], values: &mut [Option<f64>]) {
    interpolate_gaps(years, values);
    forward_fill(values);
    backward_fill(values);
}

/// Fill every measure of every country group in place.
///
/// Input must be sorted by (country, year) so each country is one
/// contiguous run.
pub fn fill_by_country(observations: &mut [Observation]) {
    let mut start = 0;
    while start < observations.len() {
        let country = observations[start].country.clone();
        let end = observations[start..]
            .iter()
            .position(|o| o.country != country)
            .map_or(observations.len(), |offset| start + offset);

        let group = &mut observations[start..end];
        let years: Vec<i32> = group.iter().map(|o| o.year).collect();
        for measure in Measure::ALL {
            let mut values: Vec<Option<f64>> = group.iter().map(|o| o.measure(measure)).collect();
            fill_series(&years, &mut values);
            for (obs, value) in group.iter_mut().zip(values) {
                obs.set_measure(measure, value);
            }
        }

        start = end;
    }
}
