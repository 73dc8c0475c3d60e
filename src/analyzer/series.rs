//! Derive plot series from extracted samples.

use super::types::{NamedEvent, PowerSample, Series, SeriesStats};

/// Power samples split into plot traces.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSeries {
    /// Seconds since the first sample.
    pub time_relative: Series,
    pub tdp_power: Series,
    pub board_power: Series,
}

/// Split power samples into a relative time axis and two power traces.
pub fn power_series(samples: &[PowerSample]) -> PowerSeries {
    let start = samples.first().map(|s| s.time).unwrap_or_default();

    PowerSeries {
        time_relative: Series::new("time", samples.iter().map(|s| s.time - start).collect()),
        tdp_power: Series::new("tdp_power", samples.iter().map(|s| s.tdp_power).collect()),
        board_power: Series::new("board_power", samples.iter().map(|s| s.board_power).collect()),
    }
}

/// Pad every series with `NaN` up to the length of the longest one.
pub fn pad_to_common_length(series: &mut [Series]) {
    let len = series.iter().map(Series::len).max().unwrap_or(0);
    for s in series.iter_mut() {
        s.values.resize(len, f64::NAN);
    }
}

/// Build `"<name> arg0"` / `"<name> arg1"` series for each requested event name.
///
/// The sub-populations usually have different sizes; shorter ones are padded
/// with `NaN` so every series can share one index axis.
pub fn event_series(events: &[NamedEvent], names: &[String]) -> Vec<Series> {
    let mut series = Vec::with_capacity(names.len() * 2);
    for name in names {
        let matching: Vec<&NamedEvent> = events.iter().filter(|e| &e.name == name).collect();
        series.push(Series::new(
            format!("{} arg0", name),
            matching.iter().map(|e| e.arg0 as f64).collect(),
        ));
        series.push(Series::new(
            format!("{} arg1", name),
            matching.iter().map(|e| e.arg1 as f64).collect(),
        ));
    }
    pad_to_common_length(&mut series);
    series
}

/// `(arg0, arg1)` points for the events carrying `name`.
pub fn event_points(events: &[NamedEvent], name: &str) -> Vec<(f64, f64)> {
    events
        .iter()
        .filter(|e| e.name == name)
        .map(|e| (e.arg0 as f64, e.arg1 as f64))
        .collect()
}

/// Shared `0..len` index axis.
pub fn index_axis(len: usize) -> Series {
    Series::new("index", (0..len).map(|i| i as f64).collect())
}

/// Mean, min and max over the finite values of a series.
///
/// Returns `None` when the series holds no finite value.
pub fn stats(series: &Series) -> Option<SeriesStats> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in series.finite() {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return None;
    }

    Some(SeriesStats {
        count,
        mean: sum / count as f64,
        min,
        max,
    })
}
