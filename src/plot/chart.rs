//! Line and scatter chart rendering with the [`plotters`] bitmap backend.
//!
//! Charts are saved as PNG files. Text is drawn with the backend's font
//! rendering, and non-finite values (series padding) are never drawn.

use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to prepare output location: {0}")]
    Output(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Height of the statistics strip under the chart, in pixels.
const FOOTER_HEIGHT: u32 = 40;

/// Trace colors, assigned in order.
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(255, 127, 14),
    RGBColor(148, 103, 189),
    RGBColor(23, 190, 207),
];

/// Color for the `index`-th trace.
pub fn trace_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Figure-level settings shared by all chart kinds.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    /// Summary text drawn centered under the plot.
    pub footer: Option<String>,
}

/// One connected trace of a line chart.
#[derive(Debug, Clone)]
pub struct LineTrace<'a> {
    pub label: &'a str,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub color: RGBColor,
}

/// One labelled group of points of a scatter chart.
#[derive(Debug, Clone)]
pub struct PointGroup<'a> {
    pub label: &'a str,
    pub points: &'a [(f64, f64)],
    pub color: RGBColor,
}

/// Split a trace into runs of consecutive finite points.
///
/// A `NaN` in either coordinate ends the current run.
fn finite_segments(x: &[f64], y: &[f64]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (&x, &y) in x.iter().zip(y) {
        if x.is_finite() && y.is_finite() {
            current.push((x, y));
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Axis range covering `values`, padded by `margin` of its span.
///
/// A single value (zero span) is widened so the axis is never empty.
fn axis_range(values: impl Iterator<Item = f64>, margin: f64) -> Option<Range<f64>> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let span = max - min;
    if span <= f64::EPSILON {
        let pad = if min.abs() > 1.0 { min.abs() * 0.05 } else { 1.0 };
        return Some((min - pad)..(max + pad));
    }
    Some((min - span * margin)..(max + span * margin))
}

/// Split the root area into the plot and, if needed, the footer strip.
fn draw_footer<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    spec: &ChartSpec,
) -> Result<DrawingArea<DB, plotters::coord::Shift>> {
    match &spec.footer {
        Some(text) => {
            let split_at = spec.height.saturating_sub(FOOTER_HEIGHT) as i32;
            let (plot_area, footer_area) = root.split_vertically(split_at);
            footer_area
                .titled(text, ("sans-serif", 18).into_font().color(&BLACK.mix(0.8)))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
            Ok(plot_area)
        }
        None => Ok(root.clone()),
    }
}

fn prepare_output(output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Creates a line chart of one or more traces and saves it as a PNG file
///
/// # Arguments
/// * `spec` - Title, axis labels, size and optional statistics footer
/// * `traces` - Traces sharing the x axis; `NaN` points break a trace
/// * `output_path` - Path where the PNG file should be saved
///
/// # Returns
/// * `Err(PlotError::InvalidData)` if no trace holds a finite point
pub fn render_line_chart(spec: &ChartSpec, traces: &[LineTrace<'_>], output_path: &Path) -> Result<()> {
    let segmented: Vec<(&LineTrace<'_>, Vec<Vec<(f64, f64)>>)> =
        traces.iter().map(|t| (t, finite_segments(t.x, t.y))).collect();

    let all_points = || segmented.iter().flat_map(|(_, segs)| segs.iter().flatten());
    let x_range = axis_range(all_points().map(|p| p.0), 0.0)
        .ok_or_else(|| PlotError::InvalidData("No finite points to plot".to_string()))?;
    let y_range = axis_range(all_points().map(|p| p.1), 0.05)
        .ok_or_else(|| PlotError::InvalidData("No finite points to plot".to_string()))?;

    prepare_output(output_path)?;
    let root = BitMapBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let plot_area = draw_footer(&root, spec)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&spec.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style(("sans-serif", 16))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.3))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (trace, segments) in segmented {
        let color = trace.color;
        for (i, segment) in segments.into_iter().enumerate() {
            let mut anno = chart
                .draw_series(LineSeries::new(segment, color.stroke_width(1)))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
            if i == 0 {
                anno.label(trace.label)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present().map_err(|e| PlotError::Drawing(e.to_string()))?;
    log::debug!("Rendered {} line traces to {}", traces.len(), output_path.display());
    Ok(())
}

/// Creates a scatter chart of labelled point groups and saves it as a PNG file
///
/// # Returns
/// * `Err(PlotError::InvalidData)` if no group holds a finite point
pub fn render_scatter_chart(spec: &ChartSpec, groups: &[PointGroup<'_>], output_path: &Path) -> Result<()> {
    let finite = |g: &PointGroup<'_>| -> Vec<(f64, f64)> {
        g.points.iter().copied().filter(|(x, y)| x.is_finite() && y.is_finite()).collect()
    };
    let filtered: Vec<(&PointGroup<'_>, Vec<(f64, f64)>)> = groups.iter().map(|g| (g, finite(g))).collect();

    let all_points = || filtered.iter().flat_map(|(_, pts)| pts.iter());
    let x_range = axis_range(all_points().map(|p| p.0), 0.05)
        .ok_or_else(|| PlotError::InvalidData("No finite points to plot".to_string()))?;
    let y_range = axis_range(all_points().map(|p| p.1), 0.05)
        .ok_or_else(|| PlotError::InvalidData("No finite points to plot".to_string()))?;

    prepare_output(output_path)?;
    let root = BitMapBackend::new(output_path, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    let plot_area = draw_footer(&root, spec)?;

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(&spec.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .label_style(("sans-serif", 16))
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.3))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (group, points) in filtered {
        if points.is_empty() {
            continue;
        }
        let color = group.color;
        chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, 3, color.mix(0.7).filled())))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(group.label)
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present().map_err(|e| PlotError::Drawing(e.to_string()))?;
    log::debug!("Rendered {} point groups to {}", groups.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_segments_split_on_nan() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [1.0, f64::NAN, 2.0, 3.0, f64::NAN];
        let segments = finite_segments(&x, &y);
        assert_eq!(segments, vec![vec![(0.0, 1.0)], vec![(2.0, 2.0), (3.0, 3.0)]]);
    }

    #[test]
    fn test_axis_range_pads_span() {
        let range = axis_range([0.0, 10.0].into_iter(), 0.1).unwrap();
        assert_eq!(range, -1.0..11.0);
    }

    #[test]
    fn test_axis_range_widens_single_value() {
        let range = axis_range([150.0, 150.0].into_iter(), 0.05).unwrap();
        assert!(range.start < 150.0 && range.end > 150.0);

        let range = axis_range([0.0].into_iter(), 0.05).unwrap();
        assert_eq!(range, -1.0..1.0);
    }

    #[test]
    fn test_axis_range_ignores_nan() {
        assert_eq!(axis_range([f64::NAN].into_iter(), 0.05), None);
        assert_eq!(axis_range([f64::NAN, 2.0, 4.0].into_iter(), 0.0), Some(2.0..4.0));
    }

    #[test]
    fn test_empty_chart_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ChartSpec {
            title: "Empty".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            width: 320,
            height: 240,
            footer: None,
        };
        let trace = LineTrace {
            label: "nothing",
            x: &[0.0],
            y: &[f64::NAN],
            color: trace_color(0),
        };
        let err = render_line_chart(&spec, &[trace], &dir.path().join("empty.png")).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
        assert!(!dir.path().join("empty.png").exists());
    }

    #[test]
    fn test_trace_colors_cycle() {
        assert_eq!(trace_color(0), trace_color(PALETTE.len()));
        assert_ne!(trace_color(0), trace_color(1));
    }
}
