//! Chart rendering for extracted telemetry series.

pub mod chart;

pub use chart::{ChartSpec, LineTrace, PlotError, PointGroup, render_line_chart, render_scatter_chart, trace_color};
