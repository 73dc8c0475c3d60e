//! Report pipelines: read, extract, derive, plot, summarize.
//!
//! Each [`ReportMode`] maps to one pipeline. A pipeline either renders a chart
//! and returns its summary, or reports that the input held no usable data.
//! Console output is the user-facing result of a run; diagnostics go through
//! `log`.

pub mod power;
pub mod summary;
pub mod throttler;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analyzer::ReportMode;
use crate::analyzer::log_loader;
use crate::analyzer::types::{Series, SeriesStats};
use crate::common::config::PlotConfig;
use crate::plot::PlotError;
use crate::ui::viewer;

pub use summary::ReportSummary;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("{} file not found!", .0.display())]
    LogNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("Failed to write summary: {0}")]
    Summary(String),
}

impl ReportError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ReportError::LogNotFound(path.to_path_buf())
        } else {
            ReportError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    }
}

/// Result of a pipeline that did not fail.
#[derive(Debug)]
pub enum ReportOutcome {
    /// The input held no matching lines; no chart was produced.
    NoData,
    /// A chart was saved.
    Rendered(ReportSummary),
}

/// Read all non-empty lines of a log file.
pub(crate) fn read_log(path: &Path) -> Result<Vec<String>, ReportError> {
    log_loader::read_lines(path).map_err(|e| ReportError::from_io(path, e))
}

/// `avg=..., min=..., max=...` with the given precision and unit suffix.
pub(crate) fn format_stats(stats: &SeriesStats, precision: usize, unit: &str) -> String {
    format!(
        "avg={:.p$}{u}, min={:.p$}{u}, max={:.p$}{u}",
        stats.mean,
        stats.min,
        stats.max,
        p = precision,
        u = unit
    )
}

/// One-line chart footer: `<name>: avg=..., min=..., max=... | ...`.
pub(crate) fn stats_footer(entries: &[(&str, &Series)], unit: &str) -> Option<String> {
    let parts: Vec<String> = entries
        .iter()
        .filter_map(|(name, series)| {
            crate::analyzer::series::stats(series).map(|s| format!("{}: {}", name, format_stats(&s, 1, unit)))
        })
        .collect();
    if parts.is_empty() { None } else { Some(parts.join(" | ")) }
}

/// Run the pipeline for `mode`, then the optional summary and viewer steps.
pub fn run(mode: ReportMode, config: &PlotConfig) -> Result<ReportOutcome, ReportError> {
    log::info!("Running {} report", mode.name());

    let outcome = match mode {
        ReportMode::PowerTelemetry => power::run_text(&config.power, &config.output)?,
        ReportMode::CsmDump => power::run_csm(&config.csm, &config.output)?,
        ReportMode::ThrottlerTimeline => throttler::run_timeline(&config.throttler, &config.output)?,
        ReportMode::ThrottlerScatter => throttler::run_scatter(&config.throttler, &config.output)?,
    };

    if let ReportOutcome::Rendered(summary) = &outcome {
        if let Some(path) = &config.output.summary_path {
            summary::write_summary(summary, path)?;
            println!("Summary written to '{}'", path.display());
        }

        if config.output.show_window {
            if let Err(e) = viewer::show_chart(&summary.output, &summary.title) {
                log::warn!("{}", e);
            }
        }
    }

    Ok(outcome)
}
