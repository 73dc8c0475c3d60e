//! JSON summary of a rendered report.

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::ReportError;
use crate::analyzer::series::stats;
use crate::analyzer::types::{Series, SeriesStats};

/// Statistics of one plotted series.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub label: String,
    /// `None` when the series held no finite value.
    pub stats: Option<SeriesStats>,
}

impl SeriesSummary {
    pub fn of(series: &Series) -> Self {
        Self {
            label: series.label.clone(),
            stats: stats(series),
        }
    }
}

/// What a report rendered and from which input.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub mode: String,
    pub title: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub sample_count: usize,
    pub series: Vec<SeriesSummary>,
    /// RFC 3339 time the summary was produced.
    pub generated_at: String,
}

impl ReportSummary {
    pub fn new(mode: &str, title: &str, input: &Path, output: &Path, sample_count: usize, series: &[&Series]) -> Self {
        Self {
            mode: mode.to_string(),
            title: title.to_string(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            sample_count,
            series: series.iter().map(|s| SeriesSummary::of(s)).collect(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Write `summary` as pretty-printed JSON.
pub fn write_summary(summary: &ReportSummary, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(summary)
        .context("Failed to serialize summary")
        .map_err(|e| ReportError::Summary(format!("{:#}", e)))?;

    fs::write(path, json)
        .with_context(|| format!("Failed to write file: {}", path.display()))
        .map_err(|e| ReportError::Summary(format!("{:#}", e)))
}
