//! Telemetry log plotter for Tenstorrent Blackhole bring-up logs.
//!
//! Extracts power readings and throttler events from plain-text logs (or a
//! raw CSM telemetry dump), renders them as PNG charts with summary
//! statistics and optionally shows the chart in a window.

use env_logger::Builder;
use log::{LevelFilter, debug, info};
use std::path::Path;

mod analyzer;
mod common;
mod plot;
mod report;
mod ui;

use analyzer::ReportMode;
use common::config::{CONFIG_FILE_NAME, PlotConfig};
use report::{ReportError, ReportOutcome};

const USAGE: &str = "usage: bh-telemetry-plot [power | throttler | throttler-scatter | csm]";

/// Pick the report mode from the first command line argument.
fn parse_mode(args: &[String]) -> Result<ReportMode, String> {
    match args.first() {
        None => Ok(ReportMode::default()),
        Some(arg) if arg == "-h" || arg == "--help" => Err(USAGE.to_string()),
        Some(arg) => ReportMode::from_arg(arg).ok_or_else(|| format!("unknown report '{}'\n{}", arg, USAGE)),
    }
}

/// Print a failed report the way users expect, without aborting.
fn report_failure(mode: ReportMode, error: &ReportError) {
    match error {
        ReportError::LogNotFound(_) => println!("Error: {}", error),
        _ => match mode {
            ReportMode::CsmDump => println!("Error decoding CSM dump: {}", error),
            _ => println!("Error parsing log file: {}", error),
        },
    }
}

/// Logger configuration: info globally, debug for this crate.
fn log_builder() -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter(Some("bh_telemetry_plot"), LevelFilter::Debug);
    builder
}

fn main() {
    // Logging setup
    log_builder().init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = match parse_mode(&args) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{}", message);
            return;
        }
    };

    let config = match PlotConfig::load_or_default(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    debug!("Configuration: {:?}", config);

    match report::run(mode, &config) {
        Ok(ReportOutcome::Rendered(summary)) => info!("{} report finished: {}", mode.name(), summary.output.display()),
        Ok(ReportOutcome::NoData) => info!("{} report produced no chart", mode.name()),
        Err(e) => report_failure(mode, &e),
    }
}
