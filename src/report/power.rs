//! Power telemetry report: TDP and board power over time.

use std::path::Path;

use super::{ReportError, ReportOutcome, ReportSummary, format_stats, read_log, stats_footer};
use crate::analyzer::csm;
use crate::analyzer::log_parser::{extract_samples, power_samples};
use crate::analyzer::series::{power_series, stats};
use crate::analyzer::types::PowerSample;
use crate::common::config::{CsmConfig, OutputConfig, PowerConfig};
use crate::plot::{ChartSpec, LineTrace, render_line_chart, trace_color};

pub const POWER_CHART_TITLE: &str = "Tenstorrent Blackhole Power Telemetry Over Time";

/// Power report over a text log.
pub fn run_text(config: &PowerConfig, output: &OutputConfig) -> Result<ReportOutcome, ReportError> {
    let path = &config.log_path;
    println!("Parsing {} file...", path.display());

    let lines = read_log(path)?;
    let samples = power_samples(&extract_samples(&lines));

    if samples.is_empty() {
        println!("No telemetry data found in {}", path.display());
        return Ok(ReportOutcome::NoData);
    }

    render_power_report("power", &samples, path, &config.output_path, output).map(ReportOutcome::Rendered)
}

/// Power report over a raw CSM telemetry dump.
pub fn run_csm(config: &CsmConfig, output: &OutputConfig) -> Result<ReportOutcome, ReportError> {
    let path = &config.dump_path;
    println!("Decoding {} CSM dump...", path.display());

    let bytes = std::fs::read(path).map_err(|e| ReportError::from_io(path, e))?;
    let samples = csm::decode_power_samples(&bytes, config.tick_hz);

    if samples.is_empty() {
        println!("No telemetry records found in {}", path.display());
        return Ok(ReportOutcome::NoData);
    }

    render_power_report("csm", &samples, path, &config.output_path, output).map(ReportOutcome::Rendered)
}

/// `Time range: <first> to <last>`, with floats always showing a fraction.
fn time_range_line(first: f64, last: f64) -> String {
    format!("Time range: {:?} to {:?}", first, last)
}

/// Chart, console statistics and summary shared by both power inputs.
fn render_power_report(
    mode: &str,
    samples: &[PowerSample],
    input: &Path,
    output_path: &Path,
    output: &OutputConfig,
) -> Result<ReportSummary, ReportError> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first.time, last.time),
        _ => return Err(ReportError::Plot(crate::plot::PlotError::InvalidData("No samples".to_string()))),
    };
    println!("Found {} telemetry data points", samples.len());
    println!("{}", time_range_line(first, last));

    let series = power_series(samples);

    println!("\nCreating power telemetry graph...");
    let footer = if output.show_stats {
        stats_footer(&[("TDP", &series.tdp_power), ("Board", &series.board_power)], "W")
    } else {
        None
    };
    let spec = ChartSpec {
        title: POWER_CHART_TITLE.to_string(),
        x_label: "Time (seconds)".to_string(),
        y_label: "Power (W)".to_string(),
        width: output.width,
        height: output.height,
        footer,
    };
    let traces = [
        LineTrace {
            label: "TDP Power",
            x: &series.time_relative.values,
            y: &series.tdp_power.values,
            color: trace_color(0),
        },
        LineTrace {
            label: "Board Power",
            x: &series.time_relative.values,
            y: &series.board_power.values,
            color: trace_color(1),
        },
    ];
    render_line_chart(&spec, &traces, output_path)?;
    println!("Graph saved as '{}'", output_path.display());

    if let (Some(tdp), Some(board)) = (stats(&series.tdp_power), stats(&series.board_power)) {
        println!("\n=== Power Statistics ===");
        println!("TDP Power: {}", format_stats(&tdp, 2, "W"));
        println!("Board Power: {}", format_stats(&board, 2, "W"));
    }

    Ok(ReportSummary::new(
        mode,
        POWER_CHART_TITLE,
        input,
        output_path,
        samples.len(),
        &[&series.tdp_power, &series.board_power],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output() -> OutputConfig {
        OutputConfig {
            show_window: false,
            width: 400,
            height: 300,
            ..OutputConfig::default()
        }
    }

    #[test]
    fn test_power_report_renders_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = PowerConfig {
            log_path: dir.path().join("log.txt"),
            output_path: dir.path().join("charts/power.png"),
        };
        std::fs::write(
            &config.log_path,
            "Time: 12.5 W\nTDP Power: 150.2 W\nBoard Power: 160.8 W\n\
             Time: 13.0 W\nTDP Power: 155.0 W\nBoard Power: 170.0 W\n\
             Time: 13.5 W\nBoard Power: 1.0 W\n",
        )
        .unwrap();

        let outcome = run_text(&config, &output()).unwrap();
        let ReportOutcome::Rendered(summary) = outcome else {
            panic!("Expected a rendered report");
        };
        assert_eq!(summary.sample_count, 2);
        assert_eq!(summary.series.len(), 2);
        assert_eq!(summary.series[0].stats.unwrap().max, 155.0);
        assert!(config.output_path.exists());
    }

    #[test]
    fn test_single_sample_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let config = PowerConfig {
            log_path: dir.path().join("log.txt"),
            output_path: dir.path().join("power.png"),
        };
        std::fs::write(&config.log_path, "Time: 1.0 W\nTDP Power: 2.0 W\nBoard Power: 3.0 W\n").unwrap();

        assert!(matches!(run_text(&config, &output()).unwrap(), ReportOutcome::Rendered(_)));
    }

    #[test]
    fn test_csm_report_renders_chart() {
        let dir = tempfile::tempdir().unwrap();
        let config = CsmConfig {
            dump_path: dir.path().join("csm.bin"),
            output_path: dir.path().join("csm.png"),
            tick_hz: 1000.0,
        };
        let mut dump = Vec::new();
        for i in 0..10u32 {
            dump.extend_from_slice(&(1 + i * 100).to_le_bytes());
            dump.extend_from_slice(&(100.0f32 + i as f32).to_bits().to_le_bytes());
            dump.extend_from_slice(&(120.0f32 + i as f32).to_bits().to_le_bytes());
        }
        std::fs::write(&config.dump_path, dump).unwrap();

        let ReportOutcome::Rendered(summary) = run_csm(&config, &output()).unwrap() else {
            panic!("Expected a rendered report");
        };
        assert_eq!(summary.mode, "csm");
        assert_eq!(summary.sample_count, 10);
        assert!(config.output_path.exists());
    }

    #[test]
    fn test_time_range_keeps_fraction() {
        assert_eq!(time_range_line(12.5, 13.0), "Time range: 12.5 to 13.0");
    }

    #[test]
    fn test_blank_csm_dump_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = CsmConfig {
            dump_path: dir.path().join("csm.bin"),
            output_path: dir.path().join("csm.png"),
            ..CsmConfig::default()
        };
        std::fs::write(&config.dump_path, vec![0u8; 120]).unwrap();

        assert!(matches!(run_csm(&config, &output()).unwrap(), ReportOutcome::NoData));
    }
}
