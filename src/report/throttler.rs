//! Throttler named-event reports.
//!
//! Both reports read `named_event` lines from the throttler log and compare
//! the configured event names: the timeline plots each argument against the
//! event's position within its name, the scatter plots arg0 against arg1.

use super::{ReportError, ReportOutcome, ReportSummary, format_stats, read_log, stats_footer};
use crate::analyzer::log_parser::{extract_samples, named_events};
use crate::analyzer::series::{event_points, event_series, index_axis, stats};
use crate::analyzer::types::{NamedEvent, Series};
use crate::common::config::{OutputConfig, ThrottlerConfig};
use crate::plot::{ChartSpec, LineTrace, PointGroup, render_line_chart, render_scatter_chart, trace_color};

pub const TIMELINE_TITLE: &str = "Throttler Named Events";
pub const SCATTER_TITLE: &str = "Throttler Named Events: arg0 vs arg1";

/// Read the log and keep its named events, printing per-name counts.
///
/// Returns `None` when the log has no named event at all.
fn load_events(config: &ThrottlerConfig) -> Result<Option<Vec<NamedEvent>>, ReportError> {
    let path = &config.log_path;
    println!("Parsing {} file...", path.display());

    let lines = read_log(path)?;
    let events = named_events(&extract_samples(&lines));
    if events.is_empty() {
        println!("No named events found in {}", path.display());
        return Ok(None);
    }

    println!("Found {} named events", events.len());
    for name in &config.event_names {
        let count = events.iter().filter(|e| &e.name == name).count();
        println!("  name \"{}\": {} events", name, count);
    }
    Ok(Some(events))
}

fn print_event_stats(series: &[Series]) {
    println!("\n=== Event Statistics ===");
    for s in series {
        match stats(s) {
            Some(st) => println!("{} ({} events): {}", s.label, st.count, format_stats(&st, 2, "")),
            None => println!("{}: no events", s.label),
        }
    }
}

/// Arguments of each event name against the event index.
pub fn run_timeline(config: &ThrottlerConfig, output: &OutputConfig) -> Result<ReportOutcome, ReportError> {
    let Some(events) = load_events(config)? else {
        return Ok(ReportOutcome::NoData);
    };

    let series = event_series(&events, &config.event_names);
    if series.iter().all(Series::is_empty) {
        println!("None of the events are named {:?}", config.event_names);
        return Ok(ReportOutcome::NoData);
    }
    let index = index_axis(series.first().map_or(0, Series::len));

    println!("\nCreating throttler event graph...");
    let footer = if output.show_stats {
        let entries: Vec<(&str, &Series)> = series.iter().map(|s| (s.label.as_str(), s)).collect();
        stats_footer(&entries, "")
    } else {
        None
    };
    let spec = ChartSpec {
        title: TIMELINE_TITLE.to_string(),
        x_label: "Event index".to_string(),
        y_label: "Argument value".to_string(),
        width: output.width,
        height: output.height,
        footer,
    };
    let traces: Vec<LineTrace<'_>> = series
        .iter()
        .enumerate()
        .map(|(i, s)| LineTrace {
            label: &s.label,
            x: &index.values,
            y: &s.values,
            color: trace_color(i),
        })
        .collect();
    render_line_chart(&spec, &traces, &config.output_path)?;
    println!("Graph saved as '{}'", config.output_path.display());

    print_event_stats(&series);

    let refs: Vec<&Series> = series.iter().collect();
    Ok(ReportOutcome::Rendered(ReportSummary::new(
        "throttler",
        TIMELINE_TITLE,
        &config.log_path,
        &config.output_path,
        events.len(),
        &refs,
    )))
}

/// arg0 against arg1, one point group per event name.
pub fn run_scatter(config: &ThrottlerConfig, output: &OutputConfig) -> Result<ReportOutcome, ReportError> {
    let Some(events) = load_events(config)? else {
        return Ok(ReportOutcome::NoData);
    };

    let points: Vec<(String, Vec<(f64, f64)>)> = config
        .event_names
        .iter()
        .map(|name| (format!("name {}", name), event_points(&events, name)))
        .collect();
    if points.iter().all(|(_, p)| p.is_empty()) {
        println!("None of the events are named {:?}", config.event_names);
        return Ok(ReportOutcome::NoData);
    }

    println!("\nCreating throttler scatter graph...");
    let footer = if output.show_stats {
        let counts: Vec<String> = points.iter().map(|(label, p)| format!("{}: {} events", label, p.len())).collect();
        Some(counts.join(" | "))
    } else {
        None
    };
    let spec = ChartSpec {
        title: SCATTER_TITLE.to_string(),
        x_label: "arg0".to_string(),
        y_label: "arg1".to_string(),
        width: output.width,
        height: output.height,
        footer,
    };
    let groups: Vec<PointGroup<'_>> = points
        .iter()
        .enumerate()
        .map(|(i, (label, p))| PointGroup {
            label,
            points: p,
            color: trace_color(i),
        })
        .collect();
    render_scatter_chart(&spec, &groups, &config.output_path)?;
    println!("Graph saved as '{}'", config.output_path.display());

    let series = event_series(&events, &config.event_names);
    print_event_stats(&series);

    let refs: Vec<&Series> = series.iter().collect();
    Ok(ReportOutcome::Rendered(ReportSummary::new(
        "throttler-scatter",
        SCATTER_TITLE,
        &config.log_path,
        &config.output_path,
        events.len(),
        &refs,
    )))
}
