//! Type definitions specific to the analyzer module.

use serde::Serialize;

/// Report pipeline selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Time / TDP / board power triplets from `log.txt`.
    #[default]
    PowerTelemetry,
    /// Named throttler events plotted against their index.
    ThrottlerTimeline,
    /// Named throttler events plotted as arg0 against arg1.
    ThrottlerScatter,
    /// Raw telemetry records dumped from the CSM region.
    CsmDump,
}

impl ReportMode {
    /// Parse the mode name given on the command line.
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "power" => Some(ReportMode::PowerTelemetry),
            "throttler" => Some(ReportMode::ThrottlerTimeline),
            "throttler-scatter" => Some(ReportMode::ThrottlerScatter),
            "csm" => Some(ReportMode::CsmDump),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportMode::PowerTelemetry => "power",
            ReportMode::ThrottlerTimeline => "throttler",
            ReportMode::ThrottlerScatter => "throttler-scatter",
            ReportMode::CsmDump => "csm",
        }
    }
}

/// One completed Time / TDP Power / Board Power reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerSample {
    /// Raw time value as logged (seconds).
    pub time: f64,
    /// TDP power in watts.
    pub tdp_power: f64,
    /// Board input power in watts.
    pub board_power: f64,
}

/// A `named_event` line with its two integer arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedEvent {
    pub name: String,
    pub arg0: u64,
    pub arg1: u64,
}

/// Parsed sample, tagged by the extractor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Power(PowerSample),
    Event(NamedEvent),
}

/// One field's values across all samples, used as a plot trace.
///
/// `NaN` entries are padding and are skipped by statistics and drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the finite values only.
    pub fn finite(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }
}

/// Summary statistics over the finite values of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}
