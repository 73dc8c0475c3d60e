// UI module for the telemetry plotter
//
// The only window is the chart viewer opened after a report has saved its
// PNG; everything else runs headless.

pub mod viewer;
