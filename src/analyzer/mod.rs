//! Analyzer module for telemetry log parsing.
//!
//! Provides functionality for:
//! - Reading log files line by line
//! - Extracting power triplets and named events into samples
//! - Decoding raw CSM telemetry dumps
//! - Deriving plot series and summary statistics

pub mod csm;
pub mod log_loader;
pub mod log_parser;
pub mod series;
pub mod types;

pub use types::ReportMode;
