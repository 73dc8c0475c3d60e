//! Shared infrastructure used by every report.

pub mod config;
