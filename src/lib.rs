// src/lib.rs
//! GNSS positioning statistics library
//!
//! Parses fixed-column positioning result files and satellite time series,
//! and derives fix-rate, time to first fix and per-axis (E/N/U) convergence
//! time and accuracy.

pub mod batch;
pub mod config;
pub mod display;
pub mod error;
pub mod parse;
pub mod stats;

// Re-export main types for convenience
pub use batch::{check_batch, run_batch, BatchSettings};
pub use config::StatsConfig;
pub use error::{Result, StatsError};
pub use parse::{parse_pos, PositionRecord, PositionSeries, TimeWindow};
pub use stats::{AccuracySummary, ConvergenceLimits, SessionSummary};
