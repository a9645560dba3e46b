// src/stats/summary.rs
//! One summary row per positioning result file

use super::convergence::{accuracy_summary, AccuracySummary, ConvergenceLimits};
use super::fix::{fix_rate, ttff_or_undefined, TTFF_UNDEFINED};
use crate::error::{Result, StatsError};
use crate::parse::pos::parse_pos;
use crate::parse::records::{PositionSeries, TimeWindow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fix-rate, TTFF and convergence figures of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub file: String,
    pub epochs: usize,
    pub fix_rate: f64,
    /// Minutes, `-1` when no sustained fix was reached.
    pub ttff: f64,
    pub accuracy: AccuracySummary,
    /// Set when the file could not be processed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl SessionSummary {
    pub fn from_series(file: &str, series: &PositionSeries, limits: &ConvergenceLimits) -> Self {
        Self {
            file: file.to_string(),
            epochs: series.len(),
            fix_rate: fix_rate(series),
            ttff: ttff_or_undefined(series),
            accuracy: accuracy_summary(file, series, limits),
            error: None,
        }
    }

    /// Row for a file whose processing failed, nothing in it is defined.
    pub fn failed(file: &str, error: impl ToString) -> Self {
        Self {
            file: file.to_string(),
            epochs: 0,
            fix_rate: f64::NAN,
            ttff: TTFF_UNDEFINED,
            accuracy: AccuracySummary::undefined(file),
            error: Some(error.to_string()),
        }
    }

    /// Whether the row holds usable convergence figures.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.accuracy.is_defined()
    }
}

/// Display name of a result file.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse one result file and summarize it.
pub fn summarize_file(
    path: &Path,
    window: Option<TimeWindow>,
    limits: &ConvergenceLimits,
) -> Result<SessionSummary> {
    let series = parse_pos(path, window)?;
    if series.is_empty() {
        warn!("{}", StatsError::EmptyInput(path.to_path_buf()));
    }
    Ok(SessionSummary::from_series(&file_label(path), &series, limits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::series_with_flags;

    #[test]
    fn test_three_epoch_summary() {
        let s = series_with_flags(&[7, 7, 6]);
        let row = SessionSummary::from_series("wuh2.pos", &s, &ConvergenceLimits::uniform(0.1));
        assert_eq!(row.epochs, 3);
        assert!((row.fix_rate - 0.6667).abs() < 1e-4);
        // the trailing no-fix falls inside every lookahead window
        assert_eq!(row.ttff, TTFF_UNDEFINED);
        // all offsets are zero
        assert!(row.is_complete());
        assert_eq!(row.accuracy.convergence_time, [0.0; 3]);
    }

    #[test]
    fn test_failed_row() {
        let row = SessionSummary::failed("bad.pos", "Malformed record");
        assert!(!row.is_complete());
        assert!(row.fix_rate.is_nan());
        assert_eq!(row.ttff, TTFF_UNDEFINED);
        assert!(!row.accuracy.is_defined());
    }

    #[test]
    fn test_missing_file_summary() {
        let row = summarize_file(
            Path::new("/nonexistent/none.pos"),
            None,
            &ConvergenceLimits::uniform(0.1),
        )
        .unwrap();
        assert_eq!(row.file, "none.pos");
        assert_eq!(row.epochs, 0);
        assert_eq!(row.fix_rate, 0.0);
        assert_eq!(row.ttff, TTFF_UNDEFINED);
        assert!(!row.accuracy.is_defined());
    }
}
