// src/stats/convergence.rs
//! Per-axis convergence time and post-convergence accuracy

use crate::error::{Result, StatsError};
use crate::parse::records::{Axis, PositionSeries};
use serde::{Deserialize, Serialize};

/// Epochs whose largest absolute offset must stay under the limit, the
/// current one included.
pub const CONVERGENCE_WINDOW: usize = 20;

/// Convergence thresholds in meters, one per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceLimits {
    pub elimit: f64,
    pub nlimit: f64,
    pub ulimit: f64,
}

impl ConvergenceLimits {
    pub fn new(elimit: f64, nlimit: f64, ulimit: f64) -> Self {
        Self { elimit, nlimit, ulimit }
    }

    pub fn uniform(limit: f64) -> Self {
        Self::new(limit, limit, limit)
    }

    pub fn for_axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::East => self.elimit,
            Axis::North => self.nlimit,
            Axis::Up => self.ulimit,
        }
    }

    /// Every limit must be a positive number (infinity allowed).
    pub fn validate(&self) -> Result<()> {
        for axis in Axis::ALL {
            let limit = self.for_axis(axis);
            if limit.is_nan() || limit <= 0.0 {
                return Err(StatsError::config(format!(
                    "{} limit must be positive, got {}",
                    axis.label(),
                    limit
                )));
            }
        }
        Ok(())
    }
}

/// Convergence accuracy and time of one result file. Undefined entries are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub file: String,
    /// Mean absolute offset after convergence (m), E/N/U.
    pub accuracy: [f64; 3],
    /// Minutes from the first epoch to convergence, E/N/U.
    pub convergence_time: [f64; 3],
}

impl AccuracySummary {
    pub fn undefined(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            accuracy: [f64::NAN; 3],
            convergence_time: [f64::NAN; 3],
        }
    }

    pub fn is_defined(&self) -> bool {
        self.accuracy.iter().all(|v| !v.is_nan())
    }
}

/// Largest absolute offset along `axis` over `[start, start + CONVERGENCE_WINDOW)`.
fn window_max(series: &PositionSeries, axis: Axis, start: usize) -> f64 {
    let records = series.records();
    let end = (start + CONVERGENCE_WINDOW).min(records.len());
    records[start..end]
        .iter()
        .map(|r| r.axis(axis).abs())
        .fold(0.0, f64::max)
}

/// First index at which each axis converges, E/N/U.
///
/// An axis converges at the first epoch whose windowed maximum drops below
/// its limit. Scanning stops once all three axes have converged.
pub fn convergence_indices(series: &PositionSeries, limits: &ConvergenceLimits) -> [Option<usize>; 3] {
    let mut indices = [None; 3];

    for i in 0..series.len() {
        for axis in Axis::ALL {
            let slot = &mut indices[axis.index()];
            if slot.is_none() && window_max(series, axis, i) < limits.for_axis(axis) {
                *slot = Some(i);
            }
        }
        if indices.iter().all(Option::is_some) {
            break;
        }
    }

    indices
}

fn mean_abs_from(series: &PositionSeries, axis: Axis, start: usize) -> Option<f64> {
    let tail = &series.records()[start.min(series.len())..];
    if tail.is_empty() {
        return None;
    }
    let sum: f64 = tail.iter().map(|r| r.axis(axis).abs()).sum();
    Some(sum / tail.len() as f64)
}

/// Convergence time and post-convergence accuracy of a series.
///
/// The three axes are judged together: when one of them has no
/// post-convergence epochs every output is undefined.
pub fn accuracy_summary(
    file: impl Into<String>,
    series: &PositionSeries,
    limits: &ConvergenceLimits,
) -> AccuracySummary {
    let mut summary = AccuracySummary::undefined(file);
    if series.is_empty() {
        return summary;
    }

    let indices = convergence_indices(series, limits);
    let mut accuracy = [0.0; 3];
    let mut time = [0.0; 3];
    for axis in Axis::ALL {
        let k = axis.index();
        let Some(index) = indices[k] else {
            return summary;
        };
        let (Some(mean), Some(minutes)) = (
            mean_abs_from(series, axis, index),
            series.minutes_since_start(index),
        ) else {
            return summary;
        };
        accuracy[k] = mean;
        time[k] = minutes;
    }

    summary.accuracy = accuracy;
    summary.convergence_time = time;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::series_with_enu;

    #[test]
    fn test_infinite_limits_converge_immediately() {
        let s = series_with_enu(&[(3.0, -2.0, 5.0), (1.0, 1.0, 1.0), (0.5, 0.2, 0.0)]);
        let limits = ConvergenceLimits::uniform(f64::INFINITY);
        assert_eq!(convergence_indices(&s, &limits), [Some(0); 3]);

        let summary = accuracy_summary("a.pos", &s, &limits);
        assert_eq!(summary.convergence_time, [0.0; 3]);
        assert!((summary.accuracy[0] - 1.5).abs() < 1e-12);
        assert!((summary.accuracy[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_east_converges_later() {
        // E decays from 0.5 to 0.05 over the first five epochs, N/U start small.
        let mut rows = vec![
            (0.5, 0.01, 0.02),
            (0.4, 0.01, 0.02),
            (0.3, 0.01, 0.02),
            (0.2, 0.01, 0.02),
            (0.1, 0.01, 0.02),
        ];
        rows.extend(std::iter::repeat((0.05, 0.01, 0.02)).take(40));
        let s = series_with_enu(&rows);
        let limits = ConvergenceLimits::uniform(0.1);

        // The window starting at epoch 4 still holds |E| = 0.1, not below the limit.
        assert_eq!(convergence_indices(&s, &limits), [Some(5), Some(0), Some(0)]);

        let summary = accuracy_summary("a.pos", &s, &limits);
        assert!(summary.is_defined());
        assert_eq!(summary.convergence_time, [2.5, 0.0, 0.0]);
        assert!((summary.accuracy[0] - 0.05).abs() < 1e-12);
        assert!((summary.accuracy[1] - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_window_looks_ahead() {
        // A spike 19 epochs later keeps the axis from converging at epoch 0.
        let mut rows = vec![(0.0, 0.0, 0.0); 19];
        rows.push((1.0, 0.0, 0.0));
        rows.extend(vec![(0.0, 0.0, 0.0); 5]);
        let s = series_with_enu(&rows);
        let idx = convergence_indices(&s, &ConvergenceLimits::uniform(0.1));
        assert_eq!(idx, [Some(20), Some(0), Some(0)]);
    }

    #[test]
    fn test_one_axis_failing_undefines_all() {
        let rows = vec![(0.01, 0.01, 0.5); 30];
        let s = series_with_enu(&rows);
        let summary = accuracy_summary("a.pos", &s, &ConvergenceLimits::uniform(0.1));
        assert!(!summary.is_defined());
        assert!(summary.accuracy.iter().all(|v| v.is_nan()));
        assert!(summary.convergence_time.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_empty_series_undefined() {
        let summary = accuracy_summary(
            "empty.pos",
            &PositionSeries::default(),
            &ConvergenceLimits::uniform(0.1),
        );
        assert_eq!(summary.file, "empty.pos");
        assert!(!summary.is_defined());
    }

    #[test]
    fn test_limits_validation() {
        assert!(ConvergenceLimits::uniform(0.1).validate().is_ok());
        assert!(ConvergenceLimits::uniform(f64::INFINITY).validate().is_ok());
        assert!(ConvergenceLimits::new(0.1, 0.0, 0.1).validate().is_err());
        assert!(ConvergenceLimits::new(0.1, 0.1, f64::NAN).validate().is_err());
    }
}
