// src/stats/mod.rs
//! Statistics engine over parsed position series

pub mod fix;
pub mod convergence;
pub mod summary;

pub use convergence::{accuracy_summary, AccuracySummary, ConvergenceLimits};
pub use fix::{fix_rate, ttff, TTFF_UNDEFINED};
pub use summary::{summarize_file, SessionSummary};

#[cfg(test)]
pub(crate) mod tests {
    use crate::parse::records::{PositionRecord, PositionSeries};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn epoch(i: usize) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 4, 25)
            .unwrap()
            .and_hms_opt(9, 50, 0)
            .unwrap()
            + Duration::seconds(30 * i as i64)
    }

    /// 30 s epochs with zero offsets and the given flags.
    pub(crate) fn series_with_flags(flags: &[u8]) -> PositionSeries {
        flags
            .iter()
            .enumerate()
            .map(|(i, &fix_flag)| PositionRecord {
                timestamp: epoch(i),
                east: 0.0,
                north: 0.0,
                up: 0.0,
                fix_flag,
            })
            .collect()
    }

    /// 30 s fixed epochs with the given E/N/U offsets.
    pub(crate) fn series_with_enu(rows: &[(f64, f64, f64)]) -> PositionSeries {
        rows.iter()
            .enumerate()
            .map(|(i, &(east, north, up))| PositionRecord {
                timestamp: epoch(i),
                east,
                north,
                up,
                fix_flag: 7,
            })
            .collect()
    }
}
