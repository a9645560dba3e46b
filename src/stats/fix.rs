// src/stats/fix.rs
//! Fix-rate and time to first fix

use crate::parse::records::{PositionSeries, FLAG_NO_FIX};

/// Epochs the TTFF scan looks ahead, the current one included.
pub const TTFF_WINDOW: usize = 10;

/// Reported when no sustained fix is ever reached.
pub const TTFF_UNDEFINED: f64 = -1.0;

/// Share of ambiguity-fixed epochs. An empty series has a fix-rate of 0.
pub fn fix_rate(series: &PositionSeries) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let fixed = series.records().iter().filter(|r| r.is_fixed()).count();
    fixed as f64 / series.len() as f64
}

/// Index of the first epoch whose `TTFF_WINDOW` lookahead (clipped at the
/// end of the series) holds no "no-fix" flag.
pub fn first_fix_index(series: &PositionSeries) -> Option<usize> {
    let flags: Vec<u8> = series.flags().collect();
    (0..flags.len()).find(|&i| {
        let end = (i + TTFF_WINDOW).min(flags.len());
        !flags[i..end].contains(&FLAG_NO_FIX)
    })
}

/// Minutes from the first epoch to the first sustained fix, `None` when the
/// series is empty or never settles.
pub fn ttff(series: &PositionSeries) -> Option<f64> {
    first_fix_index(series).and_then(|i| series.minutes_since_start(i))
}

/// [`ttff`] with the undefined case mapped to [`TTFF_UNDEFINED`].
pub fn ttff_or_undefined(series: &PositionSeries) -> f64 {
    ttff(series).unwrap_or(TTFF_UNDEFINED)
}
