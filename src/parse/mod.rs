// src/parse/mod.rs
//! Record parsers for positioning results and satellite time series

pub mod records;
pub mod pos;
pub mod sat_value;
pub mod selector;
pub mod observables;
pub mod ele_azi;
pub mod files;

pub use records::{
    Axis, PositionRecord, PositionSeries, SatValueRecord, SatValueSeries, SatelliteSeries,
    TimeWindow,
};
pub use pos::{parse_pos, POS_COLUMNS};
pub use sat_value::parse_sat_value;
pub use selector::{FrequencyBand, FrequencyMask, ObservableMode, SatSelector};
pub use observables::parse_observables;
pub use ele_azi::parse_ele_azi;

use crate::error::{Result, StatsError};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use std::path::Path;

/// Calendar fields of an epoch, as read from six consecutive tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeFields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl TimeFields {
    /// Read `year month day hour minute second(.frac)` from the start of
    /// `tokens`. Fractional seconds are truncated.
    pub(crate) fn from_tokens(tokens: &[&str]) -> std::result::Result<Self, String> {
        fn int<T: std::str::FromStr>(
            tokens: &[&str],
            idx: usize,
            name: &str,
        ) -> std::result::Result<T, String> {
            let tok = tokens.get(idx).ok_or_else(|| format!("missing {}", name))?;
            tok.parse::<T>().map_err(|_| format!("cannot read {} from {:?}", name, tok))
        }

        let sec_tok = tokens.get(5).ok_or("missing second")?;
        let second = sec_tok
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite() && *s >= 0.0)
            .ok_or_else(|| format!("cannot read second from {:?}", sec_tok))?;

        Ok(Self {
            year: int(tokens, 0, "year")?,
            month: int(tokens, 1, "month")?,
            day: int(tokens, 2, "day")?,
            hour: int(tokens, 3, "hour")?,
            minute: int(tokens, 4, "minute")?,
            second: second.trunc().min(u32::MAX as f64) as u32,
        })
    }
}

/// Build the calendar epoch, `None` when the fields do not form a valid date.
pub(crate) fn parse_timestamp(fields: &TimeFields) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)?
        .and_hms_opt(fields.hour, fields.minute, fields.second)
}

/// Walk a marker-stamped satellite file.
///
/// `#` lines (`# year month day hour minute second`) set the epoch for every
/// following data line until the next marker. Each data line is handed to
/// `on_data` with its epoch, its tokens and its 1-based line number. Data
/// lines ahead of the first marker have no epoch and are skipped.
pub(crate) fn for_each_epoch_line<F>(contents: &str, source: &Path, mut on_data: F) -> Result<()>
where
    F: FnMut(NaiveDateTime, &[&str], usize) -> Result<()>,
{
    let mut epoch: Option<NaiveDateTime> = None;

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            let fields = TimeFields::from_tokens(&tokens[1..])
                .map_err(|reason| StatsError::malformed(source, line_no, reason))?;
            let stamp = parse_timestamp(&fields).ok_or_else(|| {
                StatsError::malformed(source, line_no, "invalid epoch marker date")
            })?;
            epoch = Some(stamp);
            continue;
        }

        match epoch {
            Some(stamp) => on_data(stamp, &tokens, line_no)?,
            None => debug!("{}:{}: data before first epoch marker", source.display(), line_no),
        }
    }

    Ok(())
}

/// Read a whole input file. I/O failures are reported and treated as "no data".
pub(crate) fn read_input(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            warn!("Cannot open {}: {}", path.display(), e);
            None
        }
    }
}
