// src/parse/ele_azi.rs
//! Satellite elevation/azimuth series

use super::records::{SatelliteSeries, LABEL_AZIMUTH, LABEL_ELEVATION};
use super::selector::SatSelector;
use super::{for_each_epoch_line, read_input};
use crate::error::{Result, StatsError};
use log::debug;
use std::path::Path;

/// Parse an elevation/azimuth file (`<sat> <elevation> <azimuth>` lines under
/// `#` epoch markers). Angles are kept in degrees as written.
pub fn parse_ele_azi(path: &Path, selector: &SatSelector) -> Result<SatelliteSeries> {
    match read_input(path) {
        Some(contents) => parse_ele_azi_str(&contents, path, selector),
        None => Ok(SatelliteSeries::new()),
    }
}

pub fn parse_ele_azi_str(
    contents: &str,
    source: &Path,
    selector: &SatSelector,
) -> Result<SatelliteSeries> {
    let mut series = SatelliteSeries::new();

    for_each_epoch_line(contents, source, |epoch, tokens, line_no| {
        let sat = tokens[0];
        if !selector.matches(sat) {
            return Ok(());
        }

        let angle = |idx: usize, label: &str| {
            tokens
                .get(idx)
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or_else(|| StatsError::malformed(source, line_no, format!("cannot read {}", label)))
        };
        let elevation = angle(1, LABEL_ELEVATION)?;
        let azimuth = angle(2, LABEL_AZIMUTH)?;

        let values = series
            .entry(sat.to_string())
            .or_default()
            .entry(epoch)
            .or_default();
        values.insert(LABEL_ELEVATION.to_string(), elevation);
        values.insert(LABEL_AZIMUTH.to_string(), azimuth);
        Ok(())
    })?;

    debug!("{}: {} satellites", source.display(), series.len());
    Ok(series)
}
