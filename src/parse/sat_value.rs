// src/parse/sat_value.rs
//! Satellite-count/value series (PDOP, wet troposphere)
//!
//! Line layout: `<tag> year month day hour minute second ... numSat ... value`,
//! with the satellite count at token 9 and the value at token 11.

use super::records::{SatValueRecord, SatValueSeries};
use super::{parse_timestamp, read_input, TimeFields};
use crate::error::{Result, StatsError};
use log::debug;
use std::path::Path;

const MIN_SAT_VALUE_TOKENS: usize = 9;
const NUM_SAT_TOKEN: usize = 9;
const VALUE_TOKEN: usize = 11;

/// Parse a satellite-count/value file. A missing file yields an empty series.
pub fn parse_sat_value(path: &Path) -> Result<SatValueSeries> {
    match read_input(path) {
        Some(contents) => parse_sat_value_str(&contents, path),
        None => Ok(SatValueSeries::new()),
    }
}

pub fn parse_sat_value_str(contents: &str, source: &Path) -> Result<SatValueSeries> {
    let mut series = SatValueSeries::new();

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_SAT_VALUE_TOKENS {
            continue;
        }

        let malformed = |reason: String| StatsError::malformed(source, line_no, reason);
        let fields = TimeFields::from_tokens(&tokens[1..]).map_err(malformed)?;
        let timestamp = parse_timestamp(&fields)
            .ok_or_else(|| malformed("invalid calendar date".to_string()))?;

        let num_sat = tokens
            .get(NUM_SAT_TOKEN)
            .and_then(|t| t.parse::<u32>().ok())
            .ok_or_else(|| malformed("cannot read satellite count".to_string()))?;
        let value = tokens
            .get(VALUE_TOKEN)
            .and_then(|t| t.parse::<f64>().ok())
            .ok_or_else(|| malformed("cannot read value".to_string()))?;

        series.push(SatValueRecord {
            timestamp,
            num_sat,
            value,
        });
    }

    debug!("{}: {} epochs", source.display(), series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdop_lines() {
        let text = "\
% PDOP series
> 2023 4 25 9 50 0.0 sats : 12 PDOP 1.85
> 2023 4 25 9 50 30.0 sats : 11 PDOP 1.92
";
        let series = parse_sat_value_str(text, Path::new("pdop.txt")).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].num_sat, 12);
        assert_eq!(series[0].value, 1.85);
        assert_eq!(series[1].timestamp.to_string(), "2023-04-25 09:50:30");
        assert_eq!(series[1].num_sat, 11);
    }

    #[test]
    fn test_missing_value_fails_file() {
        let text = "> 2023 4 25 9 50 0.0 sats : 12";
        let err = parse_sat_value_str(text, Path::new("pdop.txt")).unwrap_err();
        assert!(matches!(err, StatsError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_invalid_date_fails_file() {
        let text = "> 2023 2 30 9 50 0.0 sats : 12 PDOP 1.85";
        let err = parse_sat_value_str(text, Path::new("pdop.txt")).unwrap_err();
        assert!(err.to_string().contains("invalid calendar date"));
    }
}
