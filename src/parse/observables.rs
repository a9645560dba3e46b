// src/parse/observables.rs
//! Per-satellite observable values (residuals, ambiguities)
//!
//! Data lines read `<sat> <label> <value> <label> <value> ...` and are stamped
//! by the preceding `#` epoch marker.

use super::records::SatelliteSeries;
use super::selector::{accepted_labels, FrequencyMask, ObservableMode, SatSelector};
use super::{for_each_epoch_line, read_input};
use crate::error::{Result, StatsError};
use log::debug;
use std::collections::HashSet;
use std::path::Path;

/// What to keep from an observable file.
#[derive(Debug, Clone)]
pub struct ObservableFilter {
    pub selector: SatSelector,
    labels: HashSet<String>,
}

impl ObservableFilter {
    pub fn new(selector: SatSelector, frequency: FrequencyMask, mode: ObservableMode) -> Self {
        Self {
            selector,
            labels: accepted_labels(frequency, mode),
        }
    }

    pub fn accepts_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// Parse an observable file. A missing file yields an empty map.
pub fn parse_observables(path: &Path, filter: &ObservableFilter) -> Result<SatelliteSeries> {
    match read_input(path) {
        Some(contents) => parse_observables_str(&contents, path, filter),
        None => Ok(SatelliteSeries::new()),
    }
}

pub fn parse_observables_str(
    contents: &str,
    source: &Path,
    filter: &ObservableFilter,
) -> Result<SatelliteSeries> {
    let mut series = SatelliteSeries::new();

    for_each_epoch_line(contents, source, |epoch, tokens, line_no| {
        let sat = tokens[0];
        if !filter.selector.matches(sat) {
            return Ok(());
        }

        let values = series
            .entry(sat.to_string())
            .or_default()
            .entry(epoch)
            .or_default();

        for pair in tokens[1..].chunks_exact(2) {
            let (label, raw) = (pair[0], pair[1]);
            if !filter.accepts_label(label) {
                continue;
            }
            let value = raw.parse::<f64>().map_err(|_| {
                StatsError::malformed(source, line_no, format!("cannot read {} from {:?}", label, raw))
            })?;
            values.insert(label.to_string(), value);
        }
        Ok(())
    })?;

    debug!("{}: {} satellites", source.display(), series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESIDUALS: &str = "\
# 2023 4 25 9 50 0.0
G01 L1G 0.0012 L2G -0.0031 P1G 0.45
E30 L1E 0.0020 L5E 0.0007
C06 L2C 0.0100
# 2023 4 25 9 50 30.0
G01 L1G 0.0009 BLC12G 1.5
E30 L1E -0.0004
";

    fn filter(sel: &str, freq: u8, mode: ObservableMode) -> ObservableFilter {
        ObservableFilter::new(
            SatSelector::parse(sel).unwrap(),
            FrequencyMask::new(freq).unwrap(),
            mode,
        )
    }

    #[test]
    fn test_carrier_first_frequency() {
        let f = filter("G/E", 1, ObservableMode::Carrier);
        let series = parse_observables_str(RESIDUALS, Path::new("res"), &f).unwrap();

        assert_eq!(series.len(), 2);
        assert!(!series.contains_key("C06"));

        let g01 = &series["G01"];
        assert_eq!(g01.len(), 2);
        let first = g01.values().next().unwrap();
        assert_eq!(first.get("L1G"), Some(&0.0012));
        assert!(first.get("L2G").is_none());
        assert!(first.get("P1G").is_none());
        let second = g01.values().nth(1).unwrap();
        assert_eq!(second.get("BLC12G"), Some(&1.5));
    }

    #[test]
    fn test_pseudorange_single_satellite() {
        let f = filter("G01", 1, ObservableMode::Pseudorange);
        let series = parse_observables_str(RESIDUALS, Path::new("res"), &f).unwrap();
        assert_eq!(series.keys().collect::<Vec<_>>(), vec!["G01"]);
        let first = series["G01"].values().next().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.get("P1G"), Some(&0.45));
    }

    #[test]
    fn test_bad_value_fails_file() {
        let text = "# 2023 4 25 9 50 0.0\nG01 L1G abc\n";
        let f = filter("G", 1, ObservableMode::Carrier);
        assert!(matches!(
            parse_observables_str(text, Path::new("res"), &f),
            Err(StatsError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_lines_before_marker_skipped() {
        let text = "G01 L1G 0.1\n# 2023 4 25 9 50 0.0\nG01 L1G 0.2\n";
        let f = filter("G", 1, ObservableMode::Carrier);
        let series = parse_observables_str(text, Path::new("res"), &f).unwrap();
        let epochs = &series["G01"];
        assert_eq!(epochs.len(), 1);
        assert_eq!(epochs.values().next().unwrap().get("L1G"), Some(&0.2));
    }
}
