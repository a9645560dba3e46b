// src/parse/files.rs
//! Input discovery and batch sanity checks

use super::records::PositionSeries;
use crate::error::{Result, StatsError};
use std::path::{Path, PathBuf};

/// Files directly under `dir` whose name ends with `suffix`, sorted by path.
/// The suffix match ignores ASCII case, `pos` matches `a.POS` and `a.pos`.
pub fn list_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let suffix = suffix.to_ascii_lowercase();
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let matched = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.to_ascii_lowercase().ends_with(&suffix));
        if matched {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Four character station code (upper case) taken from the start of a file name.
pub fn station_code(name: &str) -> String {
    name.chars().take(4).collect::<String>().to_uppercase()
}

/// Station codes of the observation files (`*o`) found in `obs_dir`.
pub fn station_names(obs_dir: &Path) -> Result<Vec<String>> {
    Ok(list_files(obs_dir, "o")?
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .map(station_code)
        .collect())
}

/// Station code of a result file named like `<solution>_<sta>....pos`.
fn result_station(path: &Path) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let last = name.rsplit('_').next().unwrap_or(name);
    let stem = last.split('.').next().unwrap_or(last);
    station_code(stem)
}

/// Series compared side by side must come from one station and hold the
/// same number of epochs.
pub fn check_consistent(series: &[(PathBuf, PositionSeries)]) -> Result<()> {
    let mut stations: Vec<String> = series.iter().map(|(p, _)| result_station(p)).collect();
    stations.sort();
    stations.dedup();
    if stations.len() > 1 {
        return Err(StatsError::config(format!(
            "results come from different stations: {}",
            stations.join(", ")
        )));
    }

    let first_len = series.first().map(|(_, s)| s.len());
    if series.iter().any(|(_, s)| Some(s.len()) != first_len) {
        let counts = series
            .iter()
            .map(|(p, s)| format!("{}: {} epochs", p.display(), s.len()))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(StatsError::config(format!(
            "results must hold the same number of epochs ({})",
            counts
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::records::PositionRecord;
    use chrono::NaiveDate;

    fn series(n: usize) -> PositionSeries {
        let t0 = NaiveDate::from_ymd_opt(2023, 4, 25)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| PositionRecord {
                timestamp: t0 + chrono::Duration::seconds(i as i64 * 30),
                east: 0.0,
                north: 0.0,
                up: 0.0,
                fix_flag: 7,
            })
            .collect()
    }

    #[test]
    fn test_list_files_by_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pos", "a.POS", "c.txt", "wuh21150.23o"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.pos")).unwrap();

        let found = list_files(dir.path(), "pos").unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.POS", "b.pos"]);

        assert_eq!(station_names(dir.path()).unwrap(), vec!["WUH2"]);
    }

    #[test]
    fn test_consistent_batch() {
        let batch = vec![
            (PathBuf::from("ppp_wuh2.pos"), series(3)),
            (PathBuf::from("rtk_WUH2.pos"), series(3)),
        ];
        assert!(check_consistent(&batch).is_ok());
    }

    #[test]
    fn test_mixed_stations_rejected() {
        let batch = vec![
            (PathBuf::from("ppp_wuh2.pos"), series(3)),
            (PathBuf::from("ppp_jfng.pos"), series(3)),
        ];
        assert!(matches!(
            check_consistent(&batch),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn test_epoch_count_mismatch_rejected() {
        let batch = vec![
            (PathBuf::from("ppp_wuh2.pos"), series(3)),
            (PathBuf::from("rtk_wuh2.pos"), series(2)),
        ];
        let err = check_consistent(&batch).unwrap_err();
        assert!(err.to_string().contains("2 epochs"));
    }
}
