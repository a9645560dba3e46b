// src/config.rs
//! Configuration loading and eager validation

use crate::error::{Result, StatsError};
use crate::parse::files::list_files;
use crate::parse::observables::ObservableFilter;
use crate::parse::records::{TimeWindow, SECONDS_PER_DAY};
use crate::parse::selector::{FrequencyMask, ObservableMode, SatSelector};
use crate::stats::ConvergenceLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings of the observable (residual/ambiguity) parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableSettings {
    pub file: PathBuf,
    pub sat: String,
    /// Sum of band numbers: 1, 2, 4, 8, 16.
    pub frequency: u8,
    #[serde(default)]
    pub mode: ObservableMode,
}

/// Settings of the elevation/azimuth parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EleAziSettings {
    pub file: PathBuf,
    pub sat: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Required for convergence statistics.
    pub limits: Option<ConvergenceLimits>,
    pub time_window: Option<TimeWindow>,
    pub pos_files: Vec<PathBuf>,
    /// When set, every `*pos` file of this directory is processed instead of `pos_files`.
    pub pos_dir: Option<PathBuf>,
    pub sat_value: Option<PathBuf>,
    pub observables: Option<ObservableSettings>,
    pub ele_azi: Option<EleAziSettings>,
}

impl StatsConfig {
    /// Load configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file yields an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Self::get_config_path()?;
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                Self::load_from_file(&default_path)
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StatsError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            StatsError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| StatsError::config("HOME environment variable not set"))?;

        Ok(PathBuf::from(home).join(".config").join("pos-stats").join("config.json"))
    }

    pub fn update_limits(&mut self, limits: ConvergenceLimits) {
        self.limits = Some(limits);
    }

    pub fn update_window(&mut self, begin_sod: u32, end_sod: u32) {
        self.time_window = Some(TimeWindow::new(begin_sod, end_sod));
    }

    /// Convergence limits, failing when they were never configured.
    pub fn required_limits(&self) -> Result<ConvergenceLimits> {
        let limits = self
            .limits
            .ok_or_else(|| StatsError::config("elimit/nlimit/ulimit are required"))?;
        limits.validate()?;
        Ok(limits)
    }

    pub fn window(&self) -> Option<TimeWindow> {
        self.time_window.filter(|w| !w.is_full_day())
    }

    /// Check every configured section before any input file is read.
    pub fn validate(&self) -> Result<()> {
        if let Some(limits) = &self.limits {
            limits.validate()?;
        }
        if let Some(w) = &self.time_window {
            if w.begin_sod > w.end_sod || w.end_sod > SECONDS_PER_DAY {
                return Err(StatsError::config(format!(
                    "invalid time window {}..{} (seconds of day)",
                    w.begin_sod, w.end_sod
                )));
            }
        }
        self.observable_filter()?;
        self.ele_azi_selector()?;
        Ok(())
    }

    /// Result files to process.
    pub fn pos_inputs(&self) -> Result<Vec<PathBuf>> {
        match &self.pos_dir {
            Some(dir) => list_files(dir, "pos"),
            None => Ok(self.pos_files.clone()),
        }
    }

    pub fn observable_filter(&self) -> Result<Option<(PathBuf, ObservableFilter)>> {
        let Some(settings) = &self.observables else {
            return Ok(None);
        };
        let filter = ObservableFilter::new(
            SatSelector::parse(&settings.sat)?,
            FrequencyMask::new(settings.frequency)?,
            settings.mode,
        );
        Ok(Some((settings.file.clone(), filter)))
    }

    pub fn ele_azi_selector(&self) -> Result<Option<(PathBuf, SatSelector)>> {
        let Some(settings) = &self.ele_azi else {
            return Ok(None);
        };
        Ok(Some((settings.file.clone(), SatSelector::parse(&settings.sat)?)))
    }
}
