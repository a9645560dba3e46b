// src/parse/records.rs
//! Parsed time-series structures shared by the parsers and the statistics engine

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Solution status of an ambiguity-fixed epoch.
pub const FLAG_FIXED: u8 = 7;
/// Solution status the TTFF scan treats as "not yet converged".
pub const FLAG_NO_FIX: u8 = 6;

pub const SECONDS_PER_DAY: u32 = 86_400;

/// Labels used by the elevation/azimuth parser.
pub const LABEL_ELEVATION: &str = "elevation";
pub const LABEL_AZIMUTH: &str = "azimuth";

/// One observation epoch of a positioning result file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub timestamp: NaiveDateTime,
    pub east: f64,  // meters
    pub north: f64, // meters
    pub up: f64,    // meters
    pub fix_flag: u8,
}

impl PositionRecord {
    pub fn is_fixed(&self) -> bool {
        self.fix_flag == FLAG_FIXED
    }

    /// Offset along one axis
    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::East => self.east,
            Axis::North => self.north,
            Axis::Up => self.up,
        }
    }
}

/// The three local topocentric axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    East,
    North,
    Up,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::East, Axis::North, Axis::Up];

    pub fn index(self) -> usize {
        match self {
            Axis::East => 0,
            Axis::North => 1,
            Axis::Up => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::East => "E",
            Axis::North => "N",
            Axis::Up => "U",
        }
    }
}

/// Epochs of one positioning result file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSeries {
    records: Vec<PositionRecord>,
}

impl PositionSeries {
    pub fn new(records: Vec<PositionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PositionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_epoch(&self) -> Option<NaiveDateTime> {
        self.records.first().map(|r| r.timestamp)
    }

    /// Minutes elapsed between the first epoch and epoch `index`
    pub fn minutes_since_start(&self, index: usize) -> Option<f64> {
        let first = self.first_epoch()?;
        let epoch = self.records.get(index)?.timestamp;
        Some(epoch.signed_duration_since(first).num_seconds() as f64 / 60.0)
    }

    pub fn flags(&self) -> impl Iterator<Item = u8> + '_ {
        self.records.iter().map(|r| r.fix_flag)
    }
}

impl FromIterator<PositionRecord> for PositionSeries {
    fn from_iter<I: IntoIterator<Item = PositionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Optional, inclusive seconds-of-day filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub begin_sod: u32,
    pub end_sod: u32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::full_day()
    }
}

impl TimeWindow {
    pub fn new(begin_sod: u32, end_sod: u32) -> Self {
        Self { begin_sod, end_sod }
    }

    pub fn full_day() -> Self {
        Self::new(0, SECONDS_PER_DAY)
    }

    pub fn is_full_day(&self) -> bool {
        self.begin_sod == 0 && self.end_sod == SECONDS_PER_DAY
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        let sod = timestamp.num_seconds_from_midnight();
        sod >= self.begin_sod && sod <= self.end_sod
    }
}

/// One epoch of a satellite-count/value file (PDOP, wet troposphere, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatValueRecord {
    pub timestamp: NaiveDateTime,
    pub num_sat: u32,
    pub value: f64,
}

pub type SatValueSeries = Vec<SatValueRecord>;

/// Observable label to value, for one satellite at one epoch.
pub type LabelValues = BTreeMap<String, f64>;

/// Satellite identifier, then epoch, then observable label.
pub type SatelliteSeries = BTreeMap<String, BTreeMap<NaiveDateTime, LabelValues>>;
