// src/parse/pos.rs
//! Positioning result (`.pos`) file parsing
//!
//! Each epoch line starts with whitespace separated calendar fields
//! `year month day hour minute second(.frac)` and carries the E/N/U offsets
//! and the solution status at fixed byte columns further right. Both
//! addressing schemes are part of the file format written by the positioning
//! engines, see [`POS_COLUMNS`].

use super::records::{PositionRecord, PositionSeries, TimeWindow};
use super::{parse_timestamp, read_input, TimeFields};
use crate::error::{Result, StatsError};
use chrono::NaiveDateTime;
use log::debug;
use std::path::Path;

/// Lines with fewer leading tokens are header or footer lines.
pub const MIN_POS_TOKENS: usize = 5;

/// Fields read from fixed byte columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosField {
    East,
    North,
    Up,
    FixFlag,
}

/// A half-open `[start, end)` byte range of a result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub field: PosField,
    pub start: usize,
    pub end: usize,
}

/// Byte layout of a positioning result line. These offsets are fixed by the
/// producing software and must not be changed.
pub const POS_COLUMNS: [ColumnSpan; 4] = [
    ColumnSpan { field: PosField::East, start: 80, end: 89 },
    ColumnSpan { field: PosField::North, start: 89, end: 98 },
    ColumnSpan { field: PosField::Up, start: 98, end: 107 },
    ColumnSpan { field: PosField::FixFlag, start: 116, end: 119 },
];

impl PosField {
    pub fn span(self) -> ColumnSpan {
        POS_COLUMNS[self as usize]
    }

    fn name(self) -> &'static str {
        match self {
            PosField::East => "east",
            PosField::North => "north",
            PosField::Up => "up",
            PosField::FixFlag => "fix flag",
        }
    }
}

/// Slice a column out of the raw line. Like the producing tools we clip the
/// range at the end of the line, a short field then fails to parse.
fn column(line: &str, span: ColumnSpan) -> Option<&str> {
    let end = span.end.min(line.len());
    if span.start >= end {
        return None;
    }
    line.get(span.start..end)
}

fn read_float(line: &str, field: PosField) -> std::result::Result<f64, String> {
    let raw = column(line, field.span())
        .ok_or_else(|| format!("{} column missing", field.name()))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("cannot read {} from {:?}", field.name(), raw))
}

fn read_flag(line: &str) -> std::result::Result<u8, String> {
    let value = read_float(line, PosField::FixFlag)?;
    let flag = value.trunc();
    if !(0.0..=u8::MAX as f64).contains(&flag) {
        return Err(format!("fix flag {} out of range", value));
    }
    Ok(flag as u8)
}

/// Parse a positioning result file.
///
/// A missing or unreadable file yields an empty series. A line whose time or
/// column fields cannot be read, or whose epoch is earlier than the line
/// before, fails the whole file.
pub fn parse_pos(path: &Path, window: Option<TimeWindow>) -> Result<PositionSeries> {
    match read_input(path) {
        Some(contents) => parse_pos_str(&contents, path, window),
        None => Ok(PositionSeries::default()),
    }
}

/// Parse the contents of a positioning result file. `source` is only used
/// for error reporting.
pub fn parse_pos_str(
    contents: &str,
    source: &Path,
    window: Option<TimeWindow>,
) -> Result<PositionSeries> {
    let window = window.filter(|w| !w.is_full_day());
    let mut records = Vec::new();
    let mut previous: Option<NaiveDateTime> = None;

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < MIN_POS_TOKENS {
            continue;
        }

        let fields = TimeFields::from_tokens(&tokens)
            .map_err(|reason| StatsError::malformed(source, line_no, reason))?;
        let timestamp = parse_timestamp(&fields)
            .ok_or_else(|| StatsError::malformed(source, line_no, "invalid calendar date"))?;
        if previous.is_some_and(|p| timestamp < p) {
            return Err(StatsError::malformed(
                source,
                line_no,
                "epoch earlier than the previous one",
            ));
        }
        previous = Some(timestamp);

        let read = |field| read_float(line, field);
        let record = PositionRecord {
            timestamp,
            east: read(PosField::East).map_err(|r| StatsError::malformed(source, line_no, r))?,
            north: read(PosField::North).map_err(|r| StatsError::malformed(source, line_no, r))?,
            up: read(PosField::Up).map_err(|r| StatsError::malformed(source, line_no, r))?,
            fix_flag: read_flag(line).map_err(|r| StatsError::malformed(source, line_no, r))?,
        };

        if let Some(w) = window {
            if !w.contains(&timestamp) {
                continue;
            }
        }
        records.push(record);
    }

    debug!("{}: {} epochs", source.display(), records.len());
    Ok(PositionSeries::new(records))
}
