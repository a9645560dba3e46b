// src/parse/selector.rs
//! Satellite/system selection and observable-type label sets

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Satellites to keep, either whole constellations (`G/E/C`) or single
/// satellites (`G01/E30`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatSelector {
    Systems(Vec<char>),
    Satellites(Vec<String>),
}

impl SatSelector {
    /// Parse a `/` joined selector. All tokens must share one length, a
    /// first token of length one selects systems.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens: Vec<&str> = input.trim().split('/').collect();
        let first_len = tokens[0].len();
        if first_len == 0 {
            return Err(StatsError::config(format!("empty satellite selector {:?}", input)));
        }
        if tokens.iter().any(|t| t.len() != first_len) {
            return Err(StatsError::config(format!(
                "satellite selector {:?} mixes systems and satellites",
                input
            )));
        }

        if first_len == 1 {
            Ok(SatSelector::Systems(
                tokens.iter().filter_map(|t| t.chars().next()).collect(),
            ))
        } else {
            Ok(SatSelector::Satellites(
                tokens.iter().map(|t| t.to_string()).collect(),
            ))
        }
    }

    /// Whether a satellite identifier such as `G01` is selected
    pub fn matches(&self, sat: &str) -> bool {
        match self {
            SatSelector::Systems(systems) => sat
                .chars()
                .next()
                .map_or(false, |sys| systems.contains(&sys)),
            SatSelector::Satellites(sats) => sats.iter().any(|s| s == sat),
        }
    }
}

impl FromStr for SatSelector {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = match self {
            SatSelector::Systems(systems) => systems
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("/"),
            SatSelector::Satellites(sats) => sats.join("/"),
        };
        write!(f, "{}", joined)
    }
}

/// The five frequency bands of the observable-type tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrequencyBand {
    First = 1,
    Second = 2,
    Third = 4,
    Fourth = 8,
    Fifth = 16,
}

impl FrequencyBand {
    pub const ALL: [FrequencyBand; 5] = [
        FrequencyBand::First,
        FrequencyBand::Second,
        FrequencyBand::Third,
        FrequencyBand::Fourth,
        FrequencyBand::Fifth,
    ];

    pub fn bit(self) -> u8 {
        self as u8
    }

    /// Observable-type label suffixes written for this band. Ionosphere-free
    /// combinations (`C12G`, `C157E`, ...) are listed under the band of their
    /// first frequency.
    pub fn suffixes(self) -> &'static [&'static str] {
        match self {
            FrequencyBand::First => &[
                "1G", "C12G", "C125G",
                "1E", "C15E", "C157E", "C1578E", "C15786E",
                "2C", "C26C", "C261C", "C2615C", "C26158C",
                "1C", "C15C", "C152C", "C1526C", "C15268C",
                "C15C", "C158C",
            ],
            FrequencyBand::Second => &[
                "2G", "C15G",
                "5E", "C17E",
                "6C", "C27C", "C21C",
                "5C", "C12C",
                "C26C",
            ],
            FrequencyBand::Third => &[
                "5G",
                "7E", "C18E",
                "6C", "C25C",
                "5C", "C16C",
            ],
            FrequencyBand::Fourth => &[
                "8E", "C16E",
                "5C", "C25C",
                "6C", "C16C",
            ],
            FrequencyBand::Fifth => &["6E", "8C"],
        }
    }
}

/// A non-empty combination of [`FrequencyBand`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyMask(u8);

impl FrequencyMask {
    const VALID_BITS: u8 = 0b1_1111;

    pub fn new(bits: u8) -> Result<Self> {
        if bits == 0 {
            return Err(StatsError::config("frequency mask selects no band"));
        }
        if bits & !Self::VALID_BITS != 0 {
            return Err(StatsError::config(format!(
                "frequency mask {} has bits outside the five bands",
                bits
            )));
        }
        Ok(Self(bits))
    }

    pub fn from_bands(bands: &[FrequencyBand]) -> Result<Self> {
        Self::new(bands.iter().fold(0, |acc, b| acc | b.bit()))
    }

    pub fn contains(self, band: FrequencyBand) -> bool {
        self.0 & band.bit() != 0
    }

    pub fn bands(self) -> impl Iterator<Item = FrequencyBand> {
        FrequencyBand::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

/// Carrier-phase or pseudorange observables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservableMode {
    #[default]
    Carrier,
    Pseudorange,
}

impl ObservableMode {
    /// Label prefixes. Carrier mode also accepts the `BL` ambiguity labels.
    pub fn prefixes(self) -> &'static [&'static str] {
        match self {
            ObservableMode::Carrier => &["L", "BL"],
            ObservableMode::Pseudorange => &["P"],
        }
    }
}

impl FromStr for ObservableMode {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "carrier" | "l" | "0" => Ok(ObservableMode::Carrier),
            "pseudorange" | "p" | "1" => Ok(ObservableMode::Pseudorange),
            _ => Err(StatsError::config(format!("unknown observable mode {:?}", s))),
        }
    }
}

/// Every observable-type label accepted for the given bands and mode.
pub fn accepted_labels(mask: FrequencyMask, mode: ObservableMode) -> HashSet<String> {
    mask.bands()
        .flat_map(|band| band.suffixes().iter())
        .flat_map(|suffix| {
            mode.prefixes()
                .iter()
                .map(move |prefix| format!("{}{}", prefix, suffix))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_selector() {
        let sel = SatSelector::parse("G/E").unwrap();
        assert!(sel.matches("G01"));
        assert!(sel.matches("E30"));
        assert!(!sel.matches("C06"));
    }

    #[test]
    fn test_satellite_selector() {
        let sel: SatSelector = "G01/E30".parse().unwrap();
        assert!(sel.matches("G01"));
        assert!(sel.matches("E30"));
        assert!(!sel.matches("G02"));
        assert!(!sel.matches("E3"));
        assert_eq!(sel.to_string(), "G01/E30");
    }

    #[test]
    fn test_unequal_tokens_rejected() {
        assert!(matches!(
            SatSelector::parse("G/E30"),
            Err(StatsError::Configuration(_))
        ));
        assert!(SatSelector::parse("").is_err());
        assert!(SatSelector::parse("G/").is_err());
    }

    #[test]
    fn test_frequency_mask_validation() {
        assert!(FrequencyMask::new(0).is_err());
        assert!(FrequencyMask::new(32).is_err());
        let mask = FrequencyMask::new(5).unwrap();
        let bands: Vec<_> = mask.bands().collect();
        assert_eq!(bands, vec![FrequencyBand::First, FrequencyBand::Third]);
        assert_eq!(
            FrequencyMask::from_bands(&[FrequencyBand::Second, FrequencyBand::Fifth]).unwrap(),
            FrequencyMask::new(18).unwrap()
        );
    }

    #[test]
    fn test_carrier_labels() {
        let labels = accepted_labels(FrequencyMask::new(1).unwrap(), ObservableMode::Carrier);
        assert!(labels.contains("L1G"));
        assert!(labels.contains("BLC12G"));
        assert!(!labels.contains("P1G"));
        assert!(!labels.contains("L2G"));
    }

    #[test]
    fn test_pseudorange_labels() {
        let labels = accepted_labels(FrequencyMask::new(2 | 16).unwrap(), ObservableMode::Pseudorange);
        assert!(labels.contains("P2G"));
        assert!(labels.contains("P8C"));
        assert!(!labels.contains("P1G"));
        assert!(!labels.iter().any(|l| l.starts_with('L')));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("P".parse::<ObservableMode>().unwrap(), ObservableMode::Pseudorange);
        assert_eq!("carrier".parse::<ObservableMode>().unwrap(), ObservableMode::Carrier);
        assert!("x".parse::<ObservableMode>().is_err());
    }
}
