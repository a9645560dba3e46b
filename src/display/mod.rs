// src/display/mod.rs
//! Display of computed statistics

pub mod terminal;

pub use terminal::TerminalDisplay;

use crate::stats::SessionSummary;

/// Trait for different summary renderers
pub trait SummaryDisplay {
    type Error;

    /// Render one batch of summary rows
    fn show(&self, rows: &[SessionSummary]) -> Result<(), Self::Error>;
}
