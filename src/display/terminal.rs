// src/display/terminal.rs
//! Terminal table of session summaries

use super::SummaryDisplay;
use crate::{
    error::{Result, StatsError},
    stats::SessionSummary,
};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

const RULE_WIDTH: usize = 96;

pub struct TerminalDisplay {
    color: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self { color: true }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Render the table to any writer
    pub fn render(&self, out: &mut impl Write, rows: &[SessionSummary]) -> Result<()> {
        self.render_header(out)?;
        for row in rows {
            self.render_row(out, row)?;
        }

        let complete = rows.iter().filter(|r| r.is_complete()).count();
        self.colored(out, Color::Green, &"=".repeat(RULE_WIDTH))?;
        execute!(
            out,
            Print(format!("\n{} files, {} converged\n", rows.len(), complete))
        )
        .map_err(StatsError::Io)?;
        Ok(())
    }

    fn colored(&self, out: &mut impl Write, color: Color, text: &str) -> Result<()> {
        let written = if self.color {
            execute!(out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            execute!(out, Print(text))
        };
        written.map_err(StatsError::Io)
    }

    fn render_header(&self, out: &mut impl Write) -> Result<()> {
        self.colored(out, Color::Green, &format!("{}\n", "=".repeat(RULE_WIDTH)))?;
        self.colored(
            out,
            Color::Yellow,
            &format!(
                "{:<24} {:>9} {:>9} {:>9} {:>8} {:>8} {:>8} {:>7} {:>8}\n",
                "# posname", "E/cm", "N/cm", "U/cm", "E/min", "N/min", "U/min", "FixRate", "TTFF/min"
            ),
        )?;
        self.colored(out, Color::Green, &format!("{}\n", "=".repeat(RULE_WIDTH)))
    }

    fn render_row(&self, out: &mut impl Write, row: &SessionSummary) -> Result<()> {
        let acc = &row.accuracy.accuracy;
        let time = &row.accuracy.convergence_time;
        let name = if row.is_complete() {
            row.file.clone()
        } else {
            format!("#{}", row.file)
        };
        let line = format!(
            "{:<24} {:>9.4} {:>9.4} {:>9.4} {:>8.4} {:>8.4} {:>8.4} {:>7.4} {:>8.4}\n",
            name,
            acc[0] * 100.0,
            acc[1] * 100.0,
            acc[2] * 100.0,
            time[0],
            time[1],
            time[2],
            row.fix_rate,
            row.ttff
        );

        let color = match (&row.error, row.accuracy.is_defined()) {
            (Some(_), _) => Color::Red,
            (None, false) => Color::Magenta,
            (None, true) => Color::Reset,
        };
        self.colored(out, color, &line)?;

        if let Some(err) = &row.error {
            self.colored(out, Color::Red, &format!("    {}\n", err))?;
        }
        Ok(())
    }
}

impl SummaryDisplay for TerminalDisplay {
    type Error = StatsError;

    fn show(&self, rows: &[SessionSummary]) -> Result<()> {
        let mut stdout = io::stdout();
        self.render(&mut stdout, rows)?;
        stdout.flush().map_err(StatsError::Io)
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}
