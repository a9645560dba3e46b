// src/batch.rs
//! Batch driver: each result file is parsed and summarized on its own task

use crate::{
    error::Result,
    parse::{files::check_consistent, parse_pos, records::TimeWindow},
    stats::{
        summary::{file_label, summarize_file},
        ConvergenceLimits, SessionSummary,
    },
};
use log::{error, info, warn};
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Settings shared by every file of a batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub limits: ConvergenceLimits,
    pub window: Option<TimeWindow>,
}

/// Summarize a batch of result files.
///
/// Files are independent, each runs on a blocking task. Rows come back in
/// input order. A file that fails yields an all-undefined row and the batch
/// carries on.
pub async fn run_batch(files: Vec<PathBuf>, settings: BatchSettings) -> Vec<SessionSummary> {
    info!("Processing {} result files", files.len());

    let handles: Vec<(String, JoinHandle<_>)> = files
        .into_iter()
        .map(|path| {
            let label = file_label(&path);
            let handle = tokio::task::spawn_blocking(move || {
                summarize_file(&path, settings.window, &settings.limits)
            });
            (label, handle)
        })
        .collect();

    let mut rows = Vec::with_capacity(handles.len());
    for (label, handle) in handles {
        let row = match handle.await {
            Ok(Ok(row)) => {
                info!("{}: {} epochs, fix-rate {:.4}", label, row.epochs, row.fix_rate);
                row
            }
            Ok(Err(e)) => {
                error!("{}: {}", label, e);
                SessionSummary::failed(&label, e)
            }
            Err(e) => {
                error!("{}: task failed: {}", label, e);
                SessionSummary::failed(&label, e)
            }
        };
        rows.push(row);
    }
    rows
}

/// Check that the readable files of a batch come from one station and hold
/// the same number of epochs.
///
/// Files that fail to parse are left out of the check, `run_batch` reports
/// them as failed rows.
pub fn check_batch(files: &[PathBuf], window: Option<TimeWindow>) -> Result<()> {
    let mut parsed = Vec::with_capacity(files.len());
    for path in files {
        match parse_pos(path, window) {
            Ok(series) => parsed.push((path.clone(), series)),
            Err(e) if !e.is_fatal() => {
                warn!("{}: left out of the consistency check: {}", file_label(path), e)
            }
            Err(e) => return Err(e),
        }
    }
    check_consistent(&parsed)
}
