// src/main.rs
//! pos-stats - convergence and fix statistics for GNSS positioning results

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env, Target};
use log::info;
use pos_stats::{
    config::{EleAziSettings, ObservableSettings},
    display::{SummaryDisplay, TerminalDisplay},
    parse::{
        self, files::station_names, observables::ObservableFilter,
        ObservableMode, SatSelector,
    },
    *,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pos-stats", version, about = "GNSS positioning result statistics")]
struct Cli {
    /// JSON configuration file (defaults to ~/.config/pos-stats/config.json)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Debug traces
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct WindowArgs {
    /// Keep epochs from this second of day
    #[arg(long)]
    begin_sod: Option<u32>,
    /// Keep epochs up to this second of day (inclusive)
    #[arg(long)]
    end_sod: Option<u32>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fix-rate, TTFF and convergence accuracy/time of result files
    Count {
        /// Result files (overrides `pos_files` of the configuration)
        files: Vec<PathBuf>,
        /// Process every *.pos file of this directory
        #[arg(long, short = 'd')]
        dir: Option<PathBuf>,
        #[arg(long)]
        elimit: Option<f64>,
        #[arg(long)]
        nlimit: Option<f64>,
        #[arg(long)]
        ulimit: Option<f64>,
        #[command(flatten)]
        window: WindowArgs,
        /// Refuse results from different stations or with different epoch counts
        #[arg(long)]
        check: bool,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
        /// Disable terminal colors
        #[arg(long)]
        no_color: bool,
    },
    /// Dump the epochs of one result file as JSON
    Series {
        file: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Dump a satellite-count/value file (PDOP, troposphere) as JSON
    SatValue { file: Option<PathBuf> },
    /// Dump per-satellite observables (residuals, ambiguities) as JSON
    Observables {
        file: Option<PathBuf>,
        /// Systems (G/E/C) or satellites (G01/E30)
        #[arg(long)]
        sat: Option<String>,
        /// Frequency bitmask: 1, 2, 4, 8, 16 or their sum
        #[arg(long)]
        frequency: Option<u8>,
        /// carrier or pseudorange
        #[arg(long)]
        mode: Option<ObservableMode>,
    },
    /// Dump satellite elevation/azimuth as JSON
    EleAzi {
        file: Option<PathBuf>,
        #[arg(long)]
        sat: Option<String>,
    },
    /// List station codes of the observation files in a directory
    Stations { dir: PathBuf },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn apply_window(config: &mut StatsConfig, window: &WindowArgs) {
    if window.begin_sod.is_some() || window.end_sod.is_some() {
        let current = config.time_window.unwrap_or_default();
        config.update_window(
            window.begin_sod.unwrap_or(current.begin_sod),
            window.end_sod.unwrap_or(current.end_sod),
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let mut config = StatsConfig::load(cli.config.as_deref()).context("Cannot load configuration")?;

    match cli.command {
        Command::Count {
            files,
            dir,
            elimit,
            nlimit,
            ulimit,
            window,
            check,
            json,
            no_color,
        } => {
            if let (Some(e), Some(n), Some(u)) = (elimit, nlimit, ulimit) {
                config.update_limits(ConvergenceLimits::new(e, n, u));
            } else if let Some(mut limits) = config.limits {
                limits.elimit = elimit.unwrap_or(limits.elimit);
                limits.nlimit = nlimit.unwrap_or(limits.nlimit);
                limits.ulimit = ulimit.unwrap_or(limits.ulimit);
                config.update_limits(limits);
            }
            apply_window(&mut config, &window);
            if !files.is_empty() {
                config.pos_files = files;
                config.pos_dir = None;
            }
            if dir.is_some() {
                config.pos_dir = dir;
            }

            // settings are checked before any result file is opened
            config.validate()?;
            let limits = config.required_limits()?;
            let inputs = config.pos_inputs().context("Cannot list result files")?;
            if inputs.is_empty() {
                bail!("No result files given");
            }

            if check {
                check_batch(&inputs, config.window())?;
            }

            let rows = run_batch(
                inputs,
                BatchSettings {
                    limits,
                    window: config.window(),
                },
            )
            .await;

            if json {
                print_json(&rows)?;
            } else if no_color {
                TerminalDisplay::plain().show(&rows)?;
            } else {
                TerminalDisplay::new().show(&rows)?;
            }
        }
        Command::Series { file, window } => {
            apply_window(&mut config, &window);
            config.validate()?;
            let series = parse_pos(&file, config.window())?;
            info!("{}: {} epochs", file.display(), series.len());
            print_json(&series)?;
        }
        Command::SatValue { file } => {
            let file = file
                .or(config.sat_value.clone())
                .context("No satellite-count/value file given")?;
            print_json(&parse::parse_sat_value(&file)?)?;
        }
        Command::Observables {
            file,
            sat,
            frequency,
            mode,
        } => {
            let current = config.observables.clone();
            let settings = ObservableSettings {
                file: file
                    .or(current.as_ref().map(|s| s.file.clone()))
                    .context("No observable file given")?,
                sat: sat
                    .or(current.as_ref().map(|s| s.sat.clone()))
                    .context("No satellite selector given")?,
                frequency: frequency
                    .or(current.as_ref().map(|s| s.frequency))
                    .context("No frequency given")?,
                mode: mode.or(current.map(|s| s.mode)).unwrap_or_default(),
            };
            config.observables = Some(settings);
            config.validate()?;

            let (file, filter): (PathBuf, ObservableFilter) = config
                .observable_filter()?
                .context("No observable settings")?;
            print_json(&parse::parse_observables(&file, &filter)?)?;
        }
        Command::EleAzi { file, sat } => {
            let current = config.ele_azi.clone();
            config.ele_azi = Some(EleAziSettings {
                file: file
                    .or(current.as_ref().map(|s| s.file.clone()))
                    .context("No elevation/azimuth file given")?,
                sat: sat
                    .or(current.map(|s| s.sat))
                    .context("No satellite selector given")?,
            });
            config.validate()?;

            let (file, selector): (PathBuf, SatSelector) = config
                .ele_azi_selector()?
                .context("No elevation/azimuth settings")?;
            print_json(&parse::parse_ele_azi(&file, &selector)?)?;
        }
        Command::Stations { dir } => {
            for station in station_names(&dir)? {
                println!("{}", station);
            }
        }
    }

    Ok(())
}
