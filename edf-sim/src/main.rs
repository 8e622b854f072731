/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

use edf_sim::config::{TaskSetFile, TaskSetFormat};
use edf_sim::hyperperiod::DEFAULT_HYPERPERIOD_LIMIT;
use edf_sim::report::TraceReporter;
use edf_sim::scheduler::{DemandModel, EdfScheduler};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Input format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Detect from the file extension (stdin is always text).
    Auto,
    Text,
    Yaml,
}

/// Offline EDF scheduling simulator.
///
/// Example:
///   edf-sim --taskset tasksets/taskset1.txt --show-demand
///   echo "2 0 3 1 3 0 6 4 6" | edf-sim
#[derive(Debug, Parser)]
#[command(
    name = "edf-sim",
    about = "Tick-level EDF simulator for periodic task sets",
    long_about = None,
)]
struct Cli {
    /// Task set file.  Reads the text format from stdin when omitted.
    #[arg(short = 't', long = "taskset")]
    taskset: Option<PathBuf>,

    /// Task set file format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Append the per-tick stack demand to every trace line.
    #[arg(short = 's', long = "show-demand", default_value_t = false)]
    show_demand: bool,

    /// Demand of a started job (overrides the task set file).
    #[arg(long = "high-cost")]
    high_cost: Option<u32>,

    /// Demand of a queued, unstarted job (overrides the task set file).
    #[arg(long = "low-cost")]
    low_cost: Option<u32>,

    /// Refuse task sets whose hyperperiod exceeds this many ticks.
    #[arg(long = "max-hyperperiod", default_value_t = DEFAULT_HYPERPERIOD_LIMIT)]
    max_hyperperiod: u64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Logs go to stderr; stdout carries only the trace.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        taskset         = ?cli.taskset,
        format          = ?cli.format,
        show_demand     = cli.show_demand,
        max_hyperperiod = cli.max_hyperperiod,
        "Configuration"
    );

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // ── Load task set ─────────────────────────────────────────────────────────
    let forced = match cli.format {
        Format::Auto => None,
        Format::Text => Some(TaskSetFormat::Text),
        Format::Yaml => Some(TaskSetFormat::Yaml),
    };

    let file = match &cli.taskset {
        Some(path) => TaskSetFile::load_from_file(path, forced)?,
        None => {
            info!("No task set file provided, reading from stdin");
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Cannot read task set from stdin")?;
            TaskSetFile::parse(&content, forced.unwrap_or(TaskSetFormat::Text))?
        }
    };

    // ── Demand model: CLI > file > defaults ───────────────────────────────────
    let base = file.demand.unwrap_or_default();
    let demand = DemandModel {
        high_cost: cli.high_cost.unwrap_or(base.high_cost),
        low_cost: cli.low_cost.unwrap_or(base.low_cost),
    };

    // ── Simulate ──────────────────────────────────────────────────────────────
    let scheduler = EdfScheduler::new()
        .with_demand(demand)
        .with_hyperperiod_limit(cli.max_hyperperiod);

    let report = scheduler.simulate_specs(&file.specs)?;

    // ── Report ────────────────────────────────────────────────────────────────
    TraceReporter::new()
        .with_demand(cli.show_demand)
        .write(&report, io::stdout().lock())
        .context("Failed to write trace")?;

    Ok(())
}
