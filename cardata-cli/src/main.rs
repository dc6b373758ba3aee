//! CarData Telemetry CLI Application
//!
//! Command-line replay tool for recorded CarData telemetry event logs.
//! It uses the cardata-telemetry library and adds:
//! - JSONL event log replay (the stand-in for the live stream host)
//! - Persisted-location seeding from a restore file
//! - Accepted-fix output and a per-run summary report
//! - Descriptor icon classification listing

use anyhow::{Context, Result};
use cardata_telemetry::ReconcilerConfig;
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

mod config;
mod replay;
mod report;

use replay::ReplayEngine;

/// CarData Telemetry - Replay and analyze vehicle telemetry logs
#[derive(Parser, Debug)]
#[command(name = "cardata-cli")]
#[command(about = "Replay CarData telemetry event logs (JSONL)", long_about = None)]
#[command(version)]
struct Args {
    /// Path to JSONL event log(s) to replay (can be repeated)
    #[arg(short, long, value_name = "FILE")]
    log: Vec<PathBuf>,

    /// Path to persisted locations file (JSON map of VIN to lat/lon)
    #[arg(short, long, value_name = "FILE")]
    restore: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for accepted fixes (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of events to replay (for testing)
    #[arg(long, value_name = "COUNT")]
    max_events: Option<usize>,

    /// Also list the icon classification of every descriptor seen
    #[arg(long)]
    icons: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

/// Persisted location entry in the restore file
#[derive(Debug, Deserialize)]
struct RestoredLocation {
    latitude: f64,
    longitude: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("CarData Telemetry CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using telemetry library v{}", cardata_telemetry::VERSION);

    // Assemble the run from flags, a config file, or both
    let (files, restore, reconciler_config, vin_filter) = if let Some(config_path) = &args.config {
        let app_config = config::load_config(config_path)?;
        log::debug!("Configuration loaded from {:?}", config_path);
        let restore = args
            .restore
            .clone()
            .or(app_config.input.restore_file.clone());
        let mut files = app_config.input.files;
        files.extend(args.log.iter().cloned());
        (
            files,
            restore,
            app_config.reconciler,
            app_config.filtering.vins,
        )
    } else {
        (
            args.log.clone(),
            args.restore.clone(),
            ReconcilerConfig::default(),
            None,
        )
    };

    reconciler_config
        .validate()
        .context("Invalid reconciler configuration")?;

    if files.is_empty() {
        println!("CarData Telemetry - No input specified");
        println!("\nQuick Start:");
        println!("  cardata-cli --log drive.jsonl");
        println!("  cardata-cli --log drive.jsonl --restore locations.json");
        println!("\nFor configured runs:");
        println!("  cardata-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    }

    let mut engine = ReplayEngine::new(reconciler_config, vin_filter);

    if let Some(restore_path) = &restore {
        seed_from_restore_file(&mut engine, restore_path)?;
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?,
        ),
        None => Box::new(io::stdout()),
    };

    replay_files(&mut engine, &files, args.max_events, &mut out)?;

    engine.summary().render(&mut out)?;
    let stats = engine.store_stats();
    writeln!(
        out,
        "  Vehicles seen:      {}\n  Descriptors seen:   {}",
        stats.num_vehicles, stats.num_descriptors
    )?;

    if args.icons {
        writeln!(out, "\nDescriptor icons")?;
        writeln!(out, "───────────────────────────────────────────────")?;
        for (descriptor, icon) in engine.icons() {
            writeln!(out, "  {:60} {}", descriptor, icon.unwrap_or("-"))?;
        }
    }

    Ok(())
}

/// Seed trackers from a JSON restore file: `{"VIN": {"latitude": .., "longitude": ..}}`
fn seed_from_restore_file(engine: &mut ReplayEngine, path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Failed to open restore file: {:?}", path))?;
    let locations: HashMap<String, RestoredLocation> = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse restore file: {:?}", path))?;

    for (vin, loc) in &locations {
        engine.seed_location(vin, loc.latitude, loc.longitude);
    }
    log::info!("Restored locations for {} vehicle(s)", locations.len());
    Ok(())
}

/// Replay event files through the engine, printing accepted fixes
fn replay_files(
    engine: &mut ReplayEngine,
    files: &[PathBuf],
    max_events: Option<usize>,
    out: &mut dyn Write,
) -> Result<()> {
    let mut processed = 0usize;

    for path in files {
        log::info!("Replaying event log: {:?}", path);
        let file =
            File::open(path).with_context(|| format!("Failed to open event log: {:?}", path))?;

        for line in BufReader::new(file).lines() {
            if let Some(limit) = max_events {
                if processed >= limit {
                    log::info!("Event limit of {} reached", limit);
                    return Ok(());
                }
            }
            let line = line?;
            if let Some(accepted) = engine.process_line(&line) {
                writeln!(
                    out,
                    "{} {} {} ({})",
                    accepted.time.to_rfc3339(),
                    accepted.vin,
                    accepted.fix,
                    accepted.reason.label()
                )?;
            }
            processed += 1;
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
