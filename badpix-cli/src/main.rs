//! badpix command-line interface.
//!
//! Detects bad pixels from dark frames, maintains the bad pixel store and
//! corrects raw frames.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Parser, Subcommand};

use badpix_algorithms::{detect, BadPixelCorrector, DetectionConfig};
use badpix_core::{AcquisitionParams, SensorConfig};
use badpix_io::{
    read_raw_frame, write_raw_frame, BadPixelStore, FrequencyReportWriter, RawFrameDirectory,
    RawPedestalFile,
};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    BadpixIo(#[from] badpix_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] badpix_core::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Bad pixel detection and correction for imaging sensors.
#[derive(Parser)]
#[command(name = "badpix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect bad pixels in a range of dark frames and update the store
    Detect {
        /// Sensor configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory holding numbered raw dark frames
        #[arg(short, long)]
        frames: PathBuf,

        /// File name prefix of the raw frames
        #[arg(long, default_value = "frame_")]
        prefix: String,

        /// First frame to scan (inclusive)
        #[arg(long)]
        min_frame: u32,

        /// Last frame to scan (inclusive)
        #[arg(long)]
        max_frame: u32,

        /// Raw pedestal frame
        #[arg(short, long)]
        pedestal: PathBuf,

        /// Bad pixel store
        #[arg(short, long)]
        store: PathBuf,

        /// Minimum number of frames a pixel must exceed its threshold in
        #[arg(long, default_value = "1")]
        min_frequency: u32,

        /// Write a CSV frequency report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Replace the store instead of merging into it
        #[arg(long)]
        replace: bool,

        /// Compare pixels sequentially
        #[arg(long)]
        sequential: bool,
    },

    /// Correct bad pixels in a raw frame
    Correct {
        /// Sensor configuration (JSON); thresholds are not required
        #[arg(short, long)]
        config: PathBuf,

        /// Bad pixel store
        #[arg(short, long)]
        store: PathBuf,

        /// Raw input frame(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output directory for corrected frames
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the pixels in a bad pixel store
    Show {
        /// Bad pixel store
        store: PathBuf,

        /// Sensor configuration, to print rows and columns
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Detect {
            config,
            frames,
            prefix,
            min_frame,
            max_frame,
            pedestal,
            store,
            min_frequency,
            report,
            replace,
            sequential,
        } => {
            if min_frame > max_frame {
                return Err(CliError::InvalidArgument(format!(
                    "min frame {} is after max frame {}",
                    min_frame, max_frame
                )));
            }

            let sensor = SensorConfig::from_file(&config)?;
            let location = frames.to_str().ok_or_else(|| {
                CliError::InvalidArgument(format!("non UTF-8 path: {}", frames.display()))
            })?;
            let params = AcquisitionParams::new(min_frame, max_frame, location);
            let source = RawFrameDirectory::new().with_prefix(prefix);
            let pedestal = RawPedestalFile::new(&pedestal);
            let detection = DetectionConfig {
                parallel: !sequential,
                min_frequency,
            };

            let start = Instant::now();
            let outcome = detect(&source, &params, &pedestal, &sensor, &detection)?;
            let elapsed = start.elapsed();

            if let Some(report) = report {
                let mut writer = FrequencyReportWriter::create(&report)?;
                writer.write_csv(&outcome.frequencies, &sensor.geometry)?;
                log::info!("Frequency report written to {}", report.display());
            }

            let store = BadPixelStore::new(&store);
            let stored = if replace {
                store.save(outcome.bad_pixels.iter())?
            } else {
                store.append(outcome.bad_pixels.iter())?
            };

            let stats = outcome.frequencies.statistics();
            println!(
                "Scanned {} frames in {:.2}s",
                stats.frames_scanned,
                elapsed.as_secs_f64()
            );
            println!("Flagged pixels: {}", stats.flagged_pixels);
            println!("Max frequency: {}", stats.max_count);
            println!("Mean frequency: {:.2}", stats.mean_count);
            println!(
                "Bad pixels (frequency >= {}): {}",
                min_frequency,
                outcome.bad_pixels.len()
            );
            println!("Store {}: {} pixels", store.path().display(), stored);
        }

        Commands::Correct {
            config,
            store,
            input,
            output,
        } => {
            let sensor = SensorConfig::layout_from_file(&config)?;
            let bad_pixels = BadPixelStore::new(&store).load_set()?;
            let corrector = BadPixelCorrector::from_sensor(&sensor);
            std::fs::create_dir_all(&output)?;

            log::info!(
                "Correcting {} file(s) with {} bad pixels",
                input.len(),
                bad_pixels.len()
            );

            for path in &input {
                let mut frame = read_raw_frame(path)?;
                let summary = corrector.correct(&bad_pixels, &mut frame)?;

                let name = path.file_name().ok_or_else(|| {
                    CliError::InvalidArgument(format!("not a file: {}", path.display()))
                })?;
                let destination = output.join(name);
                write_raw_frame(&destination, &frame)?;

                println!(
                    "{}: {} corrected, {} without neighbors, {} outside grid",
                    destination.display(),
                    summary.corrected,
                    summary.without_neighbors,
                    summary.skipped
                );
            }
        }

        Commands::Show { store, config } => {
            let sensor = config.map(SensorConfig::layout_from_file).transpose()?;
            let pixels = BadPixelStore::new(&store).load()?;

            println!("File: {}", store.display());
            println!("Bad pixels: {}", pixels.len());
            for pixel in pixels {
                match &sensor {
                    Some(sensor) => {
                        let coord = sensor.geometry.coord(pixel);
                        println!("{} (row {}, column {})", pixel, coord.row, coord.column);
                    }
                    None => println!("{}", pixel),
                }
            }
        }
    }

    Ok(())
}
