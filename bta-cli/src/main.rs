//! Bow Telemetry Analyzer (bta) - Main entry point
//!
//! Scans a folder of recording logs, runs the shot detectors over each one
//! and writes a JSON report.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use bta_cli::batch::{BatchProcessor, TrimExport};
use bta_cli::config::{load_toml_config, Overrides, Settings};
use bta_cli::scanner::find_recordings;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for bta
#[derive(Parser, Debug)]
#[command(name = "bta")]
#[command(about = "Shot detection over bow-mounted sensor recordings")]
#[command(version)]
struct Args {
    /// Folder containing recording logs
    #[arg(env = "BTA_INPUT_DIR")]
    input_dir: Option<PathBuf>,

    /// Path to TOML config file
    #[arg(short, long, env = "BTA_CONFIG")]
    config: Option<PathBuf>,

    /// Scan subfolders
    #[arg(short, long)]
    recursive: bool,

    /// Write the JSON report here instead of stdout
    #[arg(short = 'o', long, env = "BTA_REPORT")]
    report: Option<PathBuf>,

    /// Write trimmed copies of each recording into this folder
    #[arg(long, env = "BTA_TRIM_DIR")]
    trim_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "BTA_LOG_LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref())
        .context("Failed to load configuration")?;
    let settings = Settings::resolve(
        Overrides {
            input_dir: args.input_dir,
            recursive: args.recursive,
            report: args.report,
            trim_dir: args.trim_dir,
            log_level: args.log_level,
        },
        toml_config,
    );

    // Initialize tracing (stdout may carry the report)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "bta_cli={level},bta_common={level}",
                    level = settings.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting bta v{}", env!("CARGO_PKG_VERSION"));
    info!("Input folder: {}", settings.input_dir.display());

    let files = find_recordings(&settings.input_dir, settings.recursive)
        .context("Failed to scan input folder")?;
    info!("Found {} recording(s)", files.len());

    let mut processor = BatchProcessor::new(settings.analysis.clone());
    if let Some(dir) = &settings.trim_dir {
        info!("Trimmed copies: {}", dir.display());
        processor = processor.with_trim_export(TrimExport {
            dir: dir.clone(),
            radius: settings.trim_radius,
        });
    }

    let report = processor.process(&files);

    match &settings.report {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report {}", path.display()))?;
            report.write_json(BufWriter::new(file))?;
            info!("Report written to {}", path.display());
        }
        None => report.write_json(io::stdout().lock())?,
    }

    for count in &report.confidence_counts {
        info!(confidence = %count.confidence, count = count.count, "Shot confidence");
    }
    if !report.failures.is_empty() {
        info!("{} file(s) could not be analysed", report.failures.len());
    }

    Ok(())
}
