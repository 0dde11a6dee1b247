use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Args, Parser, Subcommand};
use gre_table_to_csv::{
    PipelineReport, ReportLayout, convert_grids_to_csv, load_grids, load_layout,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "gre2csv",
    version,
    about = "Normalize extracted score-report tables into one CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the normalized table with grand total and reference rows.
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    /// Extracted page grids as JSON: [[[cell, ...], ...], ...].
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: PathBuf,

    /// Layout overrides as JSON; omitted fields use the built-in report layout.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print every warning, not just the count.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    generated_at: String,
    input: &'a Path,
    output: &'a Path,
    #[serde(flatten)]
    report: &'a PipelineReport,
}

fn log_report(report: &PipelineReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} category={:?} dimension={:?}: {}",
                warning.code, warning.category, warning.dimension, warning.message
            );
        }
    }
}

fn write_summary(path: &Path, args: &ConvertArgs, report: &PipelineReport) -> Result<()> {
    let summary = RunSummary {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        input: &args.input,
        output: &args.output,
        report,
    };
    let mut data = serde_json::to_vec_pretty(&summary).context("failed to serialize run summary")?;
    data.push(b'\n');
    std::fs::write(path, data)
        .with_context(|| format!("failed to write run summary '{}'", path.display()))
}

fn run_convert(args: &ConvertArgs) -> Result<PipelineReport> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let layout = match &args.layout {
        Some(path) => load_layout(path)
            .with_context(|| format!("failed to load layout '{}'", path.display()))?,
        None => ReportLayout::default(),
    };
    let pages = load_grids(&args.input)
        .with_context(|| format!("failed to load page grids '{}'", args.input.display()))?;

    let report = convert_grids_to_csv(&pages, &args.output, &layout, args.delimiter as u8)
        .with_context(|| format!("failed to convert '{}'", args.input.display()))?;

    if let Some(path) = &args.report {
        write_summary(path, args, &report)?;
    }
    Ok(report)
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gre_table_to_csv=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => match run_convert(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
