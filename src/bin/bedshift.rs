// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! bedshift CLI
//!
//! Command-line interface for perturbing the regions of a BED file.

use clap::Parser;
use ferro_bedshift::cli::{
    default_output_path, replicate_output_path, validate_request, write_summary, OutputFormat,
    ReplicateSummary,
};
use ferro_bedshift::config::{BedshiftConfig, Defaults, Settings};
use ferro_bedshift::pipeline::run_all;
use ferro_bedshift::{AddSpec, Bedshift, BedshiftError, DropSpec, PerturbConfig, ShiftSpec, Workflow};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bedshift")]
#[command(author, version, about = "Perturb the regions of a BED file")]
#[command(
    long_about = "Perturb the regions of a BED file by shifting, adding, cutting, merging \
and dropping them. Stages run in that order.

Examples:
  bedshift -b peaks.bed -d 0.3
  bedshift -b peaks.bed -l hg38.chrom.sizes -s 0.2 -a 0.1 --seed 42
  bedshift -b peaks.bed -l hg38.chrom.sizes -r 10 -o out/shifted.bed -c 0.1
  bedshift -b peaks.bed -l hg38.chrom.sizes -w workflow.toml"
)]
struct Cli {
    /// BED file to perturb (may be gzipped)
    #[arg(short, long)]
    bedfile: PathBuf,

    /// Chromosome sizes file (name and length per line), required by add and shift
    #[arg(short = 'l', long)]
    chrom_lengths: Option<PathBuf>,

    /// Proportion of regions to add (may exceed 1)
    #[arg(short, long, default_value_t = 0.0)]
    addrate: f64,

    /// Mean length of added regions [default: 320]
    #[arg(long)]
    addmean: Option<f64>,

    /// Standard deviation of added region lengths [default: 30]
    #[arg(long)]
    addstdev: Option<f64>,

    /// BED file of regions to sample added regions from
    #[arg(long)]
    addfile: Option<PathBuf>,

    /// Proportion of regions to shift
    #[arg(short, long, default_value_t = 0.0)]
    shiftrate: f64,

    /// Mean shift distance [default: 0]
    #[arg(long)]
    shiftmean: Option<f64>,

    /// Standard deviation of shift distances [default: 150]
    #[arg(long)]
    shiftstdev: Option<f64>,

    /// Only shift regions overlapping this BED file
    #[arg(long)]
    shiftfile: Option<PathBuf>,

    /// Proportion of regions to cut in two
    #[arg(short, long, default_value_t = 0.0)]
    cutrate: f64,

    /// Proportion of regions to merge with their neighbour
    #[arg(short, long, default_value_t = 0.0)]
    mergerate: f64,

    /// Proportion of regions to drop
    #[arg(short, long, default_value_t = 0.0)]
    droprate: f64,

    /// Only drop regions overlapping this BED file
    #[arg(long)]
    dropfile: Option<PathBuf>,

    /// Output BED file [default: bedshifted_<bedfile name>]
    #[arg(short, long)]
    outputfile: Option<PathBuf>,

    /// Number of replicates; each is written to rep<i>_<output name>
    #[arg(short, long, default_value_t = 1)]
    repeat: usize,

    /// TOML workflow file; replaces the fixed shift/add/cut/merge/drop order
    #[arg(short, long)]
    workflow: Option<PathBuf>,

    /// Random seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Column delimiter of input BED files (tab, comma, space or a single character)
    #[arg(long)]
    delimiter: Option<String>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,

    /// Summary format (text or json)
    #[arg(long, default_value = "text")]
    summary: OutputFormat,
}

impl Cli {
    fn overrides(&self) -> Defaults {
        Defaults {
            seed: self.seed,
            delimiter: self.delimiter.clone(),
            add_mean: self.addmean,
            add_stdev: self.addstdev,
            shift_mean: self.shiftmean,
            shift_stdev: self.shiftstdev,
        }
    }

    fn perturb_config(&self, settings: &Settings) -> PerturbConfig {
        let shift = match &self.shiftfile {
            Some(path) => ShiftSpec::FromFile {
                path: path.clone(),
                rate: self.shiftrate,
                mean: settings.shift_mean,
                stdev: settings.shift_stdev,
            },
            None => ShiftSpec::Parametric {
                rate: self.shiftrate,
                mean: settings.shift_mean,
                stdev: settings.shift_stdev,
            },
        };
        let add = match &self.addfile {
            Some(path) => AddSpec::FromFile {
                path: path.clone(),
                rate: self.addrate,
            },
            None => AddSpec::Parametric {
                rate: self.addrate,
                mean: settings.add_mean,
                stdev: settings.add_stdev,
            },
        };
        let drop = match &self.dropfile {
            Some(path) => DropSpec::FromFile {
                path: path.clone(),
                rate: self.droprate,
            },
            None => DropSpec::Parametric {
                rate: self.droprate,
            },
        };
        PerturbConfig {
            shift,
            add,
            cut_rate: self.cutrate,
            merge_rate: self.mergerate,
            drop,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    if let Err(e) = init_tracing(level) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.detailed_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), BedshiftError> {
    let settings = BedshiftConfig::load()
        .unwrap_or_default()
        .merge_with_cli(&cli.overrides())?;
    let perturb = cli.perturb_config(&settings);

    let workflow = match &cli.workflow {
        Some(path) => {
            if has_any_rate(&perturb) {
                warn!("--workflow given; ignoring the rate options");
            }
            validate_request(&PerturbConfig::default(), cli.repeat, true)?;
            Some(Workflow::from_file(path)?)
        }
        None => {
            validate_request(&perturb, cli.repeat, cli.chrom_lengths.is_some())?;
            None
        }
    };

    let mut bedshift = Bedshift::from_files(
        &cli.bedfile,
        cli.chrom_lengths.as_deref(),
        settings.delimiter,
        settings.seed,
    )?;
    info!(
        regions = bedshift.original_len(),
        "Loaded {}",
        cli.bedfile.display()
    );

    let output = cli
        .outputfile
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.bedfile));

    let progress = (cli.repeat > 1).then(|| {
        let pb = ProgressBar::new(cli.repeat as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        pb
    });

    let stdout = io::stdout();
    for replicate in 1..=cli.repeat {
        if replicate > 1 {
            bedshift.reset();
        }

        let (changed, pipeline, workflow_report) = match &workflow {
            Some(workflow) => {
                let report = workflow.run(&mut bedshift)?;
                (report.total, None, Some(report))
            }
            None => {
                let report = run_all(&mut bedshift, &perturb)?;
                (report.total(), Some(report), None)
            }
        };

        let path = if cli.repeat > 1 {
            replicate_output_path(&output, replicate)
        } else {
            output.clone()
        };
        bedshift.write_bed(&path)?;

        let summary = ReplicateSummary {
            replicate,
            changed,
            output: path,
            regions: bedshift.len(),
            original_regions: bedshift.original_len(),
            pipeline,
            workflow: workflow_report,
        };
        let mut handle = stdout.lock();
        write_summary(&mut handle, &summary, cli.summary)?;
        handle.flush()?;

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }
    Ok(())
}

fn has_any_rate(config: &PerturbConfig) -> bool {
    config.shift.rate() > 0.0
        || config.add.rate() > 0.0
        || config.cut_rate > 0.0
        || config.merge_rate > 0.0
        || config.drop.rate() > 0.0
}

fn init_tracing(level: &str) -> Result<(), BedshiftError> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| BedshiftError::Config {
            msg: format!("Invalid log level '{}': {}", level, e),
        })?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}
