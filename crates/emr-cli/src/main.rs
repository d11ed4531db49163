use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use emr_pipeline::{run_pipeline, SurvivalPipelineConfig};

#[derive(Parser)]
#[command(name = "emr-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn an EMR event-record stream into a survival-analysis dataset
    Generate {
        /// Input records file (use '-' for stdin)
        #[arg(value_name = "FILE")]
        input: String,

        /// File listing exposure event types, one `tbl|typ` per line
        #[arg(long, value_name = "FILE")]
        exposures: PathBuf,

        /// File listing outcome event types, one `tbl|typ` per line
        #[arg(long, value_name = "FILE")]
        outcomes: PathBuf,

        /// Maximum gap, in days, for two same-family events to merge into one era
        #[arg(long, value_name = "DAYS", default_value_t = 0)]
        era_max_gap: i64,

        /// Drop events before this age (in years) at the patient's date of birth
        #[arg(long, value_name = "YEARS")]
        min_age: Option<f64>,

        /// Drop events after this age (in years) at the patient's date of birth
        #[arg(long, value_name = "YEARS")]
        max_age: Option<f64>,

        /// Drop the original event when it maps to an exposure/outcome type,
        /// instead of keeping it alongside the synthetic one
        #[arg(long)]
        replace_mapped_events: bool,

        /// Field delimiter used by both the input and output files
        #[arg(long, default_value = "|")]
        delimiter: char,

        /// Comment-line prefix for the input and the type files
        #[arg(long, default_value = "#")]
        comment_prefix: char,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            exposures,
            outcomes,
            era_max_gap,
            min_age,
            max_age,
            replace_mapped_events,
            delimiter,
            comment_prefix,
        } => generate_command(
            &input,
            &exposures,
            &outcomes,
            era_max_gap,
            min_age,
            max_age,
            replace_mapped_events,
            delimiter,
            comment_prefix,
        ),
    }
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>> {
    if path == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let file = File::open(path).with_context(|| format!("failed to open input file: {path}"))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

#[allow(clippy::too_many_arguments)]
fn generate_command(
    input: &str,
    exposures: &PathBuf,
    outcomes: &PathBuf,
    era_max_gap: i64,
    min_age: Option<f64>,
    max_age: Option<f64>,
    replace_mapped_events: bool,
    delimiter: char,
    comment_prefix: char,
) -> Result<()> {
    let reader = open_input(input)?;

    let mut builder = SurvivalPipelineConfig::builder()
        .delimiter(delimiter)
        .comment_prefix(comment_prefix)
        .era_max_gap_days(era_max_gap)
        .replace_mapped_events(replace_mapped_events)
        .exposures_file(exposures)
        .with_context(|| format!("failed to read exposures file: {}", exposures.display()))?
        .outcomes_file(outcomes)
        .with_context(|| format!("failed to read outcomes file: {}", outcomes.display()))?;
    if let Some(age) = min_age {
        builder = builder.min_age(age);
    }
    if let Some(age) = max_age {
        builder = builder.max_age(age);
    }
    let config = builder.build();

    let stdout = io::stdout();
    let stats = run_pipeline(reader, &config, stdout.lock())
        .with_context(|| "pipeline run failed")?;

    eprintln!(
        "{} {} sequences read, {} skipped, {} rows written",
        "done:".green().bold(),
        stats.sequences_read,
        stats.sequences_skipped,
        stats.rows_written
    );
    Ok(())
}
