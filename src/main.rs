//! Command-line interface for drift-gen
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Ten days of the default column layout as CSV
//! drift-gen generate -o out/
//!
//! # Custom configuration, JSONL, only the last two days
//! drift-gen generate --config drift.yaml -o out/ --format jsonl --start-day 8
//!
//! # Print the row plan without writing anything
//! drift-gen generate --config drift.yaml -o out/ --dry-run
//! ```
//!
//! ## Configuration
//! ```bash
//! # Print the default configuration as a starting point
//! drift-gen sample-config > drift.yaml
//! ```
//!
//! ## Validate
//! ```bash
//! drift-gen validate -o out/ --format csv --num-days 10
//! ```
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=info`.

mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use drift_core::DriftConfig;
use drift_generator::RowPlan;
use drift_populate::{validate_output, GenerateArgs, Populator, ValidateArgs};

#[derive(Parser)]
#[command(name = "drift-gen")]
#[command(about = "Generate multi-day synthetic datasets with deliberate value and schema drift")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one file per day into an output directory
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Print the default configuration as YAML
    SampleConfig,

    /// Check that an output directory holds every day file
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing on stderr, stdout carries YAML and summaries
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => run_generate(args),
        Commands::SampleConfig => {
            let yaml = DriftConfig::with_default_columns()
                .to_yaml()
                .context("Failed to render the default configuration")?;
            print!("{yaml}");
            Ok(())
        }
        Commands::Validate { args } => run_validate(args),
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = args.load_config().with_context(|| match &args.config {
        Some(path) => format!("Failed to load configuration from {path:?}"),
        None => "Invalid configuration".to_string(),
    })?;

    if args.dry_run {
        tracing::info!(
            "Dry run: {} columns, {} days, seed {}",
            config.columns.len(),
            config.num_days,
            config.seed
        );
        println!("{}", report::format_plan(&RowPlan::draw(&config)));
        return Ok(());
    }

    let mut populator = Populator::new(config, args.format, &args.output_dir)
        .with_start_day(args.start_day)
        .with_backdate(!args.no_backdate);
    let metrics = populator
        .populate()
        .with_context(|| format!("Failed to generate data into {:?}", args.output_dir))?;

    if let Some(run) = populator.run_metrics() {
        println!(
            "{}",
            report::format_summary(populator.config(), run, &metrics)
        );
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let issues = validate_output(&args.output_dir, args.format, args.num_days);
    if issues.is_empty() {
        println!(
            "{:?}: all {} day files present",
            args.output_dir, args.num_days
        );
        return Ok(());
    }

    for issue in &issues {
        println!("  {issue}");
    }
    anyhow::bail!(
        "{} of {} day files missing or empty in {:?}",
        issues.len(),
        args.num_days,
        args.output_dir
    )
}
