//! CLI argument definitions for the populate commands.

use crate::format::OutputFormat;
use clap::Args;
use drift_core::{ConfigError, DriftConfig};
use std::path::PathBuf;

/// Arguments of `drift-gen generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to a run configuration, `.yaml`/`.yml` or `.json` (default column layout when omitted)
    #[arg(long, short = 'c', env = "DRIFT_GEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory for the day files
    #[arg(long, short = 'o', env = "DRIFT_GEN_OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Output file format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Random seed (same seed and configuration = same data)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of days to generate
    #[arg(long)]
    pub num_days: Option<u32>,

    /// Approximate number of rows per day
    #[arg(long)]
    pub rows_per_day: Option<u64>,

    /// First day to write; earlier days are skipped but the written days match a full run
    #[arg(long, default_value = "0")]
    pub start_day: u32,

    /// Keep the current time as modification time of the day files
    #[arg(long)]
    pub no_backdate: bool,

    /// Validate the configuration and print the row plan without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Load the configuration and apply the command-line overrides.
    pub fn load_config(&self) -> Result<DriftConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => DriftConfig::from_file(path)?,
            None => DriftConfig::with_default_columns(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(num_days) = self.num_days {
            config.num_days = num_days;
        }
        if let Some(rows) = self.rows_per_day {
            config.approx_rows_per_day = rows;
        }
        config.validate()?;

        if self.start_day >= config.num_days {
            return Err(ConfigError::InvalidParameter {
                parameter: "start_day",
                reason: format!(
                    "must be below num_days ({}), got {}",
                    config.num_days, self.start_day
                ),
            });
        }
        Ok(config)
    }
}

/// Arguments of `drift-gen validate`.
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Directory holding the day files
    #[arg(long, short = 'o')]
    pub output_dir: PathBuf,

    /// Format of the day files
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Number of days the directory should hold
    #[arg(long)]
    pub num_days: u32,
}
