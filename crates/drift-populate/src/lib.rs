//! Per-day file output for drift-gen.
//!
//! This crate drives a [`Timeline`](drift_generator::Timeline) and writes
//! every day batch to its own file (`{day}.csv`, `{day}.json` or
//! `{day}.jsonl`), followed by a `generation_profile.json` that records the
//! configuration and the metrics of the run.
//!
//! # Example
//!
//! ```ignore
//! use drift_core::DriftConfig;
//! use drift_populate::{OutputFormat, Populator};
//!
//! let config = DriftConfig::from_file("drift.yaml")?;
//! let mut populator = Populator::new(config, OutputFormat::Csv, "out");
//! let metrics = populator.populate()?;
//! ```

pub mod args;
mod error;
mod format;
mod populator;
mod profile;
mod validate;
pub mod writer;

pub use args::{GenerateArgs, ValidateArgs};
pub use error::PopulateError;
pub use format::OutputFormat;
pub use populator::{PopulateMetrics, Populator};
pub use profile::{GenerationProfile, PROFILE_FILE_NAME};
pub use validate::validate_output;
pub use writer::{writer_for, CsvDayWriter, DayWriter, JsonDayWriter, JsonlDayWriter};
