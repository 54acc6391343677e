//! Generation profile written next to the day files.

use crate::error::PopulateError;
use crate::format::OutputFormat;
use crate::populator::PopulateMetrics;
use chrono::{DateTime, Utc};
use drift_core::DriftConfig;
use drift_generator::RunMetrics;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the profile inside the output directory.
pub const PROFILE_FILE_NAME: &str = "generation_profile.json";

/// Everything needed to understand or reproduce a generated dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationProfile {
    pub generated_at: DateTime<Utc>,
    pub format: OutputFormat,
    /// First day written by this run
    pub start_day: u32,
    pub config: DriftConfig,
    pub run: RunMetrics,
    pub populate: PopulateMetrics,
}

impl GenerationProfile {
    /// Write the profile into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, PopulateError> {
        let path = dir.join(PROFILE_FILE_NAME);
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(path)
    }

    /// Read the profile stored in `dir`.
    pub fn read_from(dir: &Path) -> Result<Self, PopulateError> {
        let file = File::open(dir.join(PROFILE_FILE_NAME))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
