//! Writes a whole timeline to per-day files.

use crate::error::PopulateError;
use crate::format::OutputFormat;
use crate::profile::GenerationProfile;
use crate::writer::{writer_for, DayWriter};
use chrono::Utc;
use drift_core::DriftConfig;
use drift_generator::{produce, RunMetrics};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tracing::{debug, info, warn};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulateMetrics {
    /// Number of day files written.
    pub files_written: u32,
    /// Number of rows written.
    pub rows_written: u64,
    /// Total size of the day files in bytes.
    pub bytes_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent writing data.
    pub write_duration: Duration,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.bytes_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Generates a run and writes one file per day into an output directory.
pub struct Populator {
    config: DriftConfig,
    format: OutputFormat,
    output_dir: PathBuf,
    start_day: u32,
    backdate: bool,
    run_metrics: Option<RunMetrics>,
}

impl Populator {
    /// Create a new populator.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mut populator = Populator::new(config, OutputFormat::Csv, "out");
    /// let metrics = populator.populate()?;
    /// ```
    pub fn new(config: DriftConfig, format: OutputFormat, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            format,
            output_dir: output_dir.into(),
            start_day: 0,
            backdate: true,
            run_metrics: None,
        }
    }

    /// Skip the days before `day`. The written days are identical to those of
    /// a full run.
    pub fn with_start_day(mut self, day: u32) -> Self {
        self.start_day = day;
        self
    }

    /// Set whether day files get a modification time matching their day.
    pub fn with_backdate(mut self, backdate: bool) -> Self {
        self.backdate = backdate;
        self
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the file holding `day`.
    pub fn day_path(&self, day: u32) -> PathBuf {
        self.output_dir.join(self.format.file_name(day))
    }

    /// Generator metrics of the last `populate` call.
    pub fn run_metrics(&self) -> Option<&RunMetrics> {
        self.run_metrics.as_ref()
    }

    /// Generate every day and write it, then write the generation profile.
    pub fn populate(&mut self) -> Result<PopulateMetrics, PopulateError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        let mut timeline = produce(&self.config)?.with_start_day(self.start_day);
        let writer = writer_for(self.format);

        std::fs::create_dir_all(&self.output_dir)?;
        info!(
            "Generating {} day files in '{}' from day {} (seed={})",
            self.format,
            self.output_dir.display(),
            self.start_day,
            self.config.seed
        );

        let mut generation_time = Duration::ZERO;
        let mut write_time = Duration::ZERO;

        loop {
            let gen_start = Instant::now();
            let Some(batch) = timeline.next() else {
                break;
            };
            let batch = batch?;
            generation_time += gen_start.elapsed();

            let write_start = Instant::now();
            let path = self.day_path(batch.day);
            let bytes = writer.write_day(&batch, &path)?;
            if self.backdate {
                backdate_file(&path, batch.day, self.config.num_days)?;
            }
            write_time += write_start.elapsed();

            metrics.files_written += 1;
            metrics.rows_written += batch.len() as u64;
            metrics.bytes_written += bytes;

            info!(
                "Wrote day {} to '{}': {} rows, {} bytes",
                batch.day,
                path.display(),
                batch.len(),
                bytes
            );
        }

        metrics.total_duration = start_time.elapsed();
        metrics.generation_duration = generation_time;
        metrics.write_duration = write_time;

        let run = timeline.metrics();
        let profile = GenerationProfile {
            generated_at: Utc::now(),
            format: self.format,
            start_day: self.start_day,
            config: self.config.clone(),
            run: run.clone(),
            populate: metrics.clone(),
        };
        let profile_path = profile.write_to(&self.output_dir)?;
        debug!("Wrote generation profile to '{}'", profile_path.display());
        self.run_metrics = Some(run);

        info!(
            "Generation complete: {} files, {} rows, {} bytes in {:?} ({:.2} rows/sec)",
            metrics.files_written,
            metrics.rows_written,
            metrics.bytes_written,
            metrics.total_duration,
            metrics.rows_per_second()
        );

        Ok(metrics)
    }
}

/// Set the modification time of a day file to `now - (num_days - day - 1)`
/// days, so the last day looks like it was written today.
fn backdate_file(path: &Path, day: u32, num_days: u32) -> Result<(), PopulateError> {
    let days_ago = num_days.saturating_sub(day + 1) as u64;
    let Some(mtime) = SystemTime::now().checked_sub(Duration::from_secs(days_ago * SECONDS_PER_DAY))
    else {
        warn!("Cannot backdate '{}' by {} days", path.display(), days_ago);
        return Ok(());
    };

    let file: File = OpenOptions::new().write(true).open(path)?;
    file.set_modified(mtime)?;
    Ok(())
}
