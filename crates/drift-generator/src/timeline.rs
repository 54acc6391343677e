//! Day-by-day orchestration of all columns.
//!
//! A [`Timeline`] walks the days of a run and yields one [`DayBatch`] per day.
//! Row counts come from a [`RowPlan`] drawn up front, so the global index of
//! every row (and with it every INCREMENT value) is known before generation
//! starts. Together with the per-day column streams this makes each day
//! reproducible on its own, see [`Timeline::with_start_day`].

use crate::column::{ColumnSpace, RowContext};
use crate::error::GenerationError;
use crate::generators::stream_seed;
use crate::metrics::{ColumnMetrics, ColumnReport, RunMetrics};
use drift_core::{ConfigError, DriftConfig, Record};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error, info};

const PLAN_STREAM: u64 = 0;

// ============================================================================
// Row Plan
// ============================================================================

/// Realized row count of every day, with the global offset of each day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPlan {
    rows: Vec<u64>,
    offsets: Vec<u64>,
}

impl RowPlan {
    /// Draw the plan of a run from its own seeded stream.
    ///
    /// Each day gets `floor(approx * (1 + (u - 0.5) * 2 * variation))` rows,
    /// shrunk by the reduction factor with the reduction probability, and
    /// never fewer than one.
    pub fn draw(config: &DriftConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(stream_seed(config.seed, PLAN_STREAM, 0));
        let approx = config.approx_rows_per_day as f64;

        let rows = (0..config.num_days)
            .map(|day| {
                let u: f64 = rng.random();
                let mut rows = (approx * (1.0 + (u - 0.5) * 2.0 * config.row_variation_percentage))
                    .floor();
                let probability = config.random_day_reduction_probability;
                if probability > 0.0 && rng.random_bool(probability) {
                    rows = (rows * config.random_day_reduction_factor).floor();
                    debug!("Day {} reduced to {} rows", day, rows);
                }
                (rows as u64).max(1)
            })
            .collect();

        Self::from_rows(rows)
    }

    /// Build a plan from explicit per-day row counts.
    pub fn from_rows(rows: Vec<u64>) -> Self {
        let offsets = rows
            .iter()
            .scan(0u64, |next, &count| {
                let offset = *next;
                *next += count;
                Some(offset)
            })
            .collect();
        Self { rows, offsets }
    }

    /// Rows of `day`, zero if the day is outside the plan.
    pub fn rows_for_day(&self, day: u32) -> u64 {
        self.rows.get(day as usize).copied().unwrap_or(0)
    }

    /// Global index of the first row of `day`.
    pub fn offset(&self, day: u32) -> u64 {
        self.offsets
            .get(day as usize)
            .copied()
            .unwrap_or_else(|| self.total_rows())
    }

    pub fn total_rows(&self) -> u64 {
        self.rows.iter().sum()
    }

    pub fn num_days(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Plan as a `day -> rows` map.
    pub fn as_map(&self) -> BTreeMap<u32, u64> {
        self.rows
            .iter()
            .enumerate()
            .map(|(day, &rows)| (day as u32, rows))
            .collect()
    }
}

// ============================================================================
// Day Batch
// ============================================================================

/// All records of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBatch {
    pub day: u32,
    pub records: Vec<Record>,
}

impl DayBatch {
    /// Ordered union of the field keys of every record.
    ///
    /// A SCHEMA_NAME switch can happen mid-day, in which case both the old and
    /// the new key appear, the old one first.
    pub fn field_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for record in &self.records {
            for key in record.keys() {
                if seen.insert(key) {
                    names.push(key.to_string());
                }
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// Timeline
// ============================================================================

/// Build the timeline of a run.
pub fn produce(config: &DriftConfig) -> Result<Timeline, ConfigError> {
    Timeline::new(config)
}

/// Lazy, deterministic sequence of day batches.
pub struct Timeline {
    num_days: u32,
    plan: RowPlan,
    columns: Vec<ColumnSpace>,
    next_day: u32,
    failed: bool,
    rows_per_day: BTreeMap<u32, u64>,
    total_rows: u64,
}

impl Timeline {
    /// Validate `config` and prepare every column.
    pub fn new(config: &DriftConfig) -> Result<Self, ConfigError> {
        let plan = RowPlan::draw(config);
        Self::with_plan(config, plan)
    }

    /// Like [`Timeline::new`] with an explicit row plan.
    pub fn with_plan(config: &DriftConfig, plan: RowPlan) -> Result<Self, ConfigError> {
        config.validate()?;
        if plan.num_days() != config.num_days {
            return Err(ConfigError::InvalidParameter {
                parameter: "num_days",
                reason: format!(
                    "row plan covers {} days, configuration has {}",
                    plan.num_days(),
                    config.num_days
                ),
            });
        }

        let columns = config
            .columns
            .iter()
            .enumerate()
            .map(|(index, spec)| ColumnSpace::new(index, spec.clone(), config.seed, config.rates))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Timeline: {} days, {} columns, {} rows planned (seed {})",
            config.num_days,
            columns.len(),
            plan.total_rows(),
            config.seed
        );

        Ok(Self {
            num_days: config.num_days,
            plan,
            columns,
            next_day: 0,
            failed: false,
            rows_per_day: BTreeMap::new(),
            total_rows: 0,
        })
    }

    /// Start iterating at `day`. The batches are identical to those a full
    /// run yields from that day on.
    pub fn with_start_day(mut self, day: u32) -> Self {
        self.next_day = day.min(self.num_days);
        if day > 0 {
            debug!("Starting at day {} (row offset {})", day, self.plan.offset(day));
        }
        self
    }

    pub fn plan(&self) -> &RowPlan {
        &self.plan
    }

    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    /// Generate `day` regardless of the iteration position.
    ///
    /// A day that was already generated comes out identical and leaves the
    /// run metrics untouched.
    pub fn generate_day(&mut self, day: u32) -> Result<DayBatch, GenerationError> {
        if day >= self.num_days {
            return Err(GenerationError::DayOutOfRange {
                day,
                num_days: self.num_days,
            });
        }

        let recorded = self.rows_per_day.contains_key(&day);
        let snapshot: Option<Vec<ColumnMetrics>> = recorded.then(|| {
            self.columns
                .iter()
                .map(|column| column.metrics().clone())
                .collect()
        });

        let batch = self.build_day(day);

        if let Some(snapshot) = snapshot {
            debug!("Day {} regenerated, metrics unchanged", day);
            for (column, metrics) in self.columns.iter_mut().zip(snapshot) {
                column.restore_metrics(metrics);
            }
        }
        let batch = batch?;

        if !recorded {
            self.rows_per_day.insert(day, batch.len() as u64);
            self.total_rows += batch.len() as u64;
        }
        debug!("Day {}: {} rows", day, batch.len());

        Ok(batch)
    }

    fn build_day(&mut self, day: u32) -> Result<DayBatch, GenerationError> {
        let rows_in_day = self.plan.rows_for_day(day);
        let offset = self.plan.offset(day);
        for column in &mut self.columns {
            column.resume_at(day, offset);
        }

        let mut records = Vec::with_capacity(rows_in_day as usize);
        for row in 0..rows_in_day {
            let ctx = RowContext {
                day,
                row,
                rows_in_day,
                num_days: self.num_days,
            };
            let progress = ctx.progress();

            let mut builder = Record::builder(day, offset + row);
            for column in &mut self.columns {
                let key = column.field_name(progress).to_string();
                let value = column.generate_value(progress, &ctx)?;
                builder.push(key, value);
            }
            records.push(builder.build());
        }

        Ok(DayBatch { day, records })
    }

    /// Snapshot of the metrics gathered so far.
    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            total_rows: self.total_rows,
            total_columns: self.columns.len(),
            days_completed: self.rows_per_day.len() as u32,
            rows_per_day: self.rows_per_day.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| ColumnReport {
                    name: column.spec().name.clone(),
                    metrics: column.metrics().clone(),
                })
                .collect(),
        }
    }
}

impl Iterator for Timeline {
    type Item = Result<DayBatch, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_day >= self.num_days {
            return None;
        }

        let day = self.next_day;
        self.next_day += 1;
        match self.generate_day(day) {
            Ok(batch) => Some(Ok(batch)),
            Err(e) => {
                error!("Generation stopped at day {}: {}", day, e);
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
