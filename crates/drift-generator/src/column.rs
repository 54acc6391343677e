//! Per-column generation with progress-gated transitions.

use crate::error::GenerationError;
use crate::generators::{
    sample_numeric, sample_string, stream_seed, BaseRule, CategoryPool, StringStrategy,
    GROWN_TEXT_WORDS, LONG_TEXT_WORDS,
};
use crate::metrics::ColumnMetrics;
use crate::transition::{apply_value_effects, EffectContext, TransitionEffect};
use drift_core::{ColumnSpec, ConfigError, EffectRates, FieldValue, TransitionFlags};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

/// Position of a row in the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowContext {
    /// Day index
    pub day: u32,
    /// Row index within the day
    pub row: u64,
    /// Rows generated for this day
    pub rows_in_day: u64,
    /// Days in the timeline
    pub num_days: u32,
}

impl RowContext {
    /// Fraction of the whole timeline elapsed at this row.
    ///
    /// `(day + row / rows_in_day) / num_days`, continuous across day
    /// boundaries and always in `[0, 1)` for valid coordinates.
    pub fn progress(&self) -> f64 {
        let within_day = if self.rows_in_day == 0 {
            0.0
        } else {
            self.row as f64 / self.rows_in_day as f64
        };
        (self.day as f64 + within_day) / self.num_days.max(1) as f64
    }
}

/// Mutable INCREMENT state of one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationState {
    next: u64,
}

impl GenerationState {
    /// Value the next invocation will use.
    pub fn peek(&self) -> u64 {
        self.next
    }

    fn advance(&mut self) -> u64 {
        let current = self.next;
        self.next = self.next.saturating_add(1);
        current
    }
}

/// Generates the values of a single column.
///
/// Each column owns its random streams: the category pool is drawn from a
/// column-level stream at construction, and values come from a stream per
/// `(column, day)`. A day can therefore be regenerated in isolation.
pub struct ColumnSpace {
    index: usize,
    spec: ColumnSpec,
    rule: BaseRule,
    pool: CategoryPool,
    pre_key: String,
    post_key: String,
    rates: EffectRates,
    seed: u64,
    rng: StdRng,
    state: GenerationState,
    metrics: ColumnMetrics,
}

impl ColumnSpace {
    /// Build the column at position `index` of the configuration.
    pub fn new(
        index: usize,
        spec: ColumnSpec,
        seed: u64,
        rates: EffectRates,
    ) -> Result<Self, ConfigError> {
        spec.validate()?;
        let rule = BaseRule::resolve(&spec.name, spec.data_type, spec.distribution.resolve())?;
        let pool = CategoryPool::draw(&mut StdRng::seed_from_u64(stream_seed(
            seed,
            pool_stream(index),
            0,
        )));

        debug!(
            "Column '{}' ({}): rule {:?}, transition {} at {}",
            spec.name, spec.data_type, rule, spec.transition_type, spec.transition_percentage
        );

        Ok(Self {
            index,
            pre_key: spec.pre_name().to_string(),
            post_key: spec.post_name(),
            rng: StdRng::seed_from_u64(stream_seed(seed, day_stream(index), 0)),
            spec,
            rule,
            pool,
            rates,
            seed,
            state: GenerationState::default(),
            metrics: ColumnMetrics::default(),
        })
    }

    /// Column definition.
    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    /// Resolved base rule.
    pub fn rule(&self) -> &BaseRule {
        &self.rule
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn metrics(&self) -> &ColumnMetrics {
        &self.metrics
    }

    pub(crate) fn restore_metrics(&mut self, metrics: ColumnMetrics) {
        self.metrics = metrics;
    }

    /// Whether the transition point has been reached at `progress`.
    pub fn is_active(&self, progress: f64) -> bool {
        progress >= self.spec.transition_percentage
    }

    /// Whether `flag` is set on this column and active at `progress`.
    pub fn has_transition(&self, progress: f64, flag: TransitionFlags) -> bool {
        self.is_active(progress) && self.spec.transition_type.contains(flag)
    }

    /// Field key at `progress`, honoring SCHEMA_NAME.
    pub fn field_name(&self, progress: f64) -> &str {
        if self.has_transition(progress, TransitionFlags::SCHEMA_NAME) {
            &self.post_key
        } else {
            &self.pre_key
        }
    }

    /// Switch the value stream to `day`. The INCREMENT counter is untouched.
    pub fn begin_day(&mut self, day: u32) {
        self.rng = StdRng::seed_from_u64(stream_seed(self.seed, day_stream(self.index), day as u64));
    }

    /// Position the column at the first row of `day`, whose global row index
    /// is `global_index`. Produces the same state a sequential run has there.
    pub fn resume_at(&mut self, day: u32, global_index: u64) {
        self.begin_day(day);
        self.state.next = global_index;
    }

    /// Generate the value of this column for one row.
    pub fn generate_value(
        &mut self,
        progress: f64,
        row: &RowContext,
    ) -> Result<FieldValue, GenerationError> {
        let active = self.is_active(progress);
        let counter = self.state.advance();
        let base = self.sample_base(progress, counter)?;

        let ctx = EffectContext {
            active,
            flags: self.spec.transition_type,
            data_type: self.spec.data_type,
            rates: &self.rates,
        };
        let outcome = apply_value_effects(base, &ctx, &mut self.rng).map_err(|source| {
            GenerationError::Effect {
                column: self.spec.name.clone(),
                day: row.day,
                row: row.row,
                source,
            }
        })?;

        self.metrics.values_generated += 1;
        if active && self.spec.has_transitions() {
            if self.metrics.first_active_day.is_none() {
                debug!(
                    "Column '{}' transitioned at day {} row {} (progress {:.4})",
                    self.spec.name, row.day, row.row, progress
                );
                self.metrics.first_active_day = Some(row.day);
            }
            self.metrics.activated_rows += 1;
        }
        match outcome.short_circuit {
            Some(TransitionEffect::NullsHigh) => self.metrics.nulls += 1,
            Some(TransitionEffect::ZerosHigh) => self.metrics.zeros += 1,
            _ => {}
        }
        if outcome.stringified {
            self.metrics.stringified += 1;
        }

        Ok(outcome.value)
    }

    fn sample_base(&mut self, progress: f64, counter: u64) -> Result<FieldValue, GenerationError> {
        Ok(match &self.rule {
            BaseRule::Integer(rule) | BaseRule::Float(rule) => {
                let counter = if self.rule.uses_counter() {
                    i64::try_from(counter).map_err(|_| GenerationError::CounterOverflow {
                        column: self.spec.name.clone(),
                        counter,
                    })?
                } else {
                    0
                };
                let integer = matches!(self.rule, BaseRule::Integer(_));
                sample_numeric(rule, integer, counter, &mut self.rng)
            }
            BaseRule::StringLong => {
                let strategy =
                    if self.has_transition(progress, TransitionFlags::STRING_LONG_TO_SMALL) {
                        StringStrategy::Category
                    } else {
                        StringStrategy::FreeText(LONG_TEXT_WORDS)
                    };
                sample_string(strategy, &self.pool, &mut self.rng)
            }
            BaseRule::StringCategory => {
                let strategy =
                    if self.has_transition(progress, TransitionFlags::STRING_SMALL_TO_LONG) {
                        StringStrategy::FreeText(GROWN_TEXT_WORDS)
                    } else {
                        StringStrategy::Category
                    };
                sample_string(strategy, &self.pool, &mut self.rng)
            }
        })
    }
}

fn day_stream(index: usize) -> u64 {
    (index as u64 + 1) << 1
}

fn pool_stream(index: usize) -> u64 {
    ((index as u64 + 1) << 1) | 1
}
