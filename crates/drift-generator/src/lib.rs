//! Column transition engine for drift-gen.
//!
//! This crate turns a [`DriftConfig`](drift_core::DriftConfig) into a lazy,
//! deterministic sequence of day batches whose values and schema drift at
//! configured points of the timeline.
//!
//! # Architecture
//!
//! ```text
//! DriftConfig (YAML)
//!        │
//!        ▼
//! ┌───────────────────────┐
//! │       Timeline        │
//! │                       │
//! │  - RowPlan            │
//! │  - ColumnSpace x N    │──▶ BaseRule ──▶ VALUE_EFFECT_ORDER
//! └──────────┬────────────┘
//!            │
//!            ▼
//!    DayBatch { day, records }
//! ```
//!
//! # Example
//!
//! ```rust
//! use drift_core::DriftConfig;
//!
//! let config = DriftConfig::from_yaml(r#"
//! seed: 42
//! num_days: 4
//! approx_rows_per_day: 10
//! columns:
//!   - name: id
//!     data_type: integer
//!     distribution: [increment]
//!   - name: score
//!     data_type: float
//!     distribution: [normal]
//!     transition_percentage: 0.5
//!     transition_type: [values_scale, nulls_high]
//! "#).unwrap();
//!
//! for batch in drift_generator::produce(&config).unwrap() {
//!     let batch = batch.unwrap();
//!     println!("day {}: {} rows", batch.day, batch.len());
//! }
//! ```

pub mod column;
pub mod error;
pub mod generators;
pub mod metrics;
pub mod timeline;
pub mod transition;

pub use column::{ColumnSpace, GenerationState, RowContext};
pub use error::GenerationError;
pub use metrics::{ColumnMetrics, ColumnReport, RunMetrics};
pub use timeline::{produce, DayBatch, RowPlan, Timeline};
pub use transition::{
    EffectFailure, TransitionEffect, ALL_STRINGS_PREFIX, SOME_STRINGS_PREFIX,
    SOME_STRINGS_PROBABILITY, VALUES_SCALE_FACTOR, VALUE_EFFECT_ORDER,
};
