//! Core types for the drift-gen framework.
//!
//! This crate provides the foundational types shared by the generator and the
//! output layer:
//!
//! - [`DataType`], [`DistributionFlags`], [`TransitionFlags`] - per-column rules
//! - [`ColumnSpec`], [`DriftConfig`] - run configuration loaded from YAML or JSON
//! - [`FieldValue`], [`Record`] - generated cells and rows
//!
//! # Architecture
//!
//! ```text
//! drift-core (this crate)
//!    │
//!    ├─── drift-generator   (ColumnSpace + Timeline, depends on drift-core)
//!    │
//!    └─── drift-populate    (CSV / JSON / JSONL writers over the timeline)
//! ```
//!
//! # Example
//!
//! ```rust
//! use drift_core::DriftConfig;
//!
//! let config = DriftConfig::from_yaml(r#"
//! num_days: 3
//! columns:
//!   - name: id
//!     data_type: integer
//!     distribution: increment
//! "#).unwrap();
//!
//! assert_eq!(config.column_names(), vec!["id"]);
//! ```

pub mod config;
pub mod types;
pub mod values;

// Re-exports for convenience
pub use config::{default_columns, ColumnSpec, ConfigError, DriftConfig, EffectRates};
pub use types::{DataType, Distribution, DistributionFlags, TransitionFlags};
pub use values::{FieldValue, Record, RecordBuilder};
