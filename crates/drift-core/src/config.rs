//! Run configuration for the drift generator.
//!
//! A `DriftConfig` holds the timeline parameters (days, rows per day, jitter,
//! seed) and the list of `ColumnSpec`s. It is loaded from YAML and validated
//! once; the generator never sees an invalid configuration.
//!
//! ```yaml
//! seed: 7
//! num_days: 10
//! approx_rows_per_day: 500
//! columns:
//!   - name: id
//!     data_type: integer
//!     distribution: [increment]
//!   - name: normal1
//!     data_type: float
//!     distribution: normal
//!     transition_percentage: 0.2
//!     transition_type: [schema_name]
//! ```

use crate::types::{DataType, DistributionFlags, TransitionFlags};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A run-level parameter is out of range
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },

    /// A column definition is invalid
    #[error("Invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// A flag mask carries bits without a meaning
    #[error("Column '{column}' has unknown {mask} bits {bits:#x}")]
    UnknownFlags {
        column: String,
        mask: &'static str,
        bits: u32,
    },

    /// Two columns could emit the same field key
    #[error("Field key '{key}' is used by both '{first}' and '{second}'")]
    DuplicateFieldKey {
        key: String,
        first: String,
        second: String,
    },
}

fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter,
        reason: reason.into(),
    }
}

// ============================================================================
// Column Definition
// ============================================================================

fn default_transition_percentage() -> f64 {
    0.5
}

/// Generation rule of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Column data type
    pub data_type: DataType,

    /// Base distribution bits
    #[serde(default, alias = "distribution_flags")]
    pub distribution: DistributionFlags,

    /// Progress in [0, 1) at which transition effects switch on
    #[serde(default = "default_transition_percentage")]
    pub transition_percentage: f64,

    /// Transition effect bits
    #[serde(default)]
    pub transition_type: TransitionFlags,

    /// Field key before a SCHEMA_NAME transition (defaults to `name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_transition_name: Option<String>,

    /// Field key after a SCHEMA_NAME transition (defaults to `new-{name}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_transition_name: Option<String>,
}

impl ColumnSpec {
    /// Create a column with no transition. The transition point is the same
    /// default a configuration file gets when it omits it.
    pub fn new(name: impl Into<String>, data_type: DataType, distribution: DistributionFlags) -> Self {
        Self {
            name: name.into(),
            data_type,
            distribution,
            transition_percentage: default_transition_percentage(),
            transition_type: TransitionFlags::empty(),
            pre_transition_name: None,
            post_transition_name: None,
        }
    }

    /// Set the transition point and effects.
    pub fn with_transition(mut self, percentage: f64, transition_type: TransitionFlags) -> Self {
        self.transition_percentage = percentage;
        self.transition_type = transition_type;
        self
    }

    /// Set explicit field keys for a SCHEMA_NAME transition.
    pub fn with_names(mut self, pre: impl Into<String>, post: impl Into<String>) -> Self {
        self.pre_transition_name = Some(pre.into());
        self.post_transition_name = Some(post.into());
        self
    }

    /// Field key used before the transition.
    pub fn pre_name(&self) -> &str {
        self.pre_transition_name.as_deref().unwrap_or(&self.name)
    }

    /// Field key used once a SCHEMA_NAME transition is active.
    pub fn post_name(&self) -> String {
        self.post_transition_name
            .clone()
            .unwrap_or_else(|| format!("new-{}", self.name))
    }

    /// Whether any transition effect is configured.
    pub fn has_transitions(&self) -> bool {
        !self.transition_type.is_empty()
    }

    /// Every key this column can emit during a run.
    pub fn field_keys(&self) -> Vec<String> {
        let mut keys = vec![self.pre_name().to_string()];
        if self.transition_type.contains(TransitionFlags::SCHEMA_NAME) {
            keys.push(self.post_name());
        }
        keys
    }

    /// Validate this column in isolation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let column_err = |reason: String| ConfigError::InvalidColumn {
            column: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(column_err("name must not be empty".to_string()));
        }
        if !(0.0..1.0).contains(&self.transition_percentage) {
            return Err(column_err(format!(
                "transition_percentage must be in [0, 1), got {}",
                self.transition_percentage
            )));
        }
        if self.distribution.unknown_bits() != 0 {
            return Err(ConfigError::UnknownFlags {
                column: self.name.clone(),
                mask: "distribution",
                bits: self.distribution.unknown_bits(),
            });
        }
        if self.transition_type.unknown_bits() != 0 {
            return Err(ConfigError::UnknownFlags {
                column: self.name.clone(),
                mask: "transition_type",
                bits: self.transition_type.unknown_bits(),
            });
        }
        if self.transition_type.contains(TransitionFlags::SCHEMA_NAME) {
            let post = self.post_name();
            if post.trim().is_empty() {
                return Err(column_err("post_transition_name must not be empty".to_string()));
            }
            if post == self.pre_name() {
                return Err(column_err(format!(
                    "post_transition_name '{post}' equals the pre-transition name"
                )));
            }
        }
        if self.pre_name().trim().is_empty() {
            return Err(column_err("pre_transition_name must not be empty".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Effect Rates
// ============================================================================

fn default_null_high() -> f64 {
    0.3
}

fn default_zero_high() -> f64 {
    0.3
}

/// Emission rates for the null and zero effects.
///
/// Baselines apply to every column (zeros only to numeric ones) so that a
/// column's output before its transition matches a column without transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectRates {
    /// Null probability before NULLS_HIGH activates
    #[serde(default)]
    pub null_baseline: f64,

    /// Null probability once NULLS_HIGH is active
    #[serde(default = "default_null_high")]
    pub null_high: f64,

    /// Zero probability before ZEROS_HIGH activates
    #[serde(default)]
    pub zero_baseline: f64,

    /// Zero probability once ZEROS_HIGH is active
    #[serde(default = "default_zero_high")]
    pub zero_high: f64,
}

impl Default for EffectRates {
    fn default() -> Self {
        Self {
            null_baseline: 0.0,
            null_high: default_null_high(),
            zero_baseline: 0.0,
            zero_high: default_zero_high(),
        }
    }
}

impl EffectRates {
    fn validate(&self) -> Result<(), ConfigError> {
        for (parameter, value) in [
            ("rates.null_baseline", self.null_baseline),
            ("rates.null_high", self.null_high),
            ("rates.zero_baseline", self.zero_baseline),
            ("rates.zero_high", self.zero_high),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(parameter, format!("must be in [0, 1], got {value}")));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Run Configuration
// ============================================================================

fn default_version() -> u32 {
    1
}

fn default_seed() -> u64 {
    42
}

fn default_num_days() -> u32 {
    10
}

fn default_rows_per_day() -> u64 {
    500
}

fn default_row_variation() -> f64 {
    0.2
}

fn default_reduction_probability() -> f64 {
    0.2
}

fn default_reduction_factor() -> f64 {
    0.1
}

/// Full run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Seed for every random stream of the run
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of days in the timeline
    #[serde(default = "default_num_days")]
    pub num_days: u32,

    /// Target number of rows per day before jitter
    #[serde(default = "default_rows_per_day")]
    pub approx_rows_per_day: u64,

    /// Maximum relative deviation (+/-) of a day's row count
    #[serde(default = "default_row_variation")]
    pub row_variation_percentage: f64,

    /// Probability that a day is shrunk to simulate missing data
    #[serde(default = "default_reduction_probability")]
    pub random_day_reduction_probability: f64,

    /// Factor applied to the row count of a shrunk day
    #[serde(default = "default_reduction_factor")]
    pub random_day_reduction_factor: f64,

    /// Null and zero emission rates
    #[serde(default)]
    pub rates: EffectRates,

    /// Column definitions in output order
    pub columns: Vec<ColumnSpec>,
}

impl DriftConfig {
    /// Create a configuration with default timeline settings.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            version: default_version(),
            seed: default_seed(),
            num_days: default_num_days(),
            approx_rows_per_day: default_rows_per_day(),
            row_variation_percentage: default_row_variation(),
            random_day_reduction_probability: default_reduction_probability(),
            random_day_reduction_factor: default_reduction_factor(),
            rates: EffectRates::default(),
            columns,
        }
    }

    /// Default configuration with the stock column layout.
    pub fn with_default_columns() -> Self {
        Self::new(default_columns())
    }

    /// Load and validate a configuration file.
    ///
    /// The format follows the extension: `.yaml` / `.yml` or `.json`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&fs::read_to_string(path)?),
            Some("json") => Self::from_json(&fs::read_to_string(path)?),
            _ => Err(invalid(
                "config",
                format!("{path:?} is not a .yaml, .yml or .json file"),
            )),
        }
    }

    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: DriftConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DriftConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of days and the target rows per day.
    pub fn with_timeline(mut self, num_days: u32, approx_rows_per_day: u64) -> Self {
        self.num_days = num_days;
        self.approx_rows_per_day = approx_rows_per_day;
        self
    }

    /// Disable all row-count jitter so every day has exactly
    /// `approx_rows_per_day` rows.
    pub fn without_jitter(mut self) -> Self {
        self.row_variation_percentage = 0.0;
        self.random_day_reduction_probability = 0.0;
        self
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Validate run parameters and every column.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_days == 0 {
            return Err(invalid("num_days", "must be positive"));
        }
        if self.approx_rows_per_day == 0 {
            return Err(invalid("approx_rows_per_day", "must be positive"));
        }
        for (parameter, value) in [
            ("row_variation_percentage", self.row_variation_percentage),
            (
                "random_day_reduction_probability",
                self.random_day_reduction_probability,
            ),
            ("random_day_reduction_factor", self.random_day_reduction_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(parameter, format!("must be in [0, 1], got {value}")));
            }
        }
        self.rates.validate()?;

        if self.columns.is_empty() {
            return Err(invalid("columns", "at least one column is required"));
        }

        let mut owners: HashMap<String, &str> = HashMap::new();
        for column in &self.columns {
            column.validate()?;
            for key in column.field_keys() {
                if let Some(first) = owners.get(key.as_str()) {
                    return Err(ConfigError::DuplicateFieldKey {
                        key,
                        first: first.to_string(),
                        second: column.name.clone(),
                    });
                }
                owners.insert(key, column.name.as_str());
            }
        }

        for column in &self.columns {
            if column.transition_type.contains(TransitionFlags::STRING_LONG_TO_SMALL)
                && column.data_type != DataType::StringLong
            {
                tracing::warn!(
                    "Column '{}' has string_long_to_small but is {}; the bit has no effect",
                    column.name,
                    column.data_type
                );
            }
            if column.transition_type.contains(TransitionFlags::STRING_SMALL_TO_LONG)
                && column.data_type != DataType::StringCategory
            {
                tracing::warn!(
                    "Column '{}' has string_small_to_long but is {}; the bit has no effect",
                    column.name,
                    column.data_type
                );
            }
        }

        Ok(())
    }
}

/// The stock twelve-column layout.
pub fn default_columns() -> Vec<ColumnSpec> {
    use DataType::{Float, Integer, StringCategory, StringLong};

    let increment = DistributionFlags::INCREMENT;
    let uniform = DistributionFlags::UNIFORM;
    let normal = DistributionFlags::NORMAL;
    let none = DistributionFlags::empty();

    vec![
        ColumnSpec::new("id", Integer, increment),
        ColumnSpec::new("uniform1", Integer, uniform),
        ColumnSpec::new("zeroes1", Integer, uniform).with_transition(0.6, TransitionFlags::ZEROS_HIGH),
        ColumnSpec::new("nulls1", Integer, uniform).with_transition(0.4, TransitionFlags::NULLS_HIGH),
        ColumnSpec::new("normal1", Float, normal).with_transition(0.2, TransitionFlags::SCHEMA_NAME),
        ColumnSpec::new("uniform2", Float, uniform).with_transition(0.3, TransitionFlags::VALUES_SCALE),
        ColumnSpec::new("normal2", Integer, normal).with_transition(
            0.7,
            TransitionFlags::VALUES_SCALE | TransitionFlags::VALUES_SOME_STRINGS,
        ),
        ColumnSpec::new("normal3", Integer, normal).with_transition(0.7, TransitionFlags::VALUES_SCALE),
        ColumnSpec::new("uniform3", Float, uniform)
            .with_transition(0.9, TransitionFlags::VALUES_ALL_STRINGS),
        ColumnSpec::new("catStr1", StringCategory, none)
            .with_transition(0.5, TransitionFlags::STRING_SMALL_TO_LONG),
        ColumnSpec::new("catStrSteady2", StringCategory, none),
        ColumnSpec::new("descStr1", StringLong, none)
            .with_transition(0.5, TransitionFlags::STRING_LONG_TO_SMALL),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_yaml() -> &'static str {
        r#"
seed: 7
num_days: 4
approx_rows_per_day: 20
row_variation_percentage: 0.0
random_day_reduction_probability: 0.0
columns:
  - name: id
    data_type: integer
    distribution: [increment]
  - name: score
    data_type: FLOAT
    distribution_flags: 4
    transition_percentage: 0.25
    transition_type: [schema_name, values_scale]
    post_transition_name: score_v2
"#
    }

    #[test]
    fn test_parse_config() {
        let config = DriftConfig::from_yaml(test_yaml()).unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.seed, 7);
        assert_eq!(config.num_days, 4);
        assert_eq!(config.column_names(), vec!["id", "score"]);
        assert_eq!(config.rates, EffectRates::default());

        let score = config.get_column("score").unwrap();
        assert_eq!(score.distribution, DistributionFlags::NORMAL);
        assert_eq!(score.transition_type.bits(), 16 | 2);
        assert_eq!(score.pre_name(), "score");
        assert_eq!(score.post_name(), "score_v2");

        let id = config.get_column("id").unwrap();
        assert_eq!(id.transition_percentage, 0.5);
        assert!(!id.has_transitions());
    }

    #[test]
    fn test_default_post_name() {
        let column = ColumnSpec::new("normal1", DataType::Float, DistributionFlags::NORMAL)
            .with_transition(0.2, TransitionFlags::SCHEMA_NAME);
        assert_eq!(column.post_name(), "new-normal1");
        assert_eq!(column.field_keys(), vec!["normal1", "new-normal1"]);
    }

    #[test]
    fn test_rejects_transition_percentage_of_one() {
        let yaml = r#"
columns:
  - name: a
    data_type: integer
    transition_percentage: 1.0
"#;
        let err = DriftConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColumn { .. }), "{err}");
    }

    #[test]
    fn test_rejects_unknown_data_type() {
        let yaml = r#"
columns:
  - name: a
    data_type: boolean
"#;
        assert!(matches!(
            DriftConfig::from_yaml(yaml),
            Err(ConfigError::YamlError(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_bits() {
        let yaml = r#"
columns:
  - name: a
    data_type: integer
    transition_type: 1
"#;
        let err = DriftConfig::from_yaml(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownFlags { bits: 1, mask: "transition_type", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_rejects_colliding_keys() {
        let config = DriftConfig::new(vec![
            ColumnSpec::new("a", DataType::Integer, DistributionFlags::UNIFORM)
                .with_transition(0.5, TransitionFlags::SCHEMA_NAME)
                .with_names("a", "b"),
            ColumnSpec::new("b", DataType::Integer, DistributionFlags::UNIFORM),
        ]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateFieldKey { .. }), "{err}");
    }

    #[test]
    fn test_rejects_bad_run_parameters() {
        let base = DriftConfig::with_default_columns();

        let mut config = base.clone();
        config.num_days = 0;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.row_variation_percentage = 1.5;
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.rates.null_high = -0.1;
        assert!(config.validate().is_err());

        let mut config = base;
        config.columns.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_columns_validate() {
        let config = DriftConfig::with_default_columns();
        config.validate().unwrap();
        assert_eq!(config.columns.len(), 12);
        assert_eq!(config.approx_rows_per_day, 500);
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let config = DriftConfig::with_default_columns().with_seed(99);
        let yaml = config.to_yaml().unwrap();
        let parsed = DriftConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_new_uses_file_default_transition_point() {
        let built = ColumnSpec::new("id", DataType::Integer, DistributionFlags::INCREMENT);
        let parsed = DriftConfig::from_yaml(test_yaml()).unwrap();
        assert_eq!(parsed.get_column("id"), Some(&built));
    }

    #[test]
    fn test_from_file_follows_extension() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let expected = DriftConfig::from_yaml(test_yaml()).unwrap();

        let yaml_path = temp_dir.path().join("drift.yml");
        fs::write(&yaml_path, test_yaml()).unwrap();
        assert_eq!(DriftConfig::from_file(&yaml_path).unwrap(), expected);

        let json_path = temp_dir.path().join("drift.json");
        fs::write(
            &json_path,
            r#"{
  "seed": 7,
  "num_days": 4,
  "approx_rows_per_day": 20,
  "row_variation_percentage": 0.0,
  "random_day_reduction_probability": 0.0,
  "columns": [
    {"name": "id", "data_type": "integer", "distribution": ["increment"]},
    {
      "name": "score",
      "data_type": "FLOAT",
      "distribution_flags": 4,
      "transition_percentage": 0.25,
      "transition_type": 18,
      "post_transition_name": "score_v2"
    }
  ]
}"#,
        )
        .unwrap();
        assert_eq!(DriftConfig::from_file(&json_path).unwrap(), expected);

        let toml_path = temp_dir.path().join("drift.toml");
        fs::write(&toml_path, "seed = 7").unwrap();
        let err = DriftConfig::from_file(&toml_path).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidParameter { parameter: "config", .. }),
            "{err}"
        );

        let broken_path = temp_dir.path().join("broken.json");
        fs::write(&broken_path, "{\"columns\": [").unwrap();
        assert!(matches!(
            DriftConfig::from_file(&broken_path),
            Err(ConfigError::JsonError(_))
        ));
    }

    #[test]
    fn test_from_json_validates() {
        let json = r#"{"columns": [{"name": "a", "data_type": "integer", "transition_type": 1}]}"#;
        assert!(matches!(
            DriftConfig::from_json(json),
            Err(ConfigError::UnknownFlags { .. })
        ));
    }
}
