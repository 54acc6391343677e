//! Base value generation for each data type and distribution.
//!
//! A column's `{data_type x distribution}` pair is resolved once into a
//! [`BaseRule`]; sampling then matches on it exhaustively.

pub mod numeric;
pub mod words;

use drift_core::{ConfigError, DataType, Distribution, FieldValue};
use rand::Rng;
use rand_distr::Normal;

pub use words::CategoryPool;

/// Words in a STRING_LONG value.
pub const LONG_TEXT_WORDS: usize = 20;

/// Words in a STRING_CATEGORY value once it has grown into free text.
pub const GROWN_TEXT_WORDS: usize = 5;

/// Numeric base rule of a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericRule {
    /// Per-column counter
    Increment,
    /// Uniform draw over the type's canonical range
    Uniform,
    /// Gaussian draw with the canonical parameters
    Normal(Normal<f64>),
}

/// Base generation rule of a column.
///
/// String types ignore the distribution bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseRule {
    Integer(NumericRule),
    Float(NumericRule),
    StringLong,
    StringCategory,
}

/// How a string column currently builds its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringStrategy {
    /// One entry of the category pool
    Category,
    /// Several random words
    FreeText(usize),
}

impl BaseRule {
    /// Resolve the rule for a column.
    pub fn resolve(
        column: &str,
        data_type: DataType,
        distribution: Distribution,
    ) -> Result<Self, ConfigError> {
        let numeric = || -> Result<NumericRule, ConfigError> {
            Ok(match distribution {
                Distribution::Increment => NumericRule::Increment,
                Distribution::Uniform => NumericRule::Uniform,
                Distribution::Normal => {
                    let normal =
                        numeric::canonical_normal().map_err(|e| ConfigError::InvalidColumn {
                            column: column.to_string(),
                            reason: format!("normal distribution: {e}"),
                        })?;
                    NumericRule::Normal(normal)
                }
            })
        };

        Ok(match data_type {
            DataType::Integer => BaseRule::Integer(numeric()?),
            DataType::Float => BaseRule::Float(numeric()?),
            DataType::StringLong => BaseRule::StringLong,
            DataType::StringCategory => BaseRule::StringCategory,
        })
    }

    /// Whether this rule consumes the INCREMENT counter.
    pub fn uses_counter(&self) -> bool {
        matches!(
            self,
            BaseRule::Integer(NumericRule::Increment) | BaseRule::Float(NumericRule::Increment)
        )
    }
}

/// Draw a numeric base value.
///
/// `counter` is the INCREMENT value for this invocation; other rules ignore it.
pub fn sample_numeric<R: Rng>(
    rule: &NumericRule,
    integer: bool,
    counter: i64,
    rng: &mut R,
) -> FieldValue {
    match (rule, integer) {
        (NumericRule::Increment, true) => FieldValue::Int(counter),
        (NumericRule::Increment, false) => FieldValue::Float(counter as f64),
        (NumericRule::Uniform, true) => numeric::generate_uniform_int(rng),
        (NumericRule::Uniform, false) => numeric::generate_uniform_float(rng),
        (NumericRule::Normal(normal), true) => numeric::generate_normal_int(rng, normal),
        (NumericRule::Normal(normal), false) => numeric::generate_normal_float(rng, normal),
    }
}

/// Draw a string base value.
pub fn sample_string<R: Rng>(
    strategy: StringStrategy,
    pool: &CategoryPool,
    rng: &mut R,
) -> FieldValue {
    match strategy {
        StringStrategy::Category => FieldValue::String(pool.pick(rng).to_string()),
        StringStrategy::FreeText(count) => FieldValue::String(words::random_words(rng, count)),
    }
}

/// Derive an independent seed for one random stream of a run.
///
/// Streams are addressed by `(stream, lane)`, e.g. a column and a day. The
/// result goes through the splitmix64 finalizer so neighbouring streams do
/// not start from correlated states.
pub fn stream_seed(seed: u64, stream: u64, lane: u64) -> u64 {
    let mut z = seed
        .wrapping_add(stream.wrapping_mul(0x9E3779B97F4A7C15))
        .wrapping_add(lane.wrapping_mul(0xD1B54A32D192ED03));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_resolve_rules() {
        let rule = BaseRule::resolve("a", DataType::Integer, Distribution::Increment).unwrap();
        assert_eq!(rule, BaseRule::Integer(NumericRule::Increment));
        assert!(rule.uses_counter());

        let rule = BaseRule::resolve("b", DataType::Float, Distribution::Normal).unwrap();
        assert!(matches!(rule, BaseRule::Float(NumericRule::Normal(_))));
        assert!(!rule.uses_counter());

        let rule = BaseRule::resolve("c", DataType::StringLong, Distribution::Increment).unwrap();
        assert_eq!(rule, BaseRule::StringLong);
    }

    #[test]
    fn test_sample_increment_uses_counter() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            sample_numeric(&NumericRule::Increment, true, 17, &mut rng),
            FieldValue::Int(17)
        );
        assert_eq!(
            sample_numeric(&NumericRule::Increment, false, 3, &mut rng),
            FieldValue::Float(3.0)
        );
    }

    #[test]
    fn test_sample_string_strategies() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = CategoryPool::draw(&mut rng);

        let value = sample_string(StringStrategy::Category, &pool, &mut rng);
        assert!(pool.entries().contains(&value.as_str().unwrap()));

        let value = sample_string(StringStrategy::FreeText(LONG_TEXT_WORDS), &pool, &mut rng);
        assert_eq!(value.as_str().unwrap().split(' ').count(), LONG_TEXT_WORDS);
    }

    #[test]
    fn test_stream_seeds_differ() {
        let a = stream_seed(42, 1, 0);
        let b = stream_seed(42, 1, 1);
        let c = stream_seed(42, 2, 0);
        let d = stream_seed(43, 1, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a, stream_seed(42, 1, 0));
    }
}
