//! Numeric value generators.

use drift_core::FieldValue;
use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// Integer uniform draws fall in `0..INTEGER_UNIFORM_MAX`.
pub const INTEGER_UNIFORM_MAX: i64 = 100;

/// Mean of the NORMAL distribution for both numeric types.
pub const NORMAL_MEAN: f64 = 0.0;

/// Standard deviation of the NORMAL distribution for both numeric types.
pub const NORMAL_STD_DEV: f64 = 100.0;

/// The canonical Gaussian used by NORMAL columns.
pub fn canonical_normal() -> Result<Normal<f64>, NormalError> {
    Normal::new(NORMAL_MEAN, NORMAL_STD_DEV)
}

/// Generate a random integer in `0..INTEGER_UNIFORM_MAX`.
pub fn generate_uniform_int<R: Rng>(rng: &mut R) -> FieldValue {
    FieldValue::Int(rng.random_range(0..INTEGER_UNIFORM_MAX))
}

/// Generate a random float in `[0, 1)`.
pub fn generate_uniform_float<R: Rng>(rng: &mut R) -> FieldValue {
    FieldValue::Float(rng.random::<f64>())
}

/// Generate a Gaussian integer, rounded to the nearest whole number.
pub fn generate_normal_int<R: Rng>(rng: &mut R, normal: &Normal<f64>) -> FieldValue {
    FieldValue::Int(normal.sample(rng).round() as i64)
}

/// Generate a Gaussian float.
pub fn generate_normal_float<R: Rng>(rng: &mut R, normal: &Normal<f64>) -> FieldValue {
    FieldValue::Float(normal.sample(rng))
}
