//! Value-level transition effects.
//!
//! Effects run in the order of [`VALUE_EFFECT_ORDER`]. This order is part of
//! the public contract: configurations commonly stack bits such as
//! `values_scale | values_some_strings`, and the output depends on it.
//!
//! 1. `NullsHigh`: null with the high rate when active, else the baseline
//!    rate. A null ends the pipeline.
//! 2. `ZerosHigh`: same for typed zeros, numeric columns only. A zero ends the
//!    pipeline.
//! 3. `ValuesScale`: numeric value times [`VALUES_SCALE_FACTOR`].
//! 4. `ValuesAllStrings`: text prefixed with [`ALL_STRINGS_PREFIX`], always.
//! 5. `ValuesSomeStrings`: text prefixed with [`SOME_STRINGS_PREFIX`], with
//!    [`SOME_STRINGS_PROBABILITY`].
//!
//! The prefixes keep coerced numbers distinguishable from real numbers in
//! formats without types such as CSV.
//!
//! The remaining bits are not value effects: SCHEMA_NAME changes the field key
//! and the two string-length bits switch the base sampling strategy.

use drift_core::{DataType, EffectRates, FieldValue, TransitionFlags};
use rand::Rng;
use std::ops::ControlFlow;

/// Multiplier applied by VALUES_SCALE.
pub const VALUES_SCALE_FACTOR: i64 = 40;

/// Probability that VALUES_SOME_STRINGS converts a value.
pub const SOME_STRINGS_PROBABILITY: f64 = 0.5;

/// Prefix of values coerced by VALUES_ALL_STRINGS.
pub const ALL_STRINGS_PREFIX: &str = "all-";

/// Prefix of values coerced by VALUES_SOME_STRINGS.
pub const SOME_STRINGS_PREFIX: &str = "sometimes-";

/// One value-level effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionEffect {
    NullsHigh,
    ZerosHigh,
    ValuesScale,
    ValuesAllStrings,
    ValuesSomeStrings,
}

/// Order in which value effects are applied.
pub const VALUE_EFFECT_ORDER: [TransitionEffect; 5] = [
    TransitionEffect::NullsHigh,
    TransitionEffect::ZerosHigh,
    TransitionEffect::ValuesScale,
    TransitionEffect::ValuesAllStrings,
    TransitionEffect::ValuesSomeStrings,
];

/// Reasons an effect cannot produce a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffectFailure {
    #[error("scaling {value} by {factor} overflows a 64-bit integer")]
    ScaleOverflow { value: i64, factor: i64 },

    #[error("scaling produced the non-finite value {0}")]
    NonFinite(f64),
}

/// What the pipeline needs to know about the column and the current row.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext<'a> {
    /// Whether the column's transition point has been reached
    pub active: bool,
    /// Transition bits of the column
    pub flags: TransitionFlags,
    /// Declared data type of the column
    pub data_type: DataType,
    /// Null and zero rates of the run
    pub rates: &'a EffectRates,
}

impl EffectContext<'_> {
    /// Whether `flag` is set and the transition is active.
    pub fn enabled(&self, flag: TransitionFlags) -> bool {
        self.active && self.flags.contains(flag)
    }
}

/// Result of running the pipeline on one value.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectOutcome {
    pub value: FieldValue,
    /// Effect that ended the pipeline early, if any
    pub short_circuit: Option<TransitionEffect>,
    /// Whether a numeric value was turned into a string
    pub stringified: bool,
}

impl TransitionEffect {
    /// Transition bit that gates this effect's active behavior.
    pub fn flag(&self) -> TransitionFlags {
        match self {
            Self::NullsHigh => TransitionFlags::NULLS_HIGH,
            Self::ZerosHigh => TransitionFlags::ZEROS_HIGH,
            Self::ValuesScale => TransitionFlags::VALUES_SCALE,
            Self::ValuesAllStrings => TransitionFlags::VALUES_ALL_STRINGS,
            Self::ValuesSomeStrings => TransitionFlags::VALUES_SOME_STRINGS,
        }
    }

    /// Apply this effect. `Break` ends the pipeline with the given value.
    pub fn apply<R: Rng>(
        &self,
        value: FieldValue,
        ctx: &EffectContext<'_>,
        rng: &mut R,
    ) -> Result<ControlFlow<FieldValue, FieldValue>, EffectFailure> {
        match self {
            Self::NullsHigh => {
                let rate = if ctx.enabled(TransitionFlags::NULLS_HIGH) {
                    ctx.rates.null_high
                } else {
                    ctx.rates.null_baseline
                };
                if roll(rng, rate) {
                    return Ok(ControlFlow::Break(FieldValue::Null));
                }
                Ok(ControlFlow::Continue(value))
            }
            Self::ZerosHigh => {
                if !ctx.data_type.is_numeric() {
                    return Ok(ControlFlow::Continue(value));
                }
                let rate = if ctx.enabled(TransitionFlags::ZEROS_HIGH) {
                    ctx.rates.zero_high
                } else {
                    ctx.rates.zero_baseline
                };
                if roll(rng, rate) {
                    return Ok(ControlFlow::Break(typed_zero(ctx.data_type)));
                }
                Ok(ControlFlow::Continue(value))
            }
            Self::ValuesScale => {
                if !ctx.enabled(TransitionFlags::VALUES_SCALE) {
                    return Ok(ControlFlow::Continue(value));
                }
                scale(value).map(ControlFlow::Continue)
            }
            Self::ValuesAllStrings => {
                if !ctx.enabled(TransitionFlags::VALUES_ALL_STRINGS) {
                    return Ok(ControlFlow::Continue(value));
                }
                Ok(ControlFlow::Continue(value.into_string_value(ALL_STRINGS_PREFIX)))
            }
            Self::ValuesSomeStrings => {
                if !ctx.enabled(TransitionFlags::VALUES_SOME_STRINGS) || value.is_string() {
                    return Ok(ControlFlow::Continue(value));
                }
                if rng.random_bool(SOME_STRINGS_PROBABILITY) {
                    return Ok(ControlFlow::Continue(value.into_string_value(SOME_STRINGS_PREFIX)));
                }
                Ok(ControlFlow::Continue(value))
            }
        }
    }
}

/// Run every value effect in contract order.
pub fn apply_value_effects<R: Rng>(
    base: FieldValue,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) -> Result<EffectOutcome, EffectFailure> {
    let was_numeric = base.is_numeric();
    let mut value = base;

    for effect in VALUE_EFFECT_ORDER {
        match effect.apply(value, ctx, rng)? {
            ControlFlow::Continue(next) => value = next,
            ControlFlow::Break(last) => {
                return Ok(EffectOutcome {
                    value: last,
                    short_circuit: Some(effect),
                    stringified: false,
                });
            }
        }
    }

    let stringified = was_numeric && value.is_string();
    Ok(EffectOutcome {
        value,
        short_circuit: None,
        stringified,
    })
}

// Zero rates skip the draw so that a column whose effects are all inactive
// consumes exactly the same random stream as a column without effects.
fn roll<R: Rng>(rng: &mut R, rate: f64) -> bool {
    rate > 0.0 && rng.random_bool(rate)
}

fn typed_zero(data_type: DataType) -> FieldValue {
    match data_type {
        DataType::Float => FieldValue::Float(0.0),
        _ => FieldValue::Int(0),
    }
}

fn scale(value: FieldValue) -> Result<FieldValue, EffectFailure> {
    match value {
        FieldValue::Int(v) => v
            .checked_mul(VALUES_SCALE_FACTOR)
            .map(FieldValue::Int)
            .ok_or(EffectFailure::ScaleOverflow {
                value: v,
                factor: VALUES_SCALE_FACTOR,
            }),
        FieldValue::Float(v) => {
            let scaled = v * VALUES_SCALE_FACTOR as f64;
            if scaled.is_finite() {
                Ok(FieldValue::Float(scaled))
            } else {
                Err(EffectFailure::NonFinite(scaled))
            }
        }
        other => Ok(other),
    }
}
