//! Error types for value generation.

use crate::transition::EffectFailure;

/// Error type for generator operations.
///
/// Any generation error is fatal for the run: the timeline stops instead of
/// emitting a row with a malformed field.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A transition effect could not produce a value
    #[error("Column '{column}' failed at day {day}, row {row}: {source}")]
    Effect {
        column: String,
        day: u32,
        row: u64,
        #[source]
        source: EffectFailure,
    },

    /// The INCREMENT counter left the 64-bit signed range
    #[error("Column '{column}' increment counter {counter} exceeds the integer range")]
    CounterOverflow { column: String, counter: u64 },

    /// A day outside the timeline was requested
    #[error("Day {day} is outside the timeline of {num_days} days")]
    DayOutOfRange { day: u32, num_days: u32 },
}
