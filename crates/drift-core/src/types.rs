//! Column data types and the two bitmasks that drive generation.
//!
//! `DistributionFlags` selects the base sampling rule of a column and
//! `TransitionFlags` selects which drift effects switch on once the column's
//! transition point is reached.
//!
//! # YAML Format
//!
//! Both masks accept either the raw integer or a list of names:
//! ```yaml
//! distribution: 2
//! transition_type: [values_scale, values_some_strings]
//! ```

use bitflags::Flags;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Data type of a generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Whole numbers
    #[serde(alias = "INTEGER")]
    Integer,

    /// Floating point numbers
    #[serde(alias = "FLOAT")]
    Float,

    /// Free text made of several words
    #[serde(alias = "STRING_LONG")]
    StringLong,

    /// Short values drawn from a small category pool
    #[serde(alias = "STRING_CATEGORY")]
    StringCategory,
}

impl DataType {
    /// Whether values of this type are numbers before any transition.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::StringLong => write!(f, "string_long"),
            Self::StringCategory => write!(f, "string_category"),
        }
    }
}

bitflags::bitflags! {
    /// Base distribution bits of a column.
    ///
    /// Only one distribution is used per column. When several bits are set the
    /// first match in the order INCREMENT, UNIFORM, NORMAL wins; an empty mask
    /// samples uniformly.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct DistributionFlags: u32 {
        /// Monotonic per-column counter
        const INCREMENT = 1 << 0;
        /// Uniform draw over the type's canonical range
        const UNIFORM = 1 << 1;
        /// Gaussian draw with the type's canonical mean and deviation
        const NORMAL = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Transition effect bits of a column.
    ///
    /// Bits combine freely. Value effects are applied in a fixed order, see
    /// `VALUE_EFFECT_ORDER` in the generator crate.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TransitionFlags: u32 {
        /// Multiply numeric values by a constant factor
        const VALUES_SCALE = 1 << 1;
        /// Emit every value as a prefixed string
        const VALUES_ALL_STRINGS = 1 << 2;
        /// Emit about half of the values as prefixed strings
        const VALUES_SOME_STRINGS = 1 << 3;
        /// Rename the field key
        const SCHEMA_NAME = 1 << 4;
        /// Long free text collapses into category strings
        const STRING_LONG_TO_SMALL = 1 << 5;
        /// Category strings grow into free text
        const STRING_SMALL_TO_LONG = 1 << 6;
        /// Raise the null rate
        const NULLS_HIGH = 1 << 7;
        /// Raise the zero rate of numeric columns
        const ZEROS_HIGH = 1 << 8;
    }
}

/// YAML labels are the lowercase flag names; lookup ignores case.
fn flag_from_label<F: Flags>(label: &str) -> Option<F> {
    F::from_name(&label.to_ascii_uppercase())
}

fn flag_labels<F: Flags>(mask: &F) -> Vec<String> {
    mask.iter_names()
        .map(|(name, _)| name.to_ascii_lowercase())
        .collect()
}

struct MaskVisitor<F>(PhantomData<F>);

impl<'de, F: Flags<Bits = u32>> Visitor<'de> for MaskVisitor<F> {
    type Value = F;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer mask, a flag name or a list of flag names")
    }

    // Unknown bits are kept here and rejected by config validation,
    // which can name the offending column.
    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u32::try_from(value)
            .map(F::from_bits_retain)
            .map_err(|_| E::custom(format!("mask {value} does not fit in 32 bits")))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u64::try_from(value)
            .map_err(|_| E::custom(format!("mask {value} is negative")))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        flag_from_label(value).ok_or_else(|| E::custom(format!("unknown flag '{value}'")))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut mask = F::empty();
        while let Some(label) = seq.next_element::<String>()? {
            let flag: F = flag_from_label(&label)
                .ok_or_else(|| <A::Error as de::Error>::custom(format!("unknown flag '{label}'")))?;
            mask.insert(flag);
        }
        Ok(mask)
    }
}

/// Label helpers plus the integer-or-list serde form shared by both masks.
macro_rules! labelled_mask {
    ($($name:ident),+) => {
        $(
            impl $name {
                /// Look a flag up by its YAML label (case-insensitive).
                pub fn from_label(label: &str) -> Option<Self> {
                    flag_from_label(label)
                }

                /// Labels of the named bits set in this mask, in bit order.
                pub fn labels(&self) -> Vec<String> {
                    flag_labels(self)
                }

                /// Bits set in `self` that have no name.
                pub const fn unknown_bits(&self) -> u32 {
                    self.bits() & !Self::all().bits()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    if self.is_empty() {
                        return f.write_str("none");
                    }
                    let mut parts = self.labels();
                    if self.unknown_bits() != 0 {
                        parts.push(format!("{:#x}", self.unknown_bits()));
                    }
                    f.write_str(&parts.join("|"))
                }
            }

            impl Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    if self.unknown_bits() != 0 {
                        return serializer.serialize_u32(self.bits());
                    }
                    serializer.collect_seq(self.labels())
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    deserializer.deserialize_any(MaskVisitor(PhantomData))
                }
            }
        )+
    };
}

labelled_mask!(DistributionFlags, TransitionFlags);

/// Resolved base distribution of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    Increment,
    Uniform,
    Normal,
}

impl DistributionFlags {
    /// Resolve the mask into a single distribution (INCREMENT > UNIFORM > NORMAL).
    pub fn resolve(&self) -> Distribution {
        if self.contains(Self::INCREMENT) {
            Distribution::Increment
        } else if self.contains(Self::UNIFORM) {
            Distribution::Uniform
        } else if self.contains(Self::NORMAL) {
            Distribution::Normal
        } else {
            Distribution::Uniform
        }
    }
}
