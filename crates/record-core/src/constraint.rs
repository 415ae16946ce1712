//! Declared bounds attached to record fields.

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single declared bound on a field.
///
/// Numeric constraints apply to `int` and `float` fields, length
/// constraints to `text` and `bytes` fields. In YAML each constraint is a
/// one-entry map:
///
/// ```yaml
/// constraints:
///   - ge: 0
///   - lt: 100
///   - multiple_of: 5
///   - max_length: 10
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Value must be `>= v`
    GreaterEq(f64),

    /// Value must be `> v`
    GreaterThan(f64),

    /// Value must be `<= v`
    LessEq(f64),

    /// Value must be `< v`
    LessThan(f64),

    /// Value must be an exact multiple of `v`
    MultipleOf(f64),

    /// Length must be `>= n`
    MinLength(usize),

    /// Length must be `<= n`
    MaxLength(usize),
}

const CONSTRAINT_KEYS: &[&str] = &[
    "ge",
    "gt",
    "le",
    "lt",
    "multiple_of",
    "min_length",
    "max_length",
];

/// The two constraint families. A field never mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintFamily {
    Numeric,
    Length,
}

impl Constraint {
    /// Key this constraint is written under in a schema document.
    pub fn key(&self) -> &'static str {
        match self {
            Self::GreaterEq(_) => "ge",
            Self::GreaterThan(_) => "gt",
            Self::LessEq(_) => "le",
            Self::LessThan(_) => "lt",
            Self::MultipleOf(_) => "multiple_of",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
        }
    }

    /// Family this constraint belongs to.
    pub fn family(&self) -> ConstraintFamily {
        match self {
            Self::GreaterEq(_)
            | Self::GreaterThan(_)
            | Self::LessEq(_)
            | Self::LessThan(_)
            | Self::MultipleOf(_) => ConstraintFamily::Numeric,
            Self::MinLength(_) | Self::MaxLength(_) => ConstraintFamily::Length,
        }
    }

    /// Position of this constraint kind in the canonical application order.
    ///
    /// `MultipleOf` ranks after every other numeric bound because it reads
    /// the interval they establish. `MaxLength` precedes `MinLength`.
    pub fn canonical_rank(&self) -> u8 {
        match self {
            Self::GreaterEq(_) => 0,
            Self::GreaterThan(_) => 1,
            Self::LessEq(_) => 2,
            Self::LessThan(_) => 3,
            Self::MultipleOf(_) => 4,
            Self::MaxLength(_) => 5,
            Self::MinLength(_) => 6,
        }
    }

    /// Check a numeric value against this constraint.
    ///
    /// Length constraints never match a number.
    pub fn admits_number(&self, v: f64) -> bool {
        match *self {
            Self::GreaterEq(bound) => v >= bound,
            Self::GreaterThan(bound) => v > bound,
            Self::LessEq(bound) => v <= bound,
            Self::LessThan(bound) => v < bound,
            Self::MultipleOf(step) => step != 0.0 && (v % step) == 0.0,
            Self::MinLength(_) | Self::MaxLength(_) => false,
        }
    }

    /// Check a length against this constraint.
    ///
    /// Numeric constraints never match a length.
    pub fn admits_length(&self, len: usize) -> bool {
        match *self {
            Self::MinLength(n) => len >= n,
            Self::MaxLength(n) => len <= n,
            _ => false,
        }
    }
}

/// Sort constraints into canonical order.
///
/// The sort is stable: constraints of the same kind keep their declaration
/// order, so a later bound of the same kind is applied after (and
/// overwrites) an earlier one.
pub fn canonical_order(constraints: &[Constraint]) -> Vec<&Constraint> {
    let mut ordered: Vec<&Constraint> = constraints.iter().collect();
    ordered.sort_by_key(|c| c.canonical_rank());
    ordered
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterEq(v)
            | Self::GreaterThan(v)
            | Self::LessEq(v)
            | Self::LessThan(v)
            | Self::MultipleOf(v) => write!(f, "{}={v}", self.key()),
            Self::MinLength(n) | Self::MaxLength(n) => write!(f, "{}={n}", self.key()),
        }
    }
}

impl Serialize for Constraint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::GreaterEq(v)
            | Self::GreaterThan(v)
            | Self::LessEq(v)
            | Self::LessThan(v)
            | Self::MultipleOf(v) => map.serialize_entry(self.key(), v)?,
            Self::MinLength(n) | Self::MaxLength(n) => map.serialize_entry(self.key(), n)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ConstraintVisitor;

        impl<'de> Visitor<'de> for ConstraintVisitor {
            type Value = Constraint;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a one-entry map such as `ge: 0` or `max_length: 10`")
            }

            // Handle map format: {"ge": 0}
            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let key: String = map
                    .next_key()?
                    .ok_or_else(|| <M::Error as de::Error>::invalid_length(0, &self))?;

                let constraint = match key.as_str() {
                    "ge" => Constraint::GreaterEq(map.next_value()?),
                    "gt" => Constraint::GreaterThan(map.next_value()?),
                    "le" => Constraint::LessEq(map.next_value()?),
                    "lt" => Constraint::LessThan(map.next_value()?),
                    "multiple_of" => Constraint::MultipleOf(map.next_value()?),
                    "min_length" => Constraint::MinLength(map.next_value()?),
                    "max_length" => Constraint::MaxLength(map.next_value()?),
                    other => return Err(de::Error::unknown_variant(other, CONSTRAINT_KEYS)),
                };

                if map.next_key::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }
                Ok(constraint)
            }
        }

        deserializer.deserialize_map(ConstraintVisitor)
    }
}
