//! Value representations for generated data.
//!
//! This module defines `Value`, the type-agnostic value produced by the
//! generator, and `Record`, a validated instance of a record schema.

use crate::types::{PrimitiveKind, TypeDescriptor};
use base64::Engine;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_yaml::Value as YamlValue;
use std::fmt;

/// A generated (or defaulted) field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    /// Boolean value
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    /// Text string
    Text(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Calendar date
    Date(NaiveDate),

    /// Time of day
    Time(NaiveTime),

    /// Date and time of day
    DateTime(NaiveDateTime),

    /// Ordered sequence
    List(Vec<Value>),

    /// Distinct elements, in first-insertion order
    Set(Vec<Value>),

    /// Distinct elements, in first-insertion order (immutable variant)
    FrozenSet(Vec<Value>),

    /// Ordered tuple (fixed or variadic)
    Tuple(Vec<Value>),

    /// Key/value entries with distinct keys, in first-insertion order
    Dict(Vec<(Value, Value)>),

    /// Nested record instance
    Record(Record),
}

impl Value {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get the elements of a list, set, frozen set or tuple.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) | Self::FrozenSet(items) | Self::Tuple(items) => {
                Some(items)
            }
            _ => None,
        }
    }

    /// Try to get the entries of a dict.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get this value as a nested record.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Short name of this value's variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "datetime",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::FrozenSet(_) => "frozen_set",
            Self::Tuple(_) => "tuple",
            Self::Dict(_) => "dict",
            Self::Record(_) => "record",
        }
    }

    /// Collect values into a set, dropping later duplicates.
    pub fn set_from(items: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut distinct: Vec<Value> = Vec::new();
        for item in items {
            if !distinct.contains(&item) {
                distinct.push(item);
            }
        }
        distinct
    }

    /// Collect entries into a dict. A repeated key overwrites the earlier
    /// value but keeps its original position.
    pub fn dict_from(entries: impl IntoIterator<Item = (Value, Value)>) -> Vec<(Value, Value)> {
        let mut dict: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match dict.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => dict.push((key, value)),
            }
        }
        dict
    }

    /// Convert a YAML value without type information.
    pub fn from_yaml(yaml: &YamlValue) -> Value {
        match yaml {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(*b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
            YamlValue::String(s) => Value::Text(s.clone()),
            YamlValue::Sequence(items) => Value::List(items.iter().map(Value::from_yaml).collect()),
            YamlValue::Mapping(map) => Value::Dict(
                map.iter()
                    .map(|(k, v)| (Value::from_yaml(k), Value::from_yaml(v)))
                    .collect(),
            ),
            YamlValue::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }

    /// Convert a YAML value using the descriptor it must satisfy.
    ///
    /// Used for field defaults: dates arrive as ISO strings, floats may be
    /// written as integers, sets and tuples as sequences. Anything the
    /// descriptor does not explain falls back to [`Value::from_yaml`].
    pub fn from_yaml_typed(yaml: &YamlValue, descriptor: &TypeDescriptor) -> Value {
        match (descriptor, yaml) {
            (_, YamlValue::Null) => Value::Null,
            (TypeDescriptor::Optional(inner), _) => Value::from_yaml_typed(yaml, inner),
            (TypeDescriptor::Primitive(kind), _) => primitive_from_yaml(yaml, *kind),
            (TypeDescriptor::List(element), YamlValue::Sequence(items)) => {
                Value::List(items.iter().map(|i| Value::from_yaml_typed(i, element)).collect())
            }
            (TypeDescriptor::Set(element), YamlValue::Sequence(items)) => Value::Set(
                Value::set_from(items.iter().map(|i| Value::from_yaml_typed(i, element))),
            ),
            (TypeDescriptor::FrozenSet(element), YamlValue::Sequence(items)) => Value::FrozenSet(
                Value::set_from(items.iter().map(|i| Value::from_yaml_typed(i, element))),
            ),
            (TypeDescriptor::VariadicTuple(element), YamlValue::Sequence(items)) => {
                Value::Tuple(items.iter().map(|i| Value::from_yaml_typed(i, element)).collect())
            }
            (TypeDescriptor::FixedTuple(elements), YamlValue::Sequence(items))
                if elements.len() == items.len() =>
            {
                Value::Tuple(
                    items
                        .iter()
                        .zip(elements)
                        .map(|(i, d)| Value::from_yaml_typed(i, d))
                        .collect(),
                )
            }
            (TypeDescriptor::Dict(key, value), YamlValue::Mapping(map)) => {
                Value::Dict(Value::dict_from(map.iter().map(|(k, v)| {
                    (Value::from_yaml_typed(k, key), Value::from_yaml_typed(v, value))
                })))
            }
            _ => Value::from_yaml(yaml),
        }
    }

    /// Text used for this value as a JSON object key.
    fn key_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
        }
    }
}

fn primitive_from_yaml(yaml: &YamlValue, kind: PrimitiveKind) -> Value {
    match (kind, yaml) {
        (PrimitiveKind::Float, YamlValue::Number(n)) => match n.as_f64() {
            Some(f) => Value::Float(f),
            None => Value::from_yaml(yaml),
        },
        (PrimitiveKind::Bytes, YamlValue::String(s)) => Value::Bytes(s.as_bytes().to_vec()),
        (PrimitiveKind::Date, YamlValue::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Value::Date)
            .unwrap_or_else(|_| Value::Text(s.clone())),
        (PrimitiveKind::Time, YamlValue::String(s)) => NaiveTime::parse_from_str(s, "%H:%M:%S")
            .map(Value::Time)
            .unwrap_or_else(|_| Value::Text(s.clone())),
        (PrimitiveKind::DateTime, YamlValue::String(s)) => {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(Value::DateTime)
                .unwrap_or_else(|_| Value::Text(s.clone()))
        }
        _ => Value::from_yaml(yaml),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Date(d) => write!(f, "{d}"),
            Self::Time(t) => write!(f, "{t}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::List(_) | Self::Set(_) | Self::FrozenSet(_) | Self::Tuple(_) | Self::Dict(_) => {
                write!(f, "<{} of {}>", self.kind_name(), self.len_hint())
            }
            Self::Record(r) => write!(f, "<{}>", r.name),
        }
    }
}

impl Value {
    fn len_hint(&self) -> usize {
        match self {
            Self::Dict(entries) => entries.len(),
            other => other.as_elements().map_or(0, <[Value]>::len),
        }
    }
}

// JSON rendering: bytes as base64, temporal values as ISO-8601 strings,
// collections as arrays, dicts and records as objects.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bytes(b) => {
                serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(b))
            }
            Self::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            Self::Time(t) => serializer.serialize_str(&t.format("%H:%M:%S").to_string()),
            Self::DateTime(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            Self::List(items) | Self::Set(items) | Self::FrozenSet(items) | Self::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Dict(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(&key.key_text(), value)?;
                }
                map.end()
            }
            Self::Record(record) => record.serialize(serializer),
        }
    }
}

/// A built and validated record instance.
///
/// Fields are stored in schema declaration order. Instances are only
/// produced by [`RecordSchema::build`](crate::RecordSchema::build).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Name of the record schema this instance belongs to
    pub name: String,
    /// Field values in schema order
    fields: Vec<(String, Value)>,
}

impl Record {
    pub(crate) fn new(name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Get a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Remove and return a field value by name.
    pub fn take(&mut self, field: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|(name, _)| name == field)?;
        Some(self.fields.remove(idx).1)
    }

    /// Iterate over `(name, value)` pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Get all field names in schema order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
