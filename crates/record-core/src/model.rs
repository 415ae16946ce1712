//! Typed records.

use crate::schema::RecordSchema;
use crate::validate::ValidationError;
use crate::values::{Record, Value};

/// A Rust type that can be described by, and built from, a record schema.
///
/// ```rust
/// use record_core::{
///     FieldDefinition, Model, Record, RecordSchema, TypeDescriptor, ValidationError,
/// };
///
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Model for Point {
///     fn schema() -> RecordSchema {
///         RecordSchema::new("Point")
///             .field(FieldDefinition::required("x", TypeDescriptor::int()))
///             .field(FieldDefinition::required("y", TypeDescriptor::int()))
///     }
///
///     fn from_record(record: Record) -> Result<Self, ValidationError> {
///         Ok(Self {
///             x: record.require_with("x", |v| v.as_i64())?,
///             y: record.require_with("y", |v| v.as_i64())?,
///         })
///     }
/// }
/// ```
pub trait Model: Sized {
    /// Schema every generated instance must satisfy.
    fn schema() -> RecordSchema;

    /// Convert a validated record into the typed value.
    fn from_record(record: Record) -> Result<Self, ValidationError>;
}

impl Record {
    /// Extract a field through `convert`, reporting a mismatch when the field
    /// is missing or has the wrong shape.
    pub fn require_with<T, F>(&self, field: &str, convert: F) -> Result<T, ValidationError>
    where
        F: FnOnce(&Value) -> Option<T>,
    {
        let value = self.get(field).ok_or_else(|| ValidationError::MissingField {
            record: self.name.clone(),
            field: field.to_string(),
        })?;
        convert(value).ok_or_else(|| ValidationError::TypeMismatch {
            record: self.name.clone(),
            field: field.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            found: value.kind_name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDefinition;
    use crate::types::TypeDescriptor;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq)]
    struct Named {
        name: String,
        nickname: Option<String>,
    }

    impl Model for Named {
        fn schema() -> RecordSchema {
            RecordSchema::new("Named")
                .field(FieldDefinition::required("name", TypeDescriptor::text()))
                .field(FieldDefinition::optional(
                    "nickname",
                    TypeDescriptor::optional(TypeDescriptor::text()),
                ))
        }

        fn from_record(record: Record) -> Result<Self, ValidationError> {
            Ok(Self {
                name: record.require_with("name", |v| v.as_str().map(str::to_string))?,
                nickname: record
                    .get("nickname")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            })
        }
    }

    #[test]
    fn test_from_record() {
        let record = Named::schema()
            .build(HashMap::from([(
                "name".to_string(),
                Value::Text("Ada".into()),
            )]))
            .unwrap();
        assert_eq!(
            Named::from_record(record).unwrap(),
            Named {
                name: "Ada".into(),
                nickname: None
            }
        );
    }

    #[test]
    fn test_require_with_reports_mismatch() {
        let record = Named::schema()
            .build(HashMap::from([(
                "name".to_string(),
                Value::Text("Ada".into()),
            )]))
            .unwrap();
        let err = record.require_with("name", |v| v.as_i64()).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { found, .. } if found == "text"));
    }
}
