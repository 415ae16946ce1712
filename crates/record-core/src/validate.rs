//! Record construction and validation.
//!
//! `RecordSchema::build` turns a field-name to value mapping into a
//! [`Record`], checking every value against its field's descriptor and
//! constraints. Generators treat this as the final, opaque step.

use crate::constraint::{Constraint, ConstraintFamily};
use crate::schema::RecordSchema;
use crate::types::{PrimitiveKind, TypeDescriptor};
use crate::values::{Record, Value};
use std::collections::HashMap;

/// The assembled mapping does not satisfy the record's own rules.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required field has no value and no default
    #[error("Record '{record}': missing required field '{field}'")]
    MissingField { record: String, field: String },

    /// A value was supplied for a field the record does not declare
    #[error("Record '{record}': unknown field '{field}'")]
    UnknownField { record: String, field: String },

    /// A value has the wrong shape for its field
    #[error("Record '{record}', field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        record: String,
        field: String,
        expected: String,
        found: String,
    },

    /// A value violates a declared constraint
    #[error("Record '{record}', field '{field}': value {value} violates {constraint}")]
    ConstraintViolated {
        record: String,
        field: String,
        constraint: Constraint,
        value: String,
    },
}

/// Why a single value was rejected, before field context is attached.
enum Violation {
    Type { expected: String, found: String },
    Constraint { constraint: Constraint, value: String },
}

impl RecordSchema {
    /// Build and validate an instance from generated field values.
    ///
    /// Omitted fields take their default, or `Null` when they are not
    /// required. Fields are checked in declaration order and the first
    /// failure is returned.
    pub fn build(&self, mut fields: HashMap<String, Value>) -> Result<Record, ValidationError> {
        if let Some(extra) = fields
            .keys()
            .filter(|name| self.get_field(name).is_none())
            .min()
        {
            return Err(ValidationError::UnknownField {
                record: self.name.clone(),
                field: extra.clone(),
            });
        }

        let mut built = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = match fields.remove(&field.name) {
                Some(value) => {
                    if let Some(descriptor) = &field.descriptor {
                        check_value(descriptor, &field.constraints, &value).map_err(
                            |violation| self.violation_error(&field.name, violation),
                        )?;
                    }
                    value
                }
                None => match &field.default {
                    Some(default) => default.clone(),
                    None if !field.required => Value::Null,
                    None => {
                        return Err(ValidationError::MissingField {
                            record: self.name.clone(),
                            field: field.name.clone(),
                        })
                    }
                },
            };
            built.push((field.name.clone(), value));
        }

        Ok(Record::new(self.name.clone(), built))
    }

    fn violation_error(&self, field: &str, violation: Violation) -> ValidationError {
        match violation {
            Violation::Type { expected, found } => ValidationError::TypeMismatch {
                record: self.name.clone(),
                field: field.to_string(),
                expected,
                found,
            },
            Violation::Constraint { constraint, value } => ValidationError::ConstraintViolated {
                record: self.name.clone(),
                field: field.to_string(),
                constraint,
                value,
            },
        }
    }
}

fn mismatch(descriptor: &TypeDescriptor, value: &Value) -> Violation {
    Violation::Type {
        expected: descriptor.to_string(),
        found: value.kind_name().to_string(),
    }
}

/// Check one value against a descriptor; constraints flow down to the
/// primitive leaves.
fn check_value(
    descriptor: &TypeDescriptor,
    constraints: &[Constraint],
    value: &Value,
) -> Result<(), Violation> {
    match (descriptor, value) {
        (TypeDescriptor::Unknown(_), _) => Ok(()),
        (TypeDescriptor::Optional(_), Value::Null) => Ok(()),
        (TypeDescriptor::Optional(inner), _) => check_value(inner, constraints, value),

        (TypeDescriptor::Primitive(kind), _) => check_primitive(*kind, constraints, value)
            .ok_or_else(|| mismatch(descriptor, value))?,

        (TypeDescriptor::Union(alternatives), _) => {
            let mut last = mismatch(descriptor, value);
            for alternative in alternatives {
                match check_value(alternative, constraints, value) {
                    Ok(()) => return Ok(()),
                    Err(violation) => last = violation,
                }
            }
            Err(last)
        }

        (TypeDescriptor::Literal(allowed), _) => {
            if allowed.contains(value) {
                Ok(())
            } else {
                Err(mismatch(descriptor, value))
            }
        }

        (TypeDescriptor::List(element), Value::List(items))
        | (TypeDescriptor::Set(element), Value::Set(items))
        | (TypeDescriptor::FrozenSet(element), Value::FrozenSet(items))
        | (TypeDescriptor::VariadicTuple(element), Value::Tuple(items)) => items
            .iter()
            .try_for_each(|item| check_value(element, constraints, item)),

        (TypeDescriptor::FixedTuple(elements), Value::Tuple(items))
            if elements.len() == items.len() =>
        {
            elements
                .iter()
                .zip(items)
                .try_for_each(|(element, item)| check_value(element, constraints, item))
        }

        (TypeDescriptor::Dict(key, val), Value::Dict(entries)) => {
            entries.iter().try_for_each(|(k, v)| {
                check_value(key, constraints, k)?;
                check_value(val, constraints, v)
            })
        }

        (TypeDescriptor::Nested(nested), Value::Record(record))
            if record.name == nested.name() =>
        {
            Ok(())
        }

        _ => Err(mismatch(descriptor, value)),
    }
}

/// `None` means the value has the wrong shape for `kind`.
fn check_primitive(
    kind: PrimitiveKind,
    constraints: &[Constraint],
    value: &Value,
) -> Option<Result<(), Violation>> {
    let result = match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(_))
        | (PrimitiveKind::Date, Value::Date(_))
        | (PrimitiveKind::Time, Value::Time(_))
        | (PrimitiveKind::DateTime, Value::DateTime(_)) => Ok(()),
        (PrimitiveKind::Int, Value::Int(i)) => check_number(constraints, *i as f64, value),
        (PrimitiveKind::Float, Value::Float(_) | Value::Int(_)) => {
            check_number(constraints, value.as_f64()?, value)
        }
        (PrimitiveKind::Text, Value::Text(s)) => {
            check_length(constraints, s.chars().count(), value)
        }
        (PrimitiveKind::Bytes, Value::Bytes(b)) => check_length(constraints, b.len(), value),
        _ => return None,
    };
    Some(result)
}

fn check_number(constraints: &[Constraint], v: f64, value: &Value) -> Result<(), Violation> {
    first_violation(constraints, ConstraintFamily::Numeric, value, |c| {
        c.admits_number(v)
    })
}

fn check_length(constraints: &[Constraint], len: usize, value: &Value) -> Result<(), Violation> {
    first_violation(constraints, ConstraintFamily::Length, value, |c| {
        c.admits_length(len)
    })
}

fn first_violation<F>(
    constraints: &[Constraint],
    family: ConstraintFamily,
    value: &Value,
    admits: F,
) -> Result<(), Violation>
where
    F: Fn(&Constraint) -> bool,
{
    match constraints
        .iter()
        .find(|c| c.family() == family && !admits(c))
    {
        Some(constraint) => Err(Violation::Constraint {
            constraint: constraint.clone(),
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDefinition;
    use chrono::NaiveDate;

    fn scored() -> RecordSchema {
        RecordSchema::new("Scored")
            .field(
                FieldDefinition::required("score", TypeDescriptor::int())
                    .constraint(Constraint::GreaterEq(0.0))
                    .constraint(Constraint::LessEq(100.0)),
            )
            .field(
                FieldDefinition::required("name", TypeDescriptor::text())
                    .constraint(Constraint::MinLength(3))
                    .constraint(Constraint::MaxLength(10)),
            )
            .field(FieldDefinition::optional(
                "maybe",
                TypeDescriptor::optional(TypeDescriptor::int()),
            ))
            .field(
                FieldDefinition::required("flag", TypeDescriptor::bool())
                    .with_default(Value::Bool(true)),
            )
    }

    fn fields(entries: Vec<(&str, Value)>) -> HashMap<String, Value> {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_build_fills_defaults_and_nulls() {
        let record = scored()
            .build(fields(vec![
                ("score", Value::Int(50)),
                ("name", Value::Text("alice".into())),
            ]))
            .unwrap();

        assert_eq!(record.field_names(), vec!["score", "name", "maybe", "flag"]);
        assert_eq!(record.get("maybe"), Some(&Value::Null));
        assert_eq!(record.get("flag"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_missing_required_field() {
        let err = scored()
            .build(fields(vec![("score", Value::Int(50))]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                record: "Scored".into(),
                field: "name".into()
            }
        );
    }

    #[test]
    fn test_unknown_field() {
        let err = scored()
            .build(fields(vec![
                ("score", Value::Int(50)),
                ("name", Value::Text("alice".into())),
                ("extra", Value::Null),
            ]))
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { field, .. } if field == "extra"));
    }

    #[test]
    fn test_constraint_violations() {
        let err = scored()
            .build(fields(vec![
                ("score", Value::Int(101)),
                ("name", Value::Text("alice".into())),
            ]))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ConstraintViolated { constraint: Constraint::LessEq(_), .. }
        ));

        let err = scored()
            .build(fields(vec![
                ("score", Value::Int(1)),
                ("name", Value::Text("al".into())),
            ]))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ConstraintViolated { constraint: Constraint::MinLength(3), .. }
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let err = scored()
            .build(fields(vec![
                ("score", Value::Text("50".into())),
                ("name", Value::Text("alice".into())),
            ]))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                record: "Scored".into(),
                field: "score".into(),
                expected: "int".into(),
                found: "text".into()
            }
        );
    }

    #[test]
    fn test_containers_and_nested() {
        let inner = RecordSchema::new("Inner")
            .field(FieldDefinition::required("d", TypeDescriptor::date()));
        let outer = RecordSchema::new("Outer")
            .field(FieldDefinition::required(
                "pairs",
                TypeDescriptor::dict(TypeDescriptor::text(), TypeDescriptor::float()),
            ))
            .field(FieldDefinition::required(
                "triple",
                TypeDescriptor::FixedTuple(vec![
                    TypeDescriptor::int(),
                    TypeDescriptor::text(),
                    TypeDescriptor::bytes(),
                ]),
            ))
            .field(FieldDefinition::required(
                "inner",
                TypeDescriptor::nested(inner.clone()),
            ));

        let inner_record = inner
            .build(fields(vec![(
                "d",
                Value::Date(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
            )]))
            .unwrap();

        let ok = outer.build(fields(vec![
            (
                "pairs",
                Value::Dict(vec![(Value::Text("k".into()), Value::Float(1.5))]),
            ),
            (
                "triple",
                Value::Tuple(vec![
                    Value::Int(1),
                    Value::Text("x".into()),
                    Value::Bytes(vec![1]),
                ]),
            ),
            ("inner", Value::Record(inner_record.clone())),
        ]));
        assert!(ok.is_ok());

        let short_tuple = outer.build(fields(vec![
            ("pairs", Value::Dict(vec![])),
            ("triple", Value::Tuple(vec![Value::Int(1)])),
            ("inner", Value::Record(inner_record)),
        ]));
        assert!(matches!(
            short_tuple,
            Err(ValidationError::TypeMismatch { field, .. }) if field == "triple"
        ));
    }

    #[test]
    fn test_unknown_descriptor_accepts_null() {
        let schema = RecordSchema::new("Loose").field(FieldDefinition::required(
            "anything",
            TypeDescriptor::Unknown("any".into()),
        ));
        let record = schema
            .build(fields(vec![("anything", Value::Null)]))
            .unwrap();
        assert_eq!(record.get("anything"), Some(&Value::Null));
    }

    #[test]
    fn test_union_and_literal() {
        let schema = RecordSchema::new("Choice")
            .field(FieldDefinition::required(
                "either",
                TypeDescriptor::Union(vec![TypeDescriptor::int(), TypeDescriptor::text()]),
            ))
            .field(FieldDefinition::required(
                "lit",
                TypeDescriptor::Literal(vec![Value::Text("a".into()), Value::Text("b".into())]),
            ));

        assert!(schema
            .build(fields(vec![
                ("either", Value::Text("x".into())),
                ("lit", Value::Text("b".into())),
            ]))
            .is_ok());
        assert!(schema
            .build(fields(vec![
                ("either", Value::Bool(true)),
                ("lit", Value::Text("b".into())),
            ]))
            .is_err());
        assert!(schema
            .build(fields(vec![
                ("either", Value::Int(1)),
                ("lit", Value::Text("c".into())),
            ]))
            .is_err());
    }
}
