//! Type descriptor dispatch.
//!
//! `generate_value` is the single recursive entry point: it maps a
//! descriptor and the field's constraints to one sampled value, descending
//! into collections, unions and nested records as needed.

use crate::constraints::{resolve_length, resolve_numeric, ResolveError};
use crate::error::GeneratorError;
use crate::generator::{Diagnostic, RecordGenerator};
use crate::samplers::{
    sample_bool, sample_bytes, sample_date, sample_datetime, sample_number, sample_text,
    sample_time, DateParts,
};
use record_core::{Constraint, PrimitiveKind, TypeDescriptor, Value};

impl RecordGenerator {
    /// Generate one value for `descriptor`.
    ///
    /// `field` names the value in diagnostics and errors. Constraints are
    /// passed unchanged into collection elements and union alternatives and
    /// take effect at the primitive leaves.
    pub fn generate_value(
        &mut self,
        field: &str,
        descriptor: &TypeDescriptor,
        constraints: &[Constraint],
    ) -> Result<Value, GeneratorError> {
        self.generate_value_at(field, descriptor, constraints, 0)
    }

    pub(crate) fn generate_value_at(
        &mut self,
        field: &str,
        descriptor: &TypeDescriptor,
        constraints: &[Constraint],
        depth: usize,
    ) -> Result<Value, GeneratorError> {
        match descriptor {
            TypeDescriptor::Primitive(kind) => self.generate_primitive(field, *kind, constraints),

            // Omission is the record generator's call; here a value is wanted.
            TypeDescriptor::Optional(inner) => {
                self.generate_value_at(field, inner, constraints, depth)
            }

            TypeDescriptor::Union(alternatives) => match self.rng.choose(alternatives) {
                Some(chosen) => self.generate_value_at(field, chosen, constraints, depth),
                None => Ok(self.unhandled(field, descriptor)),
            },

            TypeDescriptor::Literal(values) => match self.rng.choose(values) {
                Some(chosen) => Ok(chosen.clone()),
                None => Ok(self.unhandled(field, descriptor)),
            },

            TypeDescriptor::List(element) => self
                .generate_elements(field, element, constraints, depth)
                .map(Value::List),

            TypeDescriptor::Set(element) => self
                .generate_elements(field, element, constraints, depth)
                .map(|items| Value::Set(Value::set_from(items))),

            TypeDescriptor::FrozenSet(element) => self
                .generate_elements(field, element, constraints, depth)
                .map(|items| Value::FrozenSet(Value::set_from(items))),

            TypeDescriptor::VariadicTuple(element) => self
                .generate_elements(field, element, constraints, depth)
                .map(Value::Tuple),

            TypeDescriptor::FixedTuple(elements) => elements
                .iter()
                .map(|element| self.generate_value_at(field, element, constraints, depth))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Tuple),

            TypeDescriptor::Dict(key, value) => {
                let size = self.collection_size();
                let mut entries = Vec::with_capacity(size);
                for _ in 0..size {
                    let k = self.generate_value_at(field, key, constraints, depth)?;
                    let v = self.generate_value_at(field, value, constraints, depth)?;
                    entries.push((k, v));
                }
                Ok(Value::Dict(Value::dict_from(entries)))
            }

            TypeDescriptor::Nested(nested) => {
                let schema = nested
                    .resolve()
                    .ok_or_else(|| GeneratorError::UnresolvedRecord {
                        field: field.to_string(),
                        record: nested.name().to_string(),
                    })?;
                self.generate_record_at(&schema, depth + 1)
                    .map(Value::Record)
            }

            TypeDescriptor::Unknown(_) => Ok(self.unhandled(field, descriptor)),
        }
    }

    /// Size in `[1, max_sequence_length]` for a variable-size collection.
    fn collection_size(&mut self) -> usize {
        self.rng.size_inclusive(1, self.config.max_sequence_length)
    }

    fn generate_elements(
        &mut self,
        field: &str,
        element: &TypeDescriptor,
        constraints: &[Constraint],
        depth: usize,
    ) -> Result<Vec<Value>, GeneratorError> {
        let size = self.collection_size();
        (0..size)
            .map(|_| self.generate_value_at(field, element, constraints, depth))
            .collect()
    }

    fn generate_primitive(
        &mut self,
        field: &str,
        kind: PrimitiveKind,
        constraints: &[Constraint],
    ) -> Result<Value, GeneratorError> {
        let value = match kind {
            PrimitiveKind::Bool => sample_bool(&mut self.rng),
            PrimitiveKind::Int | PrimitiveKind::Float => {
                let plan = resolve_numeric(
                    constraints,
                    self.config.numeric_min as f64,
                    self.config.numeric_max as f64,
                )
                .map_err(|e| resolve_error(field, kind, e))?;
                sample_number(&mut self.rng, &plan, kind == PrimitiveKind::Int)
            }
            PrimitiveKind::Text | PrimitiveKind::Bytes => {
                let range = resolve_length(
                    constraints,
                    self.config.min_str_length,
                    self.config.max_str_length,
                )
                .map_err(|e| resolve_error(field, kind, e))?;
                if kind == PrimitiveKind::Text {
                    sample_text(&mut self.rng, range)
                } else {
                    sample_bytes(&mut self.rng, range)
                }
            }
            PrimitiveKind::Date => {
                Value::Date(sample_date(&mut self.rng).map_err(|p| invalid_date(field, p))?)
            }
            PrimitiveKind::Time => Value::Time(sample_time(&mut self.rng)),
            PrimitiveKind::DateTime => Value::DateTime(
                sample_datetime(&mut self.rng).map_err(|p| invalid_date(field, p))?,
            ),
        };
        tracing::debug!("Generated {}: {}={}", kind.name(), field, value);
        Ok(value)
    }

    /// Record an unhandled descriptor and yield the absence marker.
    fn unhandled(&mut self, field: &str, descriptor: &TypeDescriptor) -> Value {
        tracing::warn!("Unhandled type for field {}: {}", field, descriptor);
        self.diagnostics.push(Diagnostic {
            field: field.to_string(),
            descriptor: descriptor.to_string(),
        });
        Value::Null
    }
}

fn resolve_error(field: &str, kind: PrimitiveKind, error: ResolveError) -> GeneratorError {
    match error {
        ResolveError::Invalid(reason) => GeneratorError::InvalidConstraint {
            field: field.to_string(),
            reason,
        },
        ResolveError::Unsupported(constraint) => GeneratorError::UnsupportedConstraint {
            field: field.to_string(),
            constraint,
            kind,
        },
    }
}

fn invalid_date(field: &str, parts: DateParts) -> GeneratorError {
    GeneratorError::InvalidDate {
        field: field.to_string(),
        year: parts.year,
        month: parts.month,
        day: parts.day,
    }
}
