//! Record generator.

use crate::config::{ConfigOverrides, GeneratorConfig};
use crate::error::GeneratorError;
use crate::rng::RandomSource;
use record_core::{Model, Record, RecordSchema, Value};
use std::collections::HashMap;

/// An unhandled descriptor met during generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Field whose value was replaced by `Null`
    pub field: String,
    /// Display form of the unhandled descriptor
    pub descriptor: String,
}

/// Generates validated record instances from schemas.
///
/// One generator owns one random source; every draw made while building a
/// record, nested records included, advances that source. Two generators
/// with the same seed and configuration produce identical records for
/// identical call sequences.
#[derive(Debug)]
pub struct RecordGenerator {
    pub(crate) config: GeneratorConfig,
    pub(crate) rng: RandomSource,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl RecordGenerator {
    /// Create a generator, seeding from OS entropy when `seed` is `None`.
    pub fn new(config: GeneratorConfig, seed: Option<u64>) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: RandomSource::new(seed),
            diagnostics: Vec::new(),
        })
    }

    /// Create a reproducible generator with the default configuration.
    pub fn seeded(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: RandomSource::seeded(seed),
            diagnostics: Vec::new(),
        }
    }

    /// Apply configuration overrides, keeping the random source as is.
    pub fn configure(mut self, overrides: &ConfigOverrides) -> Result<Self, GeneratorError> {
        let mut config = self.config.clone();
        config.apply(overrides);
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Get the active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Get the seed this generator was created with, if any.
    pub fn seed(&self) -> Option<u64> {
        self.rng.seed()
    }

    /// Drain the unhandled-descriptor diagnostics of the latest record.
    ///
    /// Each call to [`generate_record`](Self::generate_record) starts a
    /// fresh list, so a long-running generator does not accumulate them.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Generate one validated instance of `schema`.
    ///
    /// Fields are visited in declaration order. A field that is not
    /// required is left unset with probability `default_chance`, so the
    /// record takes its default. Otherwise an optional-typed field is set to
    /// `Null` with probability `null_chance`, and any other field gets a
    /// sampled value.
    ///
    /// At `max_depth`, fields that would nest another record are left unset
    /// when they are not required, or set to `Null` when optional-typed, so
    /// self-referential schemas terminate.
    pub fn generate_record(&mut self, schema: &RecordSchema) -> Result<Record, GeneratorError> {
        self.diagnostics.clear();
        self.generate_record_at(schema, 0)
    }

    pub(crate) fn generate_record_at(
        &mut self,
        schema: &RecordSchema,
        depth: usize,
    ) -> Result<Record, GeneratorError> {
        if depth > self.config.max_depth {
            return Err(GeneratorError::RecursionLimit {
                record: schema.name.clone(),
                limit: self.config.max_depth,
            });
        }

        let mut values = HashMap::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let descriptor =
                field
                    .descriptor
                    .as_ref()
                    .ok_or_else(|| GeneratorError::MissingTypeInformation {
                        record: schema.name.clone(),
                        field: field.name.clone(),
                    })?;

            let at_limit = depth >= self.config.max_depth && descriptor.references_records();

            if !field.required && (at_limit || self.rng.chance(self.config.default_chance)) {
                tracing::debug!("Leaving {}.{} unset", schema.name, field.name);
                continue;
            }

            let value = if descriptor.is_optional()
                && (at_limit || self.rng.chance(self.config.null_chance))
            {
                Value::Null
            } else {
                self.generate_value_at(&field.name, descriptor, &field.constraints, depth)?
            };
            tracing::debug!("Setting {}.{} = {}", schema.name, field.name, value);
            values.insert(field.name.clone(), value);
        }

        let record = schema.build(values)?;
        tracing::info!("Generated instance of {}", schema.name);
        Ok(record)
    }

    /// Generate one instance of a typed model.
    pub fn generate<M: Model>(&mut self) -> Result<M, GeneratorError> {
        let record = self.generate_record(&M::schema())?;
        Ok(M::from_record(record)?)
    }

    /// Iterate over `count` generated instances of `schema`.
    pub fn records<'a>(&'a mut self, schema: &'a RecordSchema, count: u64) -> RecordIterator<'a> {
        RecordIterator {
            generator: self,
            schema,
            remaining: count,
        }
    }
}

/// Iterator over generated records, one draw sequence per call to `next`.
///
/// A failed record is yielded as an `Err`; iteration continues afterwards
/// unless the caller stops.
pub struct RecordIterator<'a> {
    generator: &'a mut RecordGenerator,
    schema: &'a RecordSchema,
    remaining: u64,
}

impl Iterator for RecordIterator<'_> {
    type Item = Result<Record, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.generate_record(self.schema))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIterator<'_> {}
