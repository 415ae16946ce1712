//! Seeded, constraint-aware record generator.
//!
//! This crate provides the `RecordGenerator` which fills record schemas with
//! random values that satisfy each field's declared type and bounds. The
//! generator owns a seeded RNG so that the same seed and configuration
//! reproduce the same records.
//!
//! # Architecture
//!
//! ```text
//! RecordSchema (record-core)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │   RecordGenerator    │
//! │                      │
//! │  - config            │
//! │  - rng (StdRng)      │
//! └──────────┬───────────┘
//!            │  per field: omit / null / generate_value
//!            ▼
//!   constraints ──► samplers ──► Value
//!            │
//!            ▼
//!   RecordSchema::build ──► Record
//! ```
//!
//! # Example
//!
//! ```rust
//! use record_core::{Constraint, FieldDefinition, RecordSchema, TypeDescriptor};
//! use record_generator::RecordGenerator;
//!
//! let schema = RecordSchema::new("Reading")
//!     .field(
//!         FieldDefinition::required("celsius", TypeDescriptor::float())
//!             .constraint(Constraint::GreaterEq(-40.0))
//!             .constraint(Constraint::LessEq(60.0)),
//!     )
//!     .field(FieldDefinition::required("tags", TypeDescriptor::list(TypeDescriptor::text())));
//!
//! let mut generator = RecordGenerator::seeded(42);
//! let record = generator.generate_record(&schema).unwrap();
//! let celsius = record.get("celsius").unwrap().as_f64().unwrap();
//! assert!((-40.0..=60.0).contains(&celsius));
//! ```
//!
//! # Supported types
//!
//! - Primitives: `bool`, `int`, `float`, `text`, `bytes`, `date`, `time`, `datetime`
//! - `optional`, `union` and `literal`
//! - `list`, `set`, `frozen_set`, `dict`, fixed and variadic `tuple`
//! - Nested records, up to `max_depth` levels deep
//!
//! Any other descriptor produces `Null` and a [`Diagnostic`].

pub mod config;
pub mod constraints;
mod dispatch;
pub mod error;
pub mod generator;
pub mod rng;
pub mod samplers;

pub use config::{ConfigError, ConfigOverrides, GeneratorConfig};
pub use error::GeneratorError;
pub use generator::{Diagnostic, RecordGenerator, RecordIterator};
pub use rng::RandomSource;
