//! Core types for the recordgen fixture generator.
//!
//! This crate provides the record side of generation, the part the
//! generator consumes but does not own:
//!
//! - [`TypeDescriptor`] - Closed description of a field's declared shape
//! - [`Constraint`] - Numeric and length bounds attached to a field
//! - [`RecordSchema`] - Ordered field definitions of one record type
//! - [`SchemaSet`] - Record schemas compiled from a YAML document
//! - [`Value`] / [`Record`] - Generated data and validated instances
//! - [`Model`] - Bridge between typed Rust structs and record schemas
//!
//! # Architecture
//!
//! ```text
//! record-core (this crate)
//!    │
//!    ├─── record-generator  (walks descriptors, builds records via RecordSchema::build)
//!    │
//!    └─── recordgen         (CLI: loads SchemaSet from YAML, prints JSON)
//! ```
//!
//! # Example
//!
//! ```rust
//! use record_core::{Constraint, FieldDefinition, RecordSchema, TypeDescriptor, Value};
//! use std::collections::HashMap;
//!
//! let schema = RecordSchema::new("Score").field(
//!     FieldDefinition::required("points", TypeDescriptor::int())
//!         .constraint(Constraint::GreaterEq(0.0))
//!         .constraint(Constraint::LessEq(100.0)),
//! );
//!
//! let record = schema
//!     .build(HashMap::from([("points".to_string(), Value::Int(42))]))
//!     .unwrap();
//! assert_eq!(record.get("points"), Some(&Value::Int(42)));
//! ```

pub mod constraint;
pub mod model;
pub mod schema;
pub mod types;
pub mod validate;
pub mod values;

// Re-exports for convenience
pub use constraint::{Constraint, ConstraintFamily};
pub use model::Model;
pub use schema::{FieldDefinition, RecordSchema, SchemaError, SchemaSet};
pub use types::{PrimitiveKind, RecordRef, TypeDescriptor, TypeSpec};
pub use validate::ValidationError;
pub use values::{Record, Value};
