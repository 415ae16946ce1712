//! Generator error types.

use crate::config::ConfigError;
use record_core::{Constraint, PrimitiveKind, ValidationError};

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A declared field has no resolvable type
    #[error("Field '{field}' of record '{record}' has no type information")]
    MissingTypeInformation { record: String, field: String },

    /// Declared bounds contradict each other or admit no value
    #[error("Invalid constraint on field '{field}': {reason}")]
    InvalidConstraint { field: String, reason: String },

    /// A constraint kind the target primitive does not support
    #[error("Unsupported constraint {constraint} on field '{field}' of kind {}", .kind.name())]
    UnsupportedConstraint {
        field: String,
        constraint: Constraint,
        kind: PrimitiveKind,
    },

    /// The assembled instance failed the record's own validation
    #[error(transparent)]
    SchemaValidation(#[from] ValidationError),

    /// Record nesting went deeper than the configured cap
    #[error("Record '{record}' nested deeper than the limit of {limit}")]
    RecursionLimit { record: String, limit: usize },

    /// A back-reference outlived the schema set it points into
    #[error("Nested record '{record}' for field '{field}' is no longer available")]
    UnresolvedRecord { field: String, record: String },

    /// The simplified calendar produced a day the real calendar lacks
    #[error("Generated date {year:04}-{month:02}-{day:02} for field '{field}' does not exist")]
    InvalidDate {
        field: String,
        year: i32,
        month: u32,
        day: u32,
    },

    /// Configuration cannot be sampled from
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
