//! Primitive samplers.
//!
//! Each sampler draws one scalar value from an already resolved interval.
//! Constraint handling lives in [`crate::constraints`]; these routines only
//! consume what the resolver hands them.

pub mod numeric;
pub mod temporal;
pub mod text;

pub use numeric::{sample_bool, sample_number};
pub use temporal::{sample_date, sample_datetime, sample_time, DateParts};
pub use text::{sample_bytes, sample_text, ALPHABET};
