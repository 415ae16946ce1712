//! Constraint resolver.
//!
//! Collapses a default interval and a field's declared bounds into one
//! sampling plan. Bounds are applied in canonical order, each against the
//! interval left by the ones before it; a repeated bound of the same kind
//! simply overwrites the earlier one.

use record_core::constraint::canonical_order;
use record_core::Constraint;

/// Why a set of bounds could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Bounds contradict each other or admit no value
    Invalid(String),
    /// Constraint kind not applicable to the target
    Unsupported(Constraint),
}

/// Resolved numeric sampling plan.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericPlan {
    /// Draw uniformly from `[low, high]`
    Interval { low: f64, high: f64 },
    /// Draw a multiplier uniformly from `[start, end]` and scale by `step`
    Multiples { start: i64, end: i64, step: f64 },
}

/// Resolved inclusive length interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub low: usize,
    pub high: usize,
}

/// Resolve numeric bounds against `[low, high]`.
///
/// Exclusive bounds use integer arithmetic: `gt = v` narrows the low end to
/// `v + 1` and `lt = v` the high end to `v - 1`, for float fields too.
/// `multiple_of` ends resolution: the interval built so far determines the
/// multiplier range and any later constraint is not consulted.
pub fn resolve_numeric(
    constraints: &[Constraint],
    low: f64,
    high: f64,
) -> Result<NumericPlan, ResolveError> {
    let (mut low, mut high) = (low, high);

    for constraint in canonical_order(constraints) {
        match *constraint {
            Constraint::GreaterEq(v) => {
                if v >= high {
                    return Err(ResolveError::Invalid(format!(
                        "ge value ({v}) cannot be greater than high bound ({high})"
                    )));
                }
                low = v;
            }
            Constraint::GreaterThan(v) => {
                if v > high + 1.0 {
                    return Err(ResolveError::Invalid(format!(
                        "gt value ({v}) cannot be greater than high bound ({})",
                        high + 1.0
                    )));
                }
                low = v + 1.0;
            }
            Constraint::LessEq(v) => {
                if v <= low {
                    return Err(ResolveError::Invalid(format!(
                        "le value ({v}) cannot be less than low bound ({low})"
                    )));
                }
                high = v;
            }
            Constraint::LessThan(v) => {
                if v < low - 1.0 {
                    return Err(ResolveError::Invalid(format!(
                        "lt value ({v}) cannot be less than low bound ({})",
                        low - 1.0
                    )));
                }
                high = v - 1.0;
            }
            Constraint::MultipleOf(step) => {
                if step.fract() != 0.0 || !step.is_finite() {
                    return Err(ResolveError::Unsupported(constraint.clone()));
                }
                if step <= 0.0 {
                    return Err(ResolveError::Invalid(format!(
                        "multiple_of must be positive, got {step}"
                    )));
                }
                let start = (low / step).ceil();
                let end = (high / step).floor();
                if start > end {
                    return Err(ResolveError::Invalid(format!(
                        "no multiples of {step} in range {low}..={high}"
                    )));
                }
                return Ok(NumericPlan::Multiples {
                    start: start as i64,
                    end: end as i64,
                    step,
                });
            }
            Constraint::MinLength(_) | Constraint::MaxLength(_) => {
                return Err(ResolveError::Unsupported(constraint.clone()));
            }
        }
    }

    Ok(NumericPlan::Interval { low, high })
}

/// Resolve length bounds against `[low, high]`.
pub fn resolve_length(
    constraints: &[Constraint],
    low: usize,
    high: usize,
) -> Result<LengthRange, ResolveError> {
    let mut range = LengthRange { low, high };

    for constraint in canonical_order(constraints) {
        match *constraint {
            Constraint::MinLength(n) => {
                if n > range.high {
                    return Err(ResolveError::Invalid(format!(
                        "min_length ({n}) cannot be greater than current high bound ({})",
                        range.high
                    )));
                }
                range.low = n;
            }
            Constraint::MaxLength(n) => {
                if n < range.low {
                    return Err(ResolveError::Invalid(format!(
                        "max_length ({n}) cannot be less than current low bound ({})",
                        range.low
                    )));
                }
                range.high = n;
            }
            _ => return Err(ResolveError::Unsupported(constraint.clone())),
        }
    }

    Ok(range)
}
