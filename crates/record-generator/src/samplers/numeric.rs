//! Boolean and numeric samplers.

use crate::constraints::NumericPlan;
use crate::rng::RandomSource;
use record_core::Value;

/// Draw a uniform boolean.
pub fn sample_bool(rng: &mut RandomSource) -> Value {
    Value::Bool(rng.next_bool())
}

/// Draw a number according to a resolved plan.
///
/// Intervals are sampled as reals in `[low, high)`; integer fields truncate
/// the draw toward zero. Multiple plans draw the multiplier and scale it.
pub fn sample_number(rng: &mut RandomSource, plan: &NumericPlan, integer: bool) -> Value {
    match *plan {
        NumericPlan::Interval { low, high } => {
            let v = rng.uniform(low, high);
            if integer {
                Value::Int(v.trunc() as i64)
            } else {
                Value::Float(v)
            }
        }
        NumericPlan::Multiples { start, end, step } => {
            let multiplier = rng.int_inclusive(start, end);
            if integer {
                Value::Int(multiplier * step as i64)
            } else {
                Value::Float(multiplier as f64 * step)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_interval() {
        let mut rng = RandomSource::seeded(42);
        let plan = NumericPlan::Interval {
            low: 10.0,
            high: 20.0,
        };

        for _ in 0..200 {
            match sample_number(&mut rng, &plan, true) {
                Value::Int(v) => assert!((10..=20).contains(&v)),
                other => panic!("Expected Int value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_float_interval() {
        let mut rng = RandomSource::seeded(42);
        let plan = NumericPlan::Interval {
            low: 0.0,
            high: 100.0,
        };

        for _ in 0..200 {
            match sample_number(&mut rng, &plan, false) {
                Value::Float(v) => assert!((0.0..=100.0).contains(&v)),
                other => panic!("Expected Float value, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_interval_truncates_toward_zero() {
        let mut rng = RandomSource::seeded(7);
        let plan = NumericPlan::Interval {
            low: -5.0,
            high: -1.0,
        };

        for _ in 0..200 {
            let v = sample_number(&mut rng, &plan, true).as_i64().unwrap();
            assert!((-5..=-1).contains(&v));
        }
    }

    #[test]
    fn test_multiples() {
        let mut rng = RandomSource::seeded(42);
        let plan = NumericPlan::Multiples {
            start: 3,
            end: 6,
            step: 5.0,
        };

        for _ in 0..100 {
            let v = sample_number(&mut rng, &plan, true).as_i64().unwrap();
            assert_eq!(v % 5, 0);
            assert!((15..=30).contains(&v));
        }
        match sample_number(&mut rng, &plan, false) {
            Value::Float(v) => assert_eq!(v % 5.0, 0.0),
            other => panic!("Expected Float value, got {other:?}"),
        }
    }

    #[test]
    fn test_bool_takes_both_values() {
        let mut rng = RandomSource::seeded(42);
        let draws: Vec<Value> = (0..64).map(|_| sample_bool(&mut rng)).collect();
        assert!(draws.contains(&Value::Bool(true)));
        assert!(draws.contains(&Value::Bool(false)));
    }
}
