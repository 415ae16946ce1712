//! Generation tunables.

use serde::{Deserialize, Serialize};

/// Configuration error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `numeric_min` above `numeric_max`
    #[error("numeric_min ({min}) is greater than numeric_max ({max})")]
    InvertedNumericRange { min: i64, max: i64 },

    /// `min_str_length` above `max_str_length`
    #[error("min_str_length ({min}) is greater than max_str_length ({max})")]
    InvertedLengthRange { min: usize, max: usize },

    /// Collections need room for at least one element
    #[error("max_sequence_length must be at least 1")]
    EmptySequenceBound,

    /// A probability outside `[0, 1]`
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
}

/// Tunables for one generator.
///
/// Every option has a built-in default. Values are changed either with the
/// `with_*` builder methods or by applying [`ConfigOverrides`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lower bound for unconstrained numerics
    pub numeric_min: i64,

    /// Upper bound for unconstrained numerics
    pub numeric_max: i64,

    /// Lower bound for unconstrained text/bytes length
    pub min_str_length: usize,

    /// Upper bound for unconstrained text/bytes length
    pub max_str_length: usize,

    /// Upper bound for every variable-size collection
    pub max_sequence_length: usize,

    /// Probability an optional-typed field is generated as absent
    pub null_chance: f64,

    /// Probability a non-required field is left unset
    pub default_chance: f64,

    /// Deepest allowed record nesting
    pub max_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            numeric_min: -1_000_000,
            numeric_max: 1_000_000,
            min_str_length: 4,
            max_str_length: 100,
            max_sequence_length: 100,
            null_chance: 0.2,
            default_chance: 0.6,
            max_depth: 32,
        }
    }
}

impl GeneratorConfig {
    pub fn with_numeric_min(mut self, value: i64) -> Self {
        self.numeric_min = value;
        self
    }

    pub fn with_numeric_max(mut self, value: i64) -> Self {
        self.numeric_max = value;
        self
    }

    pub fn with_min_str_length(mut self, value: usize) -> Self {
        self.min_str_length = value;
        self
    }

    pub fn with_max_str_length(mut self, value: usize) -> Self {
        self.max_str_length = value;
        self
    }

    pub fn with_max_sequence_length(mut self, value: usize) -> Self {
        self.max_sequence_length = value;
        self
    }

    pub fn with_null_chance(mut self, value: f64) -> Self {
        self.null_chance = value;
        self
    }

    pub fn with_default_chance(mut self, value: f64) -> Self {
        self.default_chance = value;
        self
    }

    pub fn with_max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Overwrite every option present in `overrides`.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.numeric_min {
            self.numeric_min = v;
        }
        if let Some(v) = overrides.numeric_max {
            self.numeric_max = v;
        }
        if let Some(v) = overrides.min_str_length {
            self.min_str_length = v;
        }
        if let Some(v) = overrides.max_str_length {
            self.max_str_length = v;
        }
        if let Some(v) = overrides.max_sequence_length {
            self.max_sequence_length = v;
        }
        if let Some(v) = overrides.null_chance {
            self.null_chance = v;
        }
        if let Some(v) = overrides.default_chance {
            self.default_chance = v;
        }
        if let Some(v) = overrides.max_depth {
            self.max_depth = v;
        }
    }

    /// Check that the defaults can be sampled from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.numeric_min > self.numeric_max {
            return Err(ConfigError::InvertedNumericRange {
                min: self.numeric_min,
                max: self.numeric_max,
            });
        }
        if self.min_str_length > self.max_str_length {
            return Err(ConfigError::InvertedLengthRange {
                min: self.min_str_length,
                max: self.max_str_length,
            });
        }
        if self.max_sequence_length == 0 {
            return Err(ConfigError::EmptySequenceBound);
        }
        for (name, value) in [
            ("null_chance", self.null_chance),
            ("default_chance", self.default_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

/// A partial configuration; unset options keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub numeric_min: Option<i64>,
    pub numeric_max: Option<i64>,
    pub min_str_length: Option<usize>,
    pub max_str_length: Option<usize>,
    pub max_sequence_length: Option<usize>,
    pub null_chance: Option<f64>,
    pub default_chance: Option<f64>,
    pub max_depth: Option<usize>,
}

impl ConfigOverrides {
    /// Layer `other` on top of `self`; options set in `other` win.
    pub fn merge(mut self, other: &ConfigOverrides) -> Self {
        self.numeric_min = other.numeric_min.or(self.numeric_min);
        self.numeric_max = other.numeric_max.or(self.numeric_max);
        self.min_str_length = other.min_str_length.or(self.min_str_length);
        self.max_str_length = other.max_str_length.or(self.max_str_length);
        self.max_sequence_length = other.max_sequence_length.or(self.max_sequence_length);
        self.null_chance = other.null_chance.or(self.null_chance);
        self.default_chance = other.default_chance.or(self.default_chance);
        self.max_depth = other.max_depth.or(self.max_depth);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.numeric_min, -1_000_000);
        assert_eq!(config.numeric_max, 1_000_000);
        assert_eq!(config.min_str_length, 4);
        assert_eq!(config.max_str_length, 100);
        assert_eq!(config.max_sequence_length, 100);
        assert_eq!(config.null_chance, 0.2);
        assert_eq!(config.default_chance, 0.6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_only_touches_present_options() {
        let mut config = GeneratorConfig::default();
        config.apply(&ConfigOverrides {
            numeric_min: Some(10),
            numeric_max: Some(20),
            ..Default::default()
        });
        config.apply(&ConfigOverrides {
            numeric_max: Some(30),
            ..Default::default()
        });

        assert_eq!(config.numeric_min, 10);
        assert_eq!(config.numeric_max, 30);
        assert_eq!(config.max_str_length, 100);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            GeneratorConfig::default()
                .with_numeric_min(5)
                .with_numeric_max(1)
                .validate(),
            Err(ConfigError::InvertedNumericRange { min: 5, max: 1 })
        );
        assert_eq!(
            GeneratorConfig::default()
                .with_min_str_length(9)
                .with_max_str_length(3)
                .validate(),
            Err(ConfigError::InvertedLengthRange { min: 9, max: 3 })
        );
        assert_eq!(
            GeneratorConfig::default()
                .with_max_sequence_length(0)
                .validate(),
            Err(ConfigError::EmptySequenceBound)
        );
        assert!(matches!(
            GeneratorConfig::default().with_null_chance(1.5).validate(),
            Err(ConfigError::ProbabilityOutOfRange { name: "null_chance", .. })
        ));
    }

    #[test]
    fn test_overrides_from_yaml() {
        let overrides: ConfigOverrides =
            serde_yaml::from_str("numeric_min: 10\ndefault_chance: 1.0\n").unwrap();
        assert_eq!(overrides.numeric_min, Some(10));
        assert_eq!(overrides.default_chance, Some(1.0));
        assert_eq!(overrides.max_str_length, None);
    }

    #[test]
    fn test_merge_prefers_later_layer() {
        let file = ConfigOverrides {
            numeric_min: Some(1),
            numeric_max: Some(2),
            ..Default::default()
        };
        let flags = ConfigOverrides {
            numeric_max: Some(9),
            ..Default::default()
        };
        let merged = file.merge(&flags);
        assert_eq!(merged.numeric_min, Some(1));
        assert_eq!(merged.numeric_max, Some(9));
    }
}
