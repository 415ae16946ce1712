//! recordgen Library
//!
//! Command handlers behind the `recordgen` binary. Schemas are loaded from
//! YAML into a [`record_core::SchemaSet`] and filled by a seeded
//! [`record_generator::RecordGenerator`].
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten reproducible instances of `User`, one JSON document per line
//! recordgen generate --schema schema.yaml --record User --count 10 --seed 42
//!
//! # Tighter default bounds, options layered over a config file
//! recordgen generate --schema schema.yaml --record User \
//!   --config generator.yaml --numeric-min 0 --numeric-max 100
//!
//! # Print the compiled schema
//! recordgen check --schema schema.yaml
//! ```

use clap::Parser;
use record_generator::ConfigOverrides;
use std::path::PathBuf;

pub mod check;
pub mod generate;

pub use check::{run_check, run_check_to};
pub use generate::{run_generate, run_generate_to, GenerateSummary};

/// Generator options settable from the command line.
///
/// Options left unset fall back to the config file, then to built-in
/// defaults.
#[derive(Parser, Clone, Debug, Default)]
pub struct GeneratorOpts {
    /// Lower bound for unconstrained numbers
    #[arg(long, allow_hyphen_values = true)]
    pub numeric_min: Option<i64>,

    /// Upper bound for unconstrained numbers
    #[arg(long, allow_hyphen_values = true)]
    pub numeric_max: Option<i64>,

    /// Minimum length for unconstrained text and bytes
    #[arg(long)]
    pub min_str_length: Option<usize>,

    /// Maximum length for unconstrained text and bytes
    #[arg(long)]
    pub max_str_length: Option<usize>,

    /// Maximum element count for collections
    #[arg(long)]
    pub max_sequence_length: Option<usize>,

    /// Probability an optional-typed field is null
    #[arg(long)]
    pub null_chance: Option<f64>,

    /// Probability a non-required field keeps its default
    #[arg(long)]
    pub default_chance: Option<f64>,

    /// Deepest allowed record nesting
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl From<&GeneratorOpts> for ConfigOverrides {
    fn from(opts: &GeneratorOpts) -> Self {
        Self {
            numeric_min: opts.numeric_min,
            numeric_max: opts.numeric_max,
            min_str_length: opts.min_str_length,
            max_str_length: opts.max_str_length,
            max_sequence_length: opts.max_sequence_length,
            null_chance: opts.null_chance,
            default_chance: opts.default_chance,
            max_depth: opts.max_depth,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct GenerateArgs {
    /// Path to the YAML schema file
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,

    /// Name of the record to generate
    #[arg(long)]
    pub record: String,

    /// Number of instances to generate
    #[arg(long, default_value = "1")]
    pub count: u64,

    /// Seed for reproducible output (random when omitted)
    #[arg(long, env = "RECORDGEN_SEED")]
    pub seed: Option<u64>,

    /// YAML file with generator options
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub opts: GeneratorOpts,

    /// Pretty-print each JSON document
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct CheckArgs {
    /// Path to the YAML schema file
    #[arg(long, value_name = "PATH")]
    pub schema: PathBuf,
}
