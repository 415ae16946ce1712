//! Command-line interface for recordgen
//!
//! # Usage Examples
//!
//! ```bash
//! # Five instances of `Order`, reproducible across runs
//! recordgen generate --schema shop.yaml --record Order --count 5 --seed 42
//!
//! # Same, with the seed from the environment and pretty output
//! RECORDGEN_SEED=42 recordgen generate --schema shop.yaml --record Order --pretty
//!
//! # Validate a schema and list its fields
//! recordgen check --schema shop.yaml
//! ```
//!
//! Logs go to stderr and are filtered with `RUST_LOG`; stdout carries only
//! generated JSON.

use clap::{Parser, Subcommand};
use recordgen::{run_check, run_generate, CheckArgs, GenerateArgs};

#[derive(Parser)]
#[command(name = "recordgen")]
#[command(about = "Generate seeded, constraint-aware fixture records from YAML schemas")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate record instances as JSON lines
    Generate(GenerateArgs),

    /// Compile a schema and describe its records
    Check(CheckArgs),
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Check(args) => run_check(args),
    }
}
