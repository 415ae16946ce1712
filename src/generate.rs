//! Generate command handler.

use crate::GenerateArgs;
use anyhow::Context;
use record_core::SchemaSet;
use record_generator::{ConfigOverrides, GeneratorConfig, RecordGenerator};
use std::io::Write;
use std::path::Path;

/// Run the generate command, writing to stdout.
pub fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_generate_to(&args, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Outcome of one generate run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Instances written
    pub written: u64,
    /// Values written as null because their declared type is not generated
    pub unhandled: u64,
}

/// Run the generate command, writing one JSON document per instance to
/// `out`.
pub fn run_generate_to<W: Write>(
    args: &GenerateArgs,
    out: &mut W,
) -> anyhow::Result<GenerateSummary> {
    let schemas = SchemaSet::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;
    let schema = schemas.record(&args.record)?;

    let overrides = load_overrides(args.config.as_deref())?
        .merge(&ConfigOverrides::from(&args.opts));
    let mut config = GeneratorConfig::default();
    config.apply(&overrides);
    let mut generator =
        RecordGenerator::new(config, args.seed).context("Invalid generator configuration")?;

    tracing::info!(
        "Generating {} instance(s) of {} from {:?}",
        args.count,
        schema.name,
        args.schema
    );

    let mut summary = GenerateSummary::default();
    while summary.written < args.count {
        let record = generator
            .generate_record(schema)
            .with_context(|| format!("Failed to generate {} #{}", schema.name, summary.written))?;
        summary.unhandled += generator.take_diagnostics().len() as u64;
        if args.pretty {
            serde_json::to_writer_pretty(&mut *out, &record)?;
        } else {
            serde_json::to_writer(&mut *out, &record)?;
        }
        writeln!(out)?;
        summary.written += 1;
    }

    if summary.unhandled > 0 {
        tracing::warn!(
            "{} value(s) of {} were written as null: their type cannot be generated",
            summary.unhandled,
            schema.name
        );
    }
    tracing::info!("Wrote {} instance(s) of {}", summary.written, schema.name);
    Ok(summary)
}

fn load_overrides(path: Option<&Path>) -> anyhow::Result<ConfigOverrides> {
    let Some(path) = path else {
        return Ok(ConfigOverrides::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {path:?}"))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {path:?}"))
}
