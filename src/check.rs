//! Check command handler.

use crate::CheckArgs;
use anyhow::Context;
use record_core::{FieldDefinition, SchemaSet};
use std::io::Write;

/// Run the check command, writing to stdout.
pub fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_check_to(&args, &mut out)
}

/// Compile the schema and describe every record and field.
///
/// ```text
/// User
///   id: int required [ge=1]
///   nickname: optional[text] default=null [max_length=12]
/// ```
pub fn run_check_to<W: Write>(args: &CheckArgs, out: &mut W) -> anyhow::Result<()> {
    let schemas = SchemaSet::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    for record in schemas.records() {
        writeln!(out, "{}", record.name)?;
        for field in &record.fields {
            writeln!(out, "  {}", describe_field(field))?;
        }
    }

    tracing::info!(
        "Schema version {} with {} record(s) is valid",
        schemas.version,
        schemas.record_names().len()
    );
    Ok(())
}

fn describe_field(field: &FieldDefinition) -> String {
    let mut line = match &field.descriptor {
        Some(descriptor) => format!("{}: {descriptor}", field.name),
        None => format!("{}: <untyped>", field.name),
    };

    match &field.default {
        _ if field.required => line.push_str(" required"),
        Some(default) => line.push_str(&format!(" default={default}")),
        None => line.push_str(" default=null"),
    }

    if !field.constraints.is_empty() {
        let constraints: Vec<String> = field.constraints.iter().map(|c| c.to_string()).collect();
        line.push_str(&format!(" [{}]", constraints.join(", ")));
    }
    line
}
