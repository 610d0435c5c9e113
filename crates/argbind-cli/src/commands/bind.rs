use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use argbind_core::{DynamicTarget, Outcome};

use crate::commands::describe::render_usage;
use crate::reader::load;

/// Bind `args` against the schema file. Returns the report and whether the
/// invocation failed.
pub fn run_bind(schema_path: &Path, args: &[String], format: &str) -> Result<(String, bool)> {
    let loaded = load(schema_path)?;
    let parsed = loaded
        .parser
        .parse_with_schema(loaded.schema.clone(), args, DynamicTarget::new())?;
    let outcome = parsed.check();
    let failed = outcome.is_err();
    match &outcome {
        Ok(result) => debug!(?result, bound = parsed.target().len(), "bind finished"),
        Err(e) => debug!(error = %e, failures = parsed.exceptions().len(), "bind failed"),
    }

    if format == "json" {
        let exceptions: Vec<String> =
            parsed.exceptions().iter().map(ToString::to_string).collect();
        let output = serde_json::json!({
            "success": !failed,
            "helpRequested": parsed.help_requested(),
            "values": parsed.target().to_json(),
            "error": outcome.as_ref().err().map(ToString::to_string),
            "exceptions": exceptions,
        });
        let json = serde_json::to_string_pretty(&output).context("JSON serialization error")?;
        return Ok((json, failed));
    }

    let output = match outcome {
        Ok(Outcome::HelpRequested) => {
            let help = loaded.parser.describe(&loaded.schema);
            render_usage(&loaded.schema, &help, loaded.parser.syntax())
        }
        Ok(Outcome::Pass) => {
            let mut lines: Vec<String> = parsed
                .target()
                .iter()
                .map(|(member, value)| format!("{member} = {value}"))
                .collect();
            let count = lines.len();
            let word = if count == 1 { "switch" } else { "switches" };
            lines.push(format!("OK: {count} {word} bound."));
            lines.join("\n")
        }
        Err(e) => {
            let extra = parsed.exceptions().len().saturating_sub(1);
            if extra > 0 {
                format!("error: {e} ({extra} more argument errors)")
            } else {
                format!("error: {e}")
            }
        }
    };

    Ok((output, failed))
}
