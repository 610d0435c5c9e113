use std::path::Path;

use anyhow::{Context, Result};

use argbind_core::{Schema, SwitchHelp, SwitchSyntax};

use crate::reader::load;

pub fn run_describe(schema_path: &Path, format: &str) -> Result<String> {
    let loaded = load(schema_path)?;
    let help = loaded.parser.describe(&loaded.schema);

    match format {
        "json" => serde_json::to_string_pretty(&serde_json::json!({
            "owner": loaded.schema.owner(),
            "helpCommands": loaded.parser.help().commands,
            "switches": help,
        }))
        .context("JSON serialization error"),
        _ => Ok(render_usage(&loaded.schema, &help, loaded.parser.syntax())),
    }
}

/// Plain usage listing, one block per switch.
pub fn render_usage(schema: &Schema, help: &[SwitchHelp], syntax: &SwitchSyntax) -> String {
    let prefix = syntax.prefix_chars().first().copied().unwrap_or('/');
    let delimiter = syntax.delimiter_chars().first().copied().unwrap_or(':');

    let mut lines = vec![format!("{} switches:", schema.owner())];
    for h in help {
        let mut line = format!("  {prefix}{}{delimiter}<{}>", h.name, h.type_name);
        if h.required {
            line.push_str(" (required)");
        }
        if let Some(text) = &h.help {
            line.push_str("  ");
            line.push_str(text);
        }
        lines.push(line);
        if !h.accepted_values.is_empty() {
            lines.push(format!("      values: {}", h.accepted_values.join(", ")));
        }
    }
    lines.join("\n")
}
