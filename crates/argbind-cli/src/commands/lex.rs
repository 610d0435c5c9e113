use anyhow::{Context, Result};

use argbind_core::{lex, SwitchSyntax, SyntaxConfig};

/// Tokenize `args` without a schema. Returns the report and the number of
/// malformed arguments.
pub fn run_lex(config: &SyntaxConfig, args: &[String], format: &str) -> Result<(String, usize)> {
    let syntax = SwitchSyntax::from_config(config)?;
    let results = lex(args, &syntax);
    let failures = results.iter().filter(|r| r.is_err()).count();

    if format == "json" {
        let tokens: Vec<serde_json::Value> = results
            .iter()
            .map(|r| match r {
                Ok(t) => serde_json::json!({
                    "position": t.position,
                    "name": t.name,
                    "rawValue": t.raw_value,
                }),
                Err(e) => serde_json::json!({
                    "position": e.position(),
                    "error": e.to_string(),
                }),
            })
            .collect();
        let json = serde_json::to_string_pretty(&serde_json::json!({ "tokens": tokens }))
            .context("JSON serialization error")?;
        return Ok((json, failures));
    }

    let mut lines: Vec<String> = results
        .iter()
        .map(|r| match r {
            Ok(t) => format!("{}: {} = \"{}\"", t.position, t.name, t.raw_value),
            Err(e) => format!("{}: error: {e}", e.position()),
        })
        .collect();
    let word = if failures == 1 { "error" } else { "errors" };
    lines.push(format!("{} tokens, {failures} {word}.", results.len() - failures));

    Ok((lines.join("\n"), failures))
}
