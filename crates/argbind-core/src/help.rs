use serde::{Deserialize, Serialize};

use crate::catalogs::DEFAULT_HELP_COMMANDS;
use crate::parsers::TypeParserRegistry;
use crate::schema::Schema;
use crate::types::eq_ignore_case;

/// Arguments that turn an invocation into a help request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpOptions {
    pub commands: Vec<String>,
}

impl HelpOptions {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// True when any argument is a help command, ignoring case.
    pub fn is_help_request<S: AsRef<str>>(&self, args: &[S]) -> bool {
        args.iter()
            .any(|arg| self.commands.iter().any(|c| eq_ignore_case(c, arg.as_ref())))
    }
}

impl Default for HelpOptions {
    fn default() -> Self {
        Self::new(DEFAULT_HELP_COMMANDS.iter().copied())
    }
}

/// Usage entry for one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchHelp {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    #[serde(rename = "acceptedValues", skip_serializing_if = "Vec::is_empty")]
    pub accepted_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Describe every switch of `schema` in declaration order.
///
/// Accepted values are the declared allowed list, or what the switch's
/// parser reports (enum members, catalog names, `true`/`false`).
pub fn describe(schema: &Schema, registry: &TypeParserRegistry) -> Vec<SwitchHelp> {
    schema
        .switches()
        .iter()
        .map(|def| SwitchHelp {
            name: def.name.clone(),
            type_name: def.value_type.to_string(),
            required: def.required,
            accepted_values: if def.allowed_values.is_empty() {
                registry.accepted_values(&def.value_type)
            } else {
                def.allowed_values.clone()
            },
            help: def.help.clone(),
        })
        .collect()
}
