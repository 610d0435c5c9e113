use tracing::debug;

use crate::error::Violation;
use crate::schema::{Schema, SwitchTarget};
use crate::types::{eq_ignore_case, SwitchDefinition};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Required,
    AllowedValues,
}

/// A built-in check bound to one switch of a schema.
#[derive(Debug, Clone, Copy)]
pub struct ValidationCheck {
    /// Index of the switch in the schema.
    pub switch: usize,
    pub kind: CheckKind,
}

impl ValidationCheck {
    pub fn evaluate<T: SwitchTarget + ?Sized>(&self, schema: &Schema, target: &T) -> Option<Violation> {
        let def = &schema.switches()[self.switch];
        let value = target.current(&def.member);
        match self.kind {
            CheckKind::Required => check_required(def, value.as_ref()),
            CheckKind::AllowedValues => check_allowed_values(def, value.as_ref()),
        }
    }
}

/// A caller-defined check, evaluated after every built-in check.
pub struct AdditionalCheck<'a> {
    message: String,
    violated: Box<dyn Fn() -> bool + 'a>,
}

impl<'a> AdditionalCheck<'a> {
    pub fn new(message: impl Into<String>, violated: impl Fn() -> bool + 'a) -> Self {
        Self {
            message: message.into(),
            violated: Box::new(violated),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_violated(&self) -> bool {
        (self.violated)()
    }
}

/// Two checks per switch, switches in declaration order, Required first.
pub fn build_checks(schema: &Schema) -> Vec<ValidationCheck> {
    (0..schema.len())
        .flat_map(|switch| {
            [CheckKind::Required, CheckKind::AllowedValues]
                .map(|kind| ValidationCheck { switch, kind })
        })
        .collect()
}

/// Evaluate every check in order and return the first violation.
pub fn validate<T: SwitchTarget + ?Sized>(schema: &Schema, target: &T) -> Option<Violation> {
    for check in build_checks(schema) {
        if let Some(violation) = check.evaluate(schema, target) {
            debug!(%violation, "validation failed");
            return Some(violation);
        }
    }

    let violation = target
        .additional_checks()
        .into_iter()
        .find(AdditionalCheck::is_violated)
        .map(|check| Violation::Custom(check.message));
    if let Some(ref violation) = violation {
        debug!(%violation, "additional check failed");
    }
    violation
}

fn is_unset(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn check_required(def: &SwitchDefinition, value: Option<&Value>) -> Option<Violation> {
    (def.required && is_unset(value)).then(|| Violation::RequiredMissing(def.name.clone()))
}

fn check_allowed_values(def: &SwitchDefinition, value: Option<&Value>) -> Option<Violation> {
    if def.allowed_values.is_empty() {
        return None;
    }

    // Entries compare against the value's display form ("2.0" never matches 2.0).
    let allowed = match value {
        None | Some(Value::Null) => false,
        Some(Value::Type(handle)) => def.allowed_values.iter().any(|a| handle.matches(a)),
        Some(other) => {
            let shown = other.to_string();
            def.allowed_values.iter().any(|a| eq_ignore_case(a, &shown))
        }
    };
    (!allowed).then(|| Violation::DisallowedValue(def.name.clone()))
}
