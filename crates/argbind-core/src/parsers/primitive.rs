use std::str::FromStr;

use super::{TypeParser, TypeParserRegistry};
use crate::error::ConversionError;
use crate::types::ValueType;
use crate::value::Value;

/// Parser for the scalar types: bool, integers, float, char and string.
pub struct PrimitiveParser;

impl TypeParser for PrimitiveParser {
    fn parse(
        &self,
        raw: &str,
        target: &ValueType,
        _registry: &TypeParserRegistry,
    ) -> Result<Value, ConversionError> {
        match target {
            ValueType::Bool => parse_bool(raw),
            ValueType::Int => parse_number(raw, target).map(Value::Int),
            ValueType::UInt => parse_number(raw, target).map(Value::UInt),
            ValueType::Float => parse_number(raw, target).map(Value::Float),
            ValueType::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Char(c)),
                    _ => Err(invalid(raw, target)),
                }
            }
            ValueType::Str => Ok(Value::Str(raw.to_string())),
            other => Err(ConversionError::Mismatch {
                expected: "primitive type".into(),
                found: other.to_string(),
            }),
        }
    }

    fn accepted_values(&self, target: &ValueType, _registry: &TypeParserRegistry) -> Vec<String> {
        match target {
            ValueType::Bool => vec!["true".into(), "false".into()],
            _ => Vec::new(),
        }
    }
}

/// A bare switch (empty value) means `true`.
fn parse_bool(raw: &str) -> Result<Value, ConversionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(invalid(raw, &ValueType::Bool))
    }
}

fn parse_number<T: FromStr>(raw: &str, target: &ValueType) -> Result<T, ConversionError> {
    raw.trim().parse::<T>().map_err(|_| invalid(raw, target))
}

fn invalid(raw: &str, target: &ValueType) -> ConversionError {
    ConversionError::Invalid {
        raw: raw.to_string(),
        expected: target.to_string(),
    }
}
