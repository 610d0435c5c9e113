use super::{TypeParser, TypeParserRegistry};
use crate::error::ConversionError;
use crate::types::ValueType;
use crate::value::Value;

/// Splits the raw value on the registry's array separator and parses each
/// element with the parser for the element type.
pub struct ArrayParser;

impl TypeParser for ArrayParser {
    fn parse(
        &self,
        raw: &str,
        target: &ValueType,
        registry: &TypeParserRegistry,
    ) -> Result<Value, ConversionError> {
        let element = target.element().ok_or_else(|| ConversionError::Mismatch {
            expected: "array type".into(),
            found: target.to_string(),
        })?;

        if raw.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }

        let parser = registry.get_parser(element)?;
        raw.split(registry.array_separator())
            .map(|item| parser.parse(item.trim(), element, registry))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn accepted_values(&self, target: &ValueType, registry: &TypeParserRegistry) -> Vec<String> {
        target
            .element()
            .map(|element| registry.accepted_values(element))
            .unwrap_or_default()
    }
}
